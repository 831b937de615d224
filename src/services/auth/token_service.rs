use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tracing::error;

use crate::error::AppError;
use crate::services::auth::role::Role;

/// Claims carried by a session token (compact JWS, HS256).
///
/// `sub` is the verified email address of the account; `role` is the
/// canonical uppercase spelling of one of the closed-set roles.
#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    role: String,
    iat: i64,
    exp: i64,
}

/// Typed verification failures. Callers translate these into a single
/// coarse rejection; the distinction exists for logging and tests.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("invalid token signature")]
    SignatureInvalid,
    #[error("token expired")]
    Expired,
}

/// A token that passed signature, structure and expiry checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedToken {
    pub subject: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies HMAC-signed session tokens.
///
/// The signing secret is process-wide configuration, loaded once at startup.
/// Issue/verify touch no shared mutable state and are safe under unbounded
/// concurrent calls.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: u64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenService")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl TokenService {
    pub fn new(secret: &[u8], ttl_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked explicitly in verify_at (strict `now >= exp`,
        // no leeway), so the library-side exp check is disabled.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl_seconds,
        }
    }

    /// Issue a signed session token for an authenticated subject.
    pub fn issue(&self, subject: &str, role: Role) -> Result<String, AppError> {
        self.issue_at(subject, role, Utc::now())
    }

    /// Issuance with an explicit clock. `exp = now + ttl`.
    pub fn issue_at(
        &self,
        subject: &str,
        role: Role,
        now: DateTime<Utc>,
    ) -> Result<String, AppError> {
        let iat = now.timestamp();
        let claims = SessionClaims {
            sub: subject.to_string(),
            role: role.as_str().to_string(),
            iat,
            exp: iat + self.ttl_seconds as i64,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(
            |e| {
                error!(error = %e, "failed to sign session token");
                AppError::Internal
            },
        )
    }

    /// Verify a presented token against the current clock.
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verification as a pure function of (token, key, now).
    ///
    /// Signature and structure are checked first; expiry is strict
    /// (`now >= exp` is expired), with no clock-skew compensation.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedToken, TokenError> {
        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            })?;

        let claims = data.claims;
        if now.timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        // We only ever sign closed-set roles, so anything else means the
        // payload is not one of ours.
        let role = Role::from_str(&claims.role).map_err(|_| TokenError::Malformed)?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or(TokenError::Malformed)?;

        Ok(VerifiedToken {
            subject: claims.sub,
            role,
            expires_at,
        })
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const SECRET: &[u8] = b"test-secret-test-secret-test-secret!";
    const TTL: u64 = 86_400;

    fn service() -> TokenService {
        TokenService::new(SECRET, TTL)
    }

    #[test]
    fn issue_verify_round_trip_preserves_subject_and_role() {
        let svc = service();
        for (subject, role) in [
            ("alice@x.com", Role::Proposer),
            ("bob@y.org", Role::Admin),
            ("carol@z.net", Role::Visitor),
        ] {
            let token = svc.issue(subject, role).unwrap();
            let verified = svc.verify(&token).unwrap();
            assert_eq!(verified.subject, subject);
            assert_eq!(verified.role, role);
        }
    }

    #[test]
    fn expiry_boundary_is_exclusive_of_validity() {
        let svc = service();
        let issued = Utc::now();
        let token = svc.issue_at("alice@x.com", Role::Proposer, issued).unwrap();
        let exp = issued + Duration::seconds(TTL as i64);

        // one second before exp: still valid
        assert!(svc.verify_at(&token, exp - Duration::seconds(1)).is_ok());
        // exactly at exp: already expired
        assert_eq!(svc.verify_at(&token, exp), Err(TokenError::Expired));
        assert_eq!(
            svc.verify_at(&token, exp + Duration::hours(1)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn tampered_signature_is_rejected_as_signature_invalid() {
        let svc = service();
        let token = svc.issue("alice@x.com", Role::Proposer).unwrap();

        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        assert_eq!(parts.len(), 3);
        // flip one character of the signature segment, staying inside the
        // base64url alphabet so the failure is the MAC, not the decode
        let replacement = if parts[2].starts_with('A') { 'B' } else { 'A' };
        parts[2] = format!("{}{}", replacement, &parts[2][1..]);
        let tampered = parts.join(".");

        assert_eq!(
            svc.verify(&tampered),
            Err(TokenError::SignatureInvalid)
        );
    }

    #[test]
    fn tampered_payload_breaks_the_signature() {
        let svc = service();
        let token = svc.issue("alice@x.com", Role::Proposer).unwrap();

        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let replacement = if parts[1].starts_with('e') { 'f' } else { 'e' };
        parts[1] = format!("{}{}", replacement, &parts[1][1..]);
        let tampered = parts.join(".");

        // either the MAC mismatches or the payload no longer parses;
        // in both cases the token must not verify
        assert!(svc.verify(&tampered).is_err());
    }

    #[test]
    fn structurally_broken_tokens_are_malformed() {
        let svc = service();
        assert_eq!(svc.verify("not-a-token"), Err(TokenError::Malformed));
        assert_eq!(svc.verify("a.b"), Err(TokenError::Malformed));
        assert_eq!(svc.verify(""), Err(TokenError::Malformed));
    }

    #[test]
    fn token_signed_with_another_key_is_rejected() {
        let svc = service();
        let other = TokenService::new(b"another-secret-another-secret-!!", TTL);
        let token = other.issue("alice@x.com", Role::Admin).unwrap();
        assert_eq!(svc.verify(&token), Err(TokenError::SignatureInvalid));
    }
}
