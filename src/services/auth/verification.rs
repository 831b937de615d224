use chrono::{DateTime, Duration as ChronoDuration, Utc};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use tracing::{debug, error};

use crate::error::AppError;
use crate::repos::{user_repo, verification_token_repo};

/// Outcome of presenting a verification token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// Token accepted; the owning account is now enabled.
    Verified,
    /// No live token matches (unknown, already consumed, or replaced).
    NotFound,
    /// Token matched but its expiry window had closed.
    Expired,
}

/// Gates account activation behind a single-use, time-boxed secret.
///
/// The raw token only ever travels in the verification link; the store keeps
/// a SHA-256 hash. At most one live token exists per account: `create`
/// replaces any prior one, and a successful `consume` deletes the row.
#[derive(Clone, Debug)]
pub struct VerificationTokenManager {
    pool: PgPool,
    ttl_seconds: u64,
}

impl VerificationTokenManager {
    pub fn new(pool: PgPool, ttl_seconds: u64) -> Self {
        Self { pool, ttl_seconds }
    }

    /// Mint a fresh activation token for `user_id` and persist its hash,
    /// replacing any earlier live token for the same account.
    ///
    /// Returns the raw token string for the mail collaborator.
    pub async fn create(&self, user_id: i64) -> Result<String, AppError> {
        let token = generate_token();
        let token_hash = hash_token(&token);
        let expires_at = Utc::now() + ChronoDuration::seconds(self.ttl_seconds as i64);

        verification_token_repo::replace_for_user(&self.pool, user_id, &token_hash, expires_at)
            .await
            .map_err(|e| {
                error!(user_id, error = %e, "failed to store verification token");
                AppError::Internal
            })?;

        Ok(token)
    }

    /// Consume a presented token against the current clock.
    pub async fn consume(&self, token: &str) -> Result<VerificationOutcome, AppError> {
        self.consume_at(token, Utc::now()).await
    }

    /// Claim-then-enable with an explicit clock.
    ///
    /// The claim is a single `DELETE .. RETURNING`, so of N concurrent
    /// presenters exactly one wins the row; the rest see `NotFound`. Only
    /// the winner of an unexpired token flips the account to enabled.
    pub async fn consume_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<VerificationOutcome, AppError> {
        let claimed = verification_token_repo::claim(&self.pool, &hash_token(token))
            .await
            .map_err(|e| {
                error!(error = %e, "failed to claim verification token");
                AppError::Internal
            })?;

        let Some(claimed) = claimed else {
            debug!("verification token not found");
            return Ok(VerificationOutcome::NotFound);
        };

        if expired(claimed.expires_at, now) {
            debug!(user_id = claimed.user_id, "verification token expired");
            return Ok(VerificationOutcome::Expired);
        }

        user_repo::enable(&self.pool, claimed.user_id)
            .await
            .map_err(|e| {
                error!(user_id = claimed.user_id, error = %e, "failed to enable account");
                AppError::Internal
            })?;

        Ok(VerificationOutcome::Verified)
    }
}

// The boundary is exclusive of validity: a token presented exactly at its
// expiry instant is already dead.
fn expired(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now >= expires_at
}

fn generate_token() -> String {
    // 32 bytes of entropy -> URL-safe base64 without padding.
    let mut bytes = [0u8; 32];
    getrandom::fill(&mut bytes).expect("getrandom failed");

    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    URL_SAFE_NO_PAD.encode(bytes)
}

fn hash_token(token: &str) -> Vec<u8> {
    // sha256(token) -> raw 32 bytes (stored as BYTEA)
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn tokens_are_long_and_unique() {
        let a = generate_token();
        let b = generate_token();
        // 32 bytes -> 43 base64url chars, link-safe
        assert_eq!(a.len(), 43);
        assert!(!a.contains('='));
        assert_ne!(a, b);
    }

    #[test]
    fn token_hash_is_deterministic_and_fixed_width() {
        let token = generate_token();
        assert_eq!(hash_token(&token), hash_token(&token));
        assert_eq!(hash_token(&token).len(), 32);
        assert_ne!(hash_token(&token), hash_token("something else"));
    }

    #[test]
    fn expiry_boundary_is_exclusive_of_validity() {
        let at = Utc::now();
        assert!(expired(at, at));
        assert!(expired(at, at + Duration::seconds(1)));
        assert!(!expired(at, at - Duration::seconds(1)));
    }
}
