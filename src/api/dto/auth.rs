/*
 * Responsibility
 * - auth 系の request/response DTO
 * - validation (形式チェック) 用の validate() を持たせる
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.username.trim().is_empty() {
            return Err("username is required");
        }
        if self.username.len() > 50 {
            return Err("username must be <= 50 chars");
        }
        if self.email.trim().is_empty() || !self.email.contains('@') {
            return Err("a valid email is required");
        }
        if self.email.len() > 100 {
            return Err("email must be <= 100 chars");
        }
        if self.password.len() < 8 {
            return Err("password must be at least 8 chars");
        }
        if self.role.trim().is_empty() {
            return Err("role is required");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
}

#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub email: String,
    pub role: &'static str,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> RegisterRequest {
        RegisterRequest {
            username: "alice".to_string(),
            email: "alice@x.com".to_string(),
            password: "long enough".to_string(),
            role: "PROPOSER".to_string(),
        }
    }

    #[test]
    fn accepts_a_well_formed_registration() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn rejects_blank_username_and_bad_email() {
        let mut req = request();
        req.username = "  ".to_string();
        assert!(req.validate().is_err());

        let mut req = request();
        req.email = "not-an-email".to_string();
        assert!(req.validate().is_err());
    }

    #[test]
    fn rejects_short_passwords() {
        let mut req = request();
        req.password = "short".to_string();
        assert!(req.validate().is_err());
    }
}
