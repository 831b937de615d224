use tracing::error;

use crate::error::AppError;

/// bcrypt cost factor.
const BCRYPT_COST: u32 = 10;

/// Hash a raw password for storage (one-way, salted).
pub fn hash(password: &str) -> Result<String, AppError> {
    bcrypt::hash(password, BCRYPT_COST).map_err(|e| {
        error!(error = %e, "bcrypt hash failed");
        AppError::Internal
    })
}

/// Check a raw password against a stored hash.
pub fn verify(password: &str, password_hash: &str) -> Result<bool, AppError> {
    bcrypt::verify(password, password_hash).map_err(|e| {
        error!(error = %e, "bcrypt verify failed");
        AppError::Internal
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_accepts_the_original_password() {
        let hashed = hash("hunter2!").unwrap();
        assert!(verify("hunter2!", &hashed).unwrap());
    }

    #[test]
    fn verify_rejects_a_different_password() {
        let hashed = hash("hunter2!").unwrap();
        assert!(!verify("hunter3!", &hashed).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        assert_ne!(hash("same-password").unwrap(), hash("same-password").unwrap());
    }
}
