pub mod password;
pub mod role;
pub mod token_service;
pub mod verification;

pub use role::Role;
pub use token_service::{TokenError, TokenService, VerifiedToken};
pub use verification::{VerificationOutcome, VerificationTokenManager};
