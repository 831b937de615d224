/*
 * Responsibility
 * - repos の公開インターフェース (re-export)
 */
pub mod error;
pub mod user_repo;
pub mod verification_token_repo;
