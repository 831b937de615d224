/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use sqlx::PgPool;

use crate::services::auth::{TokenService, VerificationTokenManager};
use crate::services::mail::Mailer;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub tokens: Arc<TokenService>,
    pub verification: Arc<VerificationTokenManager>,
    pub mailer: Arc<dyn Mailer>,
    pub verified_redirect_url: String,
}
