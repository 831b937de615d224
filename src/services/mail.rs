/*
 * Responsibility
 * - 確認メール送信の境界 (trait Mailer)
 * - 実トランスポートは外部コラボレータ。ここでは契約と dev 用実装のみ
 */
use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail transport failed: {0}")]
    Transport(String),
}

/// Outbound mail boundary. The core only needs "notify this address with
/// this verification token"; everything else belongs to the transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_verification(&self, to: &str, token: &str) -> Result<(), MailError>;
}

/// Development transport: writes the verification link to the log instead
/// of sending anything.
pub struct LogMailer {
    public_base_url: String,
}

impl LogMailer {
    pub fn new(public_base_url: String) -> Self {
        Self { public_base_url }
    }
}

#[async_trait]
impl Mailer for LogMailer {
    async fn send_verification(&self, to: &str, token: &str) -> Result<(), MailError> {
        let link = format!("{}/auth/verify?token={}", self.public_base_url, token);
        info!(to = %to, link = %link, "verification email (log transport)");
        Ok(())
    }
}
