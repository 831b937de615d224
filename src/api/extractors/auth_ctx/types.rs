/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - トークン検証ロジックは middleware/services 側の責務
 * - リクエスト終了とともに破棄される。thread-local や global には置かない
 */

use crate::services::auth::Role;

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `subject` はトークンの sub (検証済みメールアドレス)
/// - `role` は閉じた集合のロール。粒度の細かい認可は policy 層でチェック
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub subject: String,
    pub role: Role,
}

impl AuthCtx {
    pub fn new(subject: String, role: Role) -> Self {
        Self { subject, role }
    }
}
