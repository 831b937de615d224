/*
 * Responsibility
 * - verification_tokens テーブル向け SQLx 操作
 * - 1 ユーザー 1 トークンの upsert と、消費時の原子的 claim
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, FromRow)]
pub struct ClaimedToken {
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
}

/// Store a token hash for a user, replacing any prior live token.
///
/// The UNIQUE(user_id) constraint makes this a single-statement upsert, so
/// the one-active-token invariant holds even under concurrent re-creation.
pub async fn replace_for_user(
    db: &PgPool,
    user_id: i64,
    token_hash: &[u8],
    expires_at: DateTime<Utc>,
) -> RepoResult<()> {
    sqlx::query(
        r#"
        INSERT INTO verification_tokens (user_id, token_hash, expires_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id) DO UPDATE
        SET token_hash = EXCLUDED.token_hash,
            expires_at = EXCLUDED.expires_at,
            created_at = now()
        "#,
    )
    .bind(user_id)
    .bind(token_hash)
    .bind(expires_at)
    .execute(db)
    .await?;

    Ok(())
}

/// Atomically claim a token by hash: the row is deleted and returned in one
/// statement, so exactly one of N concurrent claimants gets it.
pub async fn claim(db: &PgPool, token_hash: &[u8]) -> RepoResult<Option<ClaimedToken>> {
    let row = sqlx::query_as::<_, ClaimedToken>(
        r#"
        DELETE FROM verification_tokens
        WHERE token_hash = $1
        RETURNING user_id, expires_at
        "#,
    )
    .bind(token_hash)
    .fetch_optional(db)
    .await?;

    Ok(row)
}
