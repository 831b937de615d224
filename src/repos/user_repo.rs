/*
 * Responsibility
 * - users テーブル向け SQLx 操作
 * - PgPool を受け取り CRUD を提供
 * - DB エラーは RepoError/AppError に変換しやすい形で返す
 * - 一意制約違反 (username/email) は RepoError::Conflict として返す
 */
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub enabled: bool,
    pub role: String,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub city: Option<String>,
    pub profile_picture_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update for the admin endpoint. A `None` field is left unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserPatch<'a> {
    pub username: Option<&'a str>,
    pub email: Option<&'a str>,
    pub role: Option<&'a str>,
    pub enabled: Option<bool>,
    pub full_name: Option<&'a str>,
    pub phone_number: Option<&'a str>,
    pub city: Option<&'a str>,
    pub profile_picture_url: Option<&'a str>,
}

const USER_COLUMNS: &str = r#"
    id, username, email, password_hash, enabled, role,
    full_name, phone_number, city, profile_picture_url,
    created_at, updated_at
"#;

pub async fn create(
    db: &PgPool,
    username: &str,
    email: &str,
    password_hash: &str,
    role: &str,
) -> RepoResult<UserRow> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        r#"
        INSERT INTO users (username, email, password_hash, enabled, role)
        VALUES ($1, $2, $3, FALSE, $4)
        RETURNING {USER_COLUMNS}
        "#,
    ))
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_one(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

pub async fn find_by_email(db: &PgPool, email: &str) -> RepoResult<Option<UserRow>> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users
        WHERE email = $1
        "#,
    ))
    .bind(email)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn find_by_id(db: &PgPool, id: i64) -> RepoResult<Option<UserRow>> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users
        WHERE id = $1
        "#,
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

pub async fn list(db: &PgPool) -> RepoResult<Vec<UserRow>> {
    let rows = sqlx::query_as::<_, UserRow>(&format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users
        ORDER BY created_at DESC
        "#,
    ))
    .fetch_all(db)
    .await?;

    Ok(rows)
}

pub async fn list_by_role(db: &PgPool, role: &str) -> RepoResult<Vec<UserRow>> {
    let rows = sqlx::query_as::<_, UserRow>(&format!(
        r#"
        SELECT {USER_COLUMNS}
        FROM users
        WHERE role = $1
        ORDER BY created_at DESC
        "#,
    ))
    .bind(role)
    .fetch_all(db)
    .await?;

    Ok(rows)
}

/// Self-service profile update. The target row is addressed by the
/// authenticated subject's email, never by a client-supplied id.
pub async fn update_profile(
    db: &PgPool,
    email: &str,
    full_name: Option<&str>,
    phone_number: Option<&str>,
    city: Option<&str>,
    profile_picture_url: Option<&str>,
) -> RepoResult<Option<UserRow>> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        r#"
        UPDATE users
        SET
            full_name = COALESCE($2, full_name),
            phone_number = COALESCE($3, phone_number),
            city = COALESCE($4, city),
            profile_picture_url = COALESCE($5, profile_picture_url),
            updated_at = now()
        WHERE email = $1
        RETURNING {USER_COLUMNS}
        "#,
    ))
    .bind(email)
    .bind(full_name)
    .bind(phone_number)
    .bind(city)
    .bind(profile_picture_url)
    .fetch_optional(db)
    .await?;

    Ok(row)
}

/// Admin update by explicit id. Uniqueness of a changed username/email is
/// enforced by the store and surfaces as `RepoError::Conflict`.
pub async fn admin_update(
    db: &PgPool,
    id: i64,
    patch: UserPatch<'_>,
) -> RepoResult<Option<UserRow>> {
    let row = sqlx::query_as::<_, UserRow>(&format!(
        r#"
        UPDATE users
        SET
            username = COALESCE($2, username),
            email = COALESCE($3, email),
            role = COALESCE($4, role),
            enabled = COALESCE($5, enabled),
            full_name = COALESCE($6, full_name),
            phone_number = COALESCE($7, phone_number),
            city = COALESCE($8, city),
            profile_picture_url = COALESCE($9, profile_picture_url),
            updated_at = now()
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#,
    ))
    .bind(id)
    .bind(patch.username)
    .bind(patch.email)
    .bind(patch.role)
    .bind(patch.enabled)
    .bind(patch.full_name)
    .bind(patch.phone_number)
    .bind(patch.city)
    .bind(patch.profile_picture_url)
    .fetch_optional(db)
    .await
    .map_err(RepoError::from_sqlx)?;

    Ok(row)
}

/// Flip an account to enabled. The only caller is the verification flow.
pub async fn enable(db: &PgPool, id: i64) -> RepoResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET enabled = TRUE, updated_at = now()
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete(db: &PgPool, id: i64) -> RepoResult<bool> {
    // Any live verification token goes with the row (FK ON DELETE CASCADE).
    let result = sqlx::query(
        r#"
        DELETE FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}
