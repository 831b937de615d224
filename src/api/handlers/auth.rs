/*
 * Responsibility
 * - /auth 系 handler (register / verify / login / validate)
 * - DTO validation → service/repo 呼び出し → 粗いエラーカテゴリへの変換
 * - いずれも公開エンドポイント。認証失敗の詳細は外に出さない
 */
use std::str::FromStr;

use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use tracing::{error, info};

use crate::api::dto::auth::{
    LoginRequest, RegisterRequest, RegisterResponse, TokenResponse, ValidateResponse, VerifyQuery,
};
use crate::error::AppError;
use crate::repos::user_repo;
use crate::services::auth::{Role, VerificationOutcome, password};
use crate::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    req.validate().map_err(AppError::InvalidRequest)?;
    let role = Role::from_str(&req.role).map_err(|_| AppError::InvalidRole)?;

    let password_hash = password::hash(&req.password)?;

    // No existence pre-check: the store's unique constraints are the
    // serialization point, so concurrent registrations of the same email
    // resolve to exactly one winner.
    let user = user_repo::create(
        &state.db,
        req.username.trim(),
        &req.email,
        &password_hash,
        role.as_str(),
    )
    .await
    .map_err(AppError::from)?;

    let token = state.verification.create(user.id).await?;

    state
        .mailer
        .send_verification(&user.email, &token)
        .await
        .map_err(|e| {
            error!(user_id = user.id, error = %e, "failed to send verification email");
            AppError::Internal
        })?;

    info!(user_id = user.id, role = %role, "account registered, verification pending");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: format!(
                "The {} account has been created. Verify your email to activate it.",
                role.as_str().to_lowercase()
            ),
        }),
    ))
}

pub async fn verify_email(
    State(state): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> Result<impl IntoResponse, AppError> {
    let outcome = state.verification.consume(&query.token).await?;

    // The browser lands on a generic success/failure page either way;
    // token internals (unknown vs expired) are never exposed.
    let status = match outcome {
        VerificationOutcome::Verified => "success",
        VerificationOutcome::NotFound | VerificationOutcome::Expired => "failed",
    };

    let location = format!("{}?status={}", state.verified_redirect_url, status);
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    // Unknown email and wrong password collapse into the same rejection.
    let user = user_repo::find_by_email(&state.db, &req.email)
        .await
        .map_err(AppError::from)?
        .ok_or(AppError::Unauthorized)?;

    if !password::verify(&req.password, &user.password_hash)? {
        return Err(AppError::Unauthorized);
    }

    // Correct credentials, but the email was never verified.
    if !user.enabled {
        return Err(AppError::AccountDisabled);
    }

    let role = Role::from_str(&user.role).map_err(|_| {
        error!(user_id = user.id, role = %user.role, "stored role outside the closed set");
        AppError::Internal
    })?;

    let access_token = state.tokens.issue(&user.email, role)?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.tokens.ttl_seconds(),
    }))
}

/// Validates a header-supplied token without touching the store. Public:
/// other services use this to check tokens they were handed.
pub async fn validate_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ValidateResponse>, AppError> {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth.strip_prefix("Bearer ").ok_or(AppError::Unauthorized)?;

    let verified = state
        .tokens
        .verify(token)
        .map_err(|_| AppError::Unauthorized)?;

    Ok(Json(ValidateResponse {
        valid: true,
        email: verified.subject,
        role: verified.role.as_str(),
        expires_at: verified.expires_at,
    }))
}
