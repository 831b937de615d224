/*
 * Responsibility
 * - /users 系 handler
 * - /users/profile は self-service: 対象は AuthCtx の subject から導出する
 *   (client 指定の id は一切受け取らない)
 * - それ以外は admin 専用 (routes 側で require_admin を適用済み)
 */
use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::dto::users::{UpdateProfileRequest, UpdateUserRequest, UserResponse};
use crate::api::extractors::AuthCtxExtractor;
use crate::error::AppError;
use crate::repos::user_repo::{self, UserPatch};
use crate::services::auth::Role;
use crate::state::AppState;

// === self-service ===

pub async fn get_profile(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<UserResponse>, AppError> {
    let row = user_repo::find_by_email(&state.db, &ctx.subject)
        .await
        .map_err(AppError::from)?
        .ok_or(AppError::not_found("user"))?;

    Ok(Json(row.into()))
}

pub async fn update_profile(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, AppError> {
    req.validate().map_err(AppError::InvalidRequest)?;

    let row = user_repo::update_profile(
        &state.db,
        &ctx.subject,
        req.full_name.as_deref(),
        req.phone_number.as_deref(),
        req.city.as_deref(),
        req.profile_picture_url.as_deref(),
    )
    .await
    .map_err(AppError::from)?
    .ok_or(AppError::not_found("user"))?;

    Ok(Json(row.into()))
}

// === admin ===

pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let rows = user_repo::list(&state.db).await.map_err(AppError::from)?;
    Ok(Json(rows.into_iter().map(UserResponse::from).collect()))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, AppError> {
    let row = user_repo::find_by_id(&state.db, id)
        .await
        .map_err(AppError::from)?
        .ok_or(AppError::not_found("user"))?;

    Ok(Json(row.into()))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    req.validate().map_err(AppError::InvalidRequest)?;

    // The role, when present, must come from the closed set.
    let role = match &req.role {
        Some(r) => Some(Role::from_str(r).map_err(|_| AppError::InvalidRole)?),
        None => None,
    };

    let patch = UserPatch {
        username: req.username.as_deref(),
        email: req.email.as_deref(),
        role: role.map(|r| r.as_str()),
        enabled: req.enabled,
        full_name: req.full_name.as_deref(),
        phone_number: req.phone_number.as_deref(),
        city: req.city.as_deref(),
        profile_picture_url: req.profile_picture_url.as_deref(),
    };

    let row = user_repo::admin_update(&state.db, id, patch)
        .await
        .map_err(AppError::from)?
        .ok_or(AppError::not_found("user"))?;

    Ok(Json(row.into()))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let deleted = user_repo::delete(&state.db, id)
        .await
        .map_err(AppError::from)?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("user"))
    }
}

pub async fn list_users_by_role(
    State(state): State<AppState>,
    Path(role): Path<String>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let role = Role::from_str(&role).map_err(|_| AppError::InvalidRole)?;

    let rows = user_repo::list_by_role(&state.db, role.as_str())
        .await
        .map_err(AppError::from)?;

    Ok(Json(rows.into_iter().map(UserResponse::from).collect()))
}
