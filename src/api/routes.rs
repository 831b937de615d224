/*
 * Responsibility
 * - URL 構造を定義 (/auth, /users, /health)
 * - ADMIN が必要な範囲を route_layer で適用する
 *
 * Notes
 * - 認証ゲート自体は app.rs で router 全体に適用する (allow-list は gate 側)
 * - /users/profile は self-service。admin サブツリーには入れない
 */
use axum::{
    Router,
    middleware,
    routing::{get, post},
};

use crate::api::handlers::{
    auth::{login, register, validate_token, verify_email},
    health::health,
    users::{
        delete_user, get_profile, get_user, list_users, list_users_by_role, update_profile,
        update_user,
    },
};
use crate::middleware::auth::policy;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    let admin = Router::new()
        .route("/users", get(list_users))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/users/role/{role}", get(list_users_by_role))
        .route_layer(middleware::from_fn(policy::require_admin));

    Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(register))
        .route("/auth/verify", get(verify_email))
        .route("/auth/login", post(login))
        .route("/auth/validate", get(validate_token))
        .route("/users/profile", get(get_profile).put(update_profile))
        .merge(admin)
}
