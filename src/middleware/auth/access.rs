//! Bearer トークン検証 → AuthCtx を extensions に入れる
//!
//! 方針:
//! - 公開パス (allow-list) 以外は全リクエストが `Authorization: Bearer <jwt>` 必須
//! - 検証失敗の理由は外に出さない。粗い 401 のみ（enumeration 対策）
//! - セッション状態は持たない。毎リクエスト、トークンから再認証する

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

/// Paths that bypass authentication entirely. Registration, login and email
/// verification must be reachable without a token; health/metrics/docs are
/// operational surfaces; the error path must never require auth.
const PUBLIC_PREFIXES: &[&str] = &["/auth", "/health", "/metrics", "/docs", "/error"];

/// アプリ全体に認証を掛けるための middleware を適用する。
///
/// 例：
/// ```ignore
/// let app = middleware::auth::access::apply(api::routes(), state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if is_public(req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let auth = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth.strip_prefix("Bearer ").ok_or(AppError::Unauthorized)?;

    // 署名・構造・期限は TokenService 側で検証する
    let verified = match state.tokens.verify(token) {
        Ok(v) => v,
        Err(err) => {
            tracing::warn!(
                error = %err,
                path = %req.uri().path(),
                "session token verification failed"
            );
            return Err(AppError::Unauthorized);
        }
    };

    let auth_ctx = AuthCtx::new(verified.subject, verified.role);

    // middleware → extractor への受け渡し。このリクエストの間だけ生きる
    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}

fn is_public(path: &str) -> bool {
    PUBLIC_PREFIXES
        .iter()
        .any(|p| path == *p || (path.starts_with(p) && path.as_bytes().get(p.len()) == Some(&b'/')))
}

#[cfg(test)]
mod tests {
    use super::is_public;

    #[test]
    fn auth_flow_paths_are_public() {
        assert!(is_public("/auth/register"));
        assert!(is_public("/auth/verify"));
        assert!(is_public("/auth/login"));
        assert!(is_public("/auth/validate"));
    }

    #[test]
    fn operational_paths_are_public() {
        assert!(is_public("/health"));
        assert!(is_public("/metrics"));
        assert!(is_public("/docs"));
        assert!(is_public("/docs/openapi.json"));
        assert!(is_public("/error"));
    }

    #[test]
    fn everything_else_requires_auth() {
        assert!(!is_public("/users"));
        assert!(!is_public("/users/profile"));
        assert!(!is_public("/users/role/ADMIN"));
        assert!(!is_public("/"));
        assert!(!is_public("/authx"));
        assert!(!is_public("/healthcheck"));
    }
}
