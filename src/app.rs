/*
 * Responsibility
 * - Config読み込み → 依存生成 → Router 組み立て
 * - Middleware の適用 (CORS / 認証ゲート など)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::Result;
use axum::Router;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::middleware;
use crate::services::auth::{TokenService, VerificationTokenManager};
use crate::services::mail::{LogMailer, Mailer};
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,auth_api=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing so they don't get "lost"
        // (stderr can be hidden depending on how the process is launched.)
        tracing::error!(?info, "panic");

        // In development, fail fast: crash the whole process so we notice immediately.
        // In production, prefer the default behavior (stderr) and let the server keep running.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;

    let abort_on_panic = !config.app_env.is_production();
    init_panic_hook(abort_on_panic);

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&db).await?;

    let state = build_state(db, &config);
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Build process-level services and inject them into the shared application state.
pub fn build_state(db: PgPool, config: &Config) -> AppState {
    let tokens = Arc::new(TokenService::new(
        config.token_secret.as_bytes(),
        config.token_ttl_seconds,
    ));
    let verification = Arc::new(VerificationTokenManager::new(
        db.clone(),
        config.verification_token_ttl_seconds,
    ));
    let mailer: Arc<dyn Mailer> = Arc::new(LogMailer::new(config.public_base_url.clone()));

    AppState {
        db,
        tokens,
        verification,
        mailer,
        verified_redirect_url: config.verified_redirect_url.clone(),
    }
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    // The gate wraps every route; its allow-list decides what stays public.
    let app = middleware::auth::access::apply(api::routes(), state.clone());
    let app = app.with_state(state);

    let app = middleware::http::apply(app);
    middleware::cors::apply(app, config)
}
