/*
 * Responsibility
 * - 環境変数や設定の読み込み (DATABASE_URL, 署名シークレット, TTL など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - 起動時に一度だけ読む。以後は read-only
 */
use std::net::SocketAddr;
use std::str::FromStr;
use std::{env, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub database_url: String,

    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    // HMAC signing secret for session tokens. Process-wide, never rotated
    // while the process runs.
    pub token_secret: String,
    // Token lifetimes (seconds)
    pub token_ttl_seconds: u64,
    pub verification_token_ttl_seconds: u64,

    // Base URL used to build the verification link sent by mail.
    pub public_base_url: String,
    // Front-end page the verification endpoint redirects to.
    pub verified_redirect_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let app_env = AppEnv::from_env();

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let token_secret =
            env::var("AUTH_TOKEN_SECRET").map_err(|_| ConfigError::Missing("AUTH_TOKEN_SECRET"))?;
        // HS256 wants a key at least as wide as its output.
        if token_secret.len() < 32 {
            return Err(ConfigError::Invalid("AUTH_TOKEN_SECRET"));
        }

        let token_ttl_seconds = env::var("TOKEN_TTL_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(86_400); // 24h
        let verification_token_ttl_seconds = env::var("VERIFICATION_TOKEN_TTL_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(86_400); // 24h

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", port));
        let verified_redirect_url = env::var("VERIFIED_REDIRECT_URL")
            .unwrap_or_else(|_| "http://localhost:3000/verified".to_string());

        Ok(Config {
            addr,
            database_url,
            app_env,
            cors_allowed_origins,
            token_secret,
            token_ttl_seconds,
            verification_token_ttl_seconds,
            public_base_url,
            verified_redirect_url,
        })
    }
}
