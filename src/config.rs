use std::env;
use std::str::FromStr;
use std::time::Duration;

use strum::{AsRefStr, Display, EnumString};

const MIN_DEBOUNCE_MS: u64 = 300;
const MAX_DEBOUNCE_MS: u64 = 500;

/// Which creator directory backs creator search. Picked once when state is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum CreatorSearchMode {
    Mock,
    Live,
}

#[derive(Debug, Clone)]
pub struct Settings {
    // App
    pub app_name: String,
    pub app_version: String,
    pub environment: String,
    pub host: String,
    pub port: u16,

    // Database
    pub database_path: String,
    pub database_pool_size: u32,
    pub database_pool_timeout: u64,
    pub migrations_dir: String,

    // JWT
    pub jwt_secret_key: String,
    pub jwt_issuer: String,

    // Creator search (InsightIQ)
    pub creator_search_mode: CreatorSearchMode,
    pub insightiq_api_base: String,
    pub insightiq_api_key: Option<String>,
    pub insightiq_timeout: u64,
    pub mock_latency_ms: u64,

    // Search pipeline
    pub search_debounce_ms: u64,
    pub search_page_size: u32,

    // CORS
    pub cors_origins: String,

    // Logging
    pub log_level: String,
    pub log_format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "Vetta Influencer API".into(),
            app_version: "1.0.0".into(),
            environment: "development".into(),
            host: "0.0.0.0".into(),
            port: 8000,

            database_path: "data/vetta.db".into(),
            database_pool_size: 10,
            database_pool_timeout: 30,
            migrations_dir: default_migrations_dir(),

            jwt_secret_key: String::new(),
            jwt_issuer: "vetta_auth".into(),

            creator_search_mode: CreatorSearchMode::Mock,
            insightiq_api_base: "https://api.insightiq.ai/v1".into(),
            insightiq_api_key: None,
            insightiq_timeout: 30,
            mock_latency_ms: 800,

            search_debounce_ms: 400,
            search_page_size: 20,

            cors_origins: "*".into(),

            log_level: "info".into(),
            log_format: "json".into(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let insightiq_api_key = env::var("INSIGHTIQ_API_KEY")
            .ok()
            .filter(|s| !s.is_empty());

        // Live only makes sense with a key; without one the mock directory is used.
        let creator_search_mode = env::var("CREATOR_SEARCH_MODE")
            .ok()
            .and_then(|s| CreatorSearchMode::from_str(&s).ok())
            .unwrap_or(if insightiq_api_key.is_some() {
                CreatorSearchMode::Live
            } else {
                CreatorSearchMode::Mock
            });

        Self {
            app_name: env::var("APP_NAME").unwrap_or(defaults.app_name),
            app_version: env::var("APP_VERSION").unwrap_or(defaults.app_version),
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_env("PORT", defaults.port),

            database_path: env::var("DATABASE_PATH").unwrap_or(defaults.database_path),
            database_pool_size: parse_env("DATABASE_POOL_SIZE", defaults.database_pool_size),
            database_pool_timeout: parse_env(
                "DATABASE_POOL_TIMEOUT",
                defaults.database_pool_timeout,
            ),
            migrations_dir: env::var("MIGRATIONS_DIR").unwrap_or(defaults.migrations_dir),

            jwt_secret_key: env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY is required"),
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or(defaults.jwt_issuer),

            creator_search_mode,
            insightiq_api_base: env::var("INSIGHTIQ_API_BASE")
                .unwrap_or(defaults.insightiq_api_base),
            insightiq_api_key,
            insightiq_timeout: parse_env("INSIGHTIQ_TIMEOUT", defaults.insightiq_timeout),
            mock_latency_ms: parse_env("MOCK_LATENCY_MS", defaults.mock_latency_ms),

            search_debounce_ms: parse_env("SEARCH_DEBOUNCE_MS", defaults.search_debounce_ms)
                .clamp(MIN_DEBOUNCE_MS, MAX_DEBOUNCE_MS),
            search_page_size: parse_env("SEARCH_PAGE_SIZE", defaults.search_page_size)
                .clamp(1, 100),

            cors_origins: env::var("CORS_ORIGINS").unwrap_or(defaults.cors_origins),

            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_format: env::var("LOG_FORMAT").unwrap_or(defaults.log_format),
        }
    }

    pub fn cors_origins_list(&self) -> Vec<String> {
        if self.cors_origins == "*" {
            return vec!["*".to_string()];
        }
        self.cors_origins
            .split(',')
            .map(|s| s.trim().to_string())
            .collect()
    }

    #[inline]
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    #[inline]
    pub fn mock_latency(&self) -> Duration {
        Duration::from_millis(self.mock_latency_ms)
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn default_migrations_dir() -> String {
    if std::path::Path::new("/app/migrations/sqlite").exists() {
        "/app/migrations/sqlite".into()
    } else {
        "./migrations/sqlite".into()
    }
}
