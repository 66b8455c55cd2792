pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod search;
pub mod services;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use axum::Router;
use axum::http::header;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Settings;
use db::Database;
use services::{CreatorDirectory, SearchSessionRegistry, build_creator_directory};

pub struct AppState {
    pub db: Database,
    pub settings: Settings,
    pub start_time: Instant,
    pub creators: Arc<dyn CreatorDirectory>,
    pub sessions: Arc<SearchSessionRegistry>,
}

/// Connect the database, apply migrations and pick the creator directory.
pub async fn build_state(settings: Settings) -> anyhow::Result<Arc<AppState>> {
    let database = Database::connect(&settings)
        .await
        .context("Failed to connect to database")?;

    db::run_migrations(&database.pool, &settings.migrations_dir)
        .await
        .context("Failed to run migrations")?;

    let creators = build_creator_directory(&settings, reqwest::Client::new());

    Ok(Arc::new(AppState {
        db: database,
        settings,
        start_time: Instant::now(),
        creators,
        sessions: Arc::new(SearchSessionRegistry::new()),
    }))
}

pub fn build_router(state: Arc<AppState>) -> Router {
    use axum::routing::get;
    use routes::{analytics, creators, health, influencers, openapi, websocket};

    let cors = build_cors(&state.settings);

    Router::new()
        // Health
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/status", get(health::status))
        // Influencers
        .route(
            "/api/v1/influencers",
            get(influencers::list_influencers).post(influencers::create_influencer),
        )
        .route(
            "/api/v1/influencers/{influencer_id}",
            get(influencers::get_influencer),
        )
        // Creators
        .route("/api/v1/creators/search", get(creators::search_creators))
        .route("/api/v1/creators/{creator_id}", get(creators::get_creator))
        // Analytics
        .route("/api/v1/analytics/overview", get(analytics::overview))
        // Search session
        .route("/api/v1/search/ws", get(websocket::search_ws))
        .merge(openapi::swagger_ui())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

pub fn init_tracing(settings: &Settings) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    if settings.log_format == "json" {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .init();
    } else {
        fmt().with_env_filter(filter).with_target(true).init();
    }
}

fn build_cors(settings: &Settings) -> CorsLayer {
    let origins = settings.cors_origins_list();

    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let allowed: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        use axum::http::Method;
        CorsLayer::new()
            .allow_origin(allowed)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([
                header::AUTHORIZATION,
                header::CONTENT_TYPE,
                header::ACCEPT,
                header::ORIGIN,
            ])
            .allow_credentials(true)
    }
}
