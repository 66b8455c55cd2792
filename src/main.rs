use vetta_api::config::Settings;
use vetta_api::{build_router, build_state, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let settings = Settings::from_env();
    init_tracing(&settings);

    tracing::info!(
        app = %settings.app_name,
        version = %settings.app_version,
        creator_search = %settings.creator_search_mode,
        "Starting server"
    );

    let addr = format!("{}:{}", settings.host, settings.port);
    let state = build_state(settings).await?;
    let app = build_router(state);

    tracing::info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
