use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use trendboard::api;
use trendboard::config::Config;
use trendboard::services::{RefreshScheduler, Session, SqliteStore};
use trendboard::sources::TaapiClient;
use trendboard::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trendboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Arc::new(Config::from_env());
    info!("Starting Trendboard server on {}:{}", config.host, config.port);

    let client = TaapiClient::new(
        config.provider.base_url.clone(),
        config.api_key()?,
        config.provider.fetch_mode,
        config.provider.rate_limit,
    );
    info!(
        "Tracking {} {} on {} ({:?} fetch, {} indicators)",
        config.provider.symbol,
        config.provider.interval,
        config.provider.exchange,
        client.mode(),
        config.indicators.len()
    );

    let store = if config.database_path == ":memory:" {
        info!("Using in-memory SQLite store");
        SqliteStore::new_in_memory()?
    } else {
        info!("Using SQLite store at {}", config.database_path);
        SqliteStore::new(&config.database_path)?
    };

    let session = Arc::new(Session::new(
        client,
        store,
        config.session_settings(),
        config.presentation,
    ));

    // Hourly auto-update
    RefreshScheduler::new(
        session.clone(),
        Duration::from_secs(config.refresh.check_interval_secs),
    )
    .start();

    let state = AppState::new(config.clone(), session);

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the router
    let app = Router::new()
        .merge(api::router::<TaapiClient, SqliteStore>())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Trendboard server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
