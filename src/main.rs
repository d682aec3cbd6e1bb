use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;
use vendor_match::{api, AppConfig, MatcherConfig, MatcherService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Local-time log format
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // Load configuration
    let config = AppConfig::from_env();
    let matcher_config_path = std::env::var("MATCHER_CONFIG").ok();
    let matcher_config = MatcherConfig::load(matcher_config_path.as_deref())?;
    info!(
        "Starting server (threshold {}, selection {:?})",
        matcher_config.threshold, matcher_config.selection
    );

    // Create the matching service
    let service = Arc::new(MatcherService::new(matcher_config));

    // Build routes
    let app = Router::new()
        .route("/health", get(api::health_check))
        .route("/api/match", post(api::match_lists))
        .route("/api/match/export", post(api::match_lists_csv))
        .with_state(service)
        .layer(ServiceBuilder::new());

    // Start the server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/match         - match two vendor price lists (JSON)");
    info!("  POST /api/match/export  - same run, CSV body");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
