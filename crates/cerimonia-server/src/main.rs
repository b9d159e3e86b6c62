//! Cerimonia registration server - Entry point.

use cerimonia_server::{
    api::{create_router_with_rate_limit, AppState, RateLimitState},
    config::Config,
    Backend,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cerimonia server");

    // Select the data backend
    let backend = match Backend::from_config(&config.backend).await {
        Ok(b) => b,
        Err(e) => {
            error!("Failed to initialize backend: {:#}", e);
            std::process::exit(1);
        }
    };

    if !backend.health_check().await {
        warn!(backend = backend.name(), "Backend health check failed, continuing");
    }

    // Create application state
    let state = AppState::new(backend);

    // Create router with configured rate limit
    let rate_limit = RateLimitState::new(config.rate_limit.global_per_minute);
    let app = create_router_with_rate_limit(state, rate_limit);

    let addr = SocketAddr::new(
        config.server.listen_addr.parse().unwrap_or([0, 0, 0, 0].into()),
        config.server.port,
    );

    info!("Listening on {}", addr);

    // Start server
    let listener = match TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
