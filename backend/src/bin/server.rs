//! CoachTrack HTTP Server Binary
//!
//! This is the main entry point for the CoachTrack REST API server.
//! It resolves configuration, builds the repository and auth backend, sets up
//! the HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Run with the in-memory backend (no backend URL configured)
//! cargo run --bin coachtrack-server
//!
//! # Run against the hosted backend
//! COACHTRACK_BACKEND_URL=https://project.example.co \
//! COACHTRACK_BACKEND_KEY=service-role-key \
//!   cargo run --bin coachtrack-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `REPOSITORY_TYPE`: `local` or `remote`
//! - `REPOSITORY_CONFIG`: Path to a `repository.toml` overriding the backend selection
//! - `RUST_LOG`: Log level (default: info)
//!
//! See `coachtrack::config` for the complete list.

use std::env;
use std::net::SocketAddr;

use anyhow::Context;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use coachtrack::config::AppConfig;
use coachtrack::db::RepositoryFactory;
use coachtrack::http::{create_router, AppState};
use coachtrack::services::TimezoneResolver;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting CoachTrack HTTP Server");

    let config = AppConfig::from_env().context("Invalid configuration")?;

    let backend = match env::var("REPOSITORY_CONFIG") {
        Ok(path) => {
            info!("Loading repository configuration from {}", path);
            RepositoryFactory::from_config_file(&path)
        }
        Err(_) => RepositoryFactory::from_config(&config),
    }
    .context("Failed to initialize repository")?;
    info!("Repository initialized successfully");

    let timezone = TimezoneResolver::new(config.geolocation.clone())
        .context("Failed to build geolocation client")?;

    let state = AppState::new(backend, timezone);
    let app = create_router(state);

    let addr: SocketAddr = config
        .server
        .bind_address()
        .parse()
        .context("Invalid HOST/PORT")?;

    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
