pub mod api; // Console HTTP API router
pub mod auth; // Mock credential table + persisted sessions
pub mod authorization; // Role → capability mapping
pub mod config;
pub mod core_state;
pub mod models;
pub mod ordonnance; // Order builder + PDF document assembler
pub mod services; // Simulated-latency fixture directory
pub mod signature; // Freehand signature capture

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

/// Start the console: tracing, persisted sessions, fixture directory, and
/// the API server on the loopback address from `config`.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("Ordocare starting v{}", config::APP_VERSION);

    let sessions = auth::SessionStore::load(&config::sessions_file());
    let core = Arc::new(core_state::CoreState::new(
        services::MockDirectory::default(),
        sessions,
    ));
    let app = api::router::console_router(api::types::ApiContext::new(core));

    let listener = tokio::net::TcpListener::bind(config::BIND_ADDR).await?;
    tracing::info!("console API listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
