use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use profilesync_server::config::ServerConfig;
use profilesync_server::identity::LocalIdentityBackend;
use profilesync_server::router::build_router;
use profilesync_server::shutdown::shutdown_signal;
use profilesync_server::state::AppState;
use profilesync_server::storage::create_object_store;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config = ServerConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    let object_store = create_object_store(&config.storage)?;
    tracing::info!(backend = %config.storage.backend, "object store ready");

    let addr = format!("{}:{}", config.host, config.port);
    let state = AppState::new(config, Arc::new(LocalIdentityBackend::new()), object_store)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
