use std::sync::Arc;
use subjects::api::{self, app_state::AppState};
use subjects::config::loader::ConfigLoader;
use subjects::observability::{
    ObservabilityState, create_observability_router, init_tracing, metrics_middleware,
};
use subjects::storage::factory::StorageFactory;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::load()?;
    let _log_guard = init_tracing(&config.logging);
    ConfigLoader::validate(&config)?;
    info!("Configuration loaded successfully");

    let storage = StorageFactory::create(&config.database)?;

    let app_state = AppState::from_storage(&storage);
    info!("Application state created");

    let observability_state = Arc::new(ObservabilityState::new(
        env!("CARGO_PKG_VERSION").to_string(),
        storage,
    ));
    let api_router = api::create_router(app_state).layer(axum::middleware::from_fn_with_state(
        observability_state.clone(),
        metrics_middleware,
    ));
    let router = create_observability_router(observability_state).merge(api_router);
    info!("API router created with observability endpoints");

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
