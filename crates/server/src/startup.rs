use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;
use service::storage;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

/// Compose the application: pick the storage backend and wire the router.
pub fn build_app(cfg: &AppConfig) -> Result<Router, StartupError> {
    let store = storage::build_store(&cfg.airtable)?;
    Ok(routes::build_router(AppState::new(store), build_cors()))
}

/// Public entry: load configuration, build the app and run the HTTP server
/// until `shutdown` resolves. Configuration is read once here; changes need a restart.
pub async fn run<F>(shutdown: F) -> Result<(), StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    dotenv().ok();
    let cfg = AppConfig::load_and_validate()?;
    let listener = bind(&cfg).await?;
    serve(listener, &cfg, shutdown).await
}

async fn bind(cfg: &AppConfig) -> Result<tokio::net::TcpListener, StartupError> {
    let addr = bind_addr(cfg)?;
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(anyhow::Error::from)?;
    Ok(listener)
}

/// Serve on an already bound listener. In-flight requests finish before this
/// returns once `shutdown` resolves.
pub async fn serve<F>(
    listener: tokio::net::TcpListener,
    cfg: &AppConfig,
    shutdown: F,
) -> Result<(), StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_app(cfg)?;
    let addr = listener.local_addr().map_err(anyhow::Error::from)?;
    info!(%addr, backend = %backend_name(cfg), "starting freelancer catalog server");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(anyhow::Error::from)?;

    info!(%addr, "server drained");
    Ok(())
}

fn backend_name(cfg: &AppConfig) -> &'static str {
    if cfg.airtable.is_enabled() { "airtable" } else { "memory" }
}
