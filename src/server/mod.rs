//! Read-only HTTP query service over the published gold table.

pub mod handlers;
pub mod models;
pub mod router;
pub mod state;

use crate::config::Config;
use state::AppContext;
use std::sync::Arc;
use tracing::info;

/// Loads the analytical table and boundary geometry once, then serves
/// until shutdown. A load failure leaves the service in a degraded
/// state where data endpoints answer 503 instead of crashing.
pub async fn serve(config: &Config) -> anyhow::Result<()> {
    let context = Arc::new(AppContext::load(config));
    let app = router::app_router(context);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("query service listening on {bind_addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
