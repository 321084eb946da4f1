use tracing::info;

use crate::client::{AnalysisClient, BackendHealth};
use crate::commands::config::load_client_config;

/// Probe the configured backend's `/health` endpoint.
#[tauri::command]
pub async fn check_backend_health(app: tauri::AppHandle) -> Result<BackendHealth, String> {
    info!("Running backend health check");
    let config = load_client_config(&app)?;
    let client = AnalysisClient::new(config)?;
    let health = client.health().await;
    info!(
        "Backend at {} reachable: {} ({:?} ms)",
        health.url, health.reachable, health.latency_ms
    );
    Ok(health)
}
