pub mod client;
mod commands;
pub mod config;
pub mod error;
pub mod report;

pub use client::{AnalysisClient, BackendHealth};
pub use config::{ClientConfig, UploadEncoding};
pub use error::AnalyzerError;
pub use report::{build_report, AnalysisReport, AnalysisResult};

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tauri::Builder::default()
        .plugin(tauri_plugin_store::Builder::new().build())
        .plugin(tauri_plugin_clipboard_manager::init())
        .invoke_handler(tauri::generate_handler![
            commands::analyzer::analyze_image,
            commands::health::check_backend_health,
            commands::config::get_preference,
            commands::config::set_preference,
            commands::config::get_backend_config,
            commands::clipboard::copy_to_clipboard,
        ])
        .setup(|app| {
            // Log where analyses will go so misconfiguration shows up early
            match commands::config::load_client_config(app.handle()) {
                Ok(config) => tracing::info!(
                    "Analysis backend: {} ({:?}), timeout {}s",
                    config.base_url,
                    config.base_url_source,
                    config.timeout.as_secs()
                ),
                Err(e) => tracing::warn!("Backend configuration is invalid: {}", e),
            }
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
