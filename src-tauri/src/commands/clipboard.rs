use tauri::AppHandle;
use tauri_plugin_clipboard_manager::ClipboardExt;
use tracing::{info, warn};

/// Copy a value from the results to the system clipboard.
#[tauri::command]
pub fn copy_to_clipboard(app: AppHandle, label: &str, value: &str) -> Result<(), String> {
    info!("Copying {} to clipboard", label);
    app.clipboard().write_text(value.to_string()).map_err(|e| {
        warn!("Failed to write clipboard: {}", e);
        e.to_string()
    })
}
