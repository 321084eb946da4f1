use serde::Serialize;
use tauri::AppHandle;
use tauri_plugin_store::StoreExt;
use tracing::{info, warn};

use crate::config::{
    normalize_base_url, ClientConfig, ConfigSource, StoredPreferences, UploadEncoding,
    PREF_BACKEND_URL, PREF_TIMEOUT_SECS, PREF_UPLOAD_ENCODING,
};
use crate::error::AnalyzerError;

pub const PREFERENCES_STORE: &str = "preferences.json";

/// Effective backend settings, as shown on the settings page.
#[derive(Debug, Clone, Serialize)]
pub struct BackendConfigView {
    pub base_url: String,
    pub base_url_source: ConfigSource,
    pub timeout_secs: u64,
    pub upload_encoding: UploadEncoding,
}

impl From<&ClientConfig> for BackendConfigView {
    fn from(config: &ClientConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            base_url_source: config.base_url_source,
            timeout_secs: config.timeout.as_secs(),
            upload_encoding: config.upload_encoding,
        }
    }
}

#[tauri::command]
pub fn get_preference(app: AppHandle, key: &str) -> Result<Option<String>, String> {
    info!("Getting preference: {}", key);
    let store = app.store(PREFERENCES_STORE).map_err(|e| {
        warn!("Failed to open store: {}", e);
        e.to_string()
    })?;
    let value = store.get(key).and_then(|v| v.as_str().map(|s| s.to_string()));
    Ok(value)
}

/// Store a preference. Backend settings are validated before saving; an
/// empty value clears the preference.
#[tauri::command]
pub fn set_preference(app: AppHandle, key: &str, value: &str) -> Result<(), String> {
    info!("Setting preference: {} = {}", key, value);
    validate_preference(key, value)?;

    let store = app.store(PREFERENCES_STORE).map_err(|e| {
        warn!("Failed to open store: {}", e);
        e.to_string()
    })?;
    if value.trim().is_empty() {
        store.delete(key);
    } else {
        store.set(key, serde_json::json!(value.trim()));
    }
    store.save().map_err(|e| {
        warn!("Failed to save store: {}", e);
        e.to_string()
    })
}

#[tauri::command]
pub fn get_backend_config(app: AppHandle) -> Result<BackendConfigView, String> {
    let config = load_client_config(&app)?;
    Ok(BackendConfigView::from(&config))
}

/// Resolve the client configuration from the preferences store and the
/// environment.
pub fn load_client_config(app: &AppHandle) -> Result<ClientConfig, AnalyzerError> {
    let store = app.store(PREFERENCES_STORE).map_err(|e| {
        warn!("Failed to open preferences store: {}", e);
        AnalyzerError::Config(e.to_string())
    })?;
    let read = |key: &str| store.get(key).and_then(|v| v.as_str().map(|s| s.to_string()));

    let prefs = StoredPreferences {
        backend_url: read(PREF_BACKEND_URL),
        timeout_secs: read(PREF_TIMEOUT_SECS),
        upload_encoding: read(PREF_UPLOAD_ENCODING),
    };
    ClientConfig::from_preferences(&prefs)
}

fn validate_preference(key: &str, value: &str) -> Result<(), AnalyzerError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    match key {
        PREF_BACKEND_URL => normalize_base_url(value).map(|_| ()),
        PREF_TIMEOUT_SECS => match value.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(()),
            _ => Err(AnalyzerError::Config(format!(
                "Timeout must be a positive number of seconds, got '{}'",
                value
            ))),
        },
        PREF_UPLOAD_ENCODING => value.parse::<UploadEncoding>().map(|_| ()),
        _ => Ok(()),
    }
}
