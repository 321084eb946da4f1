//! Backend connection settings.
//!
//! Values are resolved from the preferences store first, then from the
//! environment, then from built-in defaults.

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::AnalyzerError;

/// Used when neither a preference nor an environment variable is set.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Analysis can take a while on large photos.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Environment variables checked for the base URL, in order.
pub const BASE_URL_ENV_VARS: [&str; 2] = ["COLOR_ANALYZER_API_URL", "API_BASE_URL"];

pub const TIMEOUT_ENV_VAR: &str = "COLOR_ANALYZER_TIMEOUT_SECS";

/// Preference keys in `preferences.json`.
pub const PREF_BACKEND_URL: &str = "backend_url";
pub const PREF_TIMEOUT_SECS: &str = "request_timeout_secs";
pub const PREF_UPLOAD_ENCODING: &str = "upload_encoding";

/// How the picked image is prepared before upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadEncoding {
    /// Send the bytes exactly as picked.
    Original,
    /// Re-encode to JPEG only when the input is some other format.
    #[default]
    Auto,
    /// Always decode and re-encode to JPEG.
    Jpeg,
}

impl FromStr for UploadEncoding {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "original" => Ok(Self::Original),
            "auto" => Ok(Self::Auto),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            _ => Err(AnalyzerError::Config(format!("Unknown upload encoding: {}", s))),
        }
    }
}

/// Where the resolved base URL came from (shown on the settings page).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    Preference,
    Environment,
    Default,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Normalized base URL without a trailing slash.
    pub base_url: String,
    pub base_url_source: ConfigSource,
    pub timeout: Duration,
    pub upload_encoding: UploadEncoding,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            base_url_source: ConfigSource::Default,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            upload_encoding: UploadEncoding::default(),
        }
    }
}

/// Raw preference values as read from the store.
#[derive(Debug, Clone, Default)]
pub struct StoredPreferences {
    pub backend_url: Option<String>,
    pub timeout_secs: Option<String>,
    pub upload_encoding: Option<String>,
}

impl ClientConfig {
    /// Resolve the configuration from stored preferences and an environment
    /// lookup. Blank values are ignored at every level.
    pub fn resolve<F>(prefs: &StoredPreferences, env: F) -> Result<Self, AnalyzerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        let (raw_url, base_url_source) =
            if let Some(url) = non_blank(prefs.backend_url.clone()) {
                (url, ConfigSource::Preference)
            } else if let Some(url) = BASE_URL_ENV_VARS.iter().find_map(|name| non_blank(env(name))) {
                (url, ConfigSource::Environment)
            } else {
                (DEFAULT_BASE_URL.to_string(), ConfigSource::Default)
            };
        let base_url = normalize_base_url(&raw_url)?;

        let timeout_secs = match non_blank(prefs.timeout_secs.clone())
            .or_else(|| non_blank(env(TIMEOUT_ENV_VAR)))
        {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let upload_encoding = prefs
            .upload_encoding
            .as_deref()
            .and_then(|s| s.parse::<UploadEncoding>().ok())
            .unwrap_or_default();

        Ok(Self {
            base_url,
            base_url_source,
            timeout: Duration::from_secs(timeout_secs),
            upload_encoding,
        })
    }

    /// Resolve using the real process environment.
    pub fn from_preferences(prefs: &StoredPreferences) -> Result<Self, AnalyzerError> {
        Self::resolve(prefs, |name| std::env::var(name).ok())
    }

    pub fn analyze_url(&self) -> String {
        format!("{}/analyze", self.base_url)
    }

    pub fn health_url(&self) -> String {
        format!("{}/health", self.base_url)
    }
}

/// Validate a base URL and strip trailing slashes.
pub fn normalize_base_url(raw: &str) -> Result<String, AnalyzerError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed)
        .map_err(|e| AnalyzerError::Config(format!("Invalid backend URL '{}': {}", raw, e)))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(AnalyzerError::Config(format!(
                "Backend URL must use http or https, got '{}'",
                other
            )))
        }
    }
    if parsed.host_str().is_none() {
        return Err(AnalyzerError::Config(format!("No host in backend URL: {}", raw)));
    }

    Ok(trimmed.to_string())
}

fn parse_timeout(raw: &str) -> Result<u64, AnalyzerError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(AnalyzerError::Config(format!(
            "Request timeout must be a positive number of seconds, got '{}'",
            raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = ClientConfig::resolve(&StoredPreferences::default(), env_from(&[])).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.base_url_source, ConfigSource::Default);
        assert_eq!(config.timeout, Duration::from_secs(120));
        assert_eq!(config.upload_encoding, UploadEncoding::Auto);
    }

    #[test]
    fn test_preference_wins_over_environment() {
        let prefs = StoredPreferences {
            backend_url: Some("http://192.168.1.20:8001/".to_string()),
            ..Default::default()
        };
        let env = env_from(&[("COLOR_ANALYZER_API_URL", "http://env-host:9000")]);
        let config = ClientConfig::resolve(&prefs, env).unwrap();
        assert_eq!(config.base_url, "http://192.168.1.20:8001");
        assert_eq!(config.base_url_source, ConfigSource::Preference);
    }

    #[test]
    fn test_second_env_var_is_fallback() {
        let env = env_from(&[("API_BASE_URL", "https://strips.example.com")]);
        let config = ClientConfig::resolve(&StoredPreferences::default(), env).unwrap();
        assert_eq!(config.base_url, "https://strips.example.com");
        assert_eq!(config.base_url_source, ConfigSource::Environment);
    }

    #[test]
    fn test_blank_preference_is_ignored() {
        let prefs = StoredPreferences {
            backend_url: Some("   ".to_string()),
            ..Default::default()
        };
        let env = env_from(&[("COLOR_ANALYZER_API_URL", "http://env-host:9000")]);
        let config = ClientConfig::resolve(&prefs, env).unwrap();
        assert_eq!(config.base_url, "http://env-host:9000");
    }

    #[test]
    fn test_timeout_from_env_and_preference() {
        let env = env_from(&[("COLOR_ANALYZER_TIMEOUT_SECS", "30")]);
        let config = ClientConfig::resolve(&StoredPreferences::default(), env).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(30));

        let prefs = StoredPreferences {
            timeout_secs: Some("45".to_string()),
            ..Default::default()
        };
        let env = env_from(&[("COLOR_ANALYZER_TIMEOUT_SECS", "30")]);
        let config = ClientConfig::resolve(&prefs, env).unwrap();
        assert_eq!(config.timeout, Duration::from_secs(45));
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        let prefs = StoredPreferences {
            timeout_secs: Some("0".to_string()),
            ..Default::default()
        };
        let result = ClientConfig::resolve(&prefs, env_from(&[]));
        assert!(matches!(result, Err(AnalyzerError::Config(_))));
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(
            normalize_base_url("http://10.0.0.5:8000//").unwrap(),
            "http://10.0.0.5:8000"
        );
        assert!(normalize_base_url("ftp://example.com").is_err());
        assert!(normalize_base_url("not a url").is_err());
    }

    #[test]
    fn test_endpoint_urls() {
        let config = ClientConfig::default();
        assert_eq!(config.analyze_url(), "http://127.0.0.1:8000/analyze");
        assert_eq!(config.health_url(), "http://127.0.0.1:8000/health");
    }

    #[test]
    fn test_upload_encoding_parse() {
        assert_eq!("JPEG".parse::<UploadEncoding>().unwrap(), UploadEncoding::Jpeg);
        assert_eq!(" jpg ".parse::<UploadEncoding>().unwrap(), UploadEncoding::Jpeg);
        assert_eq!("original".parse::<UploadEncoding>().unwrap(), UploadEncoding::Original);
        let err = "webp".parse::<UploadEncoding>().unwrap_err();
        assert!(matches!(err, AnalyzerError::Config(_)));
        assert!(err.to_string().contains("webp"));
    }

    #[test]
    fn test_unknown_stored_encoding_falls_back_to_auto() {
        let prefs = StoredPreferences {
            upload_encoding: Some("gif".to_string()),
            ..Default::default()
        };
        let config = ClientConfig::resolve(&prefs, env_from(&[])).unwrap();
        assert_eq!(config.upload_encoding, UploadEncoding::Auto);
    }
}
