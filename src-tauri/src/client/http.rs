use std::time::{Duration, Instant};

use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use super::image_prep::{prepare_upload, UPLOAD_FILE_NAME, UPLOAD_MIME_TYPE};
use crate::config::ClientConfig;
use crate::error::AnalyzerError;

/// The health check should answer quickly even when analysis is slow.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of probing `GET /health`.
#[derive(Debug, Clone, Serialize)]
pub struct BackendHealth {
    pub url: String,
    pub reachable: bool,
    /// The `status` field reported by the server, if any.
    pub status: Option<String>,
    pub http_status: Option<u16>,
    pub latency_ms: Option<u64>,
    pub error: Option<String>,
}

/// HTTP client for the remote analysis service.
pub struct AnalysisClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl AnalysisClient {
    pub fn new(config: ClientConfig) -> Result<Self, AnalyzerError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("ColorAnalyzer/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| AnalyzerError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Upload an image to `{base_url}/analyze` and return the JSON body
    /// unmodified.
    ///
    /// A JSON body carrying an `error` field is treated as a server failure
    /// even when the status is 2xx.
    pub async fn analyze(&self, image_bytes: &[u8]) -> Result<Value, AnalyzerError> {
        let upload = prepare_upload(image_bytes, self.config.upload_encoding)?;
        let url = self.config.analyze_url();
        info!("Sending image to {} ({} bytes)", url, upload.len());

        let part = Part::bytes(upload)
            .file_name(UPLOAD_FILE_NAME)
            .mime_str(UPLOAD_MIME_TYPE)
            .map_err(|e| AnalyzerError::Config(format!("Invalid upload content type: {}", e)))?;
        let form = Form::new().part("file", part);

        let started = Instant::now();
        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.classify_transport_error(e))?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            error!("Failed to read response body from {}: {}", url, e);
            self.classify_transport_error(e)
        })?;
        info!(
            "Received {} from {} in {} ms ({} bytes)",
            status.as_u16(),
            url,
            started.elapsed().as_millis(),
            body.len()
        );

        let parsed: Option<Value> = serde_json::from_slice(&body).ok();

        if !status.is_success() {
            let message = parsed
                .as_ref()
                .and_then(server_error_message)
                .unwrap_or_else(|| {
                    format!(
                        "Server returned {} {}",
                        status.as_u16(),
                        status.canonical_reason().unwrap_or("Unknown")
                    )
                });
            error!("Analysis failed with HTTP {}: {}", status.as_u16(), message);
            return Err(AnalyzerError::Server {
                status: Some(status.as_u16()),
                message,
            });
        }

        let value = parsed.ok_or_else(|| {
            error!("Analysis response from {} was not valid JSON", url);
            AnalyzerError::Server {
                status: Some(status.as_u16()),
                message: "Server returned a response that is not valid JSON".to_string(),
            }
        })?;

        if let Some(message) = server_error_message(&value) {
            warn!("Analysis server reported an error: {}", message);
            return Err(AnalyzerError::Server {
                status: Some(status.as_u16()),
                message,
            });
        }

        Ok(value)
    }

    /// Probe `GET {base_url}/health`. Never fails; problems are reported in
    /// the returned struct.
    pub async fn health(&self) -> BackendHealth {
        let url = self.config.health_url();
        info!("Checking backend health at {}", url);

        let started = Instant::now();
        let response = self.client.get(&url).timeout(HEALTH_TIMEOUT).send().await;
        let latency_ms = started.elapsed().as_millis() as u64;

        match response {
            Ok(resp) => {
                let http_status = resp.status();
                let status = resp
                    .json::<Value>()
                    .await
                    .ok()
                    .and_then(|v| v.get("status").and_then(|s| s.as_str()).map(str::to_string));
                let reachable = http_status.is_success();
                if !reachable {
                    warn!("Backend health returned {}", http_status);
                }
                BackendHealth {
                    url,
                    reachable,
                    status,
                    http_status: Some(http_status.as_u16()),
                    latency_ms: Some(latency_ms),
                    error: (!reachable).then(|| format!("HTTP {}", http_status.as_u16())),
                }
            }
            Err(e) => {
                warn!("Backend health check failed: {}", e);
                BackendHealth {
                    url,
                    reachable: false,
                    status: None,
                    http_status: None,
                    latency_ms: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    fn classify_transport_error(&self, e: reqwest::Error) -> AnalyzerError {
        if e.is_timeout() {
            error!("Request to {} timed out", self.config.base_url);
            AnalyzerError::Timeout(self.config.timeout.as_secs())
        } else {
            error!("Backend connection failed: {}", e);
            AnalyzerError::Network(format!("{} ({})", self.config.base_url, e))
        }
    }
}

/// Extract a server-supplied `error` (or FastAPI-style `detail`) message.
fn server_error_message(value: &Value) -> Option<String> {
    let obj = value.as_object()?;
    ["error", "detail"].iter().find_map(|key| match obj.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::String(_) | Value::Null => None,
        other => Some(other.to_string()),
    })
}
