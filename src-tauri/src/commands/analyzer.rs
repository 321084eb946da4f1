//! Tauri commands for image analysis.
//!
//! Provides the analyze_image command that:
//! 1. Decodes the picked image sent by the front-end
//! 2. Uploads it to the analysis service
//! 3. Builds the display report from the response

use base64::Engine;
use serde::Deserialize;
use tracing::{error, info};

use crate::client::AnalysisClient;
use crate::commands::config::load_client_config;
use crate::report::{build_report, AnalysisReport};

/// Request payload for image analysis.
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Base64-encoded image data (from frontend FileReader)
    pub image_base64: String,
    /// Original file name, for logging only
    pub file_name: Option<String>,
}

/// Analyze a picked image and return the display-ready report.
#[tauri::command]
pub async fn analyze_image(
    app: tauri::AppHandle,
    request: AnalyzeRequest,
) -> Result<AnalysisReport, String> {
    info!(
        "Starting analysis of {}",
        request.file_name.as_deref().unwrap_or("picked image")
    );

    let image_bytes = decode_image_payload(&request.image_base64)?;

    let config = load_client_config(&app)?;
    let client = AnalysisClient::new(config)?;

    let raw = client.analyze(&image_bytes).await.map_err(|e| {
        error!("Analysis error: {}", e);
        e
    })?;

    let report = build_report(raw);
    info!(
        "Analysis complete: {} trials, {} charts",
        report.trials.len(),
        report.charts.len()
    );

    Ok(report)
}

/// Decode base64 image data, tolerating a `data:` URL prefix.
fn decode_image_payload(payload: &str) -> Result<Vec<u8>, String> {
    let data = match payload.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => payload,
    };

    base64::engine::general_purpose::STANDARD
        .decode(data.trim())
        .map_err(|e| format!("Invalid base64 image data: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_base64() {
        assert_eq!(decode_image_payload("AQID").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_decode_data_url() {
        let bytes = decode_image_payload("data:image/png;base64,AQID").unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode_image_payload("***").unwrap_err();
        assert!(err.contains("Invalid base64"));
    }

    #[test]
    fn test_request_deserializes_without_file_name() {
        let request: AnalyzeRequest = serde_json::from_str(r#"{"image_base64": "AQID"}"#).unwrap();
        assert!(request.file_name.is_none());
    }
}
