use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = ["window", "__TAURI__", "core"], catch)]
    async fn invoke(cmd: &str, args: JsValue) -> Result<JsValue, JsValue>;
}

// -- Arg structs for serialization --

#[derive(Serialize)]
struct GetPreferenceArgs {
    key: String,
}

#[derive(Serialize)]
struct SetPreferenceArgs {
    key: String,
    value: String,
}

#[derive(Serialize)]
struct CopyArgs {
    label: String,
    value: String,
}

#[derive(Serialize)]
struct AnalyzeImageArgs {
    request: AnalyzeRequest,
}

/// Request payload for image analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRequest {
    pub image_base64: String,
    pub file_name: Option<String>,
}

// -- Analysis report matching backend structs --

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MetricsDisplay {
    pub r2: String,
    pub mae: String,
    pub rmse: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StepsDisplay {
    pub trials_detected: String,
    pub wells_detected: String,
    pub feature_type: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ColorRow {
    pub well: String,
    pub r: String,
    pub g: String,
    pub b: String,
    pub rgb_mean: String,
    pub s_mean: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ConcentrationRow {
    pub well_number: usize,
    pub r_value: String,
    pub predicted: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrialSection {
    pub trial: u32,
    pub title: String,
    pub color_rows: Vec<ColorRow>,
    pub concentration_rows: Vec<ConcentrationRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ChartPoint {
    pub x: f64,
    pub observed: Option<f64>,
    pub fitted: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ChartBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChannelChart {
    pub channel: String,
    pub title: String,
    pub observed_color: String,
    pub fitted_color: String,
    pub points: Vec<ChartPoint>,
    pub labels: Vec<String>,
    pub bounds: Option<ChartBounds>,
    pub equation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalysisReport {
    pub metrics: Option<MetricsDisplay>,
    pub steps: Option<StepsDisplay>,
    pub trials: Vec<TrialSection>,
    pub charts: Vec<ChannelChart>,
    pub received_at: String,
    pub raw: serde_json::Value,
}

// -- Backend settings and health matching backend structs --

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BackendHealth {
    pub url: String,
    pub reachable: bool,
    pub status: Option<String>,
    pub http_status: Option<u16>,
    pub latency_ms: Option<u64>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BackendConfigView {
    pub base_url: String,
    /// "preference", "environment" or "default"
    pub base_url_source: String,
    pub timeout_secs: u64,
    /// "original", "auto" or "jpeg"
    pub upload_encoding: String,
}

fn js_error(e: JsValue) -> String {
    e.as_string().unwrap_or_else(|| "Unknown error".to_string())
}

// -- Typed invoke helpers --

pub async fn analyze_image(image_base64: String, file_name: Option<String>) -> Result<AnalysisReport, String> {
    let args = serde_wasm_bindgen::to_value(&AnalyzeImageArgs {
        request: AnalyzeRequest {
            image_base64,
            file_name,
        },
    })
    .map_err(|e| e.to_string())?;

    let result = invoke("analyze_image", args).await.map_err(js_error)?;

    // The raw body carries arbitrary JSON; go through serde_json so it maps
    // onto `serde_json::Value` as objects rather than JS Maps.
    let json = js_sys::JSON::stringify(&result)
        .map_err(js_error)?
        .as_string()
        .ok_or_else(|| "Analysis result is not serializable".to_string())?;
    serde_json::from_str(&json).map_err(|e| e.to_string())
}

pub async fn check_backend_health() -> Result<BackendHealth, String> {
    let args = serde_wasm_bindgen::to_value(&serde_json::json!({})).map_err(|e| e.to_string())?;

    let result = invoke("check_backend_health", args).await.map_err(js_error)?;

    serde_wasm_bindgen::from_value(result).map_err(|e| e.to_string())
}

pub async fn get_backend_config() -> Result<BackendConfigView, String> {
    let args = serde_wasm_bindgen::to_value(&serde_json::json!({})).map_err(|e| e.to_string())?;

    let result = invoke("get_backend_config", args).await.map_err(js_error)?;

    serde_wasm_bindgen::from_value(result).map_err(|e| e.to_string())
}

pub async fn get_preference(key: &str) -> Result<Option<String>, String> {
    let args = serde_wasm_bindgen::to_value(&GetPreferenceArgs {
        key: key.to_string(),
    })
    .map_err(|e| e.to_string())?;

    let result = invoke("get_preference", args).await.map_err(js_error)?;

    serde_wasm_bindgen::from_value(result).map_err(|e| e.to_string())
}

pub async fn set_preference(key: &str, value: &str) -> Result<(), String> {
    let args = serde_wasm_bindgen::to_value(&SetPreferenceArgs {
        key: key.to_string(),
        value: value.to_string(),
    })
    .map_err(|e| e.to_string())?;

    invoke("set_preference", args).await.map(|_| ()).map_err(js_error)
}

pub async fn copy_to_clipboard(label: &str, value: &str) -> Result<(), String> {
    let args = serde_wasm_bindgen::to_value(&CopyArgs {
        label: label.to_string(),
        value: value.to_string(),
    })
    .map_err(|e| e.to_string())?;

    invoke("copy_to_clipboard", args).await.map(|_| ()).map_err(js_error)
}
