//! Display-ready report sent to the front-end.
//!
//! All numbers are pre-formatted so the UI renders strings as-is.

use serde::Serialize;
use serde_json::Value;

/// Rendered for any value the backend did not supply.
pub const PLACEHOLDER: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsDisplay {
    pub r2: String,
    pub mae: String,
    pub rmse: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepsDisplay {
    pub trials_detected: String,
    pub wells_detected: String,
    pub feature_type: String,
    pub model: String,
}

/// One row of the color values table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorRow {
    pub well: String,
    pub r: String,
    pub g: String,
    pub b: String,
    pub rgb_mean: String,
    pub s_mean: String,
}

/// One row of the predicted concentrations table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConcentrationRow {
    /// 1-based position within the trial.
    pub well_number: usize,
    pub r_value: String,
    pub predicted: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialSection {
    pub trial: u32,
    pub title: String,
    pub color_rows: Vec<ColorRow>,
    pub concentration_rows: Vec<ConcentrationRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartPoint {
    pub x: f64,
    pub observed: Option<f64>,
    pub fitted: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelChart {
    /// "r" or "s".
    pub channel: String,
    pub title: String,
    pub observed_color: String,
    pub fitted_color: String,
    pub points: Vec<ChartPoint>,
    /// One label per point; blank for unlabeled ticks.
    pub labels: Vec<String>,
    pub bounds: Option<ChartBounds>,
    /// Human-readable fitted equation, e.g. "y = -20.0000x + 210.0000".
    pub equation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub metrics: Option<MetricsDisplay>,
    pub steps: Option<StepsDisplay>,
    pub trials: Vec<TrialSection>,
    pub charts: Vec<ChannelChart>,
    pub received_at: String,
    /// Unmodified response body.
    pub raw: Value,
}

/// Format with a fixed number of decimals, or the placeholder.
pub fn fixed(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => PLACEHOLDER.to_string(),
    }
}
