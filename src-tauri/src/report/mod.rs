//! Parsing of analysis responses and their projection into display-ready
//! tables, metrics and chart series.

pub mod charts;
pub mod display;
pub mod lenient;
pub mod polynomial;
pub mod tables;
pub mod types;

use chrono::Utc;
use serde_json::Value;

pub use display::*;
pub use types::*;

/// Build the display report for a raw response body.
pub fn build_report(raw: Value) -> AnalysisReport {
    let result = AnalysisResult::from_value(&raw);

    let metrics = result.trial_metrics.as_ref().map(|m| MetricsDisplay {
        r2: fixed(m.r2, 4),
        mae: fixed(m.mae, 4),
        rmse: fixed(m.rmse, 4),
    });

    let steps = result.steps.as_ref().map(|s| StepsDisplay {
        trials_detected: s
            .trials_detected
            .map(|n| n.to_string())
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        wells_detected: s
            .wells_detected
            .map(|n| n.to_string())
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        feature_type: s.feature_type.clone().unwrap_or_else(|| PLACEHOLDER.to_string()),
        model: s.model.clone().unwrap_or_else(|| PLACEHOLDER.to_string()),
    });

    // Both channels are plotted together or not at all.
    let charts = match (&result.r_channel, &result.s_channel) {
        (Some(r), Some(s)) => vec![
            charts::build_channel_chart(r, &charts::R_CHANNEL),
            charts::build_channel_chart(s, &charts::S_CHANNEL),
        ],
        _ => Vec::new(),
    };

    AnalysisReport {
        metrics,
        steps,
        trials: tables::build_trial_sections(&result),
        charts,
        received_at: Utc::now().to_rfc3339(),
        raw,
    }
}
