//! Response shapes returned by the analysis service.
//!
//! Two response variants exist in the wild: one with `trial_metrics`,
//! `color_values` and per-channel fits, and one with `steps` and per-trial
//! `predictions`. Both are read into the same struct; every field is
//! optional and parsed leniently.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::lenient;

/// Fit quality for the calibration curve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrialMetrics {
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub r2: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub mae: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub rmse: Option<f64>,
}

/// Color readings for one well.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorValue {
    #[serde(default, deserialize_with = "lenient::opt_label")]
    pub well: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub trial: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub r: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub g: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub b: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub rgb_mean: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub s_mean: Option<f64>,
}

/// Sampled points and polynomial fit for one color channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelFit {
    #[serde(default, deserialize_with = "lenient::f64_gaps")]
    pub actual_x: Vec<Option<f64>>,
    #[serde(default, deserialize_with = "lenient::f64_gaps")]
    pub actual_y: Vec<Option<f64>>,
    /// Highest degree first.
    #[serde(default, deserialize_with = "lenient::coefficients")]
    pub coeffs: Vec<f64>,
    #[serde(default, deserialize_with = "lenient::f64_gaps")]
    pub predicted_concentration: Vec<Option<f64>>,
}

/// Pipeline summary from the alternate response variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSteps {
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub trials_detected: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub wells_detected: Option<u32>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub feature_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub model: Option<String>,
}

/// Predicted concentrations for all wells of one trial.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrialPrediction {
    #[serde(default, deserialize_with = "lenient::opt_u32")]
    pub trial: Option<u32>,
    #[serde(default, deserialize_with = "lenient::f64_gaps")]
    pub concentrations: Vec<Option<f64>>,
}

/// Parsed analysis response. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, deserialize_with = "lenient::opt_object")]
    pub trial_metrics: Option<TrialMetrics>,
    #[serde(default, deserialize_with = "lenient::vec_of")]
    pub color_values: Vec<ColorValue>,
    #[serde(default, deserialize_with = "lenient::opt_object")]
    pub r_channel: Option<ChannelFit>,
    #[serde(default, deserialize_with = "lenient::opt_object")]
    pub s_channel: Option<ChannelFit>,
    #[serde(default, deserialize_with = "lenient::opt_object")]
    pub steps: Option<AnalysisSteps>,
    #[serde(default, deserialize_with = "lenient::vec_of")]
    pub predictions: Vec<TrialPrediction>,
}

impl AnalysisResult {
    /// Parse a response body. A body that is not an object yields an empty
    /// result rather than an error.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value.clone()).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    /// Rows of `color_values` belonging to `trial`, with their global index.
    pub fn wells_for_trial(&self, trial: u32) -> impl Iterator<Item = (usize, &ColorValue)> {
        self.color_values
            .iter()
            .enumerate()
            .filter(move |(_, cv)| cv.trial == Some(trial))
    }

    pub fn prediction_for_trial(&self, trial: u32) -> Option<&TrialPrediction> {
        self.predictions.iter().find(|p| p.trial == Some(trial))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_full_response() {
        let body = json!({
            "trial_metrics": {"r2": 0.991, "mae": 0.12, "rmse": 0.15},
            "color_values": [
                {"well": 1, "trial": 1, "r": 201.4, "g": 88.0, "b": 90.2, "rgb_mean": 126.5, "s_mean": 0.56}
            ],
            "r_channel": {
                "actual_x": [0.5, 1.0],
                "actual_y": [200.0, 190.0],
                "coeffs": [-20.0, 210.0],
                "predicted_concentration": [0.48]
            }
        });

        let result = AnalysisResult::from_value(&body);
        assert_eq!(result.trial_metrics.as_ref().unwrap().r2, Some(0.991));
        assert_eq!(result.color_values.len(), 1);
        assert_eq!(result.color_values[0].well.as_deref(), Some("1"));
        assert_eq!(result.color_values[0].trial, Some(1));
        let r = result.r_channel.unwrap();
        assert_eq!(r.coeffs, vec![-20.0, 210.0]);
        assert_eq!(r.predicted_concentration, vec![Some(0.48)]);
        assert!(result.s_channel.is_none());
    }

    #[test]
    fn test_parse_steps_variant() {
        let body = json!({
            "steps": {
                "wells_detected": 24,
                "trials_detected": 2,
                "feature_type": "Mean Red Channel Intensity",
                "model": "Polynomial Regression"
            },
            "predictions": [
                {"trial": 1, "concentrations": [0.5, 1.0]},
                {"trial": 2, "concentrations": [0.6, null]}
            ]
        });

        let result = AnalysisResult::from_value(&body);
        let steps = result.steps.as_ref().unwrap();
        assert_eq!(steps.trials_detected, Some(2));
        assert_eq!(steps.wells_detected, Some(24));
        assert_eq!(result.predictions.len(), 2);
        assert_eq!(
            result.prediction_for_trial(2).unwrap().concentrations,
            vec![Some(0.6), None]
        );
    }

    #[test]
    fn test_malformed_fields_degrade() {
        let body = json!({
            "trial_metrics": "not an object",
            "color_values": {"oops": true},
            "r_channel": {"actual_x": "nope", "coeffs": [1, "x", 3]},
            "predictions": [42, {"trial": 1, "concentrations": [1.5]}]
        });

        let result = AnalysisResult::from_value(&body);
        assert!(result.trial_metrics.is_none());
        assert!(result.color_values.is_empty());
        let r = result.r_channel.unwrap();
        assert!(r.actual_x.is_empty());
        assert!(r.coeffs.is_empty());
        assert_eq!(result.predictions.len(), 1);
    }

    #[test]
    fn test_non_object_body_is_empty() {
        assert_eq!(AnalysisResult::from_value(&json!([1, 2])), AnalysisResult::default());
    }

    #[test]
    fn test_wells_for_trial_keeps_global_index() {
        let body = json!({
            "color_values": [
                {"well": 1, "trial": 1, "r": 1.0},
                {"well": 1, "trial": 2, "r": 2.0},
                {"well": 2, "trial": 1, "r": 3.0}
            ]
        });
        let result = AnalysisResult::from_value(&body);
        let indices: Vec<usize> = result.wells_for_trial(1).map(|(i, _)| i).collect();
        assert_eq!(indices, vec![0, 2]);
    }
}
