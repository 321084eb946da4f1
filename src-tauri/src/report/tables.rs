use std::collections::BTreeSet;

use super::display::{fixed, ColorRow, ConcentrationRow, TrialSection, PLACEHOLDER};
use super::types::{AnalysisResult, ColorValue};

/// Trial numbers to render, ascending.
///
/// The union of trials seen in `color_values` and in `predictions`.
/// `steps.trials_detected` only feeds the summary; a trial without rows has
/// nothing to render.
pub fn trial_numbers(result: &AnalysisResult) -> Vec<u32> {
    let mut trials: BTreeSet<u32> = result.color_values.iter().filter_map(|cv| cv.trial).collect();
    trials.extend(result.predictions.iter().filter_map(|p| p.trial));
    trials.into_iter().collect()
}

/// Build one section per trial that has at least one row.
pub fn build_trial_sections(result: &AnalysisResult) -> Vec<TrialSection> {
    trial_numbers(result)
        .into_iter()
        .filter_map(|trial| build_trial_section(result, trial))
        .collect()
}

/// Build the tables for `trial`, or `None` when it has no rows.
///
/// Rows are renumbered 1..n within the trial. The predicted concentration
/// comes from the trial's `predictions` entry by local position, falling back
/// to `r_channel.predicted_concentration` by global position.
pub fn build_trial_section(result: &AnalysisResult, trial: u32) -> Option<TrialSection> {
    let wells: Vec<(usize, &ColorValue)> = result.wells_for_trial(trial).collect();
    let trial_predictions = result
        .prediction_for_trial(trial)
        .map(|p| p.concentrations.as_slice())
        .unwrap_or_default();
    let channel_predictions = result
        .r_channel
        .as_ref()
        .map(|c| c.predicted_concentration.as_slice())
        .unwrap_or_default();

    let row_count = if wells.is_empty() {
        trial_predictions.len()
    } else {
        wells.len()
    };
    if row_count == 0 {
        return None;
    }

    let color_rows = wells.iter().map(|(_, cv)| color_row(cv)).collect();

    let concentration_rows = (0..row_count)
        .map(|local| {
            let well = wells.get(local);
            let predicted = trial_predictions
                .get(local)
                .copied()
                .flatten()
                .or_else(|| {
                    well.and_then(|(global, _)| channel_predictions.get(*global).copied().flatten())
                });

            ConcentrationRow {
                well_number: local + 1,
                r_value: fixed(well.and_then(|(_, cv)| cv.r), 1),
                predicted: fixed(predicted, 2),
            }
        })
        .collect();

    Some(TrialSection {
        trial,
        title: format!("Trial {}", trial),
        color_rows,
        concentration_rows,
    })
}

fn color_row(cv: &ColorValue) -> ColorRow {
    ColorRow {
        well: cv.well.clone().unwrap_or_else(|| PLACEHOLDER.to_string()),
        r: fixed(cv.r, 1),
        g: fixed(cv.g, 1),
        b: fixed(cv.b, 1),
        rgb_mean: fixed(cv.rgb_mean, 1),
        s_mean: fixed(cv.s_mean, 1),
    }
}
