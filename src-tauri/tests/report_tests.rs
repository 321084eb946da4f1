use std::path::PathBuf;

use serde_json::Value;

use color_analyzer_tauri::report::polynomial::evaluate;
use color_analyzer_tauri::report::tables::build_trial_section;
use color_analyzer_tauri::report::{build_report, AnalysisResult, PLACEHOLDER};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load_fixture(name: &str) -> Value {
    let raw = std::fs::read_to_string(fixture_path(name)).expect("Failed to read fixture");
    serde_json::from_str(&raw).expect("Fixture is not valid JSON")
}

#[test]
fn test_twelve_wells_render_twelve_numbered_rows() {
    let report = build_report(load_fixture("three_trial_response.json"));

    let trial_one = report
        .trials
        .iter()
        .find(|t| t.trial == 1)
        .expect("Trial 1 section missing");
    assert_eq!(trial_one.title, "Trial 1");
    assert_eq!(trial_one.color_rows.len(), 12);
    assert_eq!(trial_one.concentration_rows.len(), 12);

    let numbers: Vec<usize> = trial_one
        .concentration_rows
        .iter()
        .map(|row| row.well_number)
        .collect();
    assert_eq!(numbers, (1..=12).collect::<Vec<_>>());
}

#[test]
fn test_local_numbering_ignores_backend_well_index() {
    let report = build_report(load_fixture("three_trial_response.json"));
    let trial_three = report.trials.iter().find(|t| t.trial == 3).unwrap();

    // Backend numbers wells globally (24..35 for trial 3)
    assert_eq!(trial_three.color_rows[0].well, "24");
    assert_eq!(trial_three.concentration_rows[0].well_number, 1);
    assert_eq!(trial_three.concentration_rows[11].well_number, 12);
}

#[test]
fn test_filtering_by_trial_matches_row_counts() {
    let raw = load_fixture("three_trial_response.json");
    let result = AnalysisResult::from_value(&raw);
    let report = build_report(raw);

    for section in &report.trials {
        let expected = result
            .color_values
            .iter()
            .filter(|cv| cv.trial == Some(section.trial))
            .count();
        assert_eq!(
            section.color_rows.len(),
            expected,
            "Trial {} row count mismatch",
            section.trial
        );
    }
    assert_eq!(report.trials.len(), 3);
}

#[test]
fn test_missing_prediction_index_renders_placeholder() {
    let report = build_report(load_fixture("three_trial_response.json"));
    let trial_three = report.trials.iter().find(|t| t.trial == 3).unwrap();

    // The fixture's r_channel has one fewer prediction than wells
    let last = trial_three.concentration_rows.last().unwrap();
    assert_eq!(last.predicted, PLACEHOLDER);
    assert_ne!(trial_three.concentration_rows[0].predicted, PLACEHOLDER);
}

#[test]
fn test_r_values_formatted_to_one_decimal() {
    let report = build_report(load_fixture("three_trial_response.json"));
    let trial_one = report.trials.iter().find(|t| t.trial == 1).unwrap();
    assert_eq!(trial_one.concentration_rows[0].r_value, "227.3");
    assert_eq!(trial_one.color_rows[0].r, "227.3");
}

#[test]
fn test_metrics_and_charts_from_fixture() {
    let report = build_report(load_fixture("three_trial_response.json"));

    let metrics = report.metrics.expect("metrics missing");
    assert_eq!(metrics.r2, "0.9941");
    assert_eq!(metrics.mae, "0.1873");
    assert_eq!(metrics.rmse, "0.2411");

    assert_eq!(report.charts.len(), 2);
    let r_chart = &report.charts[0];
    assert_eq!(r_chart.channel, "r");
    assert_eq!(r_chart.points.len(), 12);
    for point in &r_chart.points {
        let expected = evaluate(&[0.05, -9.6, 227.1], point.x);
        assert!((point.fitted.unwrap() - expected).abs() < 1e-9);
    }
    assert_eq!(report.charts[1].title, "S Channel (Saturation)");
}

#[test]
fn test_steps_variant_uses_trial_predictions() {
    let report = build_report(load_fixture("steps_variant_response.json"));

    let steps = report.steps.expect("steps missing");
    assert_eq!(steps.trials_detected, "2");
    assert_eq!(steps.wells_detected, "22");
    assert!(report.metrics.is_none());
    assert!(report.charts.is_empty());

    assert_eq!(report.trials.len(), 2);
    let trial_two = &report.trials[1];
    assert_eq!(trial_two.trial, 2);
    assert_eq!(trial_two.concentration_rows.len(), 11);
    assert_eq!(trial_two.concentration_rows[0].predicted, "0.49");
    assert_eq!(trial_two.concentration_rows[0].r_value, PLACEHOLDER);
}

#[test]
fn test_unknown_trial_has_no_section() {
    let result = AnalysisResult::from_value(&load_fixture("three_trial_response.json"));
    assert!(build_trial_section(&result, 7).is_none());
}
