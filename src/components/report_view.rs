use leptos::prelude::*;

use crate::commands::AnalysisReport;
use crate::components::channel_chart::ChannelChartView;
use crate::components::color_value_card::ColorValueCard;
use crate::components::trial_tables::TrialTables;

const METRICS_COLOR: &str = "#c4161c";
const STEPS_COLOR: &str = "#9b59b6";
/// Gap between the entrance of consecutive cards.
const CARD_STAGGER_MS: u32 = 150;

/// Everything the backend returned: metric cards, per-trial tables and
/// channel charts.
#[component]
pub fn ReportView(report: AnalysisReport, on_copy: Callback<(String, String)>) -> impl IntoView {
    let raw_json = serde_json::to_string_pretty(&report.raw).unwrap_or_default();

    let metrics = report.metrics.map(|m| {
        view! {
            <ColorValueCard
                title="Trial Metrics"
                values=vec![
                    ("R\u{b2}".to_string(), m.r2),
                    ("MAE".to_string(), m.mae),
                    ("RMSE".to_string(), m.rmse),
                ]
                color=METRICS_COLOR
                delay_ms=0
                on_copy=Some(on_copy)
            />
        }
    });

    let steps = report.steps.map(|s| {
        view! {
            <ColorValueCard
                title="Analysis Summary"
                values=vec![
                    ("Trials".to_string(), s.trials_detected),
                    ("Wells".to_string(), s.wells_detected),
                    ("Feature".to_string(), s.feature_type),
                    ("Model".to_string(), s.model),
                ]
                color=STEPS_COLOR
                delay_ms=CARD_STAGGER_MS
                on_copy=Some(on_copy)
            />
        }
    });

    let has_trials = !report.trials.is_empty();
    let trials = report
        .trials
        .into_iter()
        .map(|section| view! { <TrialTables section=section /> })
        .collect::<Vec<_>>();

    let has_charts = !report.charts.is_empty();
    let charts = report
        .charts
        .into_iter()
        .map(|chart| view! { <ChannelChartView chart=chart /> })
        .collect::<Vec<_>>();

    view! {
        <div class="result-box">
            {metrics}
            {steps}

            {has_trials.then(|| view! {
                <h3 class="section-title">"Results by Trial"</h3>
                {trials}
            })}

            {has_charts.then(|| view! {
                <h3 class="section-title">"Channel Analysis"</h3>
                {charts}
            })}

            <div class="raw-actions">
                <button
                    class="btn btn-secondary"
                    on:click=move |_| on_copy.run((raw_json.clone(), "Raw JSON".to_string()))
                >
                    "Copy Raw JSON"
                </button>
                <span class="received-at">{format!("Received {}", report.received_at)}</span>
            </div>
        </div>
    }
}
