use leptos::prelude::*;

use crate::commands::{ChannelChart, ChartBounds};

const WIDTH: f64 = 340.0;
const HEIGHT: f64 = 240.0;
const PAD_LEFT: f64 = 44.0;
const PAD_RIGHT: f64 = 12.0;
const PAD_TOP: f64 = 12.0;
const PAD_BOTTOM: f64 = 28.0;
const Y_SEGMENTS: usize = 4;

/// Map a data point into SVG coordinates inside the plot area.
fn project(bounds: &ChartBounds, x: f64, y: f64) -> (f64, f64) {
    let plot_w = WIDTH - PAD_LEFT - PAD_RIGHT;
    let plot_h = HEIGHT - PAD_TOP - PAD_BOTTOM;
    let px = PAD_LEFT + (x - bounds.min_x) / (bounds.max_x - bounds.min_x) * plot_w;
    let py = PAD_TOP + (bounds.max_y - y) / (bounds.max_y - bounds.min_y) * plot_h;
    (px, py)
}

fn polyline(bounds: &ChartBounds, points: impl Iterator<Item = (f64, f64)>) -> String {
    points
        .map(|(x, y)| {
            let (px, py) = project(bounds, x, y);
            format!("{:.1},{:.1}", px, py)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn y_ticks(bounds: &ChartBounds) -> Vec<f64> {
    (0..=Y_SEGMENTS)
        .map(|i| bounds.min_y + (bounds.max_y - bounds.min_y) * i as f64 / Y_SEGMENTS as f64)
        .collect()
}

/// Observed samples for one channel with the fitted polynomial overlaid.
#[component]
pub fn ChannelChartView(chart: ChannelChart) -> impl IntoView {
    let Some(bounds) = chart.bounds else {
        return view! {
            <div class="channel-chart">
                <h4 class="graph-title">{chart.title}</h4>
                <p class="chart-empty">"No samples to plot"</p>
            </div>
        }
        .into_any();
    };

    let observed_line = polyline(
        &bounds,
        chart.points.iter().filter_map(|p| p.observed.map(|y| (p.x, y))),
    );
    let fitted_line = polyline(
        &bounds,
        chart.points.iter().filter_map(|p| p.fitted.map(|y| (p.x, y))),
    );

    let dots = chart
        .points
        .iter()
        .filter_map(|p| p.observed.map(|y| project(&bounds, p.x, y)))
        .map(|(cx, cy)| {
            view! { <circle cx=format!("{:.1}", cx) cy=format!("{:.1}", cy) r="3" fill=chart.observed_color.clone() /> }
        })
        .collect::<Vec<_>>();

    let x_labels = chart
        .points
        .iter()
        .zip(chart.labels.iter())
        .filter(|(_, label)| !label.is_empty())
        .map(|(p, label)| {
            let (px, _) = project(&bounds, p.x, bounds.min_y);
            view! {
                <text x=format!("{:.1}", px) y=format!("{:.1}", HEIGHT - 8.0) class="axis-label" text-anchor="middle">
                    {label.clone()}
                </text>
            }
        })
        .collect::<Vec<_>>();

    let y_labels = y_ticks(&bounds)
        .into_iter()
        .map(|tick| {
            let (_, py) = project(&bounds, bounds.min_x, tick);
            view! {
                <line x1=PAD_LEFT.to_string() x2=(WIDTH - PAD_RIGHT).to_string()
                    y1=format!("{:.1}", py) y2=format!("{:.1}", py) class="grid-line" />
                <text x=format!("{:.1}", PAD_LEFT - 6.0) y=format!("{:.1}", py + 4.0) class="axis-label" text-anchor="end">
                    {format!("{:.1}", tick)}
                </text>
            }
        })
        .collect::<Vec<_>>();

    view! {
        <div class="channel-chart">
            <style>{include_str!("channel_chart.css")}</style>
            <h4 class="graph-title">{chart.title}</h4>
            <svg viewBox=format!("0 0 {} {}", WIDTH, HEIGHT) class="chart-svg" role="img">
                {y_labels}
                <polyline points=observed_line fill="none" stroke=chart.observed_color.clone() stroke-width="2" />
                <polyline points=fitted_line fill="none" stroke=chart.fitted_color.clone() stroke-width="2" stroke-dasharray="6 4" />
                {dots}
                {x_labels}
            </svg>
            <div class="chart-legend">
                <span class="legend-item">
                    <span class="legend-swatch" style=format!("background-color: {}", chart.observed_color)></span>
                    "Observed"
                </span>
                <span class="legend-item">
                    <span class="legend-swatch" style=format!("background-color: {}", chart.fitted_color)></span>
                    "Fitted"
                </span>
            </div>
            {chart.equation.map(|eq| view! { <p class="chart-equation">{eq}</p> })}
        </div>
    }
    .into_any()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: ChartBounds = ChartBounds {
        min_x: 0.0,
        max_x: 10.0,
        min_y: 100.0,
        max_y: 200.0,
    };

    #[test]
    fn test_project_corners() {
        assert_eq!(project(&BOUNDS, 0.0, 100.0), (PAD_LEFT, HEIGHT - PAD_BOTTOM));
        assert_eq!(project(&BOUNDS, 10.0, 200.0), (WIDTH - PAD_RIGHT, PAD_TOP));
    }

    #[test]
    fn test_polyline_format() {
        let line = polyline(&BOUNDS, [(0.0, 100.0), (10.0, 200.0)].into_iter());
        assert_eq!(line, "44.0,212.0 328.0,12.0");
    }

    #[test]
    fn test_y_ticks_span_bounds() {
        assert_eq!(y_ticks(&BOUNDS), vec![100.0, 125.0, 150.0, 175.0, 200.0]);
    }
}
