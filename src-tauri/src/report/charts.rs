use super::display::{ChannelChart, ChartBounds, ChartPoint};
use super::polynomial::evaluate_at;
use super::types::ChannelFit;

/// Every Nth sample gets an axis label.
pub const LABEL_EVERY: usize = 6;

pub const FITTED_COLOR: &str = "#9b59b6";

/// Per-channel presentation settings.
pub struct ChannelStyle {
    pub channel: &'static str,
    pub title: &'static str,
    pub observed_color: &'static str,
}

pub const R_CHANNEL: ChannelStyle = ChannelStyle {
    channel: "r",
    title: "R Channel",
    observed_color: "#ff6b6b",
};

pub const S_CHANNEL: ChannelStyle = ChannelStyle {
    channel: "s",
    title: "S Channel (Saturation)",
    observed_color: "#9c27b0",
};

/// Build chart series for one channel: observed points plus the fitted
/// curve evaluated at the same x samples.
///
/// Samples without a numeric x are dropped. Fitted values that overflow are
/// left as gaps.
pub fn build_channel_chart(fit: &ChannelFit, style: &ChannelStyle) -> ChannelChart {
    let fitted = evaluate_at(&fit.coeffs, &fit.actual_x);
    let has_fit = !fit.coeffs.is_empty();

    let points: Vec<ChartPoint> = fit
        .actual_x
        .iter()
        .enumerate()
        .filter_map(|(i, x)| {
            x.map(|x| ChartPoint {
                x,
                observed: fit.actual_y.get(i).copied().flatten(),
                fitted: if has_fit { fitted[i].filter(|y| y.is_finite()) } else { None },
            })
        })
        .collect();

    let labels = points
        .iter()
        .enumerate()
        .map(|(i, p)| {
            if i % LABEL_EVERY == 0 {
                format!("{:.1}", p.x)
            } else {
                String::new()
            }
        })
        .collect();

    ChannelChart {
        channel: style.channel.to_string(),
        title: style.title.to_string(),
        observed_color: style.observed_color.to_string(),
        fitted_color: FITTED_COLOR.to_string(),
        bounds: chart_bounds(&points),
        labels,
        points,
        equation: format_equation(&fit.coeffs),
    }
}

/// Bounding box of every plotted value, padded when degenerate.
pub fn chart_bounds(points: &[ChartPoint]) -> Option<ChartBounds> {
    let xs = points.iter().map(|p| p.x);
    let ys = points
        .iter()
        .flat_map(|p| [p.observed, p.fitted])
        .flatten()
        .filter(|y| y.is_finite());

    let (min_x, max_x) = min_max(xs)?;
    let (min_y, max_y) = min_max(ys)?;

    let (min_x, max_x) = pad_if_flat(min_x, max_x);
    let (min_y, max_y) = pad_if_flat(min_y, max_y);
    Some(ChartBounds { min_x, max_x, min_y, max_y })
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

fn pad_if_flat(lo: f64, hi: f64) -> (f64, f64) {
    if hi > lo {
        (lo, hi)
    } else {
        (lo - 1.0, hi + 1.0)
    }
}

/// Render coefficients as "y = ax^2 + bx + c".
pub fn format_equation(coeffs: &[f64]) -> Option<String> {
    if coeffs.is_empty() {
        return None;
    }
    let degree = coeffs.len() - 1;
    let terms: Vec<String> = coeffs
        .iter()
        .enumerate()
        .map(|(i, c)| match degree - i {
            0 => format!("{:.4}", c.abs()),
            1 => format!("{:.4}x", c.abs()),
            p => format!("{:.4}x^{}", c.abs(), p),
        })
        .collect();

    let mut equation = String::from("y = ");
    for (i, term) in terms.iter().enumerate() {
        let negative = coeffs[i] < 0.0;
        if i == 0 {
            if negative {
                equation.push('-');
            }
        } else {
            equation.push_str(if negative { " - " } else { " + " });
        }
        equation.push_str(term);
    }
    Some(equation)
}
