//! SVG geometry for the ring and line charts.
//!
//! Scores are drawn two ways: as concentric partial rings (one per
//! [`ScoreCategory`], sized by `stroke-dashoffset`) and as one polyline per
//! category across every year in the series.

use std::f64::consts::PI;

use impact_types::{ImpactSeries, ScoreCategory};

use crate::config::ChartConfig;

/// Circumference of the ring drawn for `category`.
pub fn circumference(category: ScoreCategory) -> f64 {
    2.0 * PI * category.ring_radius()
}

/// `stroke-dashoffset` that reveals `score` percent of the category's ring.
///
/// A score of 0 yields the full circumference (nothing drawn), 100 yields 0
/// (full ring). Scores outside `[0, 100]` are not clamped.
pub fn ring_offset(category: ScoreCategory, score: f64) -> f64 {
    circumference(category) * (1.0 - score / 100.0)
}

/// Build the SVG path `d` attribute for one category across the series.
///
/// Point `i` is placed at `x = x_min + i * step` with
/// `step = (x_max - x_min) / (n - 1)`, and at
/// `y = y_base - (score / 100) * height`. The result is
/// `"M x0 y0 L x1 y1 ..."`: empty for an empty series, a lone `M` command
/// for a single point.
pub fn line_path(series: &ImpactSeries, category: ScoreCategory, chart: &ChartConfig) -> String {
    let step = x_step(series.len(), chart);

    series
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let position = f64::from(u32::try_from(index).unwrap_or(u32::MAX));
            let x = chart.x_min + position * step;
            let y = chart.y_base - (record.scores.get(category) / 100.0) * chart.height;
            let command = if index == 0 { 'M' } else { 'L' };
            format!("{command} {x} {y}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Horizontal distance between consecutive points.
fn x_step(points: usize, chart: &ChartConfig) -> f64 {
    let gaps = u32::try_from(points.saturating_sub(1)).unwrap_or(u32::MAX);
    if gaps == 0 {
        return 0.0;
    }
    (chart.x_max - chart.x_min) / f64::from(gaps)
}
