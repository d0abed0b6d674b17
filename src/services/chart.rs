//! Projection of a windowed series onto chart coordinates.
//!
//! Maps samples into a padded logical canvas with the y axis pointing down
//! (screen convention). Each projected point carries its health class and
//! color so the rendering layer never re-derives them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::NdviSample;
use crate::services::health::{classify, HealthClass};

/// Logical canvas dimensions and padding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub width: f64,
    pub height: f64,
    pub pad_x: f64,
    pub pad_y: f64,
}

impl Default for ChartSpec {
    fn default() -> Self {
        // Matches the dashboard's default NDVI chart viewport.
        Self {
            width: 640.0,
            height: 240.0,
            pad_x: 24.0,
            pad_y: 16.0,
        }
    }
}

/// A single projected chart point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
    pub date: NaiveDate,
    pub value: f64,
    pub class: HealthClass,
    pub color: String,
}

/// Project a windowed series into chart coordinates.
///
/// The value axis spans `[max(0, min - 0.1), min(1, max + 0.1)]` so the
/// curve never hugs the canvas edge. A single-point series is plotted at
/// the horizontal center, and a flat series (degenerate value range) at the
/// vertical center; neither degenerate case divides by zero.
pub fn project_chart(series: &[NdviSample], spec: ChartSpec) -> Vec<ChartPoint> {
    if series.is_empty() {
        return Vec::new();
    }

    let values: Vec<f64> = series.iter().map(|s| s.value).collect();
    let min_value = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max_value = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let axis_min = (min_value - 0.1).max(0.0);
    let axis_max = (max_value + 0.1).min(1.0);
    let axis_span = axis_max - axis_min;

    let n = series.len();
    let draw_width = spec.width - 2.0 * spec.pad_x;
    let draw_height = spec.height - 2.0 * spec.pad_y;

    series
        .iter()
        .enumerate()
        .map(|(i, sample)| {
            let x = if n == 1 {
                spec.width / 2.0
            } else {
                spec.pad_x + (i as f64 / (n - 1) as f64) * draw_width
            };
            let y_fraction = if axis_span > 0.0 {
                (sample.value - axis_min) / axis_span
            } else {
                0.5
            };
            let y = spec.height - (spec.pad_y + y_fraction * draw_height);
            let class = classify(sample.value);
            ChartPoint {
                x,
                y,
                date: sample.date,
                value: sample.value,
                class,
                color: class.color().to_string(),
            }
        })
        .collect()
}
