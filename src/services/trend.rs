//! Coarse trend detection over a windowed series.

use serde::{Deserialize, Serialize};

use crate::api::NdviSample;

/// Direction of change across the displayed window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

/// Dead band below which endpoint movement counts as stable.
const TREND_THRESHOLD: f64 = 0.05;

/// Derive the trend from the endpoints of a windowed series.
///
/// Compares only the first and last samples of the window, not a moving
/// average or slope fit; intermediate movement is deliberately ignored.
/// Fewer than two points is `Stable`.
pub fn trend(series: &[NdviSample]) -> TrendDirection {
    let (first, last) = match (series.first(), series.last()) {
        (Some(first), Some(last)) if series.len() >= 2 => (first, last),
        _ => return TrendDirection::Stable,
    };
    let delta = last.value - first.value;
    if delta > TREND_THRESHOLD {
        TrendDirection::Up
    } else if delta < -TREND_THRESHOLD {
        TrendDirection::Down
    } else {
        TrendDirection::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn series(values: &[f64]) -> Vec<NdviSample> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                NdviSample::new(
                    NaiveDate::from_ymd_opt(2025, 7, 1 + i as u32).unwrap(),
                    value,
                )
            })
            .collect()
    }

    #[test]
    fn test_short_series_is_stable() {
        assert_eq!(trend(&[]), TrendDirection::Stable);
        assert_eq!(trend(&series(&[0.9])), TrendDirection::Stable);
    }

    #[test]
    fn test_endpoint_deltas() {
        assert_eq!(trend(&series(&[0.3, 0.3])), TrendDirection::Stable);
        assert_eq!(trend(&series(&[0.3, 0.4])), TrendDirection::Up);
        assert_eq!(trend(&series(&[0.3, 0.32])), TrendDirection::Stable);
        assert_eq!(trend(&series(&[0.5, 0.4])), TrendDirection::Down);
    }

    #[test]
    fn test_intermediate_points_ignored() {
        // The dip in the middle does not matter; only the endpoints do.
        assert_eq!(trend(&series(&[0.4, 0.1, 0.5])), TrendDirection::Up);
        assert_eq!(trend(&series(&[0.4, 0.9, 0.41])), TrendDirection::Stable);
    }

    #[test]
    fn test_threshold_is_strict() {
        // Delta of exactly 0.05 stays stable on both sides. Values chosen
        // so the f64 difference is exactly representable.
        assert_eq!(trend(&series(&[0.25, 0.30])), TrendDirection::Stable);
    }
}
