//! Trailing time-window selection.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::api::NdviSample;

/// Trailing window the dashboard can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeWindow {
    #[serde(rename = "1w")]
    OneWeek,
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "3m")]
    ThreeMonths,
}

impl TimeWindow {
    /// Span of the window in calendar days.
    pub fn span_days(&self) -> i64 {
        match self {
            TimeWindow::OneWeek => 7,
            TimeWindow::OneMonth => 30,
            TimeWindow::ThreeMonths => 90,
        }
    }

    /// Parse the dashboard's short window codes.
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "1w" => Some(TimeWindow::OneWeek),
            "1m" => Some(TimeWindow::OneMonth),
            "3m" => Some(TimeWindow::ThreeMonths),
            _ => None,
        }
    }
}

impl std::fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            TimeWindow::OneWeek => "1w",
            TimeWindow::OneMonth => "1m",
            TimeWindow::ThreeMonths => "3m",
        };
        write!(f, "{code}")
    }
}

/// Slice `series` to the trailing window ending at `today`.
///
/// Keeps samples with `date >= today - span`, preserving the original
/// ascending order. An empty result is a valid "no data for this window"
/// outcome, not an error; downstream renders it distinctly from a failure.
pub fn filter_window(series: &[NdviSample], window: TimeWindow, today: NaiveDate) -> Vec<NdviSample> {
    let cutoff = today - Duration::days(window.span_days());
    series
        .iter()
        .filter(|sample| sample.date >= cutoff)
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    #[test]
    fn test_window_spans() {
        assert_eq!(TimeWindow::OneWeek.span_days(), 7);
        assert_eq!(TimeWindow::OneMonth.span_days(), 30);
        assert_eq!(TimeWindow::ThreeMonths.span_days(), 90);
    }

    #[test]
    fn test_parse_codes() {
        assert_eq!(TimeWindow::parse("1w"), Some(TimeWindow::OneWeek));
        assert_eq!(TimeWindow::parse("1m"), Some(TimeWindow::OneMonth));
        assert_eq!(TimeWindow::parse("3m"), Some(TimeWindow::ThreeMonths));
        assert_eq!(TimeWindow::parse("6m"), None);
    }

    #[test]
    fn test_one_week_keeps_boundary_date() {
        let today = d(6, 15);
        let series = vec![
            NdviSample::new(d(6, 7), 0.3),  // 8 days back, excluded
            NdviSample::new(d(6, 8), 0.4),  // exactly 7 days back, kept
            NdviSample::new(d(6, 14), 0.5),
        ];
        let windowed = filter_window(&series, TimeWindow::OneWeek, today);
        assert_eq!(windowed.len(), 2);
        assert_eq!(windowed[0].date, d(6, 8));
        assert_eq!(windowed[1].date, d(6, 14));
    }

    #[test]
    fn test_order_preserved() {
        let today = d(6, 30);
        let series: Vec<NdviSample> = (1..=10)
            .map(|day| NdviSample::new(d(6, day), day as f64 / 10.0))
            .collect();
        let windowed = filter_window(&series, TimeWindow::ThreeMonths, today);
        assert_eq!(windowed, series);
    }

    #[test]
    fn test_empty_inputs_and_results() {
        assert!(filter_window(&[], TimeWindow::OneWeek, d(6, 1)).is_empty());

        let stale = vec![NdviSample::new(d(1, 1), 0.5)];
        assert!(filter_window(&stale, TimeWindow::OneMonth, d(6, 1)).is_empty());
    }
}
