//! Composed vegetation report for the rendering layer.
//!
//! One call assembles everything a dashboard panel needs for the selected
//! entity and window: the windowed series with per-point classification,
//! the trend signal, projected chart geometry, and a row-oriented table
//! view. Built from pure services, so rebuilding the report on an
//! unchanged snapshot always yields identical output.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::NdviSample;
use crate::services::chart::{project_chart, ChartPoint, ChartSpec};
use crate::services::health::{classify, HealthClass};
use crate::services::trend::{trend, TrendDirection};
use crate::services::window::{filter_window, TimeWindow};

/// A classified sample in the windowed series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedSample {
    pub date: NaiveDate,
    pub value: f64,
    pub class: HealthClass,
    pub label: String,
    pub description: String,
    pub color: String,
}

/// One row of the dashboard's history table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub date: NaiveDate,
    pub value: f64,
    pub label: String,
    /// Direction of this row's value relative to the previous row;
    /// the first row is `Stable`.
    pub delta: TrendDirection,
}

/// Everything the rendering layer needs for one selection + window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VegetationReport {
    pub window: TimeWindow,
    pub series: Vec<ClassifiedSample>,
    pub trend: TrendDirection,
    pub chart: Vec<ChartPoint>,
    pub table: Vec<TableRow>,
    /// Classification of the latest value in the window, if any.
    pub current: Option<ClassifiedSample>,
    /// True when the window holds no samples. Valid data, not a failure;
    /// the frontend renders an explicit "no data" state for it.
    pub empty: bool,
}

fn classified(sample: &NdviSample) -> ClassifiedSample {
    let class = classify(sample.value);
    ClassifiedSample {
        date: sample.date,
        value: sample.value,
        class,
        label: class.label().to_string(),
        description: class.description().to_string(),
        color: class.color().to_string(),
    }
}

fn table_rows(series: &[NdviSample]) -> Vec<TableRow> {
    series
        .iter()
        .enumerate()
        .map(|(i, sample)| {
            let delta = if i == 0 {
                TrendDirection::Stable
            } else {
                let prev = series[i - 1].value;
                if sample.value > prev {
                    TrendDirection::Up
                } else if sample.value < prev {
                    TrendDirection::Down
                } else {
                    TrendDirection::Stable
                }
            };
            TableRow {
                date: sample.date,
                value: sample.value,
                label: classify(sample.value).label().to_string(),
                delta,
            }
        })
        .collect()
}

/// Build the full report for an aggregated series.
pub fn build_report(
    aggregated: &[NdviSample],
    window: TimeWindow,
    today: NaiveDate,
    chart_spec: ChartSpec,
) -> VegetationReport {
    let windowed = filter_window(aggregated, window, today);
    let series: Vec<ClassifiedSample> = windowed.iter().map(classified).collect();
    let current = windowed.last().map(classified);

    VegetationReport {
        window,
        trend: trend(&windowed),
        chart: project_chart(&windowed, chart_spec),
        table: table_rows(&windowed),
        empty: windowed.is_empty(),
        series,
        current,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, day).unwrap()
    }

    fn series() -> Vec<NdviSample> {
        vec![
            NdviSample::new(d(10), 0.35),
            NdviSample::new(d(12), 0.55),
            NdviSample::new(d(14), 0.55),
            NdviSample::new(d(16), 0.72),
        ]
    }

    #[test]
    fn test_report_composes_all_views() {
        let report = build_report(&series(), TimeWindow::OneMonth, d(20), ChartSpec::default());

        assert!(!report.empty);
        assert_eq!(report.series.len(), 4);
        assert_eq!(report.chart.len(), 4);
        assert_eq!(report.table.len(), 4);
        assert_eq!(report.trend, TrendDirection::Up);

        let current = report.current.unwrap();
        assert_eq!(current.date, d(16));
        assert_eq!(current.class, HealthClass::Excellent);
        assert_eq!(current.label, "Excellent");
    }

    #[test]
    fn test_table_row_deltas() {
        let report = build_report(&series(), TimeWindow::OneMonth, d(20), ChartSpec::default());
        let deltas: Vec<TrendDirection> = report.table.iter().map(|r| r.delta).collect();
        assert_eq!(
            deltas,
            vec![
                TrendDirection::Stable, // first row has no predecessor
                TrendDirection::Up,
                TrendDirection::Stable,
                TrendDirection::Up,
            ]
        );
    }

    #[test]
    fn test_window_narrows_report() {
        let report = build_report(&series(), TimeWindow::OneWeek, d(20), ChartSpec::default());
        // Only dates on or after day 13 survive the 7-day window.
        assert_eq!(report.series.len(), 2);
        assert_eq!(report.series[0].date, d(14));
    }

    #[test]
    fn test_empty_window_is_valid() {
        let report = build_report(&[], TimeWindow::OneWeek, d(20), ChartSpec::default());
        assert!(report.empty);
        assert!(report.series.is_empty());
        assert!(report.chart.is_empty());
        assert!(report.table.is_empty());
        assert!(report.current.is_none());
        assert_eq!(report.trend, TrendDirection::Stable);
    }

    #[test]
    fn test_report_is_idempotent() {
        let input = series();
        let first = build_report(&input, TimeWindow::ThreeMonths, d(20), ChartSpec::default());
        let second = build_report(&input, TimeWindow::ThreeMonths, d(20), ChartSpec::default());
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
