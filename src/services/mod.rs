//! Service layer for the analytics pipeline.
//!
//! The five analytics services (aggregation, windowing, classification, trend
//! detection, chart projection) are pure functions over immutable snapshots;
//! [`report`] composes them into the single structure the rendering layer
//! consumes. [`job_tracker`] is the only stateful member and backs the
//! asynchronous custom-area analysis.

pub mod aggregate;

pub mod chart;

pub mod health;

pub mod job_tracker;

pub mod report;

pub mod trend;

pub mod window;

pub use aggregate::aggregate;
pub use chart::{project_chart, ChartPoint, ChartSpec};
pub use health::{classify, HealthClass};
pub use job_tracker::JobTracker;
pub use report::{build_report, VegetationReport};
pub use trend::{trend, TrendDirection};
pub use window::{filter_window, TimeWindow};
