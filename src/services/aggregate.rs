//! Time-series aggregation across fields.
//!
//! Merges per-field NDVI series into the single series the rest of the
//! pipeline consumes. Pure and deterministic: identical inputs always
//! produce identical outputs, so recomputation on every read is safe.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::api::{Field, FieldId, NdviSample};

/// Which series the aggregator should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateTarget {
    /// The farm-wide average across every field.
    AllFields,
    /// One field's series, passed through unchanged.
    SingleField(FieldId),
}

/// Round to 2 decimal places, half away from zero.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Aggregate the given fields' series according to `target`.
///
/// For a single field the series is returned unchanged (an unknown field id
/// yields an empty series; the caller decides how to fall back). For
/// `AllFields` the date axis is the union of all dates across every field,
/// and each date's value is the mean over the fields that actually have a
/// sample on that date. Fields lacking a date contribute to neither the
/// numerator nor the denominator; a date with zero contributors is skipped
/// outright rather than divided by zero. Means are rounded to 2 decimals.
pub fn aggregate(target: AggregateTarget, fields: &[Field]) -> Vec<NdviSample> {
    match target {
        AggregateTarget::SingleField(id) => fields
            .iter()
            .find(|f| f.id == id)
            .map(|f| f.series.clone())
            .unwrap_or_default(),
        AggregateTarget::AllFields => {
            let mut by_date: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
            for field in fields {
                for sample in &field.series {
                    let entry = by_date.entry(sample.date).or_insert((0.0, 0));
                    entry.0 += sample.value;
                    entry.1 += 1;
                }
            }
            by_date
                .into_iter()
                .filter(|(_, (_, count))| *count > 0)
                .map(|(date, (sum, count))| NdviSample::new(date, round2(sum / count as f64)))
                .collect()
        }
    }
}
