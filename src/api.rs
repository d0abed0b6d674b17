//! Public API surface for the CropSense core.
//!
//! This file consolidates the domain types shared across the crate.
//! All types derive Serialize/Deserialize for JSON serialization.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Field identifier (assigned by the external farm data service).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FieldId(pub i64);

impl FieldId {
    pub fn new(value: i64) -> Self {
        FieldId(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// Custom-area identifier (UUID assigned at registration).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomAreaId(pub String);

impl CustomAreaId {
    pub fn new(value: impl Into<String>) -> Self {
        CustomAreaId(value.into())
    }
}

impl std::fmt::Display for CustomAreaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A geographic point in decimal degrees (WGS84).
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Minimum number of vertices for a polygon usable in analysis.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// An ordered ring of geographic vertices delineating a land area.
///
/// A polygon is only constructible with at least [`MIN_POLYGON_VERTICES`]
/// vertices; the closing edge back to the first vertex is implicit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon(Vec<GeoPoint>);

impl Polygon {
    /// Build a polygon from an ordered vertex list.
    ///
    /// Returns `None` when fewer than three vertices are supplied.
    pub fn try_new(vertices: Vec<GeoPoint>) -> Option<Self> {
        if vertices.len() < MIN_POLYGON_VERTICES {
            None
        } else {
            Some(Polygon(vertices))
        }
    }

    pub fn vertices(&self) -> &[GeoPoint] {
        &self.0
    }

    pub fn vertex_count(&self) -> usize {
        self.0.len()
    }

    /// Approximate enclosed area in hectares.
    ///
    /// Uses the planar shoelace formula on an equirectangular projection
    /// centered at the polygon's mean latitude. Accurate enough for
    /// field-sized areas; not intended for continental polygons.
    pub fn area_hectares(&self) -> f64 {
        // Meters per degree of latitude / longitude at the mean latitude.
        const M_PER_DEG_LAT: f64 = 111_320.0;
        let mean_lat = self.0.iter().map(|p| p.lat).sum::<f64>() / self.0.len() as f64;
        let m_per_deg_lon = M_PER_DEG_LAT * mean_lat.to_radians().cos();

        let mut doubled = 0.0;
        for i in 0..self.0.len() {
            let a = &self.0[i];
            let b = &self.0[(i + 1) % self.0.len()];
            let (ax, ay) = (a.lon * m_per_deg_lon, a.lat * M_PER_DEG_LAT);
            let (bx, by) = (b.lon * m_per_deg_lon, b.lat * M_PER_DEG_LAT);
            doubled += ax * by - bx * ay;
        }
        (doubled.abs() / 2.0) / 10_000.0
    }
}

/// A single NDVI observation for one calendar day.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct NdviSample {
    pub date: NaiveDate,
    /// Vegetation index, nominally in [0, 1]. Sensor noise may push values
    /// slightly outside the nominal range; the pipeline accepts any real.
    pub value: f64,
}

impl NdviSample {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// A pre-registered farm subdivision with its NDVI history.
///
/// Fields arrive from the external farm data service and are immutable to
/// this core. The `series` is expected date-sorted with unique dates; see
/// [`Field::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub id: FieldId,
    pub name: String,
    pub boundary: Option<Polygon>,
    pub crop: String,
    pub area_hectares: f64,
    /// Ordered-by-date NDVI samples, no duplicate dates.
    pub series: Vec<NdviSample>,
}

impl Field {
    /// Check the series invariant: strictly ascending dates (which also
    /// implies uniqueness).
    pub fn validate(&self) -> Result<(), String> {
        for pair in self.series.windows(2) {
            if pair[0].date >= pair[1].date {
                return Err(format!(
                    "field {} series not strictly ascending at {}",
                    self.id.0, pair[1].date
                ));
            }
        }
        Ok(())
    }
}

/// Lifecycle of the external analysis job attached to a custom area.
///
/// Transitions `Pending -> Complete` or `Pending -> Failed` exactly once;
/// an area never regresses to `Pending`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum AnalysisState {
    /// Analysis request dispatched, result not yet available.
    Pending,
    /// Analysis finished with a current NDVI value for the area.
    Complete { ndvi: f64 },
    /// Analysis failed or timed out; the area keeps its geometry but has
    /// no vegetation value.
    Failed { reason: String },
}

impl AnalysisState {
    pub fn ndvi_value(&self) -> Option<f64> {
        match self {
            AnalysisState::Complete { ndvi } => Some(*ndvi),
            _ => None,
        }
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(self, AnalysisState::Pending)
    }
}

/// A user-drawn ad-hoc area analyzed on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomArea {
    pub id: CustomAreaId,
    pub name: String,
    pub polygon: Polygon,
    pub area_hectares: Option<f64>,
    pub analysis: AnalysisState,
}

/// Snapshot of farm-wide NDVI data from the external satellite service.
///
/// Read-only to this core; a new snapshot simply replaces the previous one
/// and triggers fresh recomputation on next read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmSnapshot {
    pub average_ndvi: f64,
    pub fields: Vec<Field>,
    pub last_updated: DateTime<Utc>,
}

/// What the analytics pipeline should consume.
///
/// Selection never mutates the underlying entities; it only picks which
/// series is fed to the aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum SelectionTarget {
    AllFields,
    Field(FieldId),
    CustomArea(CustomAreaId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(which: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, which).unwrap()
    }

    #[test]
    fn test_polygon_requires_three_vertices() {
        assert!(Polygon::try_new(vec![]).is_none());
        assert!(
            Polygon::try_new(vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0)]).is_none()
        );
        let tri = Polygon::try_new(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 1.0),
            GeoPoint::new(1.0, 0.0),
        ]);
        assert!(tri.is_some());
        assert_eq!(tri.unwrap().vertex_count(), 3);
    }

    #[test]
    fn test_polygon_area_square_100m() {
        // Roughly a 100m x 100m square near the equator -> ~1 hectare.
        let side_deg = 100.0 / 111_320.0;
        let square = Polygon::try_new(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, side_deg),
            GeoPoint::new(side_deg, side_deg),
            GeoPoint::new(side_deg, 0.0),
        ])
        .unwrap();
        let ha = square.area_hectares();
        assert!((ha - 1.0).abs() < 0.05, "expected ~1 ha, got {ha}");
    }

    #[test]
    fn test_field_validate_ordering() {
        let mut field = Field {
            id: FieldId::new(1),
            name: "North paddock".to_string(),
            boundary: None,
            crop: "wheat".to_string(),
            area_hectares: 12.5,
            series: vec![NdviSample::new(d(1), 0.4), NdviSample::new(d(2), 0.5)],
        };
        assert!(field.validate().is_ok());

        field.series.push(NdviSample::new(d(2), 0.6));
        assert!(field.validate().is_err());
    }

    #[test]
    fn test_analysis_state_accessors() {
        assert!(AnalysisState::Pending.is_analyzing());
        assert_eq!(AnalysisState::Pending.ndvi_value(), None);

        let done = AnalysisState::Complete { ndvi: 0.62 };
        assert!(!done.is_analyzing());
        assert_eq!(done.ndvi_value(), Some(0.62));

        let failed = AnalysisState::Failed {
            reason: "upstream timeout".to_string(),
        };
        assert!(!failed.is_analyzing());
        assert_eq!(failed.ndvi_value(), None);
    }

    #[test]
    fn test_selection_target_serde_shape() {
        let json = serde_json::to_value(SelectionTarget::Field(FieldId::new(7))).unwrap();
        assert_eq!(json["kind"], "field");
        assert_eq!(json["id"], 7);

        let all = serde_json::to_value(SelectionTarget::AllFields).unwrap();
        assert_eq!(all["kind"], "all_fields");
    }
}
