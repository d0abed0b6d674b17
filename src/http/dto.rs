//! Data Transfer Objects for the HTTP API.
//!
//! These DTOs are used for request/response serialization in the REST API.
//! The analytics and capture types already derive Serialize/Deserialize and
//! are re-exported here instead of being duplicated.

use serde::{Deserialize, Serialize};

// Re-export core types that are already serializable
pub use crate::api::{
    AnalysisState, CustomArea, CustomAreaId, Field, FieldId, GeoPoint, NdviSample, Polygon,
    SelectionTarget,
};
pub use crate::capture::{CaptureEvent, CaptureState};
pub use crate::services::chart::{ChartPoint, ChartSpec};
pub use crate::services::health::HealthClass;
pub use crate::services::job_tracker::{AnalysisJob, LogEntry};
pub use crate::services::report::{ClassifiedSample, TableRow, VegetationReport};
pub use crate::services::trend::TrendDirection;
pub use crate::services::window::TimeWindow;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Farm data source status
    pub source: String,
}

/// Farm snapshot overview (field list without full series payloads).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarmOverviewResponse {
    pub average_ndvi: f64,
    pub last_updated: chrono::DateTime<chrono::Utc>,
    /// Identity of the snapshot's field data; changes iff the data changes
    pub checksum: String,
    pub fields: Vec<FieldSummaryDto>,
}

/// One field in the overview listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSummaryDto {
    pub id: FieldId,
    pub name: String,
    pub crop: String,
    pub area_hectares: f64,
    pub sample_count: usize,
    /// Latest NDVI sample, if the field has any history
    pub latest: Option<NdviSample>,
}

impl From<&Field> for FieldSummaryDto {
    fn from(field: &Field) -> Self {
        Self {
            id: field.id,
            name: field.name.clone(),
            crop: field.crop.clone(),
            area_hectares: field.area_hectares,
            sample_count: field.series.len(),
            latest: field.series.last().copied(),
        }
    }
}

/// Query parameters for the report endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportQuery {
    /// Window code: `1w`, `1m` or `3m` (default `1m`)
    #[serde(default)]
    pub window: Option<String>,
    /// Explicit selection target
    #[serde(default)]
    pub target: Option<String>,
    /// Field id supplied by the surrounding dashboard context
    #[serde(default)]
    pub field_id: Option<i64>,
}

/// Report response: the report plus what the selection resolved to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportResponse {
    /// `all_fields`, `field:<id>` or `area:<id>`
    pub resolved: String,
    pub report: VegetationReport,
}

/// Request body for registering a custom area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterAreaRequest {
    /// Name for the area
    pub name: String,
    /// Ordered vertex ring (at least 3 vertices)
    pub vertices: Vec<GeoPoint>,
}

/// Response for area registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterAreaResponse {
    pub area_id: CustomAreaId,
    /// Job ID for tracking the async analysis
    pub job_id: String,
    pub message: String,
}

/// Custom-area listing response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AreaListResponse {
    pub areas: Vec<CustomArea>,
    pub total: usize,
}

/// Analysis job status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusResponse {
    pub job_id: String,
    pub area_id: CustomAreaId,
    pub status: String,
    pub logs: Vec<LogEntry>,
    pub ndvi: Option<f64>,
}

/// Request body for adding a capture vertex.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddVertexRequest {
    pub point: GeoPoint,
}

/// Response for capture operations: resulting state plus emitted events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureResponse {
    pub state: CaptureState,
    pub vertex_count: usize,
    pub events: Vec<CaptureEvent>,
}

/// Request body for completing a capture session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureCompleteRequest {
    /// Name for the registered area (defaults to "Custom area")
    #[serde(default)]
    pub name: Option<String>,
}

/// Response for completing a capture session: the registered area plus the
/// events the session emitted while finalizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureCompleteResponse {
    pub area_id: CustomAreaId,
    /// Job ID for tracking the async analysis
    pub job_id: String,
    pub message: String,
    pub events: Vec<CaptureEvent>,
}
