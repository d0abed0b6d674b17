//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the capture
//! state machine, the area registry, or the analytics pipeline.

use axum::{
    extract::{Path, Query, State},
    response::sse::{Event, Sse},
    Json,
};
use chrono::Utc;
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;

use super::dto::{
    AddVertexRequest, AreaListResponse, CaptureCompleteRequest, CaptureCompleteResponse,
    CaptureResponse,
    FarmOverviewResponse, FieldSummaryDto, HealthResponse, JobStatusResponse, RegisterAreaRequest,
    RegisterAreaResponse, ReportQuery, ReportResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{CustomArea, CustomAreaId, FieldId, NdviSample, Polygon, SelectionTarget};
use crate::registry::ResolvedSelection;
use crate::services::aggregate::{aggregate, AggregateTarget};
use crate::services::chart::ChartSpec;
use crate::services::report::build_report;
use crate::services::window::TimeWindow;
use crate::source::snapshot_checksum;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the farm data
/// source is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let source_status = match state.source.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "no data".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        source: source_status,
    }))
}

// =============================================================================
// Farm Snapshot
// =============================================================================

/// GET /v1/farm
///
/// Overview of the current farm snapshot: average NDVI, field summaries and
/// the snapshot checksum.
pub async fn get_farm(State(state): State<AppState>) -> HandlerResult<FarmOverviewResponse> {
    let snapshot = state.source.fetch_snapshot().await?;
    let checksum = snapshot_checksum(&snapshot);
    let fields: Vec<FieldSummaryDto> = snapshot.fields.iter().map(Into::into).collect();

    Ok(Json(FarmOverviewResponse {
        average_ndvi: snapshot.average_ndvi,
        last_updated: snapshot.last_updated,
        checksum,
        fields,
    }))
}

// =============================================================================
// Vegetation Report
// =============================================================================

/// Parse the `target` query parameter: `all_fields`, `field:<id>` or
/// `area:<id>`.
fn parse_target(raw: &str) -> Result<SelectionTarget, AppError> {
    if raw == "all_fields" {
        return Ok(SelectionTarget::AllFields);
    }
    if let Some(id) = raw.strip_prefix("field:") {
        let id: i64 = id
            .parse()
            .map_err(|_| AppError::BadRequest(format!("invalid field id: {}", id)))?;
        return Ok(SelectionTarget::Field(FieldId::new(id)));
    }
    if let Some(id) = raw.strip_prefix("area:") {
        return Ok(SelectionTarget::CustomArea(CustomAreaId::new(id)));
    }
    Err(AppError::BadRequest(format!(
        "invalid target: {} (expected all_fields, field:<id> or area:<id>)",
        raw
    )))
}

/// Series for a resolved custom area: its single current NDVI value, dated
/// at the snapshot timestamp, or nothing while analysis is pending/failed.
fn area_series(area: &CustomArea, snapshot_date: chrono::NaiveDate) -> Vec<NdviSample> {
    area.analysis
        .ndvi_value()
        .map(|ndvi| vec![NdviSample::new(snapshot_date, ndvi)])
        .unwrap_or_default()
}

/// GET /v1/report
///
/// Full vegetation report for the selected entity and window: windowed
/// series with per-point health labels, trend direction, chart geometry and
/// the history table.
pub async fn get_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> HandlerResult<ReportResponse> {
    let window = match query.window.as_deref() {
        None => TimeWindow::OneMonth,
        Some(code) => TimeWindow::parse(code)
            .ok_or_else(|| AppError::BadRequest(format!("invalid window: {}", code)))?,
    };
    let explicit = query.target.as_deref().map(parse_target).transpose()?;
    let external_field = query.field_id.map(FieldId::new);

    let snapshot = state.source.fetch_snapshot().await?;
    let resolved =
        state
            .registry
            .resolve_selection(explicit.as_ref(), external_field, &snapshot.fields);

    let (resolved_label, series) = match &resolved {
        ResolvedSelection::AllFields => (
            "all_fields".to_string(),
            aggregate(AggregateTarget::AllFields, &snapshot.fields),
        ),
        ResolvedSelection::Field(field) => (
            format!("field:{}", field.id.0),
            aggregate(AggregateTarget::SingleField(field.id), &snapshot.fields),
        ),
        ResolvedSelection::CustomArea(area) => (
            format!("area:{}", area.id),
            area_series(area, snapshot.last_updated.date_naive()),
        ),
    };

    let today = Utc::now().date_naive();
    let report = build_report(&series, window, today, ChartSpec::default());

    Ok(Json(ReportResponse {
        resolved: resolved_label,
        report,
    }))
}

// =============================================================================
// Custom Areas
// =============================================================================

/// POST /v1/areas
///
/// Register a custom area from an explicit vertex ring and start its
/// analysis. Returns a job ID for tracking progress.
pub async fn register_area(
    State(state): State<AppState>,
    Json(request): Json<RegisterAreaRequest>,
) -> Result<(axum::http::StatusCode, Json<RegisterAreaResponse>), AppError> {
    let polygon = Polygon::try_new(request.vertices).ok_or_else(|| {
        AppError::BadRequest("a custom area needs at least 3 vertices".to_string())
    })?;

    let (area_id, job_id) = state.registry.register_custom_area(polygon, request.name);

    Ok((
        axum::http::StatusCode::ACCEPTED,
        Json(RegisterAreaResponse {
            area_id,
            message: format!("Area analysis started. Track progress at /v1/jobs/{}/logs", job_id),
            job_id,
        }),
    ))
}

/// GET /v1/areas
///
/// List all registered custom areas.
pub async fn list_areas(State(state): State<AppState>) -> HandlerResult<AreaListResponse> {
    let areas = state.registry.areas();
    let total = areas.len();
    Ok(Json(AreaListResponse { areas, total }))
}

/// GET /v1/areas/{area_id}
///
/// Get one custom area, including its analysis state.
pub async fn get_area(
    State(state): State<AppState>,
    Path(area_id): Path<String>,
) -> HandlerResult<CustomArea> {
    let id = CustomAreaId::new(area_id);
    let area = state
        .registry
        .get_area(&id)
        .ok_or_else(|| AppError::NotFound(format!("Area {} not found", id)))?;
    Ok(Json(area))
}

// =============================================================================
// Boundary Capture
// =============================================================================

fn capture_response(state: &AppState, events: Vec<crate::capture::CaptureEvent>) -> CaptureResponse {
    let capture = state.capture.lock();
    CaptureResponse {
        state: capture.state(),
        vertex_count: capture.pending_vertices().len(),
        events,
    }
}

/// POST /v1/capture/start
///
/// Begin a drawing session, cancelling any active one.
pub async fn capture_start(State(state): State<AppState>) -> HandlerResult<CaptureResponse> {
    let events = state.capture.lock().start();
    Ok(Json(capture_response(&state, events)))
}

/// POST /v1/capture/vertices
///
/// Append a vertex to the active drawing session.
pub async fn capture_add_vertex(
    State(state): State<AppState>,
    Json(request): Json<AddVertexRequest>,
) -> HandlerResult<CaptureResponse> {
    let events = state.capture.lock().add_vertex(request.point);
    Ok(Json(capture_response(&state, events)))
}

/// POST /v1/capture/complete
///
/// Finalize the drawn polygon and register it as a custom area. Fails with
/// 409 and keeps the session open when fewer than 3 vertices were drawn.
pub async fn capture_complete(
    State(state): State<AppState>,
    Json(request): Json<CaptureCompleteRequest>,
) -> Result<(axum::http::StatusCode, Json<CaptureCompleteResponse>), AppError> {
    let (polygon, events) = state.capture.lock().complete()?;
    let name = request.name.unwrap_or_else(|| "Custom area".to_string());
    let (area_id, job_id) = state.registry.register_custom_area(polygon, name);

    Ok((
        axum::http::StatusCode::ACCEPTED,
        Json(CaptureCompleteResponse {
            area_id,
            message: format!("Area analysis started. Track progress at /v1/jobs/{}/logs", job_id),
            job_id,
            events,
        }),
    ))
}

/// POST /v1/capture/cancel
///
/// Discard the active drawing session.
pub async fn capture_cancel(State(state): State<AppState>) -> HandlerResult<CaptureResponse> {
    let events = state.capture.lock().cancel();
    Ok(Json(capture_response(&state, events)))
}

// =============================================================================
// Async Job Management
// =============================================================================

/// GET /v1/jobs/{job_id}
///
/// Get the current status and logs of an analysis job.
pub async fn get_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> HandlerResult<JobStatusResponse> {
    let job = state
        .job_tracker
        .get_job(&job_id)
        .ok_or_else(|| AppError::NotFound(format!("Job {} not found", job_id)))?;

    Ok(Json(JobStatusResponse {
        job_id: job.job_id,
        area_id: job.area_id,
        status: format!("{:?}", job.status).to_lowercase(),
        logs: job.logs,
        ndvi: job.outcome.map(|o| o.ndvi),
    }))
}

/// GET /v1/jobs/{job_id}/logs
///
/// Stream job logs via Server-Sent Events (SSE).
pub async fn stream_job_logs(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    // Verify job exists
    if state.job_tracker.get_job(&job_id).is_none() {
        return Err(AppError::NotFound(format!("Job {} not found", job_id)));
    }

    let tracker = state.job_tracker.clone();
    let stream = async_stream::stream! {
        let mut last_log_count = 0;
        loop {
            // Send new logs since last check
            let logs = tracker.get_logs(&job_id);
            for log in logs.iter().skip(last_log_count) {
                let event_data = serde_json::to_string(log).unwrap_or_default();
                yield Ok(Event::default().data(event_data));
            }
            last_log_count = logs.len();

            // Check if job is complete
            if let Some(job) = tracker.get_job(&job_id) {
                if job.status != crate::services::job_tracker::JobStatus::Running {
                    let final_event = serde_json::json!({
                        "status": job.status,
                        "outcome": job.outcome,
                    });
                    yield Ok(Event::default()
                        .event("complete")
                        .data(serde_json::to_string(&final_event).unwrap_or_default()));
                    break;
                }
            } else {
                break;
            }

            // Wait before checking again
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
    };

    Ok(Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(1))
            .text("keep-alive"),
    ))
}
