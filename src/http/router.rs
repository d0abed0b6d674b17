//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Farm snapshot and analytics
        .route("/farm", get(handlers::get_farm))
        .route("/report", get(handlers::get_report))
        // Custom areas
        .route("/areas", post(handlers::register_area))
        .route("/areas", get(handlers::list_areas))
        .route("/areas/{area_id}", get(handlers::get_area))
        // Boundary capture session
        .route("/capture/start", post(handlers::capture_start))
        .route("/capture/vertices", post(handlers::capture_add_vertex))
        .route("/capture/complete", post(handlers::capture_complete))
        .route("/capture/cancel", post(handlers::capture_cancel))
        // Job management
        .route("/jobs/{job_id}", get(handlers::get_job_status))
        .route("/jobs/{job_id}/logs", get(handlers::stream_job_logs));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
