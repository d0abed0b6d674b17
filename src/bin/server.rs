//! CropSense HTTP Server Binary
//!
//! This is the main entry point for the CropSense REST API server.
//! It seeds the in-memory farm data source, sets up the HTTP router, and
//! starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin cropsense-server --features "local-source,http-server"
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `ANALYSIS_TIMEOUT_SECS`: Custom-area analysis timeout (default: 120)
//! - `CROPSENSE_CONFIG`: Optional TOML config file
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use cropsense_rust::api::{FarmSnapshot, Field, FieldId, NdviSample};
use cropsense_rust::config::ServerConfig;
use cropsense_rust::http::{create_router, AppState};
use cropsense_rust::registry::{AreaRegistry, LocalAnalysisClient};
use cropsense_rust::services::job_tracker::JobTracker;
use cropsense_rust::source::LocalFarmSource;

/// Development snapshot: three fields with 90 days of synthetic history.
fn demo_snapshot() -> FarmSnapshot {
    let today = Utc::now().date_naive();
    let field = |id: i64, name: &str, crop: &str, base: f64| Field {
        id: FieldId::new(id),
        name: name.to_string(),
        boundary: None,
        crop: crop.to_string(),
        area_hectares: 10.0 + id as f64 * 2.5,
        series: (0..90)
            .map(|i| {
                let date = today - ChronoDuration::days(89 - i);
                // Slow seasonal ramp with a small oscillation.
                let value = base + 0.15 * (i as f64 / 89.0) + 0.03 * (i as f64 / 7.0).sin();
                NdviSample::new(date, (value * 100.0).round() / 100.0)
            })
            .collect(),
    };

    let fields = vec![
        field(1, "North paddock", "wheat", 0.45),
        field(2, "River strip", "maize", 0.55),
        field(3, "Hill block", "barley", 0.35),
    ];
    let average_ndvi = fields
        .iter()
        .filter_map(|f| f.series.last())
        .map(|s| s.value)
        .sum::<f64>()
        / fields.len() as f64;

    FarmSnapshot {
        average_ndvi: (average_ndvi * 100.0).round() / 100.0,
        fields,
        last_updated: Utc::now(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting CropSense HTTP Server");

    let config = ServerConfig::load()?;

    // Seed the in-memory source with the development snapshot
    let source = Arc::new(LocalFarmSource::with_snapshot(demo_snapshot())?);
    info!("Farm data source seeded");

    // Registry with the local analysis stub standing in for the external service
    let registry = AreaRegistry::new(Arc::new(LocalAnalysisClient), JobTracker::new())
        .with_analysis_timeout(Duration::from_secs(config.analysis_timeout_secs));

    // Create application state
    let state = AppState::new(source, registry);

    // Create router with all endpoints
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("Server listening on http://{}", addr);
    info!("API documentation: http://{}/health", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
