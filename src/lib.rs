//! # CropSense Core
//!
//! Field boundary capture and vegetation-health analytics engine.
//!
//! This crate provides the algorithmic core of the CropSense agricultural
//! monitoring backend: a finite-state geometry-capture protocol for delineating
//! arbitrary land polygons, and a deterministic pipeline that turns raw
//! per-field NDVI time series into aggregated values, health classifications,
//! trend signals, and chart-ready projections. The backend exposes a REST API
//! via Axum for the dashboard frontend.
//!
//! ## Features
//!
//! - **Boundary Capture**: Synchronous state machine recording freehand
//!   geographic vertices into a polygon, with an explicit event stream
//! - **Area Registry**: Resolution of the selected field/custom area and
//!   asynchronous analysis of freshly drawn areas
//! - **Analytics**: Aggregation across fields, trailing time windows, ordinal
//!   health classification, endpoint trend detection, chart projection
//! - **HTTP API**: RESTful endpoints for frontend integration
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Core domain types shared across the crate
//! - [`capture`]: Boundary-capture state machine
//! - [`registry`]: Custom-area registration and selection resolution
//! - [`source`]: Farm data source trait and in-memory implementation
//! - [`services`]: Pure analytics pipeline and job tracking
//! - [`http`]: Axum-based HTTP server and request handlers

pub mod api;
pub mod capture;
pub mod config;
pub mod registry;
pub mod services;
pub mod source;

#[cfg(feature = "http-server")]
pub mod http;
