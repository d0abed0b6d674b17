//! HTTP server module for the CropSense backend.
//!
//! This module provides an axum-based HTTP server that exposes the analytics
//! core as a REST API. It reuses the service layer, the area registry, and
//! the farm data source from the core library.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Request parsing and validation                         │
//! │  - JSON serialization/deserialization                     │
//! │  - CORS, compression, error handling                      │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Core (capture / registry / services)                     │
//! │  - Boundary-capture state machine                         │
//! │  - Custom-area analysis jobs                              │
//! │  - Pure analytics pipeline                                │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Farm data source (source/)                               │
//! │  - External snapshot ingestion                            │
//! │  - LocalFarmSource for development                        │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
