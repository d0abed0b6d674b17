//! Farm data source.
//!
//! The satellite NDVI values are produced by an external ingestion service;
//! this core only consumes already-derived scalar samples. The source trait
//! abstracts where a [`FarmSnapshot`] comes from; the in-memory
//! implementation backs tests and local development.

pub mod checksum;

use async_trait::async_trait;
#[cfg(feature = "local-source")]
use parking_lot::RwLock;
use thiserror::Error;

use crate::api::FarmSnapshot;

pub use checksum::snapshot_checksum;

/// Errors raised by snapshot retrieval.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    /// No snapshot has been delivered yet.
    #[error("no farm snapshot available")]
    NoSnapshot,
    /// A delivered snapshot violated a series invariant.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
    /// The upstream service could not be reached.
    #[error("farm data service unavailable: {0}")]
    Unavailable(String),
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Read-only access to the current farm snapshot.
#[async_trait]
pub trait FarmDataSource: Send + Sync {
    /// Fetch the most recent snapshot.
    async fn fetch_snapshot(&self) -> SourceResult<FarmSnapshot>;

    /// Whether the source is reachable and has data.
    async fn health_check(&self) -> SourceResult<bool>;
}

/// In-memory source for tests and local development.
///
/// Holds one snapshot behind a lock; `replace_snapshot` models a fresh
/// delivery from the ingestion service. Replacement validates every field's
/// series invariant before accepting the snapshot.
#[cfg(feature = "local-source")]
#[derive(Default)]
pub struct LocalFarmSource {
    snapshot: RwLock<Option<FarmSnapshot>>,
}

#[cfg(feature = "local-source")]
impl LocalFarmSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: FarmSnapshot) -> SourceResult<Self> {
        let source = Self::new();
        source.replace_snapshot(snapshot)?;
        Ok(source)
    }

    /// Accept a newly delivered snapshot, rejecting invalid series.
    pub fn replace_snapshot(&self, snapshot: FarmSnapshot) -> SourceResult<()> {
        for field in &snapshot.fields {
            field
                .validate()
                .map_err(SourceError::InvalidSnapshot)?;
        }
        log::info!(
            "farm snapshot replaced: {} fields, checksum {}",
            snapshot.fields.len(),
            &snapshot_checksum(&snapshot)[..12]
        );
        *self.snapshot.write() = Some(snapshot);
        Ok(())
    }
}

#[cfg(feature = "local-source")]
#[async_trait]
impl FarmDataSource for LocalFarmSource {
    async fn fetch_snapshot(&self) -> SourceResult<FarmSnapshot> {
        self.snapshot
            .read()
            .clone()
            .ok_or(SourceError::NoSnapshot)
    }

    async fn health_check(&self) -> SourceResult<bool> {
        Ok(self.snapshot.read().is_some())
    }
}
