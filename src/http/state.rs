//! Application state for the HTTP server.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::capture::BoundaryCapture;
use crate::registry::AreaRegistry;
use crate::services::job_tracker::JobTracker;
use crate::source::FarmDataSource;

/// Shared application state passed to all handlers.
///
/// The capture session sits behind a mutex because only one drawing session
/// may be active at a time; every capture operation takes the lock for one
/// synchronous transition.
#[derive(Clone)]
pub struct AppState {
    /// Farm snapshot source
    pub source: Arc<dyn FarmDataSource>,
    /// Custom areas and their analysis jobs
    pub registry: AreaRegistry,
    /// Analysis job tracker (shared with the registry)
    pub job_tracker: JobTracker,
    /// The single boundary-capture session
    pub capture: Arc<Mutex<BoundaryCapture>>,
}

impl AppState {
    /// Create a new application state around the given source and registry.
    pub fn new(source: Arc<dyn FarmDataSource>, registry: AreaRegistry) -> Self {
        let job_tracker = registry.tracker().clone();
        Self {
            source,
            registry,
            job_tracker,
            capture: Arc::new(Mutex::new(BoundaryCapture::new())),
        }
    }
}
