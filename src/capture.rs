//! Boundary-capture state machine.
//!
//! Records a freehand sequence of geographic points into a polygon. All
//! transitions are synchronous and driven by user input events on a single
//! control thread; there are no concurrent writers to the vertex list.
//! Instead of mutating a shared drawing surface, every mutating operation
//! returns the [`CaptureEvent`]s it emitted so that whatever owns the map
//! rendering surface can react explicitly.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::{GeoPoint, Polygon, MIN_POLYGON_VERTICES};

/// Errors raised by capture operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// `complete()` was called with too few vertices. Recoverable: the
    /// session stays open and more vertices may be added.
    #[error("polygon needs at least 3 vertices, have {have}")]
    InsufficientVertices { have: usize },
    /// `complete()` was called outside an active drawing session.
    #[error("no active capture session")]
    NoActiveSession,
}

/// Current state of the capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureState {
    Idle,
    Drawing,
}

/// Events emitted by capture transitions, consumed by the map surface owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CaptureEvent {
    SessionStarted,
    VertexAdded { point: GeoPoint, count: usize },
    SessionCompleted { polygon: Polygon },
    SessionCancelled,
}

/// Finite-state machine for delineating a land polygon.
///
/// States: `Idle` and `Drawing`. `complete` and `cancel` both return to
/// `Idle`; a failed `complete` (too few vertices) keeps the session open.
/// Only one session can be active at a time: `start` while drawing cancels
/// the existing session first, so no partial geometry is ever orphaned.
#[derive(Debug, Default)]
pub struct BoundaryCapture {
    state: CaptureState,
    vertices: Vec<GeoPoint>,
}

impl Default for CaptureState {
    fn default() -> Self {
        CaptureState::Idle
    }
}

impl BoundaryCapture {
    pub fn new() -> Self {
        Self {
            state: CaptureState::Idle,
            vertices: Vec::new(),
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Vertices recorded so far in the active session.
    pub fn pending_vertices(&self) -> &[GeoPoint] {
        &self.vertices
    }

    /// Begin a new drawing session, cancelling any active one.
    pub fn start(&mut self) -> Vec<CaptureEvent> {
        let mut events = Vec::new();
        if self.state == CaptureState::Drawing {
            log::warn!("capture session restarted while drawing; discarding {} vertices", self.vertices.len());
            events.push(CaptureEvent::SessionCancelled);
        }
        self.vertices.clear();
        self.state = CaptureState::Drawing;
        events.push(CaptureEvent::SessionStarted);
        events
    }

    /// Append a vertex to the active session. A no-op outside `Drawing`.
    pub fn add_vertex(&mut self, point: GeoPoint) -> Vec<CaptureEvent> {
        if self.state != CaptureState::Drawing {
            log::debug!("add_vertex ignored outside drawing session");
            return Vec::new();
        }
        self.vertices.push(point);
        vec![CaptureEvent::VertexAdded {
            point,
            count: self.vertices.len(),
        }]
    }

    /// Finalize the vertex list as a polygon and return to `Idle`.
    ///
    /// With fewer than three vertices this fails with
    /// [`CaptureError::InsufficientVertices`] and the session stays in
    /// `Drawing` so the user can keep adding points.
    pub fn complete(&mut self) -> Result<(Polygon, Vec<CaptureEvent>), CaptureError> {
        if self.state != CaptureState::Drawing {
            return Err(CaptureError::NoActiveSession);
        }
        if self.vertices.len() < MIN_POLYGON_VERTICES {
            // Recoverable: keep the session and its vertices.
            return Err(CaptureError::InsufficientVertices {
                have: self.vertices.len(),
            });
        }
        let vertices = std::mem::take(&mut self.vertices);
        let have = vertices.len();
        let polygon =
            Polygon::try_new(vertices).ok_or(CaptureError::InsufficientVertices { have })?;
        self.state = CaptureState::Idle;
        let events = vec![CaptureEvent::SessionCompleted {
            polygon: polygon.clone(),
        }];
        Ok((polygon, events))
    }

    /// Discard the active session and all recorded vertices.
    pub fn cancel(&mut self) -> Vec<CaptureEvent> {
        if self.state != CaptureState::Drawing {
            return Vec::new();
        }
        self.vertices.clear();
        self.state = CaptureState::Idle;
        vec![CaptureEvent::SessionCancelled]
    }
}
