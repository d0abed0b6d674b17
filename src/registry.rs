//! Area registry: custom-area registration and selection resolution.
//!
//! Holds the ad-hoc areas users have drawn, dispatches the external
//! vegetation analysis for each new area as a background task, and resolves
//! which entity the analytics pipeline should consume for a given UI
//! selection.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::api::{AnalysisState, CustomArea, CustomAreaId, Field, FieldId, Polygon, SelectionTarget};
use crate::services::job_tracker::{AnalysisOutcome, JobTracker, LogLevel};

/// Client for the external area-analysis service.
///
/// The protocol is opaque to this core: one request eventually resolves to
/// an NDVI value or an error. Timeouts and retries are layered on by the
/// registry, not the client.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    async fn analyze(&self, polygon: &Polygon) -> Result<f64, String>;
}

/// Deterministic stand-in for the external analysis service.
///
/// Derives a stable pseudo-NDVI from the polygon geometry so development
/// and tests get repeatable values without a network dependency.
pub struct LocalAnalysisClient;

#[async_trait]
impl AnalysisClient for LocalAnalysisClient {
    async fn analyze(&self, polygon: &Polygon) -> Result<f64, String> {
        let centroid_lat = polygon.vertices().iter().map(|p| p.lat).sum::<f64>()
            / polygon.vertex_count() as f64;
        let centroid_lon = polygon.vertices().iter().map(|p| p.lon).sum::<f64>()
            / polygon.vertex_count() as f64;
        // Fold the centroid into [0.2, 0.8] for plausible-looking values.
        let raw = (centroid_lat.abs() + centroid_lon.abs()).fract();
        Ok(0.2 + raw * 0.6)
    }
}

/// Registry of custom areas plus the machinery to analyze them.
///
/// Areas are kept in registration order; the first registered area is the
/// dashboard's default selection.
#[derive(Clone)]
pub struct AreaRegistry {
    areas: Arc<RwLock<Vec<CustomArea>>>,
    client: Arc<dyn AnalysisClient>,
    tracker: JobTracker,
    analysis_timeout: Duration,
}

impl AreaRegistry {
    pub fn new(client: Arc<dyn AnalysisClient>, tracker: JobTracker) -> Self {
        Self {
            areas: Arc::new(RwLock::new(Vec::new())),
            client,
            tracker,
            analysis_timeout: Duration::from_secs(120),
        }
    }

    pub fn with_analysis_timeout(mut self, timeout: Duration) -> Self {
        self.analysis_timeout = timeout;
        self
    }

    pub fn tracker(&self) -> &JobTracker {
        &self.tracker
    }

    /// All registered areas, oldest first.
    pub fn areas(&self) -> Vec<CustomArea> {
        self.areas.read().clone()
    }

    pub fn get_area(&self, id: &CustomAreaId) -> Option<CustomArea> {
        self.areas.read().iter().find(|a| &a.id == id).cloned()
    }

    /// Register a freshly captured polygon as a custom area and dispatch
    /// its analysis in the background.
    ///
    /// The area starts in [`AnalysisState::Pending`] and transitions exactly
    /// once, to `Complete` on success or `Failed` on client error or
    /// timeout. Returns the new area id and the job id for progress polling.
    pub fn register_custom_area(
        &self,
        polygon: Polygon,
        name: impl Into<String>,
    ) -> (CustomAreaId, String) {
        let area_id = CustomAreaId::new(Uuid::new_v4().to_string());
        let area = CustomArea {
            id: area_id.clone(),
            name: name.into(),
            area_hectares: Some(polygon.area_hectares()),
            polygon: polygon.clone(),
            analysis: AnalysisState::Pending,
        };
        self.areas.write().push(area);

        let job_id = self.tracker.create_job(area_id.clone());
        self.tracker.log(
            &job_id,
            LogLevel::Info,
            format!("analysis dispatched for area {area_id}"),
        );

        let registry = self.clone();
        let task_area_id = area_id.clone();
        let task_job_id = job_id.clone();
        tokio::spawn(async move {
            registry
                .run_analysis(task_area_id, task_job_id, polygon)
                .await;
        });

        (area_id, job_id)
    }

    async fn run_analysis(&self, area_id: CustomAreaId, job_id: String, polygon: Polygon) {
        let result =
            tokio::time::timeout(self.analysis_timeout, self.client.analyze(&polygon)).await;

        let state = match result {
            Ok(Ok(ndvi)) => {
                self.tracker.log(
                    &job_id,
                    LogLevel::Success,
                    format!("analysis finished: ndvi={ndvi:.2}"),
                );
                self.tracker.complete_job(
                    &job_id,
                    AnalysisOutcome {
                        area_id: area_id.clone(),
                        ndvi,
                    },
                );
                AnalysisState::Complete { ndvi }
            }
            Ok(Err(reason)) => {
                log::warn!("analysis failed for area {area_id}: {reason}");
                self.tracker.fail_job(&job_id, reason.clone());
                AnalysisState::Failed { reason }
            }
            Err(_) => {
                let reason = format!(
                    "analysis timed out after {}s",
                    self.analysis_timeout.as_secs()
                );
                log::warn!("{reason} (area {area_id})");
                self.tracker.fail_job(&job_id, reason.clone());
                AnalysisState::Failed { reason }
            }
        };

        let mut areas = self.areas.write();
        if let Some(area) = areas.iter_mut().find(|a| a.id == area_id) {
            // Pending transitions exactly once; never overwrite a settled state.
            if area.analysis.is_analyzing() {
                area.analysis = state;
            }
        }
    }

    /// Resolve which entity the pipeline should consume.
    ///
    /// Precedence, preserved exactly because it defines the dashboard's
    /// default view: an explicitly selected custom area, then an explicitly
    /// selected field, then an externally supplied field id, then the first
    /// available custom area, then the all-fields aggregate. A target id
    /// with no match falls back silently to the aggregate.
    pub fn resolve_selection(
        &self,
        explicit: Option<&SelectionTarget>,
        external_field: Option<FieldId>,
        fields: &[Field],
    ) -> ResolvedSelection {
        match explicit {
            Some(SelectionTarget::CustomArea(id)) => {
                if let Some(area) = self.get_area(id) {
                    return ResolvedSelection::CustomArea(area);
                }
                log::warn!("selected custom area {id} not found; falling back to all fields");
                ResolvedSelection::AllFields
            }
            Some(SelectionTarget::Field(id)) => Self::resolve_field(*id, fields),
            Some(SelectionTarget::AllFields) => ResolvedSelection::AllFields,
            None => {
                if let Some(id) = external_field {
                    return Self::resolve_field(id, fields);
                }
                if let Some(area) = self.areas().into_iter().next() {
                    return ResolvedSelection::CustomArea(area);
                }
                ResolvedSelection::AllFields
            }
        }
    }

    fn resolve_field(id: FieldId, fields: &[Field]) -> ResolvedSelection {
        match fields.iter().find(|f| f.id == id) {
            Some(field) => ResolvedSelection::Field(field.clone()),
            None => {
                log::warn!("selected field {} not found; falling back to all fields", id.0);
                ResolvedSelection::AllFields
            }
        }
    }
}

/// Outcome of selection resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedSelection {
    AllFields,
    Field(Field),
    CustomArea(CustomArea),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::GeoPoint;
    use crate::services::job_tracker::JobStatus;

    struct FixedClient(Result<f64, String>);

    #[async_trait]
    impl AnalysisClient for FixedClient {
        async fn analyze(&self, _polygon: &Polygon) -> Result<f64, String> {
            self.0.clone()
        }
    }

    struct StalledClient;

    #[async_trait]
    impl AnalysisClient for StalledClient {
        async fn analyze(&self, _polygon: &Polygon) -> Result<f64, String> {
            futures::future::pending().await
        }
    }

    fn triangle() -> Polygon {
        Polygon::try_new(vec![
            GeoPoint::new(41.0, 2.0),
            GeoPoint::new(41.0, 2.01),
            GeoPoint::new(41.01, 2.0),
        ])
        .unwrap()
    }

    fn field(id: i64) -> Field {
        Field {
            id: FieldId::new(id),
            name: format!("field-{id}"),
            boundary: None,
            crop: "barley".to_string(),
            area_hectares: 5.0,
            series: vec![],
        }
    }

    fn registry(client: impl AnalysisClient + 'static) -> AreaRegistry {
        AreaRegistry::new(Arc::new(client), JobTracker::new())
    }

    async fn settled_area(registry: &AreaRegistry, id: &CustomAreaId) -> CustomArea {
        for _ in 0..50 {
            let area = registry.get_area(id).unwrap();
            if !area.analysis.is_analyzing() {
                return area;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("analysis never settled");
    }

    #[tokio::test]
    async fn test_register_completes_analysis() {
        let registry = registry(FixedClient(Ok(0.63)));
        let (area_id, job_id) = registry.register_custom_area(triangle(), "west strip");

        let area = settled_area(&registry, &area_id).await;
        assert_eq!(area.analysis, AnalysisState::Complete { ndvi: 0.63 });
        assert_eq!(area.analysis.ndvi_value(), Some(0.63));
        assert!(area.area_hectares.unwrap() > 0.0);

        let job = registry.tracker().get_job(&job_id).unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.outcome.unwrap().ndvi, 0.63);
    }

    #[tokio::test]
    async fn test_register_failure_is_explicit() {
        let registry = registry(FixedClient(Err("satellite tiles unavailable".to_string())));
        let (area_id, job_id) = registry.register_custom_area(triangle(), "east strip");

        let area = settled_area(&registry, &area_id).await;
        assert!(matches!(area.analysis, AnalysisState::Failed { .. }));
        assert_eq!(area.analysis.ndvi_value(), None);
        assert!(!area.analysis.is_analyzing());

        let job = registry.tracker().get_job(&job_id).unwrap();
        assert_eq!(job.status, JobStatus::Failed);
    }

    #[tokio::test]
    async fn test_analysis_timeout_fails_job() {
        let registry =
            registry(StalledClient).with_analysis_timeout(Duration::from_millis(20));
        let (area_id, job_id) = registry.register_custom_area(triangle(), "slow strip");

        let area = settled_area(&registry, &area_id).await;
        match area.analysis {
            AnalysisState::Failed { ref reason } => assert!(reason.contains("timed out")),
            ref other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(
            registry.tracker().get_job(&job_id).unwrap().status,
            JobStatus::Failed
        );
    }

    #[tokio::test]
    async fn test_selection_precedence() {
        let registry = registry(FixedClient(Ok(0.5)));
        let fields = vec![field(1), field(2)];

        // No explicit target, no external field, no areas -> aggregate.
        assert_eq!(
            registry.resolve_selection(None, None, &fields),
            ResolvedSelection::AllFields
        );

        // External field id wins over nothing.
        match registry.resolve_selection(None, Some(FieldId::new(2)), &fields) {
            ResolvedSelection::Field(f) => assert_eq!(f.id, FieldId::new(2)),
            other => panic!("expected field, got {other:?}"),
        }

        // A registered area becomes the default selection...
        let (area_id, _) = registry.register_custom_area(triangle(), "default area");
        settled_area(&registry, &area_id).await;
        match registry.resolve_selection(None, None, &fields) {
            ResolvedSelection::CustomArea(a) => assert_eq!(a.id, area_id),
            other => panic!("expected custom area, got {other:?}"),
        }

        // ...but an explicit selection always wins.
        let explicit = SelectionTarget::Field(FieldId::new(1));
        match registry.resolve_selection(Some(&explicit), None, &fields) {
            ResolvedSelection::Field(f) => assert_eq!(f.id, FieldId::new(1)),
            other => panic!("expected field, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_default_selection_is_first_registered_area() {
        let registry = registry(FixedClient(Ok(0.5)));

        let (first_id, _) = registry.register_custom_area(triangle(), "drawn first");
        let (second_id, _) = registry.register_custom_area(triangle(), "drawn second");
        settled_area(&registry, &first_id).await;
        settled_area(&registry, &second_id).await;

        // Registration order decides the default, not any ordering of the
        // random area ids.
        match registry.resolve_selection(None, None, &[]) {
            ResolvedSelection::CustomArea(a) => {
                assert_eq!(a.id, first_id);
                assert_eq!(a.name, "drawn first");
            }
            other => panic!("expected custom area, got {other:?}"),
        }

        let listed: Vec<_> = registry.areas().into_iter().map(|a| a.id).collect();
        assert_eq!(listed, vec![first_id, second_id]);
    }

    #[tokio::test]
    async fn test_missing_selection_falls_back_silently() {
        let registry = registry(FixedClient(Ok(0.5)));
        let fields = vec![field(1)];

        let ghost_field = SelectionTarget::Field(FieldId::new(404));
        assert_eq!(
            registry.resolve_selection(Some(&ghost_field), None, &fields),
            ResolvedSelection::AllFields
        );

        let ghost_area = SelectionTarget::CustomArea(CustomAreaId::new("missing"));
        assert_eq!(
            registry.resolve_selection(Some(&ghost_area), None, &fields),
            ResolvedSelection::AllFields
        );
    }
}
