//! Job tracking for async custom-area analysis.
//!
//! A freshly drawn area is analyzed by an external service; the dashboard
//! polls (or streams) progress while the request is in flight. This module
//! keeps an in-memory record of every analysis job: its status, timestamped
//! progress log, and the NDVI outcome once the job resolves.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::CustomAreaId;

/// A single log entry with timestamp and message.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LogEntry {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Job status enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Running,
    Completed,
    Failed,
}

/// Outcome of a completed analysis job.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnalysisOutcome {
    pub area_id: CustomAreaId,
    pub ndvi: f64,
}

/// Analysis job metadata and logs.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AnalysisJob {
    pub job_id: String,
    /// The custom area this job is analyzing.
    pub area_id: CustomAreaId,
    pub status: JobStatus,
    pub logs: Vec<LogEntry>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Set once the job completes successfully.
    pub outcome: Option<AnalysisOutcome>,
}

/// In-memory tracker for custom-area analysis jobs.
#[derive(Clone)]
pub struct JobTracker {
    jobs: Arc<RwLock<HashMap<String, AnalysisJob>>>,
}

impl JobTracker {
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a job for the given area and return its ID.
    pub fn create_job(&self, area_id: CustomAreaId) -> String {
        let job_id = Uuid::new_v4().to_string();
        let job = AnalysisJob {
            job_id: job_id.clone(),
            area_id,
            status: JobStatus::Running,
            logs: vec![],
            created_at: chrono::Utc::now(),
            completed_at: None,
            outcome: None,
        };
        self.jobs.write().insert(job_id.clone(), job);
        job_id
    }

    /// Add a log entry to a job.
    pub fn log(&self, job_id: &str, level: LogLevel, message: impl Into<String>) {
        let mut jobs = self.jobs.write();
        if let Some(job) = jobs.get_mut(job_id) {
            job.logs.push(LogEntry {
                timestamp: chrono::Utc::now(),
                level,
                message: message.into(),
            });
        }
    }

    /// Mark a job as completed with its NDVI outcome.
    pub fn complete_job(&self, job_id: &str, outcome: AnalysisOutcome) {
        let mut jobs = self.jobs.write();
        if let Some(job) = jobs.get_mut(job_id) {
            job.status = JobStatus::Completed;
            job.completed_at = Some(chrono::Utc::now());
            job.outcome = Some(outcome);
        }
    }

    /// Mark a job as failed.
    pub fn fail_job(&self, job_id: &str, error_message: impl Into<String>) {
        let mut jobs = self.jobs.write();
        if let Some(job) = jobs.get_mut(job_id) {
            job.status = JobStatus::Failed;
            job.completed_at = Some(chrono::Utc::now());
            job.logs.push(LogEntry {
                timestamp: chrono::Utc::now(),
                level: LogLevel::Error,
                message: error_message.into(),
            });
        }
    }

    /// Get a job by ID.
    pub fn get_job(&self, job_id: &str) -> Option<AnalysisJob> {
        self.jobs.read().get(job_id).cloned()
    }

    /// Get all logs for a job.
    pub fn get_logs(&self, job_id: &str) -> Vec<LogEntry> {
        self.jobs
            .read()
            .get(job_id)
            .map(|job| job.logs.clone())
            .unwrap_or_default()
    }

    /// Most recent job for a given area, if any.
    pub fn find_job_for_area(&self, area_id: &CustomAreaId) -> Option<AnalysisJob> {
        self.jobs
            .read()
            .values()
            .filter(|job| &job.area_id == area_id)
            .max_by_key(|job| job.created_at)
            .cloned()
    }
}

impl Default for JobTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(id: &str) -> CustomAreaId {
        CustomAreaId::new(id)
    }

    #[test]
    fn test_job_lifecycle() {
        let tracker = JobTracker::new();
        let job_id = tracker.create_job(area("area-1"));

        tracker.log(&job_id, LogLevel::Info, "analysis dispatched");
        let job = tracker.get_job(&job_id).unwrap();
        assert_eq!(job.status, JobStatus::Running);
        assert_eq!(job.logs.len(), 1);
        assert!(job.outcome.is_none());

        tracker.complete_job(
            &job_id,
            AnalysisOutcome {
                area_id: area("area-1"),
                ndvi: 0.58,
            },
        );
        let job = tracker.get_job(&job_id).unwrap();
        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.completed_at.is_some());
        assert_eq!(job.outcome.unwrap().ndvi, 0.58);
    }

    #[test]
    fn test_fail_job_appends_error_log() {
        let tracker = JobTracker::new();
        let job_id = tracker.create_job(area("area-2"));
        tracker.fail_job(&job_id, "analysis service unreachable");

        let job = tracker.get_job(&job_id).unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.logs.len(), 1);
        assert!(job.logs[0].message.contains("unreachable"));
    }

    #[test]
    fn test_find_job_for_area_picks_latest() {
        let tracker = JobTracker::new();
        let first = tracker.create_job(area("area-3"));
        let second = tracker.create_job(area("area-3"));
        tracker.create_job(area("other"));

        let found = tracker.find_job_for_area(&area("area-3")).unwrap();
        // Two jobs exist for the area; the most recent one wins.
        assert!(found.job_id == first || found.job_id == second);
        assert!(found.created_at >= tracker.get_job(&first).unwrap().created_at);
    }

    #[test]
    fn test_unknown_job_is_none() {
        let tracker = JobTracker::new();
        assert!(tracker.get_job("missing").is_none());
        assert!(tracker.get_logs("missing").is_empty());
    }
}
