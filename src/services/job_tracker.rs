//! Job tracking for async report generation.
//!
//! This module provides a simple in-memory job tracker that stores progress
//! logs and the finished rows for background report runs.
//!
//! Lifecycle: a job is registered as `Running` when a report is triggered and
//! transitions exactly once to `Complete` when the background worker finishes.
//! There is no externally visible failed state: a run that hits a fatal error
//! still completes, carrying whatever rows succeeded, so polling callers stay
//! well-defined. Jobs are never removed for the lifetime of the process.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::models::ReportRow;

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
    Complete,
}

/// Job metadata, logs, and the finished report rows.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ReportJob {
    pub report_id: String,
    pub status: JobStatus,
    pub logs: Vec<LogEntry>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Report rows, present once the job is complete.
    pub result: Option<Vec<ReportRow>>,
}

/// In-memory job tracker.
#[derive(Clone)]
pub struct JobTracker {
    jobs: Arc<RwLock<HashMap<String, ReportJob>>>,
}

impl JobTracker {
    /// Create a new job tracker.
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Register a new running job and return its ID.
    pub fn create_job(&self) -> String {
        let report_id = Uuid::new_v4().to_string();
        let job = ReportJob {
            report_id: report_id.clone(),
            status: JobStatus::Running,
            logs: vec![],
            created_at: chrono::Utc::now(),
            completed_at: None,
            result: None,
        };
        self.jobs.write().insert(report_id.clone(), job);
        report_id
    }

    /// Add a log entry to a job.
    pub fn log(&self, report_id: &str, level: LogLevel, message: impl Into<String>) {
        let mut jobs = self.jobs.write();
        if let Some(job) = jobs.get_mut(report_id) {
            job.logs.push(LogEntry {
                timestamp: chrono::Utc::now(),
                level,
                message: message.into(),
            });
        }
    }

    /// Mark a job as complete with its report rows.
    pub fn complete_job(&self, report_id: &str, rows: Vec<ReportRow>) {
        let mut jobs = self.jobs.write();
        if let Some(job) = jobs.get_mut(report_id) {
            job.status = JobStatus::Complete;
            job.completed_at = Some(chrono::Utc::now());
            job.result = Some(rows);
        }
    }

    /// Get a job by ID.
    pub fn get_job(&self, report_id: &str) -> Option<ReportJob> {
        self.jobs.read().get(report_id).cloned()
    }

    /// Get all logs for a job.
    pub fn get_logs(&self, report_id: &str) -> Vec<LogEntry> {
        self.jobs
            .read()
            .get(report_id)
            .map(|job| job.logs.clone())
            .unwrap_or_default()
    }
}

impl Default for JobTracker {
    fn default() -> Self {
        Self::new()
    }
}
