//! Data Transfer Objects for the HTTP API.

use serde::{Deserialize, Serialize};

use crate::services::{LogEntry, ReportJob};

/// Response for report triggering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerReportResponse {
    /// Job ID for polling the report
    pub report_id: String,
    /// Message about the operation
    pub message: String,
}

/// Polling response while a report is still being generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRunningResponse {
    pub status: String,
}

/// Job status response with progress logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusResponse {
    /// Job ID
    pub report_id: String,
    /// Job status
    pub status: String,
    /// Log entries
    pub logs: Vec<LogEntry>,
    /// Number of report rows, once complete
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_count: Option<usize>,
}

impl From<ReportJob> for JobStatusResponse {
    fn from(job: ReportJob) -> Self {
        Self {
            report_id: job.report_id,
            status: match job.status {
                crate::services::JobStatus::Running => "running".to_string(),
                crate::services::JobStatus::Complete => "complete".to_string(),
            },
            logs: job.logs,
            row_count: job.result.as_ref().map(Vec::len),
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Number of ingested observations visible to the engine
    pub stores: usize,
}
