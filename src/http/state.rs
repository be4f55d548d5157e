//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::FullRepository;
use crate::services::{JobTracker, ReportPolicy};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for data access
    pub repository: Arc<dyn FullRepository>,
    /// Tracker for background report jobs
    pub job_tracker: JobTracker,
    /// Default-substitution policy for report generation
    pub policy: ReportPolicy,
}

impl AppState {
    /// Create a new application state with the given repository and policy.
    pub fn new(repository: Arc<dyn FullRepository>, policy: ReportPolicy) -> Self {
        Self {
            repository,
            job_tracker: JobTracker::new(),
            policy,
        }
    }
}
