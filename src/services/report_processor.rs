//! Async report generation service.
//!
//! Runs the aggregation for one triggered report in the background, emitting
//! progress logs to the job tracker. Designed to be spawned with
//! `tokio::spawn`; the trigger call returns before any of this work starts.

use std::sync::Arc;

use crate::db::repository::{FullRepository, ObservationRepository};
use crate::services::aggregator::{aggregate, ReportPolicy};
use crate::services::job_tracker::{JobTracker, LogLevel};

/// Generate one report: resolve the reference instant, aggregate all stores,
/// and complete the job with the resulting rows.
///
/// The job always transitions to `Complete`, even on a fatal aggregation
/// failure — the poller then sees an empty result plus error logs instead of
/// hanging on a job that never finishes.
pub async fn generate_report(
    report_id: String,
    tracker: JobTracker,
    repo: Arc<dyn FullRepository>,
    policy: ReportPolicy,
) {
    tracker.log(&report_id, LogLevel::Info, "Starting report generation...");

    // The reference "now" is the newest observation in the frozen dataset.
    let reference = match repo.latest_observation_at().await {
        Ok(Some(reference)) => reference,
        Ok(None) => {
            tracker.log(
                &report_id,
                LogLevel::Warning,
                "No observations ingested; completing with an empty report",
            );
            tracker.complete_job(&report_id, vec![]);
            return;
        }
        Err(e) => {
            tracker.log(
                &report_id,
                LogLevel::Error,
                format!("Failed to resolve reference instant: {}", e),
            );
            tracker.complete_job(&report_id, vec![]);
            return;
        }
    };
    tracker.log(
        &report_id,
        LogLevel::Info,
        format!("Reference instant: {}", reference),
    );

    let rows = match aggregate(repo.as_ref(), reference, &policy).await {
        Ok(rows) => {
            tracker.log(
                &report_id,
                LogLevel::Success,
                format!("Aggregated {} stores", rows.len()),
            );
            rows
        }
        Err(e) => {
            tracker.log(
                &report_id,
                LogLevel::Error,
                format!("Aggregation failed: {}", e),
            );
            vec![]
        }
    };

    tracker.complete_job(&report_id, rows);
}
