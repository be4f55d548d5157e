//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the report
//! services for the actual work.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::sse::{Event, Sse},
    response::{IntoResponse, Response},
    Json,
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;

use super::dto::{HealthResponse, JobStatusResponse, ReportRunningResponse, TriggerReportResponse};
use super::error::AppError;
use super::state::AppState;
use crate::db::repository::ObservationRepository;
use crate::services::{self, JobStatus};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// GET /health
///
/// Health check endpoint to verify the service is running and data is loaded.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let stores = state.repository.store_ids().await?.len();

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        stores,
    }))
}

/// POST /trigger_report
///
/// Trigger report generation. Returns a report ID immediately; the
/// aggregation runs as a background task.
pub async fn trigger_report(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<TriggerReportResponse>), AppError> {
    let report_id = state.job_tracker.create_job();

    let tracker = state.job_tracker.clone();
    let repo = state.repository.clone();
    let policy = state.policy;
    let job_id = report_id.clone();
    tokio::spawn(async move {
        services::generate_report(job_id, tracker, repo, policy).await;
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(TriggerReportResponse {
            report_id: report_id.clone(),
            message: format!("Report generation started. Poll /reports/{}", report_id),
        }),
    ))
}

/// GET /reports/{report_id}
///
/// Poll a report. Returns a running marker while the job is in flight and
/// the CSV report once complete.
pub async fn get_report(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
) -> Result<Response, AppError> {
    let job = state
        .job_tracker
        .get_job(&report_id)
        .ok_or_else(|| AppError::NotFound(format!("Report {} not found", report_id)))?;

    if job.status == JobStatus::Running {
        return Ok(Json(ReportRunningResponse {
            status: "running".to_string(),
        })
        .into_response());
    }

    let rows = job.result.unwrap_or_default();
    let csv = services::report_to_csv(&rows)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"store_report_{}.csv\"", report_id),
            ),
        ],
        csv,
    )
        .into_response())
}

/// GET /reports/{report_id}/status
///
/// Get the current status and progress logs of a report job.
pub async fn get_report_status(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
) -> HandlerResult<JobStatusResponse> {
    let job = state
        .job_tracker
        .get_job(&report_id)
        .ok_or_else(|| AppError::NotFound(format!("Report {} not found", report_id)))?;

    Ok(Json(job.into()))
}

/// GET /reports/{report_id}/logs
///
/// Stream report job logs via Server-Sent Events (SSE).
pub async fn stream_report_logs(
    State(state): State<AppState>,
    Path(report_id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    // Verify the job exists before opening the stream
    if state.job_tracker.get_job(&report_id).is_none() {
        return Err(AppError::NotFound(format!("Report {} not found", report_id)));
    }

    let tracker = state.job_tracker.clone();
    let stream = async_stream::stream! {
        let mut last_log_count = 0;
        loop {
            let logs = tracker.get_logs(&report_id);
            for log in logs.iter().skip(last_log_count) {
                let event_data = serde_json::to_string(log).unwrap_or_default();
                yield Ok(Event::default().data(event_data));
            }
            last_log_count = logs.len();

            if let Some(job) = tracker.get_job(&report_id) {
                if job.status != JobStatus::Running {
                    let final_event = serde_json::json!({
                        "status": job.status,
                        "row_count": job.result.as_ref().map(Vec::len),
                    });
                    yield Ok(Event::default()
                        .event("complete")
                        .data(serde_json::to_string(&final_event).unwrap_or_default()));
                    break;
                }
            } else {
                break;
            }

            tokio::time::sleep(Duration::from_millis(200)).await;
        }
    };

    Ok(Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(1))
            .text("keep-alive"),
    ))
}
