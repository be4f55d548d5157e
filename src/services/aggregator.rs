//! Report aggregation across stores.
//!
//! For each store, resolves its schedule and timezone, pulls the relevant
//! observations, and runs the extrapolator over the three trailing windows
//! ending at the reference instant.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use tracing::warn;

use super::extrapolator::{extrapolate, integrate};
use crate::db::repository::{
    FullRepository, ObservationRepository, RepositoryResult, ScheduleRepository,
};
use crate::models::{ReportRow, StoreId, StoreStatus, WeeklySchedule};

/// Policy knobs for the documented default substitutions.
///
/// The originals of these defaults are assumptions, not verified intent, so
/// they are configurable rather than hard-wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportPolicy {
    /// Timezone for stores absent from the timezone table.
    pub default_timezone: Tz,
    /// Inferred status for stores with no observations at all.
    pub missing_data_status: StoreStatus,
}

impl Default for ReportPolicy {
    fn default() -> Self {
        Self {
            default_timezone: chrono_tz::America::Chicago,
            missing_data_status: StoreStatus::Active,
        }
    }
}

fn minutes(d: Duration) -> f64 {
    d.num_seconds() as f64 / 60.0
}

fn hours(d: Duration) -> f64 {
    d.num_seconds() as f64 / 3600.0
}

/// Compute one store's report row.
///
/// Missing business hours fall back to open 24/7, a missing timezone to the
/// policy default. Observations are fetched with a day of lead-in beyond the
/// week window so nearest-sample borrowing near the window edge still sees
/// the preceding sample.
pub async fn aggregate_store(
    repo: &dyn FullRepository,
    store_id: &StoreId,
    reference: DateTime<Utc>,
    policy: &ReportPolicy,
) -> RepositoryResult<ReportRow> {
    let schedule = repo
        .schedule_for(store_id)
        .await?
        .unwrap_or_else(WeeklySchedule::open_24_7);
    let tz = repo
        .timezone_for(store_id)
        .await?
        .unwrap_or(policy.default_timezone);

    let fetch_start = reference - Duration::weeks(1) - Duration::days(1);
    let observations = repo
        .observations_for(store_id, fetch_start, reference)
        .await?;

    let window = |length: Duration| {
        let intervals = extrapolate(
            &observations,
            &schedule,
            tz,
            reference - length,
            reference,
            policy.missing_data_status,
        );
        integrate(&intervals)
    };

    let (up_hour, down_hour) = window(Duration::hours(1));
    let (up_day, down_day) = window(Duration::hours(24));
    let (up_week, down_week) = window(Duration::weeks(1));

    Ok(ReportRow {
        store_id: store_id.clone(),
        uptime_last_hour: minutes(up_hour),
        uptime_last_day: minutes(up_day),
        uptime_last_week: hours(up_week),
        downtime_last_hour: minutes(down_hour),
        downtime_last_day: minutes(down_day),
        downtime_last_week: hours(down_week),
    })
}

/// Compute report rows for every known store, in ascending store-id order.
///
/// A store whose fetch fails is skipped with a warning; the report still
/// completes for the remaining stores.
pub async fn aggregate(
    repo: &dyn FullRepository,
    reference: DateTime<Utc>,
    policy: &ReportPolicy,
) -> RepositoryResult<Vec<ReportRow>> {
    let store_ids = repo.store_ids().await?;
    let mut rows = Vec::with_capacity(store_ids.len());
    for store_id in &store_ids {
        match aggregate_store(repo, store_id, reference, policy).await {
            Ok(row) => rows.push(row),
            Err(e) => {
                warn!(store_id = %store_id, error = %e, "skipping store after fetch failure");
            }
        }
    }
    Ok(rows)
}

#[cfg(test)]
#[path = "aggregator_tests.rs"]
mod tests;
