//! CSV ingest for the three source tables.
//!
//! Loads store status observations, weekly business hours, and timezones into
//! a [`LocalRepository`]. Malformed rows are skipped with a warning rather
//! than failing the whole load; counts of loaded and skipped rows are
//! returned so startup can report what it ingested.

use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::warn;

use super::repositories::LocalRepository;
use super::repository::{ErrorContext, RepositoryError, RepositoryResult};
use crate::models::{HoursInterval, StoreStatus};

/// Default file names of the three source tables inside the data directory.
pub const STATUS_FILE: &str = "store_status.csv";
pub const HOURS_FILE: &str = "menu_hours.csv";
pub const TIMEZONES_FILE: &str = "timezones.csv";

/// Row counts from one table load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub loaded: usize,
    pub skipped: usize,
}

/// Combined counts for a full data-directory load.
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestSummary {
    pub observations: IngestStats,
    pub business_hours: IngestStats,
    pub timezones: IngestStats,
}

#[derive(Debug, Deserialize)]
struct StatusRecord {
    store_id: String,
    timestamp_utc: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct HoursRecord {
    store_id: String,
    #[serde(rename = "dayOfWeek", alias = "day_of_week")]
    day_of_week: u8,
    start_time_local: String,
    end_time_local: String,
}

#[derive(Debug, Deserialize)]
struct TimezoneRecord {
    store_id: String,
    timezone_str: String,
}

/// Parse a source timestamp. The poller writes `2023-01-25 10:05:25.821 UTC`;
/// plain RFC 3339 and second-precision variants are accepted as well.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let bare = raw.strip_suffix(" UTC").unwrap_or(raw);
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(bare, fmt) {
            return Some(naive.and_utc());
        }
    }
    None
}

fn parse_local_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

/// Load status observations from CSV.
pub fn load_observations<R: Read>(reader: R, repo: &LocalRepository) -> RepositoryResult<IngestStats> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut stats = IngestStats::default();

    for (line, result) in csv_reader.deserialize::<StatusRecord>().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!(line, error = %e, "skipping malformed status row");
                stats.skipped += 1;
                continue;
            }
        };
        let Some(timestamp) = parse_timestamp(&record.timestamp_utc) else {
            warn!(line, raw = %record.timestamp_utc, "skipping status row with bad timestamp");
            stats.skipped += 1;
            continue;
        };
        let Ok(status) = record.status.parse::<StoreStatus>() else {
            warn!(line, raw = %record.status, "skipping status row with bad status");
            stats.skipped += 1;
            continue;
        };
        repo.add_observation(record.store_id, timestamp, status);
        stats.loaded += 1;
    }

    Ok(stats)
}

/// Load weekly business hours from CSV.
pub fn load_business_hours<R: Read>(reader: R, repo: &LocalRepository) -> RepositoryResult<IngestStats> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut stats = IngestStats::default();
    let mut schedules: std::collections::HashMap<String, crate::models::WeeklySchedule> =
        std::collections::HashMap::new();

    for (line, result) in csv_reader.deserialize::<HoursRecord>().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!(line, error = %e, "skipping malformed business-hours row");
                stats.skipped += 1;
                continue;
            }
        };
        let (Some(open), Some(close)) = (
            parse_local_time(&record.start_time_local),
            parse_local_time(&record.end_time_local),
        ) else {
            warn!(line, "skipping business-hours row with bad local time");
            stats.skipped += 1;
            continue;
        };
        let Some(interval) = HoursInterval::from_times(open, close) else {
            warn!(
                line,
                store_id = %record.store_id,
                "skipping business-hours row with close before open"
            );
            stats.skipped += 1;
            continue;
        };
        if record.day_of_week > 6 {
            warn!(line, day = record.day_of_week, "skipping business-hours row with bad weekday");
            stats.skipped += 1;
            continue;
        }
        schedules
            .entry(record.store_id)
            .or_default()
            .add_interval(record.day_of_week, interval);
        stats.loaded += 1;
    }

    for (store_id, schedule) in schedules {
        repo.set_schedule(store_id, schedule);
    }

    Ok(stats)
}

/// Load store timezones from CSV.
pub fn load_timezones<R: Read>(reader: R, repo: &LocalRepository) -> RepositoryResult<IngestStats> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut stats = IngestStats::default();

    for (line, result) in csv_reader.deserialize::<TimezoneRecord>().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                warn!(line, error = %e, "skipping malformed timezone row");
                stats.skipped += 1;
                continue;
            }
        };
        let Ok(tz) = record.timezone_str.trim().parse::<Tz>() else {
            warn!(line, raw = %record.timezone_str, "skipping row with unknown timezone");
            stats.skipped += 1;
            continue;
        };
        repo.set_timezone(record.store_id, tz);
        stats.loaded += 1;
    }

    Ok(stats)
}

/// Load all three tables from a data directory.
///
/// The status table is required; business hours and timezones are optional
/// (stores simply fall back to the documented defaults).
pub fn load_data_dir(dir: impl AsRef<Path>, repo: &LocalRepository) -> RepositoryResult<IngestSummary> {
    let dir = dir.as_ref();
    let mut summary = IngestSummary::default();

    let status_path = dir.join(STATUS_FILE);
    let status_file = std::fs::File::open(&status_path).map_err(|e| {
        RepositoryError::validation_with_context(
            format!("cannot open {}: {}", status_path.display(), e),
            ErrorContext::new("ingest").with_entity("observation"),
        )
    })?;
    summary.observations = load_observations(status_file, repo)?;

    match std::fs::File::open(dir.join(HOURS_FILE)) {
        Ok(file) => summary.business_hours = load_business_hours(file, repo)?,
        Err(e) => warn!(error = %e, "no business-hours table, stores default to 24/7"),
    }
    match std::fs::File::open(dir.join(TIMEZONES_FILE)) {
        Ok(file) => summary.timezones = load_timezones(file, repo)?,
        Err(e) => warn!(error = %e, "no timezone table, stores use the default timezone"),
    }

    Ok(summary)
}
