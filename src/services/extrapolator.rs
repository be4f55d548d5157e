//! Interval extrapolation: turning sparse status samples into a
//! continuous-time active/inactive partition of business-open time.
//!
//! Given a store's sorted observations, weekly schedule, and timezone, the
//! extrapolator covers exactly `[window_start, window_end) ∩ business-open-time`
//! with maximal constant-status intervals. Status at any instant is that of
//! the nearest observation in time (ties go to the earlier observation), so
//! samples outside a business-open stretch still inform it. A store with no
//! observations at all falls back to a configurable default status.

use chrono::{DateTime, Datelike, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::models::{Observation, StoreStatus, WeeklySchedule};

/// A maximal run of constant inferred status. Half-open: `[start, end)`.
///
/// Ephemeral: produced per aggregation call, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtrapolatedInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: StoreStatus,
}

impl ExtrapolatedInterval {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Map a store-local wall-clock time to UTC.
///
/// DST transitions: an ambiguous time (fall-back) resolves to the earlier
/// instant; a nonexistent time (spring-forward gap) resolves to the instant
/// the clock jumps to.
fn localize(tz: Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    match tz.from_local_datetime(&naive) {
        chrono::LocalResult::Single(dt) => dt.with_timezone(&Utc),
        chrono::LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        chrono::LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&naive)),
    }
}

/// Business-open time within `[window_start, window_end)` as disjoint, sorted
/// UTC sub-intervals.
///
/// Each calendar date the window spans (in store-local time) contributes its
/// weekday's `[open, close)` intervals, converted through the store timezone.
/// Touching or overlapping results are merged, so consecutive fully-open days
/// collapse into one continuous span.
pub fn business_open_intervals(
    schedule: &WeeklySchedule,
    tz: Tz,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    if window_start >= window_end {
        return Vec::new();
    }

    // An interval opened on the previous local day can reach at most that
    // day's midnight, so one day of lead-in suffices.
    let first_date = window_start.with_timezone(&tz).date_naive() - Duration::days(1);
    let last_date = window_end.with_timezone(&tz).date_naive();

    let mut open_intervals = Vec::new();
    let mut date = first_date;
    while date <= last_date {
        let weekday = date.weekday().num_days_from_monday() as u8;
        let midnight = date.and_time(chrono::NaiveTime::MIN);
        for iv in schedule.intervals_for(weekday) {
            let open_utc = localize(tz, midnight + Duration::seconds(iv.open as i64));
            let close_utc = localize(tz, midnight + Duration::seconds(iv.close as i64));
            let start = open_utc.max(window_start);
            let end = close_utc.min(window_end);
            if start < end {
                open_intervals.push((start, end));
            }
        }
        date = date + Duration::days(1);
    }

    open_intervals.sort_by_key(|&(start, _)| start);
    let mut merged: Vec<(DateTime<Utc>, DateTime<Utc>)> = Vec::with_capacity(open_intervals.len());
    for (start, end) in open_intervals {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

/// Inferred status at a single instant: the status of the observation whose
/// timestamp is nearest to `t`, ties broken toward the earlier observation.
///
/// `observations` must be sorted by timestamp. Returns `default` when empty.
pub fn status_at(observations: &[Observation], t: DateTime<Utc>, default: StoreStatus) -> StoreStatus {
    if observations.is_empty() {
        return default;
    }
    let idx = observations.partition_point(|o| o.timestamp <= t);
    match (observations.get(idx.wrapping_sub(1)), observations.get(idx)) {
        (Some(before), Some(after)) => {
            if t - before.timestamp <= after.timestamp - t {
                before.status
            } else {
                after.status
            }
        }
        (Some(before), None) => before.status,
        (None, Some(after)) => after.status,
        (None, None) => default,
    }
}

/// A run of constant status over the whole timeline. `start == None` means
/// the run extends from the infinite past.
#[derive(Debug, Clone, Copy)]
struct StatusRun {
    start: Option<DateTime<Utc>>,
    status: StoreStatus,
}

/// Partition the whole timeline into nearest-neighbor status runs.
///
/// Between two consecutive observations with differing status, the boundary
/// sits at the midpoint of the gap. The equidistant instant itself resolves
/// to the earlier observation (see [`status_at`]); as a single instant it
/// carries zero duration, so interval endpoints stay at the midpoint.
fn status_runs(observations: &[Observation]) -> Vec<StatusRun> {
    let mut runs: Vec<StatusRun> = Vec::new();
    let mut prev_ts: Option<DateTime<Utc>> = None;
    for obs in observations {
        match runs.last() {
            None => runs.push(StatusRun {
                start: None,
                status: obs.status,
            }),
            Some(last) if last.status == obs.status => {}
            Some(_) => {
                // The immediately preceding observation closes the previous
                // run; the boundary is the midpoint between the two samples.
                let prev_ts = prev_ts.unwrap_or(obs.timestamp);
                let gap_ns = (obs.timestamp - prev_ts)
                    .num_nanoseconds()
                    .unwrap_or(i64::MAX / 2);
                let cut = (prev_ts + Duration::nanoseconds(gap_ns / 2)).min(obs.timestamp);
                runs.push(StatusRun {
                    start: Some(cut),
                    status: obs.status,
                });
            }
        }
        prev_ts = Some(obs.timestamp);
    }
    runs
}

/// Extrapolate a store's status over `[window_start, window_end)`, clipped to
/// business-open time.
///
/// The returned intervals are disjoint, sorted, maximal (no two adjacent
/// intervals share a status), and sum exactly to the business-open duration
/// within the window. `observations` must be sorted by timestamp and may
/// extend beyond the window; samples outside a business-open sub-interval are
/// borrowed when they are the nearest available.
pub fn extrapolate(
    observations: &[Observation],
    schedule: &WeeklySchedule,
    tz: Tz,
    window_start: DateTime<Utc>,
    window_end: DateTime<Utc>,
    default_status: StoreStatus,
) -> Vec<ExtrapolatedInterval> {
    let open = business_open_intervals(schedule, tz, window_start, window_end);
    if open.is_empty() {
        return Vec::new();
    }

    let runs = status_runs(observations);
    let mut result: Vec<ExtrapolatedInterval> = Vec::new();

    let mut push = |start: DateTime<Utc>, end: DateTime<Utc>, status: StoreStatus| {
        if start >= end {
            return;
        }
        match result.last_mut() {
            // Merge same-status runs that touch, including across clip
            // boundaries of adjacent business-open sub-intervals.
            Some(last) if last.status == status && last.end == start => last.end = end,
            _ => result.push(ExtrapolatedInterval { start, end, status }),
        }
    };

    for (open_start, open_end) in open {
        if runs.is_empty() {
            push(open_start, open_end, default_status);
            continue;
        }
        for (i, run) in runs.iter().enumerate() {
            let run_start = run.start.unwrap_or(open_start).max(open_start);
            let run_end = runs
                .get(i + 1)
                .and_then(|next| next.start)
                .unwrap_or(open_end)
                .min(open_end);
            push(run_start, run_end, run.status);
        }
    }

    result
}

/// Sum active (uptime) and inactive (downtime) durations.
pub fn integrate(intervals: &[ExtrapolatedInterval]) -> (Duration, Duration) {
    let mut uptime = Duration::zero();
    let mut downtime = Duration::zero();
    for iv in intervals {
        match iv.status {
            StoreStatus::Active => uptime = uptime + iv.duration(),
            StoreStatus::Inactive => downtime = downtime + iv.duration(),
        }
    }
    (uptime, downtime)
}

#[cfg(test)]
#[path = "extrapolator_tests.rs"]
mod tests;
