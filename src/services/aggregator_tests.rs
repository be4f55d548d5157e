use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use chrono_tz::Tz;

use super::{aggregate, aggregate_store, ReportPolicy};
use crate::db::repository::{
    ObservationRepository, RepositoryError, RepositoryResult, ScheduleRepository,
};
use crate::db::LocalRepository;
use crate::models::{HoursInterval, Observation, StoreId, StoreStatus, WeeklySchedule};

fn reference() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, 25, 12, 0, 0).unwrap()
}

fn policy_utc() -> ReportPolicy {
    ReportPolicy {
        default_timezone: chrono_tz::UTC,
        ..ReportPolicy::default()
    }
}

#[tokio::test]
async fn test_half_hour_flip_in_last_hour() {
    // Store with no schedule rows (open 24/7) and no timezone row (default).
    // Active sample 45 min before the reference, inactive 15 min before:
    // the status flips at the midpoint, 30 min before the reference.
    let repo = LocalRepository::new();
    let t = reference();
    repo.add_observation("s1", t - Duration::minutes(45), StoreStatus::Active);
    repo.add_observation("s1", t - Duration::minutes(15), StoreStatus::Inactive);

    let row = aggregate_store(&repo, &StoreId::new("s1"), t, &policy_utc())
        .await
        .unwrap();
    assert_eq!(row.uptime_last_hour, 30.0);
    assert_eq!(row.downtime_last_hour, 30.0);
    // Day window: 23.5 h active, 0.5 h inactive, in minutes.
    assert_eq!(row.uptime_last_day, 23.5 * 60.0);
    assert_eq!(row.downtime_last_day, 30.0);
    // Week window in hours.
    assert_eq!(row.uptime_last_week, 167.5);
    assert_eq!(row.downtime_last_week, 0.5);
}

#[tokio::test]
async fn test_conservation_in_report_units() {
    let repo = LocalRepository::new();
    let t = reference();
    // Open 09:00-17:00 UTC every day.
    let mut schedule = WeeklySchedule::new();
    for day in 0..7 {
        schedule.add_interval(
            day,
            HoursInterval {
                open: 9 * 3600,
                close: 17 * 3600,
            },
        );
    }
    repo.set_schedule("s1", schedule);
    repo.set_timezone("s1", chrono_tz::UTC);
    repo.add_observation("s1", t - Duration::hours(2), StoreStatus::Inactive);
    repo.add_observation("s1", t - Duration::hours(50), StoreStatus::Active);

    let row = aggregate_store(&repo, &StoreId::new("s1"), t, &policy_utc())
        .await
        .unwrap();
    // Last hour [11:00, 12:00) is fully inside business hours.
    assert_eq!(row.uptime_last_hour + row.downtime_last_hour, 60.0);
    // Last day covers [09:00, 12:00) today and [12:00, 17:00) yesterday.
    assert_eq!(row.uptime_last_day + row.downtime_last_day, 8.0 * 60.0);
    // Last week: seven 8-hour days (clipped to 3h + 5h at the edges).
    assert_eq!(row.uptime_last_week + row.downtime_last_week, 56.0);
    for v in [
        row.uptime_last_hour,
        row.uptime_last_day,
        row.uptime_last_week,
        row.downtime_last_hour,
        row.downtime_last_day,
        row.downtime_last_week,
    ] {
        assert!(v >= 0.0);
    }
}

#[tokio::test]
async fn test_store_without_observations_defaults_active() {
    // aggregate() never sees such a store (ids come from the observation
    // table), but the per-store path must still apply the default policy.
    let repo = LocalRepository::new();
    let row = aggregate_store(&repo, &StoreId::new("ghost"), reference(), &policy_utc())
        .await
        .unwrap();
    assert_eq!(row.uptime_last_hour, 60.0);
    assert_eq!(row.downtime_last_hour, 0.0);
    assert_eq!(row.uptime_last_week, 168.0);
    assert_eq!(row.downtime_last_week, 0.0);
}

#[tokio::test]
async fn test_missing_timezone_uses_policy_default() {
    // Open 09:00-17:00 local; default timezone Asia/Karachi (UTC+5) shifts
    // that to [04:00, 12:00) UTC, so the last hour before 12:00 UTC is open.
    let repo = LocalRepository::new();
    let mut schedule = WeeklySchedule::new();
    for day in 0..7 {
        schedule.add_interval(
            day,
            HoursInterval {
                open: 9 * 3600,
                close: 17 * 3600,
            },
        );
    }
    repo.set_schedule("s1", schedule);
    let policy = ReportPolicy {
        default_timezone: chrono_tz::Asia::Karachi,
        ..ReportPolicy::default()
    };

    let row = aggregate_store(&repo, &StoreId::new("s1"), reference(), &policy)
        .await
        .unwrap();
    assert_eq!(row.uptime_last_hour + row.downtime_last_hour, 60.0);
}

#[tokio::test]
async fn test_aggregate_orders_rows_by_store_id() {
    let repo = LocalRepository::new();
    let t = reference();
    for id in ["9", "10", "2"] {
        repo.add_observation(id, t - Duration::hours(1), StoreStatus::Active);
    }

    let rows = aggregate(&repo, t, &policy_utc()).await.unwrap();
    let ids: Vec<&str> = rows.iter().map(|r| r.store_id.as_str()).collect();
    assert_eq!(ids, vec!["10", "2", "9"]);
}

#[tokio::test]
async fn test_aggregate_is_idempotent() {
    let repo = LocalRepository::new();
    let t = reference();
    repo.add_observation("a", t - Duration::minutes(90), StoreStatus::Active);
    repo.add_observation("a", t - Duration::minutes(20), StoreStatus::Inactive);
    repo.add_observation("b", t - Duration::hours(30), StoreStatus::Inactive);
    repo.set_timezone("b", chrono_tz::America::Chicago);

    let first = aggregate(&repo, t, &policy_utc()).await.unwrap();
    let second = aggregate(&repo, t, &policy_utc()).await.unwrap();
    assert_eq!(first, second);
}

/// Repository whose observation fetch fails for one store.
struct FlakyRepo {
    inner: LocalRepository,
    broken: StoreId,
}

#[async_trait]
impl ScheduleRepository for FlakyRepo {
    async fn schedule_for(&self, store_id: &StoreId) -> RepositoryResult<Option<WeeklySchedule>> {
        self.inner.schedule_for(store_id).await
    }

    async fn timezone_for(&self, store_id: &StoreId) -> RepositoryResult<Option<Tz>> {
        self.inner.timezone_for(store_id).await
    }
}

#[async_trait]
impl ObservationRepository for FlakyRepo {
    async fn observations_for(
        &self,
        store_id: &StoreId,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Observation>> {
        if store_id == &self.broken {
            return Err(RepositoryError::query("simulated fetch failure"));
        }
        self.inner.observations_for(store_id, range_start, range_end).await
    }

    async fn store_ids(&self) -> RepositoryResult<Vec<StoreId>> {
        self.inner.store_ids().await
    }

    async fn latest_observation_at(&self) -> RepositoryResult<Option<DateTime<Utc>>> {
        self.inner.latest_observation_at().await
    }
}

#[tokio::test]
async fn test_failing_store_is_skipped_not_fatal() {
    let inner = LocalRepository::new();
    let t = reference();
    inner.add_observation("bad", t - Duration::hours(1), StoreStatus::Active);
    inner.add_observation("good", t - Duration::hours(1), StoreStatus::Active);
    let repo = FlakyRepo {
        inner,
        broken: StoreId::new("bad"),
    };

    let rows = aggregate(&repo, t, &policy_utc()).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].store_id.as_str(), "good");
}
