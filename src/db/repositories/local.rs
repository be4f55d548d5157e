//! In-memory repository implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use parking_lot::RwLock;

use crate::db::repository::{
    ObservationRepository, RepositoryResult, ScheduleRepository,
};
use crate::models::{Observation, StoreId, StoreStatus, WeeklySchedule};

#[derive(Default)]
struct Tables {
    observations: HashMap<StoreId, Vec<Observation>>,
    schedules: HashMap<StoreId, WeeklySchedule>,
    timezones: HashMap<StoreId, Tz>,
    latest_observation: Option<DateTime<Utc>>,
}

/// In-memory store of the three ingested tables.
///
/// Writes happen only during ingest (and from tests); the report pipeline
/// reads concurrently through the repository traits. Observation lists are
/// kept sorted by timestamp on insert.
#[derive(Default)]
pub struct LocalRepository {
    tables: RwLock<Tables>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a single observation, keeping the store's list time-sorted.
    pub fn add_observation(
        &self,
        store_id: impl Into<StoreId>,
        timestamp: DateTime<Utc>,
        status: StoreStatus,
    ) {
        let store_id = store_id.into();
        let mut tables = self.tables.write();
        tables.latest_observation = Some(match tables.latest_observation {
            Some(latest) if latest >= timestamp => latest,
            _ => timestamp,
        });
        let list = tables.observations.entry(store_id.clone()).or_default();
        let obs = Observation::new(store_id, timestamp, status);
        // Insert after any equal timestamps so duplicate-timestamp input
        // keeps its arrival order.
        let idx = list.partition_point(|o| o.timestamp <= timestamp);
        list.insert(idx, obs);
    }

    /// Replace the weekly schedule for a store.
    pub fn set_schedule(&self, store_id: impl Into<StoreId>, schedule: WeeklySchedule) {
        self.tables.write().schedules.insert(store_id.into(), schedule);
    }

    /// Replace the timezone for a store.
    pub fn set_timezone(&self, store_id: impl Into<StoreId>, tz: Tz) {
        self.tables.write().timezones.insert(store_id.into(), tz);
    }

    /// Number of observations across all stores.
    pub fn observation_count(&self) -> usize {
        self.tables.read().observations.values().map(Vec::len).sum()
    }
}

#[async_trait]
impl ScheduleRepository for LocalRepository {
    async fn schedule_for(&self, store_id: &StoreId) -> RepositoryResult<Option<WeeklySchedule>> {
        Ok(self.tables.read().schedules.get(store_id).cloned())
    }

    async fn timezone_for(&self, store_id: &StoreId) -> RepositoryResult<Option<Tz>> {
        Ok(self.tables.read().timezones.get(store_id).copied())
    }
}

#[async_trait]
impl ObservationRepository for LocalRepository {
    async fn observations_for(
        &self,
        store_id: &StoreId,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Observation>> {
        let tables = self.tables.read();
        let Some(list) = tables.observations.get(store_id) else {
            return Ok(Vec::new());
        };
        let lo = list.partition_point(|o| o.timestamp < range_start);
        let hi = list.partition_point(|o| o.timestamp <= range_end);
        Ok(list[lo..hi].to_vec())
    }

    async fn store_ids(&self) -> RepositoryResult<Vec<StoreId>> {
        let tables = self.tables.read();
        let mut ids: Vec<StoreId> = tables.observations.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    async fn latest_observation_at(&self) -> RepositoryResult<Option<DateTime<Utc>>> {
        Ok(self.tables.read().latest_observation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, 25, h, m, 0).unwrap()
    }

    #[tokio::test]
    async fn test_observations_sorted_and_ranged() {
        let repo = LocalRepository::new();
        repo.add_observation("s1", ts(12, 0), StoreStatus::Inactive);
        repo.add_observation("s1", ts(10, 0), StoreStatus::Active);
        repo.add_observation("s1", ts(11, 0), StoreStatus::Active);
        repo.add_observation("s2", ts(10, 30), StoreStatus::Active);

        let all = repo
            .observations_for(&StoreId::new("s1"), ts(0, 0), ts(23, 0))
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

        let ranged = repo
            .observations_for(&StoreId::new("s1"), ts(10, 30), ts(12, 0))
            .await
            .unwrap();
        assert_eq!(ranged.len(), 2);
        assert_eq!(ranged[0].timestamp, ts(11, 0));
        // Range end is inclusive.
        assert_eq!(ranged[1].timestamp, ts(12, 0));
    }

    #[tokio::test]
    async fn test_store_ids_sorted_distinct() {
        let repo = LocalRepository::new();
        repo.add_observation("b", ts(1, 0), StoreStatus::Active);
        repo.add_observation("a", ts(2, 0), StoreStatus::Active);
        repo.add_observation("a", ts(3, 0), StoreStatus::Inactive);

        let ids = repo.store_ids().await.unwrap();
        assert_eq!(ids, vec![StoreId::new("a"), StoreId::new("b")]);
    }

    #[tokio::test]
    async fn test_latest_observation() {
        let repo = LocalRepository::new();
        assert!(repo.latest_observation_at().await.unwrap().is_none());
        repo.add_observation("a", ts(5, 0), StoreStatus::Active);
        repo.add_observation("b", ts(9, 0), StoreStatus::Inactive);
        repo.add_observation("a", ts(7, 0), StoreStatus::Active);
        assert_eq!(repo.latest_observation_at().await.unwrap(), Some(ts(9, 0)));
    }

    #[tokio::test]
    async fn test_missing_schedule_and_timezone() {
        let repo = LocalRepository::new();
        let id = StoreId::new("nope");
        assert!(repo.schedule_for(&id).await.unwrap().is_none());
        assert!(repo.timezone_for(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_timestamps_keep_arrival_order() {
        let repo = LocalRepository::new();
        repo.add_observation("s", ts(10, 0), StoreStatus::Active);
        repo.add_observation("s", ts(10, 0), StoreStatus::Inactive);
        let obs = repo
            .observations_for(&StoreId::new("s"), ts(9, 0), ts(11, 0))
            .await
            .unwrap();
        assert_eq!(obs[0].status, StoreStatus::Active);
        assert_eq!(obs[1].status, StoreStatus::Inactive);
    }
}
