//! Repository trait definitions.
//!
//! The core engine consumes read-only accessors over the ingested tables.
//! Keeping these behind traits decouples the extrapolation/aggregation logic
//! from the storage format, so the in-memory backend can be swapped for a
//! real database without touching the core.

pub mod error;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use crate::models::{Observation, StoreId, WeeklySchedule};

/// Read access to per-store schedules (business hours and timezone).
///
/// Both lookups return `None` for stores absent from the respective table;
/// the aggregator substitutes the documented defaults (open 24/7, configured
/// default timezone) rather than treating absence as an error.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Weekly business hours for a store, or `None` when the store has no
    /// business-hours rows.
    async fn schedule_for(&self, store_id: &StoreId) -> RepositoryResult<Option<WeeklySchedule>>;

    /// IANA timezone for a store, or `None` when the store has no timezone row.
    async fn timezone_for(&self, store_id: &StoreId) -> RepositoryResult<Option<Tz>>;
}

/// Read access to the sparse status observations.
#[async_trait]
pub trait ObservationRepository: Send + Sync {
    /// Observations for a store with `range_start <= timestamp <= range_end`,
    /// sorted ascending by timestamp.
    async fn observations_for(
        &self,
        store_id: &StoreId,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Observation>>;

    /// Distinct store ids present in the observation table, ascending.
    async fn store_ids(&self) -> RepositoryResult<Vec<StoreId>>;

    /// Maximum observed timestamp across all stores. This is the report's
    /// reference instant ("now" for the frozen dataset), or `None` when the
    /// observation table is empty.
    async fn latest_observation_at(&self) -> RepositoryResult<Option<DateTime<Utc>>>;
}

/// Combined repository interface consumed by the report pipeline.
pub trait FullRepository: ScheduleRepository + ObservationRepository {}

impl<T: ScheduleRepository + ObservationRepository> FullRepository for T {}
