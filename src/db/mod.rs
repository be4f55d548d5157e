//! Data access for the ingested monitoring tables.
//!
//! This module follows the repository pattern so storage backends can be
//! swapped without touching the report engine:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (REST API, server binary)            │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services/) - Extrapolation, Aggregation │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌──────────────────────────────────────────────┐
//!     │             Local Repository                  │
//!     │        (in-memory, CSV-ingested)              │
//!     └──────────────────────────────────────────────┘
//! ```

pub mod ingest;
pub mod repositories;
pub mod repository;

pub use ingest::{load_business_hours, load_data_dir, load_observations, load_timezones};
pub use repositories::LocalRepository;
pub use repository::{
    ErrorContext, FullRepository, ObservationRepository, RepositoryError, RepositoryResult,
    ScheduleRepository,
};
