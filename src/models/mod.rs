//! Core domain types for store uptime monitoring.

pub mod hours;
pub mod report;
pub mod store;

pub use hours::{HoursInterval, WeeklySchedule};
pub use report::{ReportRow, REPORT_COLUMNS};
pub use store::{Observation, StoreId, StoreStatus};
