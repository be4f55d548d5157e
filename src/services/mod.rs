//! Service layer for business logic and orchestration.
//!
//! The services sit between the repository layer and the HTTP surface:
//! extrapolation and aggregation are pure given their inputs, the job tracker
//! and report processor wrap them in the async report lifecycle.

pub mod aggregator;

pub mod csv_export;

pub mod extrapolator;

pub mod job_tracker;

pub mod report_processor;

pub use aggregator::{aggregate, aggregate_store, ReportPolicy};
pub use csv_export::report_to_csv;
pub use extrapolator::{
    business_open_intervals, extrapolate, integrate, status_at, ExtrapolatedInterval,
};
pub use job_tracker::{JobStatus, JobTracker, LogEntry, LogLevel, ReportJob};
pub use report_processor::generate_report;
