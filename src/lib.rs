//! # Storewatch
//!
//! Store uptime/downtime reporting engine.
//!
//! Given sparse, irregularly-sampled status observations per store, a weekly
//! business-hours schedule, and a per-store timezone, this crate extrapolates
//! how much of recent business-open time each store was active versus
//! inactive, over three trailing windows (last hour, last day, last week)
//! ending at the newest observation in the dataset. Reports are generated
//! asynchronously: a trigger returns a job handle immediately and the result
//! is polled for later.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: Domain types (observations, schedules, report rows)
//! - [`db`]: Repository pattern over the ingested tables, plus CSV ingest
//! - [`services`]: Extrapolation, aggregation, and the async job lifecycle
//! - [`config`]: TOML configuration for data paths and policy defaults
//! - [`http`]: Axum-based HTTP server exposing trigger/poll endpoints

pub mod config;
pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
