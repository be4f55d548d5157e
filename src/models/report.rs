//! Report output rows.

use serde::{Deserialize, Serialize};

use super::StoreId;

/// Fixed output column order for the report.
pub const REPORT_COLUMNS: [&str; 7] = [
    "store_id",
    "uptime_last_hour",
    "uptime_last_day",
    "uptime_last_week",
    "downtime_last_hour",
    "downtime_last_day",
    "downtime_last_week",
];

/// One store's uptime/downtime figures for the three trailing windows.
///
/// Hour and day windows are reported in minutes, the week window in hours.
/// For every window, `uptime + downtime` equals the store's business-open
/// duration within that window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub store_id: StoreId,
    pub uptime_last_hour: f64,
    pub uptime_last_day: f64,
    pub uptime_last_week: f64,
    pub downtime_last_hour: f64,
    pub downtime_last_day: f64,
    pub downtime_last_week: f64,
}
