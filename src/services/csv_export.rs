//! CSV rendering of a completed report.

use crate::db::repository::{RepositoryError, RepositoryResult};
use crate::models::{ReportRow, REPORT_COLUMNS};

/// Render report rows as CSV text in the contracted column order.
pub fn report_to_csv(rows: &[ReportRow]) -> RepositoryResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(REPORT_COLUMNS)
        .map_err(|e| RepositoryError::internal(format!("csv header: {}", e)))?;
    for row in rows {
        writer
            .write_record(&[
                row.store_id.as_str().to_string(),
                row.uptime_last_hour.to_string(),
                row.uptime_last_day.to_string(),
                row.uptime_last_week.to_string(),
                row.downtime_last_hour.to_string(),
                row.downtime_last_day.to_string(),
                row.downtime_last_week.to_string(),
            ])
            .map_err(|e| RepositoryError::internal(format!("csv row: {}", e)))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| RepositoryError::internal(format!("csv flush: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| RepositoryError::internal(format!("csv utf8: {}", e)))
}
