use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::params;

use crate::db::{
    helpers::{from_epoch_millis, parse_datetime, parse_status, to_i64, to_u32},
    Database,
};
use crate::models::{Report, ReportStatus};

impl Database {
    pub async fn insert_report(&self, report: &Report) -> Result<()> {
        let record = report.clone();
        self.execute(move |conn| {
            conn.execute(
                "INSERT INTO reports (
                    id,
                    timestamp,
                    latitude,
                    longitude,
                    wifi_ap_count,
                    cell_tower_count,
                    bluetooth_beacon_count,
                    status,
                    created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    record.id,
                    record.timestamp.timestamp_millis(),
                    record.latitude,
                    record.longitude,
                    to_i64(u64::from(record.wifi_ap_count))?,
                    to_i64(u64::from(record.cell_tower_count))?,
                    to_i64(u64::from(record.bluetooth_beacon_count))?,
                    record.status.as_str(),
                    record.created_at.to_rfc3339(),
                ],
            )
            .with_context(|| "failed to insert report")?;
            Ok(())
        })
        .await
    }

    /// Newest-first page of reports for the list screen.
    pub async fn list_reports(&self, limit: u32) -> Result<Vec<Report>> {
        self.execute(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, timestamp, latitude, longitude, wifi_ap_count,
                        cell_tower_count, bluetooth_beacon_count, status, created_at
                 FROM reports
                 ORDER BY timestamp DESC
                 LIMIT ?1",
            )?;

            let mut rows = stmt.query(params![limit])?;
            let mut reports = Vec::new();
            while let Some(row) = rows.next()? {
                reports.push(Report {
                    id: row.get(0)?,
                    timestamp: from_epoch_millis(row.get::<_, i64>(1)?, "timestamp")?,
                    latitude: row.get(2)?,
                    longitude: row.get(3)?,
                    wifi_ap_count: to_u32(row.get::<_, i64>(4)?, "wifi_ap_count")?,
                    cell_tower_count: to_u32(row.get::<_, i64>(5)?, "cell_tower_count")?,
                    bluetooth_beacon_count: to_u32(
                        row.get::<_, i64>(6)?,
                        "bluetooth_beacon_count",
                    )?,
                    status: parse_status(&row.get::<_, String>(7)?)?,
                    created_at: parse_datetime(&row.get::<_, String>(8)?, "created_at")?,
                });
            }

            Ok(reports)
        })
        .await
    }

    pub async fn count_reports(&self) -> Result<u64> {
        self.execute(|conn| {
            let count: i64 =
                conn.query_row("SELECT COUNT(*) FROM reports", [], |row| row.get(0))?;
            Ok(count as u64)
        })
        .await
    }

    pub async fn delete_report(&self, report_id: &str) -> Result<()> {
        let report_id = report_id.to_string();
        self.execute(move |conn| {
            conn.execute("DELETE FROM reports WHERE id = ?1", params![report_id])
                .with_context(|| "failed to delete report")?;
            Ok(())
        })
        .await
    }

    pub async fn update_report_status(
        &self,
        report_id: &str,
        status: ReportStatus,
    ) -> Result<()> {
        let report_id = report_id.to_string();
        self.execute(move |conn| {
            conn.execute(
                "UPDATE reports SET status = ?1 WHERE id = ?2",
                params![status.as_str(), report_id],
            )
            .with_context(|| "failed to update report status")?;
            Ok(())
        })
        .await
    }

    /// Bulk delete of reports strictly older than the cutoff. Returns the
    /// number of rows removed.
    pub async fn delete_reports_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let cutoff_millis = cutoff.timestamp_millis();
        self.execute(move |conn| {
            let deleted = conn
                .execute(
                    "DELETE FROM reports WHERE timestamp < ?1",
                    params![cutoff_millis],
                )
                .with_context(|| "failed to delete old reports")?;
            Ok(deleted)
        })
        .await
    }
}
