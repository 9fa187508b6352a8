use std::convert::TryFrom;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};

use crate::models::ReportStatus;

pub fn to_i64(value: u64) -> Result<i64> {
    i64::try_from(value).map_err(|_| anyhow!("value {value} exceeds SQLite INTEGER range"))
}

pub fn to_u32(value: i64, field: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| anyhow!("{field} contains out-of-range value {value}"))
}

pub fn parse_datetime(value: &str, field: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("failed to parse {field}"))
}

/// Report timestamps are stored as epoch milliseconds so the pruner's cutoff
/// comparison happens in SQL on integers.
pub fn from_epoch_millis(value: i64, field: &str) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(value)
        .ok_or_else(|| anyhow!("{field} contains invalid epoch millis {value}"))
}

pub fn parse_status(value: &str) -> Result<ReportStatus> {
    match value {
        "Pending" => Ok(ReportStatus::Pending),
        "Uploaded" => Ok(ReportStatus::Uploaded),
        "Failed" => Ok(ReportStatus::Failed),
        other => Err(anyhow!("unknown report status {other}")),
    }
}
