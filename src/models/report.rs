use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ReportStatus {
    Pending,
    Uploaded,
    Failed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "Pending",
            ReportStatus::Uploaded => "Uploaded",
            ReportStatus::Failed => "Failed",
        }
    }
}

/// A persisted batch of wireless signal observations taken at one position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub wifi_ap_count: u32,
    pub cell_tower_count: u32,
    pub bluetooth_beacon_count: u32,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
}

impl Report {
    pub fn new(
        timestamp: DateTime<Utc>,
        latitude: f64,
        longitude: f64,
        wifi_ap_count: u32,
        cell_tower_count: u32,
        bluetooth_beacon_count: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp,
            latitude,
            longitude,
            wifi_ap_count,
            cell_tower_count,
            bluetooth_beacon_count,
            status: ReportStatus::Pending,
            created_at: Utc::now(),
        }
    }
}
