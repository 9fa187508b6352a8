//! Deletes old scan reports from the local DB.

use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Days, Local, Utc};
use serde_json::{Map, Value};
use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::db::Database;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Work-queue labels used by the scheduling shell; both queues run the
/// identical deletion routine.
pub const PERIODIC_WORK_NAME: &str = "db_prune_periodic";
pub const ONE_TIME_WORK_NAME: &str = "db_prune_one_time";

pub const MAX_AGE_DAYS_PARAM: &str = "max_age_days";

const DEFAULT_MAX_AGE_DAYS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PruneParams {
    pub max_age_days: u64,
}

impl Default for PruneParams {
    fn default() -> Self {
        Self {
            max_age_days: DEFAULT_MAX_AGE_DAYS,
        }
    }
}

impl PruneParams {
    /// Reads `max_age_days` from a job parameter map. Absent, negative or
    /// non-integer values fall back to the 60-day default.
    pub fn from_map(params: &Map<String, Value>) -> Self {
        let max_age_days = params
            .get(MAX_AGE_DAYS_PARAM)
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_MAX_AGE_DAYS);

        Self { max_age_days }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PruneOutcome {
    pub deleted: usize,
    pub elapsed: std::time::Duration,
}

/// Cutoff computed by calendar-day subtraction on local time, so the
/// threshold follows local day boundaries across DST changes.
pub fn cutoff_instant(now: DateTime<Local>, max_age_days: u64) -> Result<DateTime<Utc>> {
    let cutoff = now
        .checked_sub_days(Days::new(max_age_days))
        .with_context(|| format!("cannot subtract {max_age_days} days from {now}"))?;
    Ok(cutoff.with_timezone(&Utc))
}

/// One prune pass: a single bulk delete of reports strictly older than the
/// cutoff. Storage errors propagate to the caller; the scheduling shell owns
/// retry policy.
pub async fn run(db: &Database, params: PruneParams) -> Result<PruneOutcome> {
    let cutoff = cutoff_instant(Local::now(), params.max_age_days)?;

    log_info!("Deleting reports older than {cutoff}");

    let started = Instant::now();
    let deleted = db.delete_reports_older_than(cutoff).await?;
    let elapsed = started.elapsed();

    log_info!("Deleted {deleted} reports in {:.1}s", elapsed.as_secs_f64());

    Ok(PruneOutcome { deleted, elapsed })
}

/// Recurring prune loop for shells without a platform work scheduler. Runs a
/// default-parameter pass every `interval` until cancelled; failures are
/// logged and the loop keeps going.
pub async fn run_periodic(db: Database, interval: Duration, cancel_token: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match run(&db, PruneParams::default()).await {
                    Ok(_) => {}
                    Err(err) => log_warn!("periodic prune failed: {err:?}"),
                }
            }
            _ = cancel_token.cancelled() => {
                log_info!("prune loop shutting down");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn params_default_to_sixty_days() {
        assert_eq!(PruneParams::default().max_age_days, 60);
        assert_eq!(PruneParams::from_map(&Map::new()).max_age_days, 60);
    }

    #[test]
    fn params_read_valid_max_age() {
        let mut map = Map::new();
        map.insert(MAX_AGE_DAYS_PARAM.to_string(), json!(14));
        assert_eq!(PruneParams::from_map(&map).max_age_days, 14);
    }

    #[test]
    fn invalid_params_fall_back_to_default() {
        let mut map = Map::new();
        map.insert(MAX_AGE_DAYS_PARAM.to_string(), json!(-5));
        assert_eq!(PruneParams::from_map(&map).max_age_days, 60);

        map.insert(MAX_AGE_DAYS_PARAM.to_string(), json!("soon"));
        assert_eq!(PruneParams::from_map(&map).max_age_days, 60);

        map.insert(MAX_AGE_DAYS_PARAM.to_string(), json!(2.5));
        assert_eq!(PruneParams::from_map(&map).max_age_days, 60);
    }

    #[test]
    fn cutoff_subtracts_calendar_days() {
        let now = Local.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        let cutoff = cutoff_instant(now, 60).unwrap();
        let expected = now.checked_sub_days(Days::new(60)).unwrap();
        assert_eq!(cutoff, expected.with_timezone(&Utc));
    }

    #[test]
    fn zero_days_keeps_cutoff_at_now() {
        let now = Local.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
        let cutoff = cutoff_instant(now, 0).unwrap();
        assert_eq!(cutoff, now.with_timezone(&Utc));
    }
}
