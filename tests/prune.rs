use chrono::{DateTime, Days, Duration as ChronoDuration, Local, Utc};
use serde_json::Map;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use stumbler::models::Report;
use stumbler::prune::{self, PruneParams};
use stumbler::Database;

fn temp_db() -> Database {
    let path = std::env::temp_dir().join(format!("stumbler-test-{}.sqlite3", Uuid::new_v4()));
    Database::new(path).expect("failed to open test database")
}

fn report_at(timestamp: DateTime<Utc>) -> Report {
    Report::new(timestamp, 60.17, 24.94, 12, 3, 2)
}

fn days_ago(days: u64) -> DateTime<Utc> {
    Local::now()
        .checked_sub_days(Days::new(days))
        .expect("date arithmetic overflow")
        .with_timezone(&Utc)
}

#[tokio::test]
async fn prune_removes_only_reports_older_than_max_age() {
    let db = temp_db();

    // One minute of slack on the 60-day report keeps it inside the window
    // even though the job recomputes "now" when it runs.
    let kept = vec![
        report_at(days_ago(10)),
        report_at(days_ago(59)),
        report_at(days_ago(60) + ChronoDuration::minutes(1)),
    ];
    let pruned = vec![report_at(days_ago(61)), report_at(days_ago(100))];

    for report in kept.iter().chain(pruned.iter()) {
        db.insert_report(report).await.unwrap();
    }

    let outcome = prune::run(&db, PruneParams { max_age_days: 60 })
        .await
        .unwrap();
    assert_eq!(outcome.deleted, 2);

    let remaining = db.list_reports(10).await.unwrap();
    assert_eq!(remaining.len(), 3);

    let kept_ids: Vec<&str> = kept.iter().map(|r| r.id.as_str()).collect();
    for report in &remaining {
        assert!(kept_ids.contains(&report.id.as_str()));
    }

    let cutoff = prune::cutoff_instant(Local::now(), 60).unwrap();
    assert!(remaining.iter().all(|r| r.timestamp >= cutoff));
}

#[tokio::test]
async fn prune_is_idempotent() {
    let db = temp_db();

    db.insert_report(&report_at(days_ago(90))).await.unwrap();

    let first = prune::run(&db, PruneParams::default()).await.unwrap();
    assert_eq!(first.deleted, 1);

    let second = prune::run(&db, PruneParams::default()).await.unwrap();
    assert_eq!(second.deleted, 0);
}

#[tokio::test]
async fn prune_defaults_to_sixty_days_when_params_absent() {
    let db = temp_db();

    db.insert_report(&report_at(days_ago(59))).await.unwrap();
    db.insert_report(&report_at(days_ago(61))).await.unwrap();

    let params = PruneParams::from_map(&Map::new());
    let outcome = prune::run(&db, params).await.unwrap();

    assert_eq!(outcome.deleted, 1);
    assert_eq!(db.count_reports().await.unwrap(), 1);
}

#[tokio::test]
async fn report_at_exact_cutoff_survives() {
    let db = temp_db();

    let cutoff = prune::cutoff_instant(Local::now(), 60).unwrap();

    db.insert_report(&report_at(cutoff)).await.unwrap();
    db.insert_report(&report_at(cutoff - ChronoDuration::milliseconds(1)))
        .await
        .unwrap();

    // Strict comparison: only the row older than the cutoff goes.
    let deleted = db.delete_reports_older_than(cutoff).await.unwrap();
    assert_eq!(deleted, 1);

    let remaining = db.list_reports(10).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].timestamp, cutoff);
}

#[tokio::test]
async fn zero_max_age_deletes_everything_before_now() {
    let db = temp_db();

    db.insert_report(&report_at(days_ago(1))).await.unwrap();
    db.insert_report(&report_at(Utc::now() + ChronoDuration::days(1)))
        .await
        .unwrap();

    let outcome = prune::run(&db, PruneParams { max_age_days: 0 })
        .await
        .unwrap();

    assert_eq!(outcome.deleted, 1);
    assert_eq!(db.count_reports().await.unwrap(), 1);
}

#[tokio::test]
async fn periodic_loop_prunes_and_stops_on_cancel() {
    let db = temp_db();

    db.insert_report(&report_at(days_ago(90))).await.unwrap();
    db.insert_report(&report_at(days_ago(10))).await.unwrap();

    let cancel = CancellationToken::new();
    let handle = tokio::spawn(prune::run_periodic(
        db.clone(),
        Duration::from_secs(3600),
        cancel.clone(),
    ));

    // The interval fires its first tick immediately; give the pass time to run.
    tokio::time::sleep(Duration::from_millis(200)).await;

    cancel.cancel();
    handle.await.unwrap();

    assert_eq!(db.count_reports().await.unwrap(), 1);
}
