use chrono::{Duration as ChronoDuration, Utc};
use uuid::Uuid;

use stumbler::models::{Report, ReportStatus};
use stumbler::Database;

fn temp_db() -> Database {
    let path = std::env::temp_dir().join(format!("stumbler-test-{}.sqlite3", Uuid::new_v4()));
    Database::new(path).expect("failed to open test database")
}

#[tokio::test]
async fn insert_and_list_round_trip_newest_first() {
    let db = temp_db();

    let older = Report::new(Utc::now() - ChronoDuration::hours(2), 60.17, 24.94, 8, 2, 1);
    let newer = Report::new(Utc::now() - ChronoDuration::hours(1), 60.18, 24.95, 15, 4, 0);

    db.insert_report(&older).await.unwrap();
    db.insert_report(&newer).await.unwrap();

    let reports = db.list_reports(10).await.unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].id, newer.id);
    assert_eq!(reports[1].id, older.id);

    let first = &reports[0];
    assert_eq!(first.wifi_ap_count, 15);
    assert_eq!(first.cell_tower_count, 4);
    assert_eq!(first.bluetooth_beacon_count, 0);
    assert_eq!(first.status, ReportStatus::Pending);
    // Millisecond precision survives the round trip.
    assert_eq!(
        first.timestamp.timestamp_millis(),
        newer.timestamp.timestamp_millis()
    );
}

#[tokio::test]
async fn list_respects_limit() {
    let db = temp_db();

    for hours in 0..5 {
        let report = Report::new(
            Utc::now() - ChronoDuration::hours(hours),
            60.17,
            24.94,
            1,
            1,
            1,
        );
        db.insert_report(&report).await.unwrap();
    }

    assert_eq!(db.list_reports(3).await.unwrap().len(), 3);
    assert_eq!(db.count_reports().await.unwrap(), 5);
}

#[tokio::test]
async fn delete_report_removes_single_row() {
    let db = temp_db();

    let keep = Report::new(Utc::now(), 60.17, 24.94, 1, 1, 1);
    let remove = Report::new(Utc::now(), 60.18, 24.95, 2, 2, 2);

    db.insert_report(&keep).await.unwrap();
    db.insert_report(&remove).await.unwrap();

    db.delete_report(&remove.id).await.unwrap();

    let remaining = db.list_reports(10).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, keep.id);
}

#[tokio::test]
async fn update_report_status_marks_uploaded() {
    let db = temp_db();

    let report = Report::new(Utc::now(), 60.17, 24.94, 1, 1, 1);
    db.insert_report(&report).await.unwrap();

    db.update_report_status(&report.id, ReportStatus::Uploaded)
        .await
        .unwrap();

    let reports = db.list_reports(1).await.unwrap();
    assert_eq!(reports[0].status, ReportStatus::Uploaded);
}
