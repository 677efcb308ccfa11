//! SQLite persistence behavior
//!
//! The engine derives all throttling from two persisted scalars, so the
//! store must keep them intact across overwrites and process restarts.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use drivewatch::storage::{SqliteStatusStore, StatusStore};
use pretty_assertions::assert_eq;

use crate::helpers::*;

fn truncate_to_millis(ts: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ts.timestamp_millis()).unwrap()
}

#[tokio::test]
async fn engine_state_survives_process_restart() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("status.db");

    let notifier = RecordingNotifier::new();

    // First "process": alert goes out, timestamp is recorded.
    {
        let store = Arc::new(SqliteStatusStore::new(&db_path).await.unwrap());
        let engine = engine_with_store(store.clone(), notifier.clone());
        engine.ingest(report("A", 15.0, 60.0)).await.unwrap();
        assert_eq!(notifier.sent_count().await, 1);
        store.close().await.unwrap();
    }

    // Second "process": the same report right after restart is throttled
    // because the timestamp was reconstructed from the store.
    {
        let store = Arc::new(SqliteStatusStore::new(&db_path).await.unwrap());
        let engine = engine_with_store(store.clone(), notifier.clone());
        let outcome = engine.ingest(report("A", 15.0, 60.0)).await.unwrap();
        assert!(!outcome.notified);
        assert_eq!(notifier.sent_count().await, 1);
        store.close().await.unwrap();
    }
}

#[tokio::test]
async fn alert_timestamp_roundtrips_through_millis() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("status.db");
    let store = SqliteStatusStore::new(&db_path).await.unwrap();

    store.save_status(&report("A", 15.0, 60.0)).await.unwrap();

    let sent_at = truncate_to_millis(Utc::now() - Duration::minutes(30));
    store.set_last_alert_sent_at("A", sent_at).await.unwrap();

    assert_eq!(store.last_alert_sent_at("A").await.unwrap(), Some(sent_at));
}

#[tokio::test]
async fn unknown_machine_has_no_alert_timestamp() {
    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("status.db");
    let store = SqliteStatusStore::new(&db_path).await.unwrap();

    assert_eq!(store.last_alert_sent_at("ghost").await.unwrap(), None);
    assert!(store.latest_for_machine("ghost").await.unwrap().is_none());
}

fn engine_with_store(
    store: Arc<SqliteStatusStore>,
    notifier: Arc<RecordingNotifier>,
) -> drivewatch::engine::StatusIngestEngine {
    use drivewatch::config::Thresholds;
    use drivewatch::throttle::AlertThrottle;

    drivewatch::engine::StatusIngestEngine::new(
        store,
        notifier,
        Thresholds {
            soft_gb: 50.0,
            hard_gb: 20.0,
        },
        AlertThrottle::from_millis(3_600_000, 86_400_000),
    )
}
