//! Test helpers shared across integration tests

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use drivewatch::{
    DriveReport, DriveStatus,
    config::Thresholds,
    engine::StatusIngestEngine,
    notify::{Notifier, NotifyError, NotifyResult},
    storage::{MemoryStatusStore, StatusStore, StorageError, StorageResult},
    throttle::AlertThrottle,
};
use tokio::sync::Mutex;

/// One recorded notification
#[derive(Debug, Clone, PartialEq)]
pub enum SentMail {
    Warning { machine: String },
    Critical { machine: String },
    DailySummary { machines: Vec<String> },
}

/// Notifier that records confirmed deliveries instead of talking SMTP.
///
/// While `failing` is set every dispatch attempt errors, mimicking an
/// unreachable relay; failed attempts are counted but not recorded as
/// sent.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentMail>>,
    failing: AtomicBool,
    failed_attempts: AtomicUsize,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn failed_attempts(&self) -> usize {
        self.failed_attempts.load(Ordering::SeqCst)
    }

    pub async fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    fn check_failing(&self) -> NotifyResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            self.failed_attempts.fetch_add(1, Ordering::SeqCst);
            Err(NotifyError::Build("smtp relay unreachable".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_warning(&self, machine: &str, _report: &DriveReport) -> NotifyResult<()> {
        self.check_failing()?;
        self.sent.lock().await.push(SentMail::Warning {
            machine: machine.to_string(),
        });
        Ok(())
    }

    async fn send_critical(&self, machine: &str, _report: &DriveReport) -> NotifyResult<()> {
        self.check_failing()?;
        self.sent.lock().await.push(SentMail::Critical {
            machine: machine.to_string(),
        });
        Ok(())
    }

    async fn send_daily_summary(&self, statuses: &[DriveStatus]) -> NotifyResult<()> {
        self.check_failing()?;
        self.sent.lock().await.push(SentMail::DailySummary {
            machines: statuses.iter().map(|s| s.machine.clone()).collect(),
        });
        Ok(())
    }
}

/// Store whose writes always fail, for abort-path tests
pub struct FailingStore;

#[async_trait]
impl StatusStore for FailingStore {
    async fn save_status(&self, _report: &DriveReport) -> StorageResult<()> {
        Err(StorageError::QueryFailed("injected failure".to_string()))
    }

    async fn latest_for_machine(&self, _machine: &str) -> StorageResult<Option<DriveStatus>> {
        Err(StorageError::QueryFailed("injected failure".to_string()))
    }

    async fn all_latest(&self) -> StorageResult<Vec<DriveStatus>> {
        Err(StorageError::QueryFailed("injected failure".to_string()))
    }

    async fn last_alert_sent_at(
        &self,
        _machine: &str,
    ) -> StorageResult<Option<chrono::DateTime<Utc>>> {
        Err(StorageError::QueryFailed("injected failure".to_string()))
    }

    async fn set_last_alert_sent_at(
        &self,
        _machine: &str,
        _sent_at: chrono::DateTime<Utc>,
    ) -> StorageResult<()> {
        Err(StorageError::QueryFailed("injected failure".to_string()))
    }

    async fn health_check(&self) -> StorageResult<drivewatch::storage::HealthStatus> {
        Err(StorageError::QueryFailed("injected failure".to_string()))
    }

    async fn close(&self) -> StorageResult<()> {
        Ok(())
    }
}

/// Report with defaults matching the design thresholds (hard=20, soft=50)
pub fn report(machine: &str, c: f64, d: f64) -> DriveReport {
    DriveReport {
        machine: machine.to_string(),
        reported_at: Utc::now(),
        c_drive_space_gb: c,
        d_drive_space_gb: d,
    }
}

/// Engine wired to an in-memory store and the given notifier, using the
/// design defaults: thresholds hard=20/soft=50, reminders 1h/24h.
pub fn test_engine(
    notifier: Arc<RecordingNotifier>,
) -> (Arc<StatusIngestEngine>, Arc<MemoryStatusStore>) {
    let store = Arc::new(MemoryStatusStore::new());
    let engine = Arc::new(StatusIngestEngine::new(
        store.clone(),
        notifier,
        Thresholds {
            soft_gb: 50.0,
            hard_gb: 20.0,
        },
        AlertThrottle::from_millis(3_600_000, 86_400_000),
    ));
    (engine, store)
}
