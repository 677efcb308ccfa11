//! Status ingest engine
//!
//! The composition point of the system: receives a normalized report,
//! persists it, classifies it, and drives the throttle-gated
//! notification.
//!
//! ## State machine without stored state
//!
//! Per machine the engine behaves like a state machine over
//! {Unknown, Healthy, Warned, Alerted}, but no state value is ever
//! stored. Everything is reconstructed on each report from two persisted
//! scalars (current free space, last-alert timestamp) and the clock, so
//! a crash between persistence and notification cannot corrupt an
//! in-memory state machine — at worst one notification is retried by the
//! next report.
//!
//! ## Ordering contract
//!
//! ```text
//! ingest(report):
//!   1. validate machine identifier
//!   2. persist (must succeed before anything else runs)
//!   3. classify against configured thresholds
//!   4. read last_alert_sent_at
//!   5. throttle check → dispatch → record on confirmed delivery
//! ```
//!
//! Steps 2-5 hold a per-machine lock: two simultaneous critical reports
//! for the same machine must not both pass the throttle check. Reports
//! for different machines never contend.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

use crate::DriveReport;
use crate::config::Thresholds;
use crate::notify::Notifier;
use crate::policy::{Classification, classify};
use crate::storage::{StatusStore, StorageError};
use crate::throttle::AlertThrottle;

/// Errors surfaced by `ingest`
#[derive(Debug)]
pub enum IngestError {
    /// Malformed report, rejected before persistence. Never retried.
    InvalidReport(String),

    /// The backing store failed; the ingest was aborted before any
    /// notification was attempted.
    Store(StorageError),
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::InvalidReport(msg) => write!(f, "invalid report: {}", msg),
            IngestError::Store(err) => write!(f, "store failure during ingest: {}", err),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::Store(err) => Some(err),
            IngestError::InvalidReport(_) => None,
        }
    }
}

impl From<StorageError> for IngestError {
    fn from(err: StorageError) -> Self {
        IngestError::Store(err)
    }
}

/// What one ingest did, for the HTTP response and for tests.
#[derive(Debug, Clone, Copy)]
pub struct IngestOutcome {
    pub classification: Classification,

    /// True only if a notification was dispatched and confirmed.
    pub notified: bool,
}

/// Orchestrator for report ingestion and alerting
pub struct StatusIngestEngine {
    store: Arc<dyn StatusStore>,
    notifier: Arc<dyn Notifier>,
    thresholds: Thresholds,
    throttle: AlertThrottle,

    /// Per-machine locks serializing the read-modify-write of the
    /// last-alert timestamp. The map itself is only held long enough to
    /// fetch or create an entry.
    machine_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl StatusIngestEngine {
    pub fn new(
        store: Arc<dyn StatusStore>,
        notifier: Arc<dyn Notifier>,
        thresholds: Thresholds,
        throttle: AlertThrottle,
    ) -> Self {
        Self {
            store,
            notifier,
            thresholds,
            throttle,
            machine_locks: Mutex::new(HashMap::new()),
        }
    }

    fn machine_lock(&self, machine: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self
            .machine_locks
            .lock()
            .expect("machine lock map poisoned");
        locks.entry(machine.to_string()).or_default().clone()
    }

    /// Ingest one report: persist, classify, and notify if permitted.
    ///
    /// A notification delivery failure does not fail the ingest — the
    /// status is already durable and the throttle timestamp is left
    /// untouched, so the next report re-attempts the alert.
    #[instrument(skip(self, report), fields(machine = %report.machine))]
    pub async fn ingest(&self, report: DriveReport) -> Result<IngestOutcome, IngestError> {
        if report.machine.trim().is_empty() {
            return Err(IngestError::InvalidReport(
                "machine identifier is empty".to_string(),
            ));
        }

        let lock = self.machine_lock(&report.machine);
        let _guard = lock.lock().await;

        // The row must be durable before any alert decision runs.
        self.store.save_status(&report).await?;

        let classification = classify(
            report.min_space_gb(),
            self.thresholds.hard_gb,
            self.thresholds.soft_gb,
        );
        debug!(?classification, "report classified");

        if classification == Classification::Healthy {
            // Healthy leaves last_alert_sent_at untouched on purpose: a
            // later degradation throttles against the most recent real
            // alert instead of being re-permitted immediately.
            return Ok(IngestOutcome {
                classification,
                notified: false,
            });
        }

        let last_sent = self.store.last_alert_sent_at(&report.machine).await?;
        let now = Utc::now();

        if !self.throttle.should_send(classification, last_sent, now) {
            debug!("alert suppressed by throttle");
            return Ok(IngestOutcome {
                classification,
                notified: false,
            });
        }

        let delivery = match classification {
            Classification::Critical => {
                self.notifier.send_critical(&report.machine, &report).await
            }
            _ => self.notifier.send_warning(&report.machine, &report).await,
        };

        match delivery {
            Ok(()) => {
                // Recorded only on confirmed delivery.
                self.store
                    .set_last_alert_sent_at(&report.machine, now)
                    .await?;
                info!(machine = %report.machine, ?classification, "alert sent");
                Ok(IngestOutcome {
                    classification,
                    notified: true,
                })
            }
            Err(e) => {
                error!(machine = %report.machine, "alert delivery failed: {e}");
                Ok(IngestOutcome {
                    classification,
                    notified: false,
                })
            }
        }
    }

    /// Send the unthrottled fleet-wide summary.
    ///
    /// Returns the number of machines covered. Delivery failures are
    /// logged, not propagated: the next interval will try again.
    #[instrument(skip(self))]
    pub async fn emit_daily_summary(&self) -> Result<usize, IngestError> {
        let statuses = self.store.all_latest().await?;

        if let Err(e) = self.notifier.send_daily_summary(&statuses).await {
            error!("daily summary delivery failed: {e}");
        }

        Ok(statuses.len())
    }
}

/// Spawn the periodic daily-summary task.
///
/// The schedule is a fixed interval measured from process start, not
/// calendar-aligned; the first summary goes out one full period after
/// startup.
pub fn spawn_daily_summary(engine: Arc<StatusIngestEngine>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let start = tokio::time::Instant::now() + period;
        let mut ticker = tokio::time::interval_at(start, period);

        loop {
            ticker.tick().await;
            match engine.emit_daily_summary().await {
                Ok(count) => info!(machines = count, "daily summary dispatched"),
                Err(e) => error!("daily summary failed: {e}"),
            }
        }
    })
}
