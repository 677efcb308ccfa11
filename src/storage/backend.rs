//! Status store trait definition

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{DriveReport, DriveStatus};

use super::error::StorageResult;

/// Health status of the storage backend
#[derive(Debug, Clone)]
pub struct HealthStatus {
    /// Is the backend operational?
    pub healthy: bool,

    /// Human-readable status message
    pub message: String,

    /// Additional backend-specific metadata
    pub metadata: std::collections::HashMap<String, String>,
}

/// Trait for machine status persistence
///
/// The store holds exactly one row per machine: the latest ingested
/// report plus the timestamp of the last alert that actually went out.
/// It is the single source of truth for both status and throttle state.
///
/// ## Thread Safety
///
/// Implementations must be `Send + Sync` as they are shared across
/// async tasks. The ingest engine serializes per-machine read-modify-write
/// of the alert timestamp, so implementations do not need their own
/// per-machine coordination beyond atomic single statements.
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Upsert the latest report for a machine.
    ///
    /// Overwrites the status columns of an existing row and must leave
    /// `last_alert_sent_at` untouched; creating a new row starts with no
    /// alert timestamp.
    async fn save_status(&self, report: &DriveReport) -> StorageResult<()>;

    /// Latest known status for one machine, if any report was ever ingested.
    async fn latest_for_machine(&self, machine: &str) -> StorageResult<Option<DriveStatus>>;

    /// Latest known status for every machine, ordered by machine identifier.
    async fn all_latest(&self) -> StorageResult<Vec<DriveStatus>>;

    /// When the last alert for this machine was dispatched, if ever.
    async fn last_alert_sent_at(&self, machine: &str) -> StorageResult<Option<DateTime<Utc>>>;

    /// Record a confirmed alert dispatch.
    ///
    /// Fails if no status row exists for the machine; the engine always
    /// persists the report first.
    async fn set_last_alert_sent_at(
        &self,
        machine: &str,
        sent_at: DateTime<Utc>,
    ) -> StorageResult<()>;

    /// Check backend health
    ///
    /// Performs a lightweight operation to verify the backend is
    /// operational (e.g., ping database, check file access).
    async fn health_check(&self) -> StorageResult<HealthStatus>;

    /// Close the backend and release resources
    async fn close(&self) -> StorageResult<()>;
}
