//! In-memory status store (no persistence)
//!
//! Stores the latest status per machine in a HashMap. Useful for:
//! - Testing without database dependencies
//! - Throwaway deployments where durability doesn't matter
//!
//! ## Limitations
//!
//! - **No persistence**: All state, including throttle timestamps, is
//!   lost on restart — every sustained problem re-alerts once after a
//!   process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::{DriveReport, DriveStatus};

use super::backend::{HealthStatus, StatusStore};
use super::error::{StorageError, StorageResult};

/// In-memory status store
#[derive(Debug, Default)]
pub struct MemoryStatusStore {
    statuses: RwLock<HashMap<String, DriveStatus>>,
}

impl MemoryStatusStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatusStore for MemoryStatusStore {
    async fn save_status(&self, report: &DriveReport) -> StorageResult<()> {
        let mut statuses = self.statuses.write().await;
        statuses
            .entry(report.machine.clone())
            .and_modify(|status| {
                // Overwrite the report columns only; the throttle state
                // survives report overwrites.
                status.reported_at = report.reported_at;
                status.c_drive_space_gb = report.c_drive_space_gb;
                status.d_drive_space_gb = report.d_drive_space_gb;
            })
            .or_insert_with(|| DriveStatus {
                machine: report.machine.clone(),
                reported_at: report.reported_at,
                c_drive_space_gb: report.c_drive_space_gb,
                d_drive_space_gb: report.d_drive_space_gb,
                last_alert_sent_at: None,
            });
        Ok(())
    }

    async fn latest_for_machine(&self, machine: &str) -> StorageResult<Option<DriveStatus>> {
        let statuses = self.statuses.read().await;
        Ok(statuses.get(machine).cloned())
    }

    async fn all_latest(&self) -> StorageResult<Vec<DriveStatus>> {
        let statuses = self.statuses.read().await;
        let mut all: Vec<_> = statuses.values().cloned().collect();
        // Match the SQLite backend's ordering
        all.sort_by(|a, b| a.machine.cmp(&b.machine));
        Ok(all)
    }

    async fn last_alert_sent_at(&self, machine: &str) -> StorageResult<Option<DateTime<Utc>>> {
        let statuses = self.statuses.read().await;
        Ok(statuses.get(machine).and_then(|s| s.last_alert_sent_at))
    }

    async fn set_last_alert_sent_at(
        &self,
        machine: &str,
        sent_at: DateTime<Utc>,
    ) -> StorageResult<()> {
        let mut statuses = self.statuses.write().await;
        match statuses.get_mut(machine) {
            Some(status) => {
                status.last_alert_sent_at = Some(sent_at);
                Ok(())
            }
            None => Err(StorageError::QueryFailed(format!(
                "no status row for machine {machine}"
            ))),
        }
    }

    async fn health_check(&self) -> StorageResult<HealthStatus> {
        let statuses = self.statuses.read().await;
        Ok(HealthStatus {
            healthy: true,
            message: "In-memory status store operational".to_string(),
            metadata: HashMap::from([
                ("backend".to_string(), "memory".to_string()),
                ("machines".to_string(), statuses.len().to_string()),
            ]),
        })
    }

    async fn close(&self) -> StorageResult<()> {
        debug!("closing in-memory store (no-op)");
        Ok(())
    }
}
