pub mod api;
pub mod config;
pub mod engine;
pub mod notify;
pub mod policy;
pub mod report;
pub mod storage;
pub mod throttle;
pub mod util;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One normalized drive-space report from a fleet machine.
///
/// This is the canonical shape everything past the HTTP boundary works
/// with; casing variants between report producers are resolved before a
/// `DriveReport` is ever constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveReport {
    pub machine: String,
    /// Client-supplied, not necessarily monotonic.
    pub reported_at: DateTime<Utc>,
    pub c_drive_space_gb: f64,
    pub d_drive_space_gb: f64,
}

impl DriveReport {
    /// Smallest free space across both drives.
    ///
    /// NaN on either drive propagates, so classification treats such a
    /// report as critical instead of silently picking the other drive.
    pub fn min_space_gb(&self) -> f64 {
        min_space(self.c_drive_space_gb, self.d_drive_space_gb)
    }
}

/// Latest persisted state for one machine.
///
/// At most one `DriveStatus` exists per machine and it always reflects
/// the most recently ingested report, regardless of the report's own
/// timestamp ordering. `last_alert_sent_at` is updated only when a
/// notification was actually dispatched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveStatus {
    pub machine: String,
    pub reported_at: DateTime<Utc>,
    pub c_drive_space_gb: f64,
    pub d_drive_space_gb: f64,
    pub last_alert_sent_at: Option<DateTime<Utc>>,
}

impl DriveStatus {
    pub fn min_space_gb(&self) -> f64 {
        min_space(self.c_drive_space_gb, self.d_drive_space_gb)
    }
}

fn min_space(c: f64, d: f64) -> f64 {
    if c.is_nan() || d.is_nan() { f64::NAN } else { c.min(d) }
}
