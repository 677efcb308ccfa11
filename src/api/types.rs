//! Wire types for the HTTP boundary

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::DriveReport;

/// Inbound status report as produced by the fleet agents.
///
/// Two casing conventions exist among report producers; both are
/// accepted here via serde aliases and normalized into the canonical
/// [`DriveReport`] before anything else sees the data. Nothing past
/// this type branches on field spellings.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusReportBody {
    pub machine: String,

    /// ISO-8601, client-supplied
    #[serde(alias = "reportedAt", alias = "reported_at")]
    pub timestamp: DateTime<Utc>,

    #[serde(alias = "cDriveSpaceGb", alias = "cDriveSpace")]
    pub c_drive_space_gb: f64,

    #[serde(alias = "dDriveSpaceGb", alias = "dDriveSpace")]
    pub d_drive_space_gb: f64,
}

impl StatusReportBody {
    pub fn into_report(self) -> DriveReport {
        DriveReport {
            machine: self.machine,
            reported_at: self.timestamp,
            c_drive_space_gb: self.c_drive_space_gb,
            d_drive_space_gb: self.d_drive_space_gb,
        }
    }
}
