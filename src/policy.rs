//! Threshold classification for drive-space reports
//!
//! Pure mapping from remaining free space to a severity bucket. Two
//! thresholds are configured, `soft_gb > hard_gb`:
//!
//! ```text
//! min_space <  hard_gb             → Critical
//! hard_gb   <= min_space < soft_gb → Warning
//! soft_gb   <= min_space           → Healthy
//! ```
//!
//! NaN or negative input classifies as critical, so a confused agent
//! raises an alert rather than being silently treated as fine.

use serde::{Deserialize, Serialize};

/// Severity bucket derived from current free space. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Healthy,
    Warning,
    Critical,
}

/// Classify the minimum free space of a machine against the configured
/// thresholds. Total over all f64 inputs, no side effects.
pub fn classify(min_space_gb: f64, hard_threshold_gb: f64, soft_threshold_gb: f64) -> Classification {
    // NaN compares false against everything; it must land in the most
    // severe bucket, not the least.
    if min_space_gb.is_nan() || min_space_gb < hard_threshold_gb {
        Classification::Critical
    } else if min_space_gb < soft_threshold_gb {
        Classification::Warning
    } else {
        Classification::Healthy
    }
}
