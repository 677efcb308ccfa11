//! Alert throttling
//!
//! Decides whether a notification for a given classification is permitted
//! now, based on when the last alert for that machine actually went out.
//! The reminder interval is selected by the classification of the
//! *current* report, not by which interval was applied last: a machine
//! that worsens from warning to critical is re-evaluated against the
//! shorter critical interval immediately, so a worsening condition is
//! never throttled more conservatively than a merely sustained one.
//!
//! Healthy reports never send and never touch the last-alert timestamp;
//! a later degradation is throttled against the most recent real alert.

use chrono::{DateTime, Duration, Utc};

use crate::policy::Classification;

#[derive(Debug, Clone, Copy)]
pub struct AlertThrottle {
    /// Minimum gap between two critical alerts for the same machine.
    hard_reminder: Duration,

    /// Minimum gap between two warning alerts for the same machine.
    soft_reminder: Duration,
}

impl AlertThrottle {
    pub fn new(hard_reminder: Duration, soft_reminder: Duration) -> Self {
        Self {
            hard_reminder,
            soft_reminder,
        }
    }

    pub fn from_millis(hard_reminder_ms: u64, soft_reminder_ms: u64) -> Self {
        Self::new(
            Duration::milliseconds(hard_reminder_ms as i64),
            Duration::milliseconds(soft_reminder_ms as i64),
        )
    }

    /// Is a notification for `classification` permitted at `now`?
    ///
    /// A machine with no recorded alert always passes (first real problem
    /// notifies immediately). Recording the send is the caller's job and
    /// must happen only on confirmed delivery.
    pub fn should_send(
        &self,
        classification: Classification,
        last_alert_sent_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> bool {
        let reminder = match classification {
            Classification::Healthy => return false,
            Classification::Critical => self.hard_reminder,
            Classification::Warning => self.soft_reminder,
        };

        match last_alert_sent_at {
            None => true,
            Some(sent_at) => now - sent_at > reminder,
        }
    }
}

impl Default for AlertThrottle {
    fn default() -> Self {
        Self::new(Duration::hours(1), Duration::hours(24))
    }
}
