//! Notification dispatch
//!
//! The `Notifier` trait is the engine's only view of the mail transport.
//! All operations return a `Result` so the engine can distinguish a
//! confirmed delivery (record the throttle timestamp) from a failed one
//! (leave it untouched so the next report re-attempts).

pub mod email;

use std::fmt;

use async_trait::async_trait;

use crate::{DriveReport, DriveStatus};

pub use email::SmtpNotifier;

/// Result type alias for notification operations
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Errors that can occur while dispatching a notification
#[derive(Debug)]
pub enum NotifyError {
    /// SMTP transport-level failure (connection, authentication, rejection)
    Transport(lettre::transport::smtp::Error),

    /// A sender or recipient address could not be parsed
    Address(lettre::address::AddressError),

    /// The message could not be assembled
    Build(String),
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyError::Transport(err) => write!(f, "SMTP transport error: {}", err),
            NotifyError::Address(err) => write!(f, "mail address parse error: {}", err),
            NotifyError::Build(msg) => write!(f, "failed to build mail: {}", msg),
        }
    }
}

impl std::error::Error for NotifyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NotifyError::Transport(err) => Some(err),
            NotifyError::Address(err) => Some(err),
            NotifyError::Build(_) => None,
        }
    }
}

impl From<lettre::transport::smtp::Error> for NotifyError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        NotifyError::Transport(err)
    }
}

impl From<lettre::address::AddressError> for NotifyError {
    fn from(err: lettre::address::AddressError) -> Self {
        NotifyError::Address(err)
    }
}

/// Trait for sending fleet notifications to the configured recipients
///
/// Implementations must be `Send + Sync` as they are shared across
/// concurrent ingest operations. A returned `Ok(())` means the transport
/// confirmed acceptance of the message.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Free space dropped below the soft threshold.
    async fn send_warning(&self, machine: &str, report: &DriveReport) -> NotifyResult<()>;

    /// Free space dropped below the hard threshold.
    async fn send_critical(&self, machine: &str, report: &DriveReport) -> NotifyResult<()>;

    /// Unthrottled fleet-wide summary, one line per machine.
    async fn send_daily_summary(&self, statuses: &[DriveStatus]) -> NotifyResult<()>;
}
