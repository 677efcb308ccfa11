use std::path::PathBuf;

use tracing::trace;

/// Storage backend configuration
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum StorageConfig {
    /// In-memory storage (no persistence)
    Memory,

    /// SQLite database (default for most deployments)
    Sqlite {
        /// Path to the SQLite database file
        #[serde(default = "default_sqlite_path")]
        path: PathBuf,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Sqlite {
            path: default_sqlite_path(),
        }
    }
}

fn default_sqlite_path() -> PathBuf {
    PathBuf::from("./data/status.db")
}

/// Free-space thresholds in gigabytes. `soft_gb` must exceed `hard_gb`;
/// validated at load time, the engine does not re-check.
#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub struct Thresholds {
    #[serde(default = "default_soft_threshold_gb")]
    pub soft_gb: f64,

    #[serde(default = "default_hard_threshold_gb")]
    pub hard_gb: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            soft_gb: default_soft_threshold_gb(),
            hard_gb: default_hard_threshold_gb(),
        }
    }
}

fn default_soft_threshold_gb() -> f64 {
    50.0
}

fn default_hard_threshold_gb() -> f64 {
    20.0
}

/// Reminder intervals between repeated alerts for the same machine.
#[derive(Debug, Clone, Copy, serde::Deserialize)]
pub struct Reminders {
    /// Minimum gap between critical alerts (default: 1 hour)
    #[serde(default = "default_hard_reminder_ms")]
    pub hard_interval_ms: u64,

    /// Minimum gap between warning alerts (default: 24 hours)
    #[serde(default = "default_soft_reminder_ms")]
    pub soft_interval_ms: u64,
}

impl Default for Reminders {
    fn default() -> Self {
        Self {
            hard_interval_ms: default_hard_reminder_ms(),
            soft_interval_ms: default_soft_reminder_ms(),
        }
    }
}

fn default_hard_reminder_ms() -> u64 {
    3_600_000
}

fn default_soft_reminder_ms() -> u64 {
    86_400_000
}

/// SMTP relay settings. Credentials are read from the environment
/// (`SMTP_USER`/`SMTP_PASSWORD`), not from the config file.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct SmtpConfig {
    pub host: String,

    #[serde(default = "default_smtp_port")]
    pub port: u16,

    /// RFC 5322 sender address
    pub from: String,
}

fn default_smtp_port() -> u16 {
    587
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub thresholds: Thresholds,

    #[serde(default)]
    pub reminders: Reminders,

    /// Fixed interval between daily summary mails, measured from process
    /// start (default: 24 hours)
    #[serde(default = "default_daily_report_interval_secs")]
    pub daily_report_interval_secs: u64,

    /// Alert and summary recipients
    pub recipients: Vec<String>,

    pub smtp: SmtpConfig,

    /// Storage configuration (optional - defaults to SQLite)
    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_port() -> u16 {
    3004
}

fn default_daily_report_interval_secs() -> u64 {
    86_400
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(self.thresholds.soft_gb > self.thresholds.hard_gb) {
            anyhow::bail!(
                "soft threshold ({} GB) must be greater than hard threshold ({} GB)",
                self.thresholds.soft_gb,
                self.thresholds.hard_gb
            );
        }

        if self.recipients.is_empty() {
            anyhow::bail!("at least one recipient must be configured");
        }

        Ok(())
    }
}

pub fn read_config_file(path: &str) -> anyhow::Result<Config> {
    let file_content = std::fs::read_to_string(path)?;
    let config: Config = serde_json::from_str(&file_content)
        .map_err(|_| anyhow::anyhow!("Invalid configuration file provided!"))?;
    config.validate()?;
    trace!("loaded config: {config:?}");
    Ok(config)
}
