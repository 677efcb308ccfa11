//! SQLite status store implementation
//!
//! This module provides a SQLite-based implementation of the
//! `StatusStore` trait.
//!
//! ## Features
//!
//! - **Embedded**: No separate database server required
//! - **WAL mode**: Better concurrency for reads during writes
//! - **Connection pooling**: Efficient resource usage
//! - **Migrations**: Automatic schema versioning with sqlx
//!
//! The table holds one row per machine, keyed by the machine identifier.
//! Timestamps are stored as unix milliseconds.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow, SqliteSynchronous,
};
use sqlx::{Pool, Row, Sqlite};
use tracing::{debug, info, instrument, warn};

use crate::{DriveReport, DriveStatus};

use super::backend::{HealthStatus, StatusStore};
use super::error::{StorageError, StorageResult};

/// SQLite status store
///
/// Persists the latest status per machine in a local SQLite database
/// file. One fleet, one file.
pub struct SqliteStatusStore {
    pool: Pool<Sqlite>,
    db_path: String,
}

impl SqliteStatusStore {
    /// Create a new SQLite status store
    ///
    /// This will:
    /// 1. Create the database file if it doesn't exist
    /// 2. Run migrations to create the `machine_status` table
    /// 3. Configure SQLite for optimal performance (WAL mode, etc.)
    #[instrument(skip_all)]
    pub async fn new(db_path: impl AsRef<Path>) -> StorageResult<Self> {
        let db_path_str = db_path.as_ref().to_string_lossy().to_string();

        info!("initializing SQLite status store at: {}", db_path_str);

        let options = SqliteConnectOptions::new()
            .filename(&db_path_str)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| StorageError::ConnectionFailed(e.to_string()))?;

        debug!("running database migrations");
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StorageError::MigrationFailed(e.to_string()))?;

        info!("database migrations complete");

        Ok(Self {
            pool,
            db_path: db_path_str,
        })
    }

    fn timestamp_to_millis(dt: &DateTime<Utc>) -> i64 {
        dt.timestamp_millis()
    }

    fn millis_to_timestamp(millis: i64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(millis).unwrap_or_else(Utc::now)
    }

    fn row_to_status(row: &SqliteRow) -> DriveStatus {
        DriveStatus {
            machine: row.get("machine"),
            reported_at: Self::millis_to_timestamp(row.get("reported_at")),
            c_drive_space_gb: row.get("c_drive_space_gb"),
            d_drive_space_gb: row.get("d_drive_space_gb"),
            last_alert_sent_at: row
                .get::<Option<i64>, _>("last_alert_sent_at")
                .map(Self::millis_to_timestamp),
        }
    }
}

#[async_trait]
impl StatusStore for SqliteStatusStore {
    #[instrument(skip(self, report), fields(machine = %report.machine))]
    async fn save_status(&self, report: &DriveReport) -> StorageResult<()> {
        // Upsert keyed by machine. last_alert_sent_at is deliberately not
        // listed: a report overwrite must never reset the throttle state.
        sqlx::query(
            r#"
            INSERT INTO machine_status (machine, reported_at, c_drive_space_gb, d_drive_space_gb)
            VALUES (?, ?, ?, ?)
            ON CONFLICT (machine) DO UPDATE SET
                reported_at = excluded.reported_at,
                c_drive_space_gb = excluded.c_drive_space_gb,
                d_drive_space_gb = excluded.d_drive_space_gb
            "#,
        )
        .bind(&report.machine)
        .bind(Self::timestamp_to_millis(&report.reported_at))
        .bind(report.c_drive_space_gb)
        .bind(report.d_drive_space_gb)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        debug!("status saved");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn latest_for_machine(&self, machine: &str) -> StorageResult<Option<DriveStatus>> {
        let row = sqlx::query(
            r#"
            SELECT machine, reported_at, c_drive_space_gb, d_drive_space_gb, last_alert_sent_at
            FROM machine_status
            WHERE machine = ?
            "#,
        )
        .bind(machine)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        Ok(row.as_ref().map(Self::row_to_status))
    }

    #[instrument(skip(self))]
    async fn all_latest(&self) -> StorageResult<Vec<DriveStatus>> {
        let rows = sqlx::query(
            r#"
            SELECT machine, reported_at, c_drive_space_gb, d_drive_space_gb, last_alert_sent_at
            FROM machine_status
            ORDER BY machine ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        let statuses = rows.iter().map(Self::row_to_status).collect::<Vec<_>>();
        debug!("query returned {} statuses", statuses.len());
        Ok(statuses)
    }

    #[instrument(skip(self))]
    async fn last_alert_sent_at(&self, machine: &str) -> StorageResult<Option<DateTime<Utc>>> {
        let row: Option<(Option<i64>,)> =
            sqlx::query_as("SELECT last_alert_sent_at FROM machine_status WHERE machine = ?")
                .bind(machine)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        Ok(row
            .and_then(|(millis,)| millis)
            .map(Self::millis_to_timestamp))
    }

    #[instrument(skip(self), fields(sent_at = %sent_at))]
    async fn set_last_alert_sent_at(
        &self,
        machine: &str,
        sent_at: DateTime<Utc>,
    ) -> StorageResult<()> {
        let result = sqlx::query("UPDATE machine_status SET last_alert_sent_at = ? WHERE machine = ?")
            .bind(Self::timestamp_to_millis(&sent_at))
            .bind(machine)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::QueryFailed(format!(
                "no status row for machine {machine}"
            )));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> StorageResult<HealthStatus> {
        // Simple ping query to verify connection
        match sqlx::query("SELECT 1").fetch_one(&self.pool).await {
            Ok(_) => {
                let mut metadata = HashMap::new();
                metadata.insert("backend".to_string(), "sqlite".to_string());
                metadata.insert("db_path".to_string(), self.db_path.clone());

                Ok(HealthStatus {
                    healthy: true,
                    message: "SQLite status store operational".to_string(),
                    metadata,
                })
            }
            Err(e) => {
                warn!("health check failed: {}", e);
                Ok(HealthStatus {
                    healthy: false,
                    message: format!("health check failed: {}", e),
                    metadata: HashMap::new(),
                })
            }
        }
    }

    async fn close(&self) -> StorageResult<()> {
        info!("closing SQLite status store");
        self.pool.close().await;
        Ok(())
    }
}
