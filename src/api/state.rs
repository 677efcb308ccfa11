//! API shared state

use std::sync::Arc;

use crate::config::Thresholds;
use crate::engine::StatusIngestEngine;
use crate::storage::StatusStore;

/// Shared state passed to all API handlers
#[derive(Clone)]
pub struct ApiState {
    /// Ingest engine driving persistence, classification, and alerting
    pub engine: Arc<StatusIngestEngine>,

    /// Store handle for read-only endpoints
    pub store: Arc<dyn StatusStore>,

    /// Thresholds used for report rendering
    pub thresholds: Thresholds,
}

impl ApiState {
    pub fn new(
        engine: Arc<StatusIngestEngine>,
        store: Arc<dyn StatusStore>,
        thresholds: Thresholds,
    ) -> Self {
        Self {
            engine,
            store,
            thresholds,
        }
    }
}
