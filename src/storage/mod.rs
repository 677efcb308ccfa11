//! Storage backends for machine status persistence
//!
//! This module provides a trait-based abstraction for persisting the
//! latest drive status per machine, including the per-machine
//! last-alert timestamp the throttle depends on.
//!
//! ## Design
//!
//! - **Trait-based**: `StatusStore` allows swapping implementations
//! - **Async**: All operations are async for compatibility with Tokio
//! - **One row per machine**: `save_status` is an upsert keyed by the
//!   machine identifier; history is not retained
//!
//! ## Backends
//!
//! - **SQLite** (default): Embedded database, good for small fleets
//! - **In-Memory**: No persistence, for testing or throwaway setups

pub mod backend;
pub mod error;
pub mod memory;
pub mod sqlite;

pub use backend::{HealthStatus, StatusStore};
pub use error::{StorageError, StorageResult};
pub use memory::MemoryStatusStore;
pub use sqlite::SqliteStatusStore;
