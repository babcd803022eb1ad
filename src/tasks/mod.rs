//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Snapshot: exports the cache to a binary dump file at configured intervals
//!
//! Per-shard eviction workers are owned by the cache itself and are not
//! listed here.

mod snapshot;

pub use snapshot::{spawn_snapshot_task, write_snapshot_file};
