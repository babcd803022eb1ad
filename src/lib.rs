//! Catalog Cache - A product-catalog cache service
//!
//! Provides a sharded, capacity-bounded LRU cache with asynchronous batch
//! eviction and binary snapshot export, behind a small HTTP API.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_snapshot_task;
