//! Configuration Module
//!
//! Handles loading and managing service configuration from environment
//! variables. Core cache parameters (shard count, threshold, low watermark)
//! are validated at cache construction, not here.

use std::env;
use std::path::PathBuf;

use crate::cache::CacheConfig;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Number of cache shards
    pub shard_count: usize,
    /// Per-shard entry count that triggers eviction
    pub shard_threshold: usize,
    /// Per-shard size an eviction pass drains down to
    pub low_watermark: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Interval in seconds between periodic snapshot dumps (0 disables)
    pub snapshot_interval: u64,
    /// Directory snapshot dumps are written to
    pub snapshot_dir: PathBuf,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SHARD_COUNT` - Number of cache shards (default: 8)
    /// - `SHARD_THRESHOLD` - Per-shard eviction trigger size (default: 1024)
    /// - `LOW_WATERMARK` - Per-shard eviction target size (default: 512)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SNAPSHOT_INTERVAL` - Snapshot frequency in seconds, 0 disables (default: 300)
    /// - `SNAPSHOT_DIR` - Snapshot output directory (default: "snapshots")
    pub fn from_env() -> Self {
        Self {
            shard_count: env::var("SHARD_COUNT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8),
            shard_threshold: env::var("SHARD_THRESHOLD")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1024),
            low_watermark: env::var("LOW_WATERMARK")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(512),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            snapshot_interval: env::var("SNAPSHOT_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
            snapshot_dir: env::var("SNAPSHOT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("snapshots")),
        }
    }

    /// Returns the cache core parameters for construction.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            shard_count: self.shard_count,
            threshold: self.shard_threshold,
            low_watermark: self.low_watermark,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shard_count: 8,
            shard_threshold: 1024,
            low_watermark: 512,
            server_port: 3000,
            snapshot_interval: 300,
            snapshot_dir: PathBuf::from("snapshots"),
        }
    }
}
