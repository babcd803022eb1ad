//! Cache Module
//!
//! The sharded, capacity-bounded, recency-ordered cache core: shard routing,
//! per-shard stores with LRU recency tracking, asynchronous batch eviction,
//! and the binary snapshot encoding.

mod encoding;
mod recency;
mod shard;
mod stats;
mod store;


// Re-export public types
pub use encoding::{read_entries, write_entries, CacheKey, CacheValue, DumpReport};
pub use recency::{NodeHandle, RecencyList};
pub use shard::Shard;
pub use stats::CacheStats;
pub use store::{CacheConfig, ShardedCache};
