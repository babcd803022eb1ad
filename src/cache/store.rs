//! Sharded Cache Module
//!
//! The shard router: owns a fixed array of shards, maps every key to exactly
//! one of them, and runs one background eviction worker per shard.
//!
//! Routing hashes the key's canonical byte encoding with 64-bit FNV-1a and
//! reduces the full hash modulo the shard count, so placement is independent
//! of the key's in-memory representation and stable for the cache's lifetime.

use std::io::Write;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::cache::encoding::{write_entries, CacheKey, CacheValue, DumpReport};
use crate::cache::shard::Shard;
use crate::cache::stats::CacheStats;
use crate::error::{ConfigError, SnapshotError};

// == Cache Configuration ==
/// The construction parameters of the cache core.
#[derive(Debug, Clone, Copy)]
pub struct CacheConfig {
    /// Number of independent shards, fixed for the cache lifetime
    pub shard_count: usize,
    /// Per-shard entry count at which eviction is requested
    pub threshold: usize,
    /// Per-shard size an eviction pass drains down to
    pub low_watermark: usize,
}

impl CacheConfig {
    /// Validates the configuration; all violations are fatal.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.shard_count == 0 {
            return Err(ConfigError::ZeroShardCount);
        }
        if self.threshold == 0 {
            return Err(ConfigError::ZeroThreshold);
        }
        if self.low_watermark >= self.threshold {
            return Err(ConfigError::WatermarkNotBelowThreshold {
                low_watermark: self.low_watermark,
                threshold: self.threshold,
            });
        }
        Ok(())
    }
}

// == FNV-1a Hash ==
const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a over a byte slice; the full width feeds the shard reduction.
fn fnv1a_64(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

// == Sharded Cache ==
/// A sharded, capacity-bounded, recency-ordered cache with asynchronous
/// batch eviction.
///
/// Each shard has its own lock and its own eviction worker; operations on
/// keys that route to different shards proceed fully in parallel. Workers are
/// spawned at construction (a tokio runtime must be current) and live until
/// the cache is dropped.
#[derive(Debug)]
pub struct ShardedCache<K, V> {
    shards: Vec<Arc<Shard<K, V>>>,
    workers: Vec<JoinHandle<()>>,
}

impl<K, V> ShardedCache<K, V>
where
    K: CacheKey,
    V: CacheValue,
{
    // == Constructor ==
    /// Creates the cache and starts one eviction worker per shard.
    ///
    /// Fails fast on invalid configuration; no instance (and no worker) is
    /// created in that case.
    pub fn new(config: CacheConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;

        let shards: Vec<Arc<Shard<K, V>>> = (0..config.shard_count)
            .map(|_| Arc::new(Shard::new(config.threshold, config.low_watermark)))
            .collect();

        let workers = shards
            .iter()
            .enumerate()
            .map(|(index, shard)| spawn_eviction_worker(Arc::clone(shard), index))
            .collect();

        Ok(Self { shards, workers })
    }

    // == Routing ==
    /// Maps a key to its shard index, deterministic for the cache lifetime.
    pub fn shard_index(&self, key: &K) -> usize {
        let hash = fnv1a_64(&key.canonical_bytes());
        (hash % self.shards.len() as u64) as usize
    }

    fn shard(&self, key: &K) -> &Shard<K, V> {
        &self.shards[self.shard_index(key)]
    }

    // == Delegated Operations ==
    /// Stores a key-value pair in the routed shard.
    pub fn put(&self, key: K, value: V) {
        let shard = &self.shards[self.shard_index(&key)];
        shard.put(key, value);
    }

    /// Retrieves a value, promoting the entry's recency on a hit.
    pub fn get(&self, key: &K) -> Option<V> {
        self.shard(key).get(key)
    }

    /// Removes a key; returns whether it was present.
    pub fn remove(&self, key: &K) -> bool {
        self.shard(key).remove(key)
    }

    /// Returns the number of live entries across all shards.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.len()).sum()
    }

    /// Returns true if no shard holds an entry.
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.is_empty())
    }

    /// Returns the fixed number of shards.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    // == Stats ==
    /// Merges all shard statistics into one cache-wide view.
    pub fn stats(&self) -> CacheStats {
        let mut total = CacheStats::new();
        for shard in &self.shards {
            total.merge(&shard.stats());
        }
        total
    }

    // == Snapshots ==
    /// Copies all live entries, shard by shard.
    ///
    /// Each shard is locked only for the duration of its own copy, so the
    /// combined view is not a single atomic point-in-time snapshot; entries
    /// may be mutated in shards not yet visited. Shard order is stable but
    /// arbitrary (not sorted by key).
    pub fn snapshot_all(&self) -> Vec<(K, V)> {
        let mut entries = Vec::new();
        for shard in &self.shards {
            entries.extend(shard.snapshot());
        }
        entries
    }

    /// Streams the whole cache to `sink` in the binary snapshot format.
    ///
    /// Shard dumps are concatenated in shard order. Entries whose value fails
    /// to encode are skipped and counted in the report; a sink failure aborts
    /// the export with the error.
    pub fn dump<W: Write>(&self, sink: &mut W) -> std::result::Result<DumpReport, SnapshotError> {
        let mut report = DumpReport::default();
        for shard in &self.shards {
            // Copy under the shard lock, encode and write outside it.
            let entries = shard.snapshot();
            report.merge(&write_entries(sink, &entries)?);
        }
        Ok(report)
    }
}

impl<K, V> Drop for ShardedCache<K, V> {
    fn drop(&mut self) {
        for worker in &self.workers {
            worker.abort();
        }
    }
}

// == Eviction Worker ==
/// Background task for one shard: waits for a trigger, then runs one bounded
/// batch-delete pass under the shard lock. Spurious wakeups delete nothing.
fn spawn_eviction_worker<K, V>(shard: Arc<Shard<K, V>>, index: usize) -> JoinHandle<()>
where
    K: CacheKey,
    V: CacheValue,
{
    tokio::spawn(async move {
        loop {
            shard.eviction_requested().await;
            let evicted = shard.evict_to_watermark();
            if evicted > 0 {
                debug!(shard = index, evicted, "eviction pass completed");
            }
        }
    })
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::time::{Duration, Instant};

    fn config(shards: usize, threshold: usize, low_watermark: usize) -> CacheConfig {
        CacheConfig {
            shard_count: shards,
            threshold,
            low_watermark,
        }
    }

    /// Polls until the cache settles at or below `target` entries.
    async fn wait_for_drain(cache: &ShardedCache<u64, String>, target: usize) {
        let deadline = Instant::now() + Duration::from_secs(2);
        while cache.len() > target {
            assert!(
                Instant::now() < deadline,
                "eviction worker never drained the shard"
            );
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    #[test]
    fn test_config_rejects_zero_shards() {
        assert_eq!(
            config(0, 4, 2).validate(),
            Err(ConfigError::ZeroShardCount)
        );
    }

    #[test]
    fn test_config_rejects_zero_threshold() {
        assert_eq!(config(4, 0, 0).validate(), Err(ConfigError::ZeroThreshold));
    }

    #[test]
    fn test_config_rejects_watermark_at_or_above_threshold() {
        assert!(matches!(
            config(4, 4, 4).validate(),
            Err(ConfigError::WatermarkNotBelowThreshold { .. })
        ));
        assert!(matches!(
            config(4, 4, 8).validate(),
            Err(ConfigError::WatermarkNotBelowThreshold { .. })
        ));
    }

    #[test]
    fn test_fnv1a_known_vectors() {
        // Published FNV-1a 64-bit test vectors.
        assert_eq!(fnv1a_64(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a_64(b"a"), 0xaf63_dc4c_8601_ec8c);
        assert_eq!(fnv1a_64(b"foobar"), 0x8594_4171_f739_67e8);
    }

    #[tokio::test]
    async fn test_shard_routing_is_deterministic() {
        let cache: ShardedCache<u64, String> = ShardedCache::new(config(8, 16, 8)).unwrap();
        for key in 0..200u64 {
            let first = cache.shard_index(&key);
            assert!(first < cache.shard_count());
            for _ in 0..5 {
                assert_eq!(cache.shard_index(&key), first);
            }
        }
    }

    #[tokio::test]
    async fn test_shard_routing_spreads_keys() {
        let cache: ShardedCache<u64, String> = ShardedCache::new(config(8, 16, 8)).unwrap();
        let used: HashSet<usize> = (0..1000u64).map(|k| cache.shard_index(&k)).collect();
        // 1000 sequential keys over 8 shards must not collapse onto a few.
        assert_eq!(used.len(), 8, "shard distribution is badly skewed");
    }

    #[tokio::test]
    async fn test_put_get_remove_across_shards() {
        let cache: ShardedCache<u64, String> = ShardedCache::new(config(4, 64, 32)).unwrap();

        for key in 0..50u64 {
            cache.put(key, format!("value-{key}"));
        }
        assert_eq!(cache.len(), 50);

        for key in 0..50u64 {
            assert_eq!(cache.get(&key), Some(format!("value-{key}")));
        }

        assert!(cache.remove(&25));
        assert!(!cache.remove(&25));
        assert_eq!(cache.get(&25), None);
        assert_eq!(cache.len(), 49);
    }

    #[tokio::test]
    async fn test_worker_drains_shard_to_watermark() {
        let cache: ShardedCache<u64, String> = ShardedCache::new(config(1, 4, 2)).unwrap();

        cache.put(1, "a".to_string());
        cache.put(2, "b".to_string());
        cache.put(3, "c".to_string());
        cache.put(4, "d".to_string());

        wait_for_drain(&cache, 2).await;

        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.get(&3), Some("c".to_string()));
        assert_eq!(cache.get(&4), Some("d".to_string()));
    }

    #[tokio::test]
    async fn test_worker_spares_recently_accessed_key() {
        let cache: ShardedCache<u64, String> = ShardedCache::new(config(1, 4, 2)).unwrap();

        cache.put(1, "a".to_string());
        cache.get(&1);
        cache.put(2, "b".to_string());
        cache.put(3, "c".to_string());
        cache.put(4, "d".to_string());

        wait_for_drain(&cache, 2).await;

        // 1 was freshly accessed, so it survives in place of 2.
        assert_eq!(cache.get(&2), None);
        assert_eq!(cache.get(&3), Some("c".to_string()));
        assert_eq!(cache.get(&4), Some("d".to_string()));
    }

    #[tokio::test]
    async fn test_size_bound_under_sustained_puts() {
        let cache: ShardedCache<u64, String> = ShardedCache::new(config(2, 8, 4)).unwrap();

        for key in 0..500u64 {
            cache.put(key, "payload".to_string());
        }

        // After the workers settle, every shard is back at or below threshold.
        wait_for_drain(&cache, 2 * 8).await;
        assert!(cache.len() <= 2 * 8);
    }

    #[tokio::test]
    async fn test_snapshot_all_concatenates_shards() {
        let cache: ShardedCache<u64, String> = ShardedCache::new(config(4, 64, 32)).unwrap();
        for key in 0..20u64 {
            cache.put(key, format!("v{key}"));
        }

        let entries = cache.snapshot_all();
        assert_eq!(entries.len(), 20);
        let keys: HashSet<u64> = entries.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys, (0..20u64).collect());
    }

    #[tokio::test]
    async fn test_dump_roundtrip() {
        use crate::cache::encoding::read_entries;

        let cache: ShardedCache<u64, String> = ShardedCache::new(config(4, 64, 32)).unwrap();
        for key in 0..20u64 {
            cache.put(key, format!("v{key}"));
        }

        let mut sink = Vec::new();
        let report = cache.dump(&mut sink).unwrap();
        assert_eq!(report.entries_written, 20);
        assert_eq!(report.entries_skipped, 0);

        let decoded: Vec<(u64, String)> = read_entries(&sink).unwrap();
        let expected: HashSet<_> = cache.snapshot_all().into_iter().collect();
        let actual: HashSet<_> = decoded.into_iter().collect();
        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn test_stats_are_merged_across_shards() {
        let cache: ShardedCache<u64, String> = ShardedCache::new(config(4, 64, 32)).unwrap();
        cache.put(1, "a".to_string());
        cache.put(2, "b".to_string());

        cache.get(&1);
        cache.get(&2);
        cache.get(&3);

        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 2);
    }
}
