//! Shard Module
//!
//! One independently-locked partition of the key space: a key-to-entry map,
//! a recency list, a capacity threshold, and an eviction trigger.
//!
//! All mutating operations take the shard's mutex for a bounded O(1) critical
//! section. Reaching the threshold never evicts on the caller's path; `put`
//! releases the lock and then fires a saturating signal, and the eviction
//! worker re-acquires the lock only for its bounded batch-delete pass.

use std::collections::HashMap;
use std::hash::Hash;

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::cache::recency::{NodeHandle, RecencyList};
use crate::cache::stats::CacheStats;

// == Cache Entry ==
/// A live entry, owned exclusively by its shard.
///
/// `handle` is the back-reference into the shard's recency list; there is
/// exactly one list node per entry.
#[derive(Debug)]
struct Entry<V> {
    value: V,
    handle: NodeHandle,
}

// == Shard Interior ==
/// State guarded by the shard mutex.
#[derive(Debug)]
struct ShardInner<K, V> {
    store: HashMap<K, Entry<V>>,
    recency: RecencyList<K>,
    stats: CacheStats,
}

impl<K, V> ShardInner<K, V> {
    /// Map and recency list must describe the same set of live keys.
    fn check_invariants(&self) {
        debug_assert_eq!(
            self.store.len(),
            self.recency.len(),
            "store and recency list diverged"
        );
    }
}

// == Shard ==
/// The authoritative store for one partition of keys, bounded asynchronously.
#[derive(Debug)]
pub struct Shard<K, V> {
    inner: Mutex<ShardInner<K, V>>,
    threshold: usize,
    low_watermark: usize,
    evict_signal: Notify,
}

impl<K, V> Shard<K, V>
where
    K: Clone + Eq + Hash,
    V: Clone,
{
    // == Constructor ==
    /// Creates an empty shard.
    ///
    /// Callers validate `low_watermark < threshold` before construction; the
    /// cache's config check is the single gate for that.
    pub fn new(threshold: usize, low_watermark: usize) -> Self {
        Self {
            inner: Mutex::new(ShardInner {
                store: HashMap::with_capacity(threshold),
                recency: RecencyList::with_capacity(threshold),
                stats: CacheStats::new(),
            }),
            threshold,
            low_watermark,
            evict_signal: Notify::new(),
        }
    }

    // == Put ==
    /// Stores a key-value pair.
    ///
    /// An existing key is overwritten and promoted (an update counts as an
    /// access); a new key gets a fresh recency node at the tail. If the shard
    /// has reached its threshold after the mutation, eviction is requested via
    /// a saturating signal once the lock is released. Nothing is evicted
    /// synchronously.
    pub fn put(&self, key: K, value: V) {
        let needs_eviction = {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;
            match inner.store.get_mut(&key) {
                Some(entry) => {
                    entry.value = value;
                    if let Some(handle) = inner.recency.move_to_back(entry.handle) {
                        entry.handle = handle;
                    }
                }
                None => {
                    let handle = inner.recency.push_back(key.clone());
                    inner.store.insert(key, Entry { value, handle });
                }
            }
            inner.check_invariants();
            inner.store.len() >= self.threshold
        };

        // Signal outside the lock; Notify holds at most one pending permit,
        // so a burst of puts cannot pile up wakeups or block the caller.
        if needs_eviction {
            self.evict_signal.notify_one();
        }
    }

    // == Get ==
    /// Retrieves a value by key, treating the read as an access.
    ///
    /// A hit promotes the entry to most recently used and returns a clone of
    /// the value; a miss has no side effect beyond the stats counter.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        match inner.store.get_mut(key) {
            Some(entry) => {
                if let Some(handle) = inner.recency.move_to_back(entry.handle) {
                    entry.handle = handle;
                }
                inner.stats.record_hit();
                Some(entry.value.clone())
            }
            None => {
                inner.stats.record_miss();
                None
            }
        }
    }

    // == Remove ==
    /// Deletes an entry and its recency node.
    ///
    /// Returns whether the key was present. Removing an absent key is a
    /// normal negative result, not an error.
    pub fn remove(&self, key: &K) -> bool {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        match inner.store.remove(key) {
            Some(entry) => {
                let removed = inner.recency.remove(entry.handle);
                debug_assert!(removed.is_some(), "entry had no live recency node");
                inner.check_invariants();
                true
            }
            None => false,
        }
    }

    // == Snapshot ==
    /// Returns a copy of all live entries.
    ///
    /// Recency order is untouched; the lock is held only for the copy.
    pub fn snapshot(&self) -> Vec<(K, V)> {
        let guard = self.inner.lock();
        guard
            .store
            .iter()
            .map(|(key, entry)| (key.clone(), entry.value.clone()))
            .collect()
    }

    // == Eviction ==
    /// Batch-deletes least-recently-used entries down to the low watermark.
    ///
    /// A single bounded pass under the shard lock; spurious invocations when
    /// already at or below the watermark delete nothing. Returns the number
    /// of evicted entries.
    pub fn evict_to_watermark(&self) -> usize {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;
        let mut evicted = 0;

        while inner.store.len() > self.low_watermark {
            let Some((key, handle)) = inner.recency.pop_front() else {
                break;
            };
            let entry = inner.store.remove(&key);
            debug_assert!(
                entry.map_or(false, |e| e.handle == handle),
                "recency front did not match its map entry"
            );
            inner.stats.record_eviction();
            evicted += 1;
        }

        inner.check_invariants();
        evicted
    }

    /// Resolves when eviction has been requested since the last wakeup.
    pub(crate) async fn eviction_requested(&self) {
        self.evict_signal.notified().await;
    }

    // == Length ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.inner.lock().store.len()
    }

    /// Returns true if the shard holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Stats ==
    /// Returns a copy of this shard's statistics.
    pub fn stats(&self) -> CacheStats {
        let guard = self.inner.lock();
        let mut stats = guard.stats.clone();
        stats.set_total_entries(guard.store.len());
        stats
    }

    /// Keys from least to most recently used (test helper).
    #[cfg(test)]
    pub fn recency_order(&self) -> Vec<K> {
        self.inner.lock().recency.iter().cloned().collect()
    }
}
