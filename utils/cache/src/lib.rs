//! Bounded cache of asynchronously resolved values keyed by identity.
//!
//! Each entry records whether the resolution that produced it failed. Writes
//! go through [`ResolutionCache::promote`], which enforces the promotion
//! policy: a success may replace anything, while an error may only fill an
//! empty slot or replace another error. Completions for one key can therefore
//! be replayed in any arrival order and converge to the same entry — the best
//! success seen so far, or the latest error if no success has ever been seen.

use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;

use lru::LruCache;

/// Live-entry bound used by [`ResolutionCache::default`].
pub const DEFAULT_CAPACITY: usize = 32;

/// A resolved value together with the outcome of the resolution that
/// produced it.
#[derive(Debug)]
pub struct CacheEntry<V> {
    pub value: Arc<V>,
    pub is_error: bool,
}

impl<V> Clone for CacheEntry<V> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            is_error: self.is_error,
        }
    }
}

/// Fixed-capacity, least-recently-used cache of resolution outcomes.
///
/// A single lock serializes all reads and writes for the cache instance;
/// nothing is held across await points, so contention stays bounded by the
/// cost of an `LruCache` operation.
pub struct ResolutionCache<K: Hash + Eq, V> {
    entries: Mutex<LruCache<K, CacheEntry<V>>>,
}

impl<K: Hash + Eq, V> ResolutionCache<K, V> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Returns the current entry for `key`, refreshing its recency.
    pub fn get(&self, key: &K) -> Option<CacheEntry<V>> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    /// Records a resolution outcome for `key` and returns the entry that is
    /// authoritative afterwards.
    ///
    /// An error result never displaces an existing success; in that case the
    /// existing entry is returned unchanged. Every other combination stores
    /// the new entry, evicting the least-recently-used entry on overflow.
    pub fn promote(&self, key: K, value: V, is_error: bool) -> CacheEntry<V> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if is_error
            && let Some(existing) = entries.get(&key)
            && !existing.is_error
        {
            return existing.clone();
        }
        let entry = CacheEntry {
            value: Arc::new(value),
            is_error,
        };
        entries.put(key, entry.clone());
        entry
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: Hash + Eq, V> Default for ResolutionCache<K, V> {
    fn default() -> Self {
        Self::new(
            NonZeroUsize::new(DEFAULT_CAPACITY).unwrap_or(NonZeroUsize::MIN),
        )
    }
}
