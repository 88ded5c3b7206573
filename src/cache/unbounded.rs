use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;

use crate::cache::{CacheStats, MemoCache};

/// UnboundedMemoInner contains the inner data structure for the UnboundedMemo.
struct UnboundedMemoInner<K: Eq + Hash, V> {
    key_value_map: HashMap<K, V>,
    hits: u64,
    misses: u64,
}

/// UnboundedMemo is a memo cache that keeps every entry for its whole lifetime.
///
/// Entries are added once and never evicted or updated, which is the natural fit for memoizing a pure recurrence. Memory grows with the number of distinct keys evaluated; use [`LruMemo`](crate::LruMemo) to bound it.
///
/// All mutability is handled internally with a Mutex, so the cache can be shared between threads.
///
/// Example:
/// ```
/// use pascal_memo::{MemoCache, UnboundedMemo};
///
/// let cache = UnboundedMemo::<(i64, i64), u128>::new();
///
/// assert_eq!(cache.insert((5, 2), 10), 10);
/// assert_eq!(cache.get(&(5, 2)), Some(10));
/// assert_eq!(cache.stats().capacity, None);
/// ```
pub struct UnboundedMemo<K: Eq + Hash + Send, V: Send> {
    inner: Mutex<UnboundedMemoInner<K, V>>,
}

impl<K: Eq + Hash + Send, V: Send> UnboundedMemo<K, V> {
    pub fn new() -> Self {
        UnboundedMemo {
            inner: Mutex::new(UnboundedMemoInner {
                key_value_map: HashMap::new(),
                hits: 0,
                misses: 0,
            }),
        }
    }

    /// Create an UnboundedMemo with room reserved for `capacity` entries. This is only a sizing hint.
    pub fn with_capacity(capacity: usize) -> Self {
        UnboundedMemo {
            inner: Mutex::new(UnboundedMemoInner {
                key_value_map: HashMap::with_capacity(capacity),
                hits: 0,
                misses: 0,
            }),
        }
    }
}

impl<K: Eq + Hash + Send, V: Send> Default for UnboundedMemo<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Clone + Send + Sync, V: Copy + Send + Sync> MemoCache<K, V>
    for UnboundedMemo<K, V>
{
    fn get(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.lock().unwrap();
        let result = inner.key_value_map.get(key).copied();

        if result.is_some() {
            inner.hits += 1;
        } else {
            inner.misses += 1;
        }
        result
    }

    fn insert(&self, key: K, value: V) -> V {
        let mut inner = self.inner.lock().unwrap();
        *inner.key_value_map.entry(key).or_insert(value)
    }

    fn contains(&self, key: &K) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.key_value_map.contains_key(key)
    }

    fn clear(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.key_value_map.clear();
    }

    fn stats(&self) -> CacheStats {
        let inner = self.inner.lock().unwrap();
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            evictions: 0,
            size: inner.key_value_map.len() as u64,
            capacity: None,
        }
    }
}
