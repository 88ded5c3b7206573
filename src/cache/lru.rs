use crate::cache::{CacheStats, MemoCache};
use linked_hash_map::LinkedHashMap;
use log::{debug, trace};
use std::hash::Hash;
use std::sync::Mutex;

/// The inner data structure for the LruMemo.
struct LruMemoInner<K: Eq + Hash, V> {
    capacity: u64,
    key_value_map: LinkedHashMap<K, V>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl<K: Eq + Hash, V> LruMemoInner<K, V> {
    /// Drop least recently used entries until the map fits in the capacity.
    fn enforce_capacity(&mut self) {
        while self.key_value_map.len() as u64 > self.capacity {
            if self.key_value_map.pop_front().is_none() {
                break;
            }
            self.evictions += 1;
            trace!("lru memo evicted an entry, {} left", self.key_value_map.len());
        }
    }
}

/// LruMemo is a bounded memo cache that evicts the least recently used entry.
///
/// Evicting from a memo cache never changes results, it only means the evicted value is recomputed the next time it is needed. Reading an entry with `get` or re-inserting it marks it as recently used.
///
/// All mutability is handled internally with a Mutex, so the cache can be shared between threads.
///
/// Example:
/// ```
/// use pascal_memo::{LruMemo, MemoCache};
///
/// let cache = LruMemo::<u64, u128>::new(2);
/// cache.insert(5, 5);
/// cache.insert(6, 8);
/// cache.get(&5);
/// cache.insert(7, 13);
///
/// assert_eq!(cache.get(&6), None);
/// assert_eq!(cache.get(&5), Some(5));
/// assert_eq!(cache.stats().evictions, 1);
/// ```
pub struct LruMemo<K: Eq + Hash + Send, V: Send> {
    inner: Mutex<LruMemoInner<K, V>>,
}

impl<K: Eq + Hash + Send, V: Send> LruMemo<K, V> {
    /// Create a new LruMemo holding at most `capacity` entries. A capacity of zero stores nothing.
    pub fn new(capacity: u64) -> Self {
        let mut kv_map = LinkedHashMap::new();
        kv_map.reserve(capacity.min(1 << 16) as usize);
        LruMemo {
            inner: Mutex::new(LruMemoInner {
                capacity,
                key_value_map: kv_map,
                hits: 0,
                misses: 0,
                evictions: 0,
            }),
        }
    }

    /// Change the capacity of the cache, if the new capacity is smaller than the current size the least recently used entries are removed.
    pub fn change_capacity(&self, capacity: u64) {
        let mut inner = self.inner.lock().unwrap();
        debug!(
            "lru memo capacity changed from {} to {}",
            inner.capacity, capacity
        );
        let old_capacity = inner.capacity;
        inner.capacity = capacity;
        inner.enforce_capacity();

        if capacity > old_capacity {
            let additional = (capacity - old_capacity).min(1 << 16) as usize;
            inner.key_value_map.reserve(additional);
        }
    }
}

impl<K: Eq + Hash + Clone + Send + Sync, V: Copy + Send + Sync> MemoCache<K, V> for LruMemo<K, V> {
    fn get(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.lock().unwrap();
        match inner.key_value_map.get_refresh(key).copied() {
            Some(value) => {
                inner.hits += 1;
                Some(value)
            }
            None => {
                inner.misses += 1;
                None
            }
        }
    }

    fn insert(&self, key: K, value: V) -> V {
        let mut inner = self.inner.lock().unwrap();
        if let Some(existing) = inner.key_value_map.get_refresh(&key) {
            return *existing;
        }
        inner.key_value_map.insert(key, value);
        inner.enforce_capacity();
        value
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
            evictions: inner.evictions,
            size: inner.key_value_map.len() as u64,
            capacity: Some(inner.capacity),
        }
    }
}
