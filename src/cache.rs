use std::hash::Hash;

/// CacheStats contains memo cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub size: u64,
    /// `None` for caches that never evict.
    pub capacity: Option<u64>,
}

/// MemoCache defines the storage an [`Evaluator`](crate::Evaluator) memoizes into and provides a shared interface for different cache implementations
///
/// Values stored in a memo cache are pure functions of their keys, so an entry is written at most once: inserting a key that is already present keeps the stored value and returns it.
///
/// Example:
/// ```
/// use pascal_memo::{LruMemo, MemoCache, UnboundedMemo};
///
/// fn remember<C>(cache: C) -> u128
/// where
///     C: MemoCache<u64, u128>,
/// {
///     cache.insert(10, 55);
///     cache.insert(10, 0);
///     cache.get(&10).unwrap_or_default()
/// }
///
/// assert_eq!(remember(UnboundedMemo::new()), 55);
/// assert_eq!(remember(LruMemo::new(4)), 55);
/// ```
pub trait MemoCache<K: Eq + Hash + Clone + Send + Sync, V: Copy + Send + Sync>: Send + Sync {
    /// Look up a key, counting a hit or a miss.
    fn get(&self, key: &K) -> Option<V>;
    /// Store a value unless the key is already present. Returns the value now stored under the key.
    fn insert(&self, key: K, value: V) -> V;
    /// Check for a key without touching the statistics or recency.
    fn contains(&self, key: &K) -> bool;
    fn clear(&self);
    fn stats(&self) -> CacheStats;
}

impl<K, V, C> MemoCache<K, V> for Box<C>
where
    K: Eq + Hash + Clone + Send + Sync,
    V: Copy + Send + Sync,
    C: MemoCache<K, V> + ?Sized,
{
    fn get(&self, key: &K) -> Option<V> {
        (**self).get(key)
    }

    fn insert(&self, key: K, value: V) -> V {
        (**self).insert(key, value)
    }

    fn contains(&self, key: &K) -> bool {
        (**self).contains(key)
    }

    fn clear(&self) {
        (**self).clear()
    }

    fn stats(&self) -> CacheStats {
        (**self).stats()
    }
}

pub mod lru;
pub mod unbounded;
