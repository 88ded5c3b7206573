use log::debug;
use std::hash::Hash;

use crate::cache::lru::LruMemo;
use crate::cache::unbounded::UnboundedMemo;
use crate::evaluator::{BinomialKey, DynMemo, Evaluator};

/// EvaluatorConfig picks a cache backend per recurrence at runtime.
///
/// A capacity of `None` keeps every computed value, `Some(n)` bounds the cache to `n` entries
/// with least-recently-used eviction.
///
/// Example:
/// ```
/// use pascal_memo::EvaluatorConfig;
///
/// let evaluator = EvaluatorConfig::new().binomial_capacity(128).build();
///
/// assert_eq!(evaluator.binomial(20, 10).unwrap(), 184_756);
/// assert_eq!(evaluator.binomial_stats().capacity, Some(128));
/// assert_eq!(evaluator.fibonacci_stats().capacity, None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluatorConfig {
    pub binomial_capacity: Option<u64>,
    pub fibonacci_capacity: Option<u64>,
}

impl EvaluatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn binomial_capacity(mut self, capacity: u64) -> Self {
        self.binomial_capacity = Some(capacity);
        self
    }

    pub fn fibonacci_capacity(mut self, capacity: u64) -> Self {
        self.fibonacci_capacity = Some(capacity);
        self
    }

    pub fn build(&self) -> Evaluator<DynMemo<BinomialKey>, DynMemo<u64>> {
        debug!("building evaluator from {:?}", self);
        Evaluator::with_caches(
            memo_for(self.binomial_capacity),
            memo_for(self.fibonacci_capacity),
        )
    }
}

fn memo_for<K: Eq + Hash + Clone + Send + Sync + 'static>(capacity: Option<u64>) -> DynMemo<K> {
    match capacity {
        Some(capacity) => Box::new(LruMemo::new(capacity)),
        None => Box::new(UnboundedMemo::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_unbounded() {
        let evaluator = EvaluatorConfig::default().build();
        assert_eq!(evaluator.binomial(8, 3), Ok(56));
        assert_eq!(evaluator.fibonacci(25), Ok(75_025));
        assert_eq!(evaluator.binomial_stats().capacity, None);
        assert_eq!(evaluator.fibonacci_stats().capacity, None);
    }

    #[test]
    fn test_bounded_config() {
        let config = EvaluatorConfig::new()
            .binomial_capacity(4)
            .fibonacci_capacity(2);
        assert_eq!(config.binomial_capacity, Some(4));
        let evaluator = config.build();
        assert_eq!(evaluator.binomial(16, 8), Ok(12_870));
        assert_eq!(evaluator.fibonacci(40), Ok(102_334_155));
        assert!(evaluator.binomial_stats().size <= 4);
        assert_eq!(evaluator.fibonacci_stats().size, 2);
        assert_eq!(evaluator.fibonacci_stats().capacity, Some(2));
    }
}
