use log::debug;
use std::collections::HashMap;

use crate::cache::lru::LruMemo;
use crate::cache::unbounded::UnboundedMemo;
use crate::cache::{CacheStats, MemoCache};
use crate::error::{EvalError, Result};

/// Cache key of a binomial coefficient: `(n, k)`.
pub type BinomialKey = (i64, i64);

/// A memo cache chosen at runtime, see [`EvaluatorConfig`](crate::EvaluatorConfig).
pub type DynMemo<K> = Box<dyn MemoCache<K, u128>>;

/// Step of the explicit work stack used to evaluate a binomial coefficient.
enum Visit {
    /// First visit: look the key up, or schedule its children.
    Enter(i64, i64),
    /// Both children are resolved, add them up.
    Combine(i64, i64),
}

/// Largest number of keys a memoized walk may touch before the multiplicative formula takes over.
const MEMO_WALK_LIMIT: u128 = 1 << 20;

/// Values of C(n, k) that need no recursion: 0 outside the triangle, 1 on its edges.
fn binomial_base(n: i64, k: i64) -> Option<u128> {
    if k < 0 || k > n {
        Some(0)
    } else if k == 0 || k == n {
        Some(1)
    } else {
        None
    }
}

/// Number of keys the memoized walk from (n, k) can reach, for `0 < k < n`.
fn walk_size(n: i64, k: i64) -> u128 {
    let k = k.min(n - k) as u128;
    (k + 1) * (n as u128 - k + 1)
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// C(n, k) for `0 < k < n` as the running product C(n - k + i, i), i = 1..=k.
///
/// Each step divides out the common factor first, so an intermediate overflow means the
/// result itself does not fit.
fn binomial_multiplicative(n: i64, k: i64) -> Result<u128> {
    let small = k.min(n - k) as u128;
    let base = n as u128 - small;
    let mut value: u128 = 1;
    for i in 1..=small {
        let divisor = gcd(value, i);
        value = (value / divisor)
            .checked_mul((base + i) / (i / divisor))
            .ok_or(EvalError::BinomialOverflow { n, k })?;
    }
    Ok(value)
}

fn known(resolved: &HashMap<BinomialKey, u128>, n: i64, k: i64) -> Option<u128> {
    binomial_base(n, k).or_else(|| resolved.get(&(n, k)).copied())
}

/// Evaluator computes binomial coefficients and Fibonacci numbers, memoizing every computed value.
///
/// The evaluator owns one cache per recurrence. Any [`MemoCache`] works as a backend: the default is
/// [`UnboundedMemo`], which keeps every value, while [`Evaluator::bounded`] uses [`LruMemo`] to cap memory.
/// The backend only changes how much work is repeated, never the results.
///
/// Evaluation is iterative, so deep recurrences do not grow the call stack. Both backends are
/// internally synchronized, so an evaluator can be shared between threads behind an `Arc`.
///
/// Example:
/// ```
/// use pascal_memo::Evaluator;
///
/// let evaluator = Evaluator::new();
///
/// assert_eq!(evaluator.binomial(5, 2).unwrap(), 10);
/// assert_eq!(evaluator.binomial(4, 5).unwrap(), 0);
/// assert_eq!(evaluator.fibonacci(7).unwrap(), 13);
/// assert!(evaluator.fibonacci(-1).is_err());
/// println!("{:?}", evaluator.binomial_stats());
/// ```
pub struct Evaluator<B = UnboundedMemo<BinomialKey, u128>, F = UnboundedMemo<u64, u128>> {
    binomial_cache: B,
    fibonacci_cache: F,
}

impl Evaluator {
    /// Create an evaluator whose caches keep every computed value.
    pub fn new() -> Self {
        Evaluator {
            binomial_cache: UnboundedMemo::new(),
            fibonacci_cache: UnboundedMemo::new(),
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator<LruMemo<BinomialKey, u128>, LruMemo<u64, u128>> {
    /// Create an evaluator whose caches hold at most the given number of entries each.
    pub fn bounded(binomial_capacity: u64, fibonacci_capacity: u64) -> Self {
        Evaluator {
            binomial_cache: LruMemo::new(binomial_capacity),
            fibonacci_cache: LruMemo::new(fibonacci_capacity),
        }
    }
}

impl<B, F> Evaluator<B, F>
where
    B: MemoCache<BinomialKey, u128>,
    F: MemoCache<u64, u128>,
{
    /// Create an evaluator on top of caller supplied caches.
    pub fn with_caches(binomial_cache: B, fibonacci_cache: F) -> Self {
        Evaluator {
            binomial_cache,
            fibonacci_cache,
        }
    }

    /// Binomial coefficient C(n, k), the entry at row `n`, position `k` of Pascal's Triangle.
    ///
    /// Returns 0 whenever `k < 0` or `k > n`, and 1 on the edges `k == 0` and `k == n`. Every other
    /// value is C(n - 1, k - 1) + C(n - 1, k), with sub-results served from and written to the cache.
    /// Rows too long to walk (more than 2^20 reachable keys) use the multiplicative formula and cache
    /// only the requested key. The only error is a result that does not fit in a `u128`.
    pub fn binomial(&self, n: i64, k: i64) -> Result<u128> {
        if let Some(value) = binomial_base(n, k) {
            return Ok(value);
        }
        if walk_size(n, k) > MEMO_WALK_LIMIT {
            if let Some(cached) = self.binomial_cache.get(&(n, k)) {
                return Ok(cached);
            }
            let value = binomial_multiplicative(n, k).map_err(|err| {
                debug!("C({}, {}) overflows u128", n, k);
                err
            })?;
            return Ok(self.binomial_cache.insert((n, k), value));
        }

        // Values resolved during this call. Children are read from here, never from the
        // cache, so a bounded cache may evict mid-query.
        let mut resolved: HashMap<BinomialKey, u128> = HashMap::new();
        let mut stack = vec![Visit::Enter(n, k)];
        let mut value = 0;

        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Enter(n, k) => {
                    if binomial_base(n, k).is_some() || resolved.contains_key(&(n, k)) {
                        continue;
                    }
                    if let Some(cached) = self.binomial_cache.get(&(n, k)) {
                        resolved.insert((n, k), cached);
                        value = cached;
                        continue;
                    }
                    stack.push(Visit::Combine(n, k));
                    stack.push(Visit::Enter(n - 1, k));
                    stack.push(Visit::Enter(n - 1, k - 1));
                }
                Visit::Combine(n, k) => {
                    let (left, right) =
                        match (known(&resolved, n - 1, k - 1), known(&resolved, n - 1, k)) {
                            (Some(left), Some(right)) => (left, right),
                            _ => unreachable!("C({}, {}) combined before its children", n, k),
                        };
                    let sum = left.checked_add(right).ok_or_else(|| {
                        debug!("C({}, {}) overflows u128", n, k);
                        EvalError::BinomialOverflow { n, k }
                    })?;
                    value = self.binomial_cache.insert((n, k), sum);
                    resolved.insert((n, k), value);
                }
            }
        }

        Ok(value)
    }

    /// The n-th Fibonacci number with F(0) = 0 and F(1) = 1.
    ///
    /// Negative indices are rejected with [`EvalError::NegativeIndex`]. Values are filled in bottom-up,
    /// so every index up to `n` ends up cached.
    pub fn fibonacci(&self, n: i64) -> Result<u128> {
        if n < 0 {
            debug!("rejected negative Fibonacci index {}", n);
            return Err(EvalError::NegativeIndex(n));
        }
        if n < 2 {
            return Ok(n as u128);
        }

        let top = n as u64;
        if let Some(value) = self.fibonacci_cache.get(&top) {
            return Ok(value);
        }

        let (mut previous, mut current) = (0u128, 1u128);
        for index in 2..=top {
            let cached = if index < top {
                self.fibonacci_cache.get(&index)
            } else {
                None
            };
            let value = match cached {
                Some(value) => value,
                None => {
                    let sum = previous.checked_add(current).ok_or_else(|| {
                        debug!("F({}) overflows u128 at index {}", n, index);
                        EvalError::FibonacciOverflow(n)
                    })?;
                    self.fibonacci_cache.insert(index, sum)
                }
            };
            previous = current;
            current = value;
        }

        Ok(current)
    }

    pub fn binomial_stats(&self) -> CacheStats {
        self.binomial_cache.stats()
    }

    pub fn fibonacci_stats(&self) -> CacheStats {
        self.fibonacci_cache.stats()
    }

    pub fn binomial_cache(&self) -> &B {
        &self.binomial_cache
    }

    pub fn fibonacci_cache(&self) -> &F {
        &self.fibonacci_cache
    }

    /// Empty both caches. Results are unaffected, they are simply recomputed on demand.
    pub fn clear(&self) {
        self.binomial_cache.clear();
        self.fibonacci_cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::seq::SliceRandom;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_binomial_known_values() {
        let evaluator = Evaluator::new();
        assert_eq!(evaluator.binomial(5, 2), Ok(10));
        assert_eq!(evaluator.binomial(7, 0), Ok(1));
        assert_eq!(evaluator.binomial(7, 7), Ok(1));
        assert_eq!(evaluator.binomial(0, 0), Ok(1));
        assert_eq!(evaluator.binomial(4, 5), Ok(0));
        assert_eq!(evaluator.binomial(10, 3), Ok(120));
        assert_eq!(evaluator.binomial(30, 15), Ok(155_117_520));
    }

    #[test]
    fn test_binomial_out_of_range_is_zero() {
        let evaluator = Evaluator::new();
        for n in -3..=12 {
            for k in -4..0 {
                assert_eq!(evaluator.binomial(n, k), Ok(0));
            }
            for k in (n + 1).max(0)..n.max(0) + 5 {
                assert_eq!(evaluator.binomial(n, k), Ok(0));
            }
        }
        assert_eq!(evaluator.binomial_stats().size, 0);
    }

    #[test]
    fn test_binomial_recurrence() {
        let evaluator = Evaluator::new();
        for n in 1..=30 {
            for k in 0..=n {
                let expected = evaluator.binomial(n - 1, k - 1).unwrap()
                    + evaluator.binomial(n - 1, k).unwrap();
                assert_eq!(evaluator.binomial(n, k).unwrap(), expected);
            }
        }
    }

    #[test]
    fn test_binomial_symmetry_and_row_sum() {
        let evaluator = Evaluator::new();
        for n in 0..=30 {
            let mut sum = 0;
            for k in 0..=n {
                let value = evaluator.binomial(n, k).unwrap();
                assert_eq!(value, evaluator.binomial(n, n - k).unwrap());
                sum += value;
            }
            assert_eq!(sum, 1u128 << n);
        }
    }

    #[test]
    fn test_binomial_populates_recursive_keys() {
        let evaluator = Evaluator::new();
        assert_eq!(evaluator.binomial(5, 2), Ok(10));
        let stats = evaluator.binomial_stats();
        assert_eq!(stats.size, 6);
        assert_eq!(stats.misses, 6);
        assert_eq!(stats.hits, 0);
        for key in [(5, 2), (4, 1), (4, 2), (3, 1), (3, 2), (2, 1)] {
            assert!(evaluator.binomial_cache().contains(&key));
        }
        // Edges are answered directly and never stored.
        for key in [(3, 0), (2, 2), (1, 0), (1, 1)] {
            assert!(!evaluator.binomial_cache().contains(&key));
        }

        assert_eq!(evaluator.binomial(5, 2), Ok(10));
        let stats = evaluator.binomial_stats();
        assert_eq!(stats.size, 6);
        assert_eq!(stats.hits, 1);
    }

    #[test]
    fn test_binomial_deep_row_does_not_recurse() {
        let evaluator = Evaluator::new();
        assert_eq!(evaluator.binomial(100_000, 1), Ok(100_000));
        assert_eq!(evaluator.binomial(100_000, 99_999), Ok(100_000));
    }

    #[test]
    fn test_binomial_extreme_rows() {
        let evaluator = Evaluator::new();
        let max = i64::MAX as u128;
        assert_eq!(evaluator.binomial(i64::MAX, 0), Ok(1));
        assert_eq!(evaluator.binomial(i64::MAX, i64::MAX), Ok(1));
        assert_eq!(evaluator.binomial(i64::MAX, 1), Ok(max));
        assert_eq!(evaluator.binomial(i64::MAX, i64::MAX - 1), Ok(max));
        assert_eq!(evaluator.binomial(i64::MAX, 2), Ok(max * (max - 1) / 2));
        assert_eq!(
            evaluator.binomial(i64::MAX, 3),
            Err(EvalError::BinomialOverflow { n: i64::MAX, k: 3 })
        );
        assert_eq!(evaluator.binomial(10_000_000, 2), Ok(49_999_995_000_000));
        assert!(evaluator.binomial_stats().size <= 4);
        assert_eq!(evaluator.binomial(i64::MAX, 2), Ok(max * (max - 1) / 2));
        assert_eq!(evaluator.binomial_stats().hits, 1);
    }

    #[test]
    fn test_multiplicative_matches_recurrence() {
        let evaluator = Evaluator::new();
        for n in 2..=130 {
            for k in 1..n {
                assert_eq!(binomial_multiplicative(n, k), evaluator.binomial(n, k));
            }
        }
        assert!(binomial_multiplicative(140, 70).is_err());
    }

    #[test]
    fn test_binomial_overflow() {
        let evaluator = Evaluator::new();
        assert_eq!(
            evaluator.binomial(130, 65),
            Ok(95_067_625_827_960_698_145_584_333_020_095_113_100)
        );
        assert!(matches!(
            evaluator.binomial(140, 70),
            Err(EvalError::BinomialOverflow { .. })
        ));
        assert_eq!(evaluator.binomial(140, 1), Ok(140));
    }

    #[test]
    fn test_fibonacci_known_values() {
        let evaluator = Evaluator::new();
        assert_eq!(evaluator.fibonacci(0), Ok(0));
        assert_eq!(evaluator.fibonacci(1), Ok(1));
        assert_eq!(evaluator.fibonacci(2), Ok(1));
        assert_eq!(evaluator.fibonacci(7), Ok(13));
        assert_eq!(evaluator.fibonacci(10), Ok(55));
        assert_eq!(evaluator.fibonacci(50), Ok(12_586_269_025));
        for n in 2..=60 {
            assert_eq!(
                evaluator.fibonacci(n).unwrap(),
                evaluator.fibonacci(n - 1).unwrap() + evaluator.fibonacci(n - 2).unwrap()
            );
        }
    }

    #[test]
    fn test_fibonacci_negative_index() {
        let evaluator = Evaluator::new();
        assert_eq!(evaluator.fibonacci(-1), Err(EvalError::NegativeIndex(-1)));
        assert_eq!(
            evaluator.fibonacci(i64::MIN),
            Err(EvalError::NegativeIndex(i64::MIN))
        );
        assert_eq!(evaluator.fibonacci_stats().size, 0);
    }

    #[test]
    fn test_fibonacci_overflow() {
        let evaluator = Evaluator::new();
        assert_eq!(
            evaluator.fibonacci(186),
            Ok(332_825_110_087_067_562_321_196_029_789_634_457_848)
        );
        assert_eq!(evaluator.fibonacci(187), Err(EvalError::FibonacciOverflow(187)));
        assert_eq!(evaluator.fibonacci(200), Err(EvalError::FibonacciOverflow(200)));
    }

    #[test]
    fn test_fibonacci_fills_cache_bottom_up() {
        let evaluator = Evaluator::new();
        assert_eq!(evaluator.fibonacci(20), Ok(6765));
        assert_eq!(evaluator.fibonacci_stats().size, 19);
        assert_eq!(evaluator.fibonacci(15), Ok(610));
        assert_eq!(evaluator.fibonacci_stats().hits, 1);
        assert_eq!(evaluator.fibonacci_stats().size, 19);
    }

    #[test]
    fn test_results_ignore_call_order() {
        let mut keys: Vec<(i64, i64)> = (0..25)
            .flat_map(|n| (-1..=n + 1).map(move |k| (n, k)))
            .collect();
        let reference = Evaluator::new();
        let expected: Vec<u128> = keys
            .iter()
            .map(|&(n, k)| reference.binomial(n, k).unwrap())
            .collect();
        let expected: HashMap<(i64, i64), u128> =
            keys.iter().copied().zip(expected).collect();

        keys.shuffle(&mut rand::rng());
        let shuffled = Evaluator::new();
        for (n, k) in keys {
            assert_eq!(shuffled.binomial(n, k).unwrap(), expected[&(n, k)]);
        }

        let mut indices: Vec<i64> = (0..90).collect();
        indices.shuffle(&mut rand::rng());
        for n in indices {
            assert_eq!(shuffled.fibonacci(n), reference.fibonacci(n));
        }
    }

    #[test]
    fn test_repeated_calls_leave_other_keys_alone() {
        let evaluator = Evaluator::new();
        let before = evaluator.binomial(12, 4).unwrap();
        for _ in 0..5 {
            assert_eq!(evaluator.binomial(20, 10), Ok(184_756));
            assert_eq!(evaluator.fibonacci(30), Ok(832_040));
        }
        assert_eq!(evaluator.binomial(12, 4), Ok(before));
        assert_eq!(evaluator.fibonacci(29), Ok(514_229));
    }

    #[test]
    fn test_bounded_evaluator_matches_unbounded() {
        let unbounded = Evaluator::new();
        for capacity in [0, 1, 2, 7, 64] {
            let bounded = Evaluator::bounded(capacity, capacity);
            for n in 0..=24 {
                for k in 0..=n {
                    assert_eq!(bounded.binomial(n, k), unbounded.binomial(n, k));
                }
                assert_eq!(bounded.fibonacci(n * 3), unbounded.fibonacci(n * 3));
            }
            assert!(bounded.binomial_stats().size <= capacity);
            assert!(bounded.fibonacci_stats().size <= capacity);
        }
    }

    #[test]
    fn test_clear_keeps_results() {
        let evaluator = Evaluator::new();
        assert_eq!(evaluator.binomial(9, 4), Ok(126));
        assert_eq!(evaluator.fibonacci(12), Ok(144));
        evaluator.clear();
        assert_eq!(evaluator.binomial_stats().size, 0);
        assert_eq!(evaluator.fibonacci_stats().size, 0);
        assert_eq!(evaluator.binomial(9, 4), Ok(126));
        assert_eq!(evaluator.fibonacci(12), Ok(144));
    }

    #[test]
    fn test_shared_between_threads() {
        let evaluator = Arc::new(Evaluator::new());
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let evaluator = Arc::clone(&evaluator);
                thread::spawn(move || {
                    for n in (0..40).rev() {
                        let k = (n + t) % (n + 1);
                        evaluator.binomial(n, k).unwrap();
                        evaluator.fibonacci(n + t).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(evaluator.binomial(39, 19), Ok(68_923_264_410));
        assert_eq!(evaluator.fibonacci(42), Ok(267_914_296));
    }
}
