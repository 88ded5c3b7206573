use pascal_memo::Evaluator;
use std::time::Instant;

// Fibonacci without caching (naive recursion)
fn naive_fib(n: u64) -> u128 {
    if n < 2 {
        return n as u128;
    }
    naive_fib(n - 1) + naive_fib(n - 2)
}

// Binomial coefficient without caching, straight from the recurrence
fn naive_binomial(n: i64, k: i64) -> u128 {
    if k < 0 || k > n {
        return 0;
    }
    if n == 0 {
        return 1;
    }
    naive_binomial(n - 1, k - 1) + naive_binomial(n - 1, k)
}

fn main() {
    env_logger::init();

    let n = 40;

    let start = Instant::now();
    let result_naive = naive_fib(n);
    let duration_naive = start.elapsed();
    println!(
        "Naive Fibonacci({}) = {} (Time: {:?})",
        n, result_naive, duration_naive
    );

    let evaluator = Evaluator::new();
    let start = Instant::now();
    let result_cached = evaluator.fibonacci(n as i64).unwrap();
    let duration_cached = start.elapsed();
    println!(
        "Memoized Fibonacci({}) = {} (Time: {:?})",
        n, result_cached, duration_cached
    );
    assert_eq!(result_naive, result_cached);

    let speedup = duration_naive.as_secs_f64() / duration_cached.as_secs_f64();
    println!("Speedup: {:.2}x", speedup);

    let (row, column) = (26, 13);
    let start = Instant::now();
    let binomial_naive = naive_binomial(row, column);
    let duration_naive = start.elapsed();
    println!(
        "Naive C({}, {}) = {} (Time: {:?})",
        row, column, binomial_naive, duration_naive
    );

    let bounded = Evaluator::bounded(64, 64);
    let start = Instant::now();
    let binomial_cached = bounded.binomial(row, column).unwrap();
    let duration_cached = start.elapsed();
    println!(
        "Memoized C({}, {}) with 64 cached entries = {} (Time: {:?})",
        row, column, binomial_cached, duration_cached
    );
    assert_eq!(binomial_naive, binomial_cached);

    println!("Fibonacci cache stats: {:?}", evaluator.fibonacci_stats());
    println!("Binomial cache stats: {:?}", bounded.binomial_stats());
}
