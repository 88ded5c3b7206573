use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalError {
    #[error("Fibonacci index must be non-negative, got {0}")]
    NegativeIndex(i64),
    #[error("Binomial coefficient C({n}, {k}) does not fit in 128 bits")]
    BinomialOverflow { n: i64, k: i64 },
    #[error("Fibonacci number F({0}) does not fit in 128 bits")]
    FibonacciOverflow(i64),
    #[error("Grid of {width} x {height} blocks is larger than the i64 argument range")]
    GridTooLarge { width: i64, height: i64 },
}

pub type Result<T> = std::result::Result<T, EvalError>;
