pub mod cache;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod triangle;
pub use crate::cache::lru::LruMemo;
pub use crate::cache::unbounded::UnboundedMemo;
pub use crate::cache::{CacheStats, MemoCache};
pub use crate::config::EvaluatorConfig;
pub use crate::error::EvalError;
pub use crate::evaluator::{BinomialKey, DynMemo, Evaluator};
