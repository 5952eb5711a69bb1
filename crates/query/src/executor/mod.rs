//! Executor module for filtering record collections.

mod filter;

pub use filter::{filter, FilterExecutor, Filterable};
