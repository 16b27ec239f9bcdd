#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// error types for the filtering operations.
pub mod error;

/// image filtering module.
pub mod filter;

/// module containing parallelization utilities.
pub mod parallel;

/// order statistic selection over generic ordered values.
pub mod select;

pub use crate::error::FilterError;
