//! Return normalization.
//!
//! Converts current/previous price pairs into log returns and into excess
//! returns relative to the benchmark asset.

pub mod normalizer;

pub use normalizer::{excess_return, excess_returns, log_return};
