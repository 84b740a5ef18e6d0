//! Asset universe module.
//!
//! Static bucket configuration consumed by the regime classifier:
//! - Benchmark asset id
//! - Ordered buckets of asset ids
//! - Bucket weight table (speculative beta)
//! - Role names used by the regime rules

pub mod config;

pub use config::{default_weights, Bucket, BucketRoles, UniverseConfig, UniverseError, DEFAULT_BUCKET_WEIGHT};
