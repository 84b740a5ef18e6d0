//! Market regime classification module.
//!
//! Scores speculative risk appetite relative to the benchmark:
//! - RISK: sum of weighted, breadth-adjusted bucket scores
//! - Breadth: share of bucketed assets beating the benchmark
//! - SpecConc: share of total weighted score held by memes
//!
//! and names the regime (Speculative Flight, Liquidation Mode, Broad Risk-On,
//! Degenerate Send, Rotation Phase, Risk-Off, or a fallback) with a
//! Violent / Heavy / Light modifier.

pub mod aggregation;
pub mod classifier;
pub mod labels;

pub use aggregation::{aggregate, bucket_score, BucketStats, RiskMetrics};
pub use classifier::{primary_regime, Regime, RegimeClassifier, RegimeResult};
pub use labels::{Intensities, Participation, PrimaryRegime, RiskLevel, Severity, Structure};
