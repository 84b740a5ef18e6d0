//! Asset universe configuration.
//!
//! Buckets group assets by assumed speculative beta. Weights run from 1
//! (majors) to 5 (memes); a bucket missing from the weight table weighs 1.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Weight applied to a bucket that has no entry in the weight table.
pub const DEFAULT_BUCKET_WEIGHT: f64 = 1.0;

#[derive(Error, Debug)]
pub enum UniverseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Duplicate bucket name: {0}")]
    DuplicateBucket(String),

    #[error("Bucket name must not be empty")]
    EmptyBucketName,

    #[error("Invalid weight {weight} for bucket {bucket}")]
    InvalidWeight { bucket: String, weight: f64 },

    #[error("Benchmark {benchmark} must not be a member of bucket {bucket}")]
    BenchmarkInBucket { benchmark: String, bucket: String },
}

/// A named, ordered set of assets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub name: String,
    pub assets: Vec<String>,
}

impl Bucket {
    pub fn new(name: &str, assets: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            assets: assets.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Bucket names that carry a structural meaning in the regime rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketRoles {
    /// Least speculative bucket.
    pub majors: String,
    /// Compared against majors when detecting rotation.
    pub midcaps: String,
    /// Most speculative bucket; numerator of speculative concentration.
    pub memes: String,
}

impl Default for BucketRoles {
    fn default() -> Self {
        Self {
            majors: "majors".to_string(),
            midcaps: "midcaps".to_string(),
            memes: "memes".to_string(),
        }
    }
}

/// Static universe: benchmark, buckets and weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniverseConfig {
    /// Benchmark asset id.
    #[serde(default = "default_benchmark")]
    pub benchmark: String,

    #[serde(default)]
    pub roles: BucketRoles,

    /// Buckets in evaluation and display order.
    pub buckets: Vec<Bucket>,

    /// Bucket name -> weight.
    #[serde(default)]
    pub weights: BTreeMap<String, f64>,
}

fn default_benchmark() -> String {
    "bitcoin".to_string()
}

impl Default for UniverseConfig {
    fn default() -> Self {
        let buckets = vec![
            Bucket::new("majors", &["ethereum", "solana", "binancecoin"]),
            Bucket::new(
                "large_alts",
                &["ripple", "cardano", "avalanche-2", "near", "polkadot"],
            ),
            Bucket::new(
                "midcaps",
                &["aptos", "sui", "arbitrum", "optimism", "sei-network"],
            ),
            Bucket::new("high_beta", &["pepe", "dogwifhat", "bonk"]),
            Bucket::new("memes", &["dogecoin", "shiba-inu", "popcat", "morg-2"]),
        ];

        Self {
            benchmark: default_benchmark(),
            roles: BucketRoles::default(),
            buckets,
            weights: default_weights(),
        }
    }
}

/// Canonical weight table.
pub fn default_weights() -> BTreeMap<String, f64> {
    [
        ("majors", 1.0),
        ("large_alts", 2.0),
        ("midcaps", 3.0),
        ("high_beta", 4.0),
        ("memes", 5.0),
    ]
    .into_iter()
    .map(|(name, w)| (name.to_string(), w))
    .collect()
}

impl UniverseConfig {
    /// Build a universe with the canonical weight table.
    pub fn with_buckets(buckets: Vec<Bucket>) -> Self {
        Self {
            buckets,
            ..Self::default()
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, UniverseError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, UniverseError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), UniverseError> {
        let mut seen = HashSet::new();
        for bucket in &self.buckets {
            if bucket.name.trim().is_empty() {
                return Err(UniverseError::EmptyBucketName);
            }
            if !seen.insert(bucket.name.as_str()) {
                return Err(UniverseError::DuplicateBucket(bucket.name.clone()));
            }
            if bucket.assets.iter().any(|a| *a == self.benchmark) {
                return Err(UniverseError::BenchmarkInBucket {
                    benchmark: self.benchmark.clone(),
                    bucket: bucket.name.clone(),
                });
            }
        }

        for (bucket, &weight) in &self.weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(UniverseError::InvalidWeight {
                    bucket: bucket.clone(),
                    weight,
                });
            }
        }

        Ok(())
    }

    /// Weight of a bucket, defaulting to 1.
    pub fn weight(&self, bucket: &str) -> f64 {
        self.weights
            .get(bucket)
            .copied()
            .unwrap_or(DEFAULT_BUCKET_WEIGHT)
    }

    pub fn bucket(&self, name: &str) -> Option<&Bucket> {
        self.buckets.iter().find(|b| b.name == name)
    }

    /// Role names that do not match any configured bucket.
    ///
    /// Missing roles are legal and read as a zero score, but usually mean a
    /// typo in the config.
    pub fn missing_roles(&self) -> Vec<&str> {
        [
            self.roles.majors.as_str(),
            self.roles.midcaps.as_str(),
            self.roles.memes.as_str(),
        ]
        .into_iter()
        .filter(|role| self.bucket(role).is_none())
        .collect()
    }

    /// Every id to request from the market-data source, benchmark included.
    pub fn all_assets(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut assets = Vec::new();
        for asset in self
            .buckets
            .iter()
            .flat_map(|b| b.assets.iter())
            .chain(std::iter::once(&self.benchmark))
        {
            if seen.insert(asset.as_str()) {
                assets.push(asset.clone());
            }
        }
        assets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_universe_is_valid() {
        let config = UniverseConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.buckets.len(), 5);
        assert_eq!(config.benchmark, "bitcoin");
        assert!(config.missing_roles().is_empty());
    }

    #[test]
    fn test_weights() {
        let config = UniverseConfig::default();
        assert_eq!(config.weight("majors"), 1.0);
        assert_eq!(config.weight("large_alts"), 2.0);
        assert_eq!(config.weight("midcaps"), 3.0);
        assert_eq!(config.weight("high_beta"), 4.0);
        assert_eq!(config.weight("memes"), 5.0);
        assert_eq!(config.weight("unlisted"), DEFAULT_BUCKET_WEIGHT);
    }

    #[test]
    fn test_all_assets_includes_benchmark_once() {
        let config = UniverseConfig::default();
        let assets = config.all_assets();
        assert_eq!(assets.iter().filter(|a| *a == "bitcoin").count(), 1);
        assert_eq!(assets.len(), 21);
    }

    #[test]
    fn test_duplicate_bucket_rejected() {
        let config = UniverseConfig::with_buckets(vec![
            Bucket::new("majors", &["ethereum"]),
            Bucket::new("majors", &["solana"]),
        ]);
        assert!(matches!(
            config.validate(),
            Err(UniverseError::DuplicateBucket(name)) if name == "majors"
        ));
    }

    #[test]
    fn test_benchmark_in_bucket_rejected() {
        let config = UniverseConfig::with_buckets(vec![Bucket::new("majors", &["bitcoin"])]);
        assert!(matches!(
            config.validate(),
            Err(UniverseError::BenchmarkInBucket { .. })
        ));
    }

    #[test]
    fn test_invalid_weight_rejected() {
        let mut config = UniverseConfig::default();
        config.weights.insert("memes".to_string(), f64::NAN);
        assert!(matches!(
            config.validate(),
            Err(UniverseError::InvalidWeight { .. })
        ));

        config.weights.insert("memes".to_string(), -1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_roles() {
        let config = UniverseConfig::with_buckets(vec![
            Bucket::new("majors", &["ethereum"]),
            Bucket::new("memes", &["dogecoin"]),
        ]);
        assert_eq!(config.missing_roles(), vec!["midcaps"]);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = UniverseConfig::default();
        let text = config.to_toml_string().unwrap();
        let parsed = UniverseConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_shipped_config_matches_default() {
        let shipped = UniverseConfig::from_toml_str(include_str!("../../config/default.toml")).unwrap();
        assert_eq!(shipped, UniverseConfig::default());
    }

    #[test]
    fn test_toml_defaults() {
        let text = r#"
            [[buckets]]
            name = "majors"
            assets = ["ethereum"]

            [[buckets]]
            name = "memes"
            assets = ["dogecoin"]

            [weights]
            memes = 5.0
        "#;
        let config = UniverseConfig::from_toml_str(text).unwrap();
        assert_eq!(config.benchmark, "bitcoin");
        assert_eq!(config.roles, BucketRoles::default());
        assert_eq!(config.weight("majors"), 1.0);
        assert_eq!(config.weight("memes"), 5.0);
    }
}
