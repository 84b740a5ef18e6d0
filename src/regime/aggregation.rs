//! Bucket aggregation.
//!
//! Turns per-asset excess returns into per-bucket strength, breadth and score,
//! then into the global RISK, breadth and speculative-concentration metrics.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::universe::UniverseConfig;

/// Statistics for one bucket over one window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketStats {
    pub name: String,
    /// Weight applied to the score.
    pub weight: f64,
    /// Number of bucket assets with data in this window.
    pub present: usize,
    /// S_b: mean excess return.
    pub strength: f64,
    /// B_b: fraction of assets with positive excess return.
    pub breadth: f64,
    /// Q_b: breadth-adjusted score.
    pub score: f64,
    /// wQ: weight * Q_b.
    pub weighted_score: f64,
}

impl BucketStats {
    /// Zeroed stats for a bucket with no data.
    pub fn empty(name: &str, weight: f64) -> Self {
        Self {
            name: name.to_string(),
            weight,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.present == 0
    }
}

/// Global metrics for one window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Sum of weighted bucket scores.
    pub risk: f64,
    /// Fraction of all present bucket assets beating the benchmark.
    pub breadth_total: f64,
    /// Share of total absolute weighted score held by the memes bucket.
    pub spec_conc: f64,
    /// Per-bucket stats in configuration order.
    pub buckets: Vec<BucketStats>,
}

impl RiskMetrics {
    pub fn bucket(&self, name: &str) -> Option<&BucketStats> {
        self.buckets.iter().find(|b| b.name == name)
    }

    /// Weighted score of a bucket; 0.0 when absent.
    pub fn weighted_score(&self, name: &str) -> f64 {
        self.bucket(name).map(|b| b.weighted_score).unwrap_or(0.0)
    }
}

/// Bucket score from strength and breadth.
///
/// Outperformance is scaled by `2*B - 1`, so narrow outperformance shrinks
/// toward zero or turns negative. Underperformance passes through unchanged:
/// low breadth must never flip it positive.
pub fn bucket_score(strength: f64, breadth: f64) -> f64 {
    if strength >= 0.0 {
        strength * (2.0 * breadth - 1.0)
    } else {
        strength
    }
}

/// Aggregate excess returns over the configured buckets.
pub fn aggregate(excess: &HashMap<String, f64>, universe: &UniverseConfig) -> RiskMetrics {
    let mut buckets = Vec::with_capacity(universe.buckets.len());
    let mut present_assets: BTreeSet<&str> = BTreeSet::new();

    for bucket in &universe.buckets {
        let weight = universe.weight(&bucket.name);

        let returns: Vec<(&str, f64)> = bucket
            .assets
            .iter()
            .filter_map(|asset| excess.get(asset).map(|r| (asset.as_str(), *r)))
            .collect();

        if returns.is_empty() {
            buckets.push(BucketStats::empty(&bucket.name, weight));
            continue;
        }

        let n = returns.len() as f64;
        let strength = returns.iter().map(|(_, r)| r).sum::<f64>() / n;
        let outperforming = returns.iter().filter(|(_, r)| *r > 0.0).count();
        let breadth = outperforming as f64 / n;
        let score = bucket_score(strength, breadth);

        present_assets.extend(returns.iter().map(|(asset, _)| *asset));

        buckets.push(BucketStats {
            name: bucket.name.clone(),
            weight,
            present: returns.len(),
            strength,
            breadth,
            score,
            weighted_score: weight * score,
        });
    }

    let risk: f64 = buckets.iter().map(|b| b.weighted_score).sum();

    let breadth_total = if present_assets.is_empty() {
        0.0
    } else {
        let up = present_assets
            .iter()
            .filter(|asset| excess.get(**asset).is_some_and(|r| *r > 0.0))
            .count();
        up as f64 / present_assets.len() as f64
    };

    let abs_total: f64 = buckets.iter().map(|b| b.weighted_score.abs()).sum();
    let spec_conc = if abs_total > 0.0 {
        let memes = buckets
            .iter()
            .find(|b| b.name == universe.roles.memes)
            .map(|b| b.weighted_score)
            .unwrap_or(0.0);
        memes / abs_total
    } else {
        0.0
    };

    RiskMetrics {
        risk,
        breadth_total,
        spec_conc,
        buckets,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::universe::Bucket;

    fn excess(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(a, r)| (a.to_string(), *r)).collect()
    }

    fn two_bucket_universe() -> UniverseConfig {
        UniverseConfig::with_buckets(vec![
            Bucket::new("majors", &["eth", "sol"]),
            Bucket::new("memes", &["doge", "shib"]),
        ])
    }

    #[test]
    fn test_negative_strength_keeps_sign() {
        for breadth in [0.0, 0.25, 0.5, 1.0] {
            assert_eq!(bucket_score(-0.1, breadth), -0.1);
        }
    }

    #[test]
    fn test_positive_strength_breadth_penalty() {
        assert_eq!(bucket_score(0.2, 1.0), 0.2);
        assert_eq!(bucket_score(0.2, 0.5), 0.0);
        assert!((bucket_score(0.2, 0.25) - (-0.1)).abs() < 1e-12);
        assert!((bucket_score(0.2, 0.0) - (-0.2)).abs() < 1e-12);
        assert_eq!(bucket_score(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_bucket_stats() {
        let r = excess(&[("eth", 0.04), ("sol", -0.02), ("doge", 0.10)]);
        let m = aggregate(&r, &two_bucket_universe());

        let majors = m.bucket("majors").unwrap();
        assert_eq!(majors.present, 2);
        assert!((majors.strength - 0.01).abs() < 1e-12);
        assert_eq!(majors.breadth, 0.5);
        assert_eq!(majors.score, 0.0);

        // shib has no data and is excluded, not counted as zero
        let memes = m.bucket("memes").unwrap();
        assert_eq!(memes.present, 1);
        assert_eq!(memes.breadth, 1.0);
        assert!((memes.weighted_score - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_risk_is_weighted_sum() {
        let universe = UniverseConfig::with_buckets(vec![
            Bucket::new("majors", &["eth"]),
            Bucket::new("large_alts", &["ada", "avax"]),
            Bucket::new("midcaps", &["sui"]),
            Bucket::new("high_beta", &["pepe", "bonk"]),
            Bucket::new("memes", &["doge"]),
            Bucket::new("custom", &["xyz"]),
        ]);
        let r = excess(&[
            ("eth", 0.03),
            ("ada", -0.01),
            ("avax", 0.05),
            ("sui", -0.04),
            ("pepe", 0.2),
            ("bonk", -0.05),
            ("doge", 0.07),
            ("xyz", -0.3),
        ]);
        let m = aggregate(&r, &universe);

        let expected: f64 = m
            .buckets
            .iter()
            .map(|b| universe.weight(&b.name) * b.score)
            .sum();
        assert!((m.risk - expected).abs() < 1e-12);
        assert_eq!(m.bucket("custom").unwrap().weight, 1.0);
    }

    #[test]
    fn test_empty_bucket_contributes_nothing() {
        let r = excess(&[("eth", 0.05)]);
        let m = aggregate(&r, &two_bucket_universe());

        let memes = m.bucket("memes").unwrap();
        assert!(memes.is_empty());
        assert_eq!(memes.weighted_score, 0.0);
        assert_eq!(memes.weight, 5.0);
        assert!((m.risk - 0.05).abs() < 1e-12);
        assert_eq!(m.spec_conc, 0.0);
    }

    #[test]
    fn test_breadth_total_over_present_assets() {
        let r = excess(&[("eth", 0.01), ("sol", -0.01), ("doge", 0.02), ("unbucketed", 0.5)]);
        let m = aggregate(&r, &two_bucket_universe());
        // 2 of the 3 bucketed assets; unbucketed ids are ignored
        assert!((m.breadth_total - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_breadth_total_counts_shared_assets_once() {
        let universe = UniverseConfig::with_buckets(vec![
            Bucket::new("majors", &["eth", "sol"]),
            Bucket::new("midcaps", &["sol"]),
        ]);
        let r = excess(&[("eth", -0.01), ("sol", 0.01)]);
        let m = aggregate(&r, &universe);
        assert_eq!(m.breadth_total, 0.5);
    }

    #[test]
    fn test_no_data() {
        let m = aggregate(&HashMap::new(), &UniverseConfig::default());
        assert_eq!(m.risk, 0.0);
        assert_eq!(m.breadth_total, 0.0);
        assert_eq!(m.spec_conc, 0.0);
        assert_eq!(m.buckets.len(), 5);
    }

    #[test]
    fn test_flat_market_spec_conc_zero() {
        let r = excess(&[("eth", 0.0), ("sol", 0.0), ("doge", 0.0)]);
        let m = aggregate(&r, &two_bucket_universe());
        assert!(m.buckets.iter().all(|b| b.weighted_score == 0.0));
        assert_eq!(m.spec_conc, 0.0);
    }

    #[test]
    fn test_spec_conc_uses_role_name() {
        let mut universe = UniverseConfig::with_buckets(vec![
            Bucket::new("majors", &["eth"]),
            Bucket::new("degen", &["doge"]),
        ]);
        universe.weights.insert("degen".to_string(), 5.0);
        let r = excess(&[("eth", -0.05), ("doge", 0.05)]);

        // Default role name "memes" matches nothing
        assert_eq!(aggregate(&r, &universe).spec_conc, 0.0);

        universe.roles.memes = "degen".to_string();
        let m = aggregate(&r, &universe);
        assert!((m.spec_conc - 0.25 / 0.30).abs() < 1e-12);
    }
}
