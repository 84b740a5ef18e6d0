//! Market regime classifier.
//!
//! Scores a window of prices against the benchmark and walks an ordered rule
//! list to name the regime. Rules overlap; the first match wins.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::data::PricePoint;
use crate::returns::excess_returns;
use crate::universe::{BucketRoles, UniverseConfig};

use super::aggregation::{aggregate, BucketStats, RiskMetrics};
use super::labels::{Intensities, PrimaryRegime, Severity};

/// Named regime with its modifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Regime {
    pub primary: PrimaryRegime,
    pub description: String,
    pub modifier: Option<Severity>,
    /// Modifier, label and description joined for display.
    pub full: String,
}

impl Regime {
    pub fn new(primary: PrimaryRegime, modifier: Option<Severity>) -> Self {
        let description = primary.description();

        let mut parts: Vec<String> = Vec::with_capacity(3);
        if let Some(m) = modifier {
            parts.push(m.label().to_string());
        }
        parts.push(primary.label().to_string());
        if !description.is_empty() {
            parts.push(format!("— {}", description));
        }

        Self {
            primary,
            description: description.to_string(),
            modifier,
            full: parts.join(" "),
        }
    }
}

/// Full classification output for one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeResult {
    pub risk: f64,
    pub breadth_total: f64,
    pub spec_conc: f64,
    /// Benchmark log return over the window.
    pub btc_return: f64,
    pub buckets: Vec<BucketStats>,
    pub intensities: Intensities,
    pub regime: Regime,
}

impl RegimeResult {
    pub fn bucket(&self, name: &str) -> Option<&BucketStats> {
        self.buckets.iter().find(|b| b.name == name)
    }
}

/// Pick the primary regime for a set of metrics.
pub fn primary_regime(metrics: &RiskMetrics, roles: &BucketRoles) -> PrimaryRegime {
    let risk = metrics.risk;
    let breadth = metrics.breadth_total;
    let spec_conc = metrics.spec_conc;

    let majors = metrics.weighted_score(&roles.majors);
    let midcaps = metrics.weighted_score(&roles.midcaps);
    let memes = metrics.weighted_score(&roles.memes);

    if risk <= 0.4 && spec_conc > 0.5 && majors < 0.0 {
        PrimaryRegime::SpeculativeFlight
    } else if risk < -0.2 && memes < -0.1 && breadth < 0.2 {
        PrimaryRegime::LiquidationMode
    } else if risk > 0.0 && breadth > 0.5 && spec_conc < 0.6 {
        PrimaryRegime::BroadRiskOn
    } else if risk > 0.0 && spec_conc >= 0.6 {
        PrimaryRegime::DegenerateSend
    } else if risk.abs() < 0.05 && midcaps > majors && breadth > 0.3 {
        PrimaryRegime::RotationPhase
    } else if risk < 0.0 && majors < 0.0 && breadth < 0.4 {
        PrimaryRegime::StructuralRiskOff
    } else if risk > 0.0 {
        PrimaryRegime::ScattershotRiskOn
    } else {
        PrimaryRegime::BleedingRiskOff
    }
}

/// Regime classifier bound to a universe.
#[derive(Debug, Clone)]
pub struct RegimeClassifier {
    universe: UniverseConfig,
}

impl RegimeClassifier {
    pub fn new(universe: UniverseConfig) -> Self {
        Self { universe }
    }

    pub fn universe(&self) -> &UniverseConfig {
        &self.universe
    }

    /// Classify one window.
    ///
    /// `benchmark` must be the benchmark's price point for the same window;
    /// use `classify_window` to look it up from the window itself.
    pub fn classify(&self, window: &HashMap<String, PricePoint>, benchmark: &PricePoint) -> RegimeResult {
        let excess = excess_returns(window, &self.universe.benchmark, benchmark);
        let metrics = aggregate(&excess, &self.universe);

        let intensities = Intensities::new(metrics.risk, metrics.breadth_total, metrics.spec_conc);
        let primary = primary_regime(&metrics, &self.universe.roles);
        let regime = Regime::new(primary, Severity::from_risk(metrics.risk));

        RegimeResult {
            risk: metrics.risk,
            breadth_total: metrics.breadth_total,
            spec_conc: metrics.spec_conc,
            btc_return: benchmark.log_return(),
            buckets: metrics.buckets,
            intensities,
            regime,
        }
    }

    /// Classify one window, or `None` if it has no benchmark price.
    pub fn classify_window(&self, window: &HashMap<String, PricePoint>) -> Option<RegimeResult> {
        let benchmark = window.get(&self.universe.benchmark)?;
        Some(self.classify(window, benchmark))
    }
}
