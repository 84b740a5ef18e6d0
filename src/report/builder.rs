//! Multi-timeframe report assembly.
//!
//! Evaluates every window of a snapshot independently. The classifier holds
//! only immutable configuration, so windows run in parallel.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::data::{MarketSnapshot, Timeframe};
use crate::regime::{RegimeClassifier, RegimeResult};

/// Outcome for a single window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WindowOutcome {
    Classified(RegimeResult),
    /// The benchmark has no price for this window.
    MissingBenchmark,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowReport {
    pub timeframe: Timeframe,
    /// Number of assets with data in this window, benchmark included.
    pub assets: usize,
    pub outcome: WindowOutcome,
}

impl WindowReport {
    pub fn result(&self) -> Option<&RegimeResult> {
        match &self.outcome {
            WindowOutcome::Classified(result) => Some(result),
            WindowOutcome::MissingBenchmark => None,
        }
    }
}

/// Regime report across windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeReport {
    pub generated_at: DateTime<Utc>,
    pub benchmark: String,
    /// Windows in the order requested.
    pub windows: Vec<WindowReport>,
}

impl RegimeReport {
    pub fn window(&self, timeframe: Timeframe) -> Option<&WindowReport> {
        self.windows.iter().find(|w| w.timeframe == timeframe)
    }

    /// Classification for a window, if the window was classified.
    pub fn result(&self, timeframe: Timeframe) -> Option<&RegimeResult> {
        self.window(timeframe).and_then(|w| w.result())
    }
}

/// Classify one window of a snapshot.
pub fn evaluate_window(
    classifier: &RegimeClassifier,
    snapshot: &MarketSnapshot,
    timeframe: Timeframe,
) -> WindowReport {
    let window = snapshot.window(timeframe);
    let assets = window.len();

    let outcome = match classifier.classify_window(&window) {
        Some(result) => {
            info!(
                "{}: RISK {:.4} over {} assets -> {}",
                timeframe, result.risk, assets, result.regime.full
            );
            WindowOutcome::Classified(result)
        }
        None => {
            warn!(
                "{}: no {} price, window skipped",
                timeframe,
                classifier.universe().benchmark
            );
            WindowOutcome::MissingBenchmark
        }
    };

    WindowReport {
        timeframe,
        assets,
        outcome,
    }
}

/// Classify every requested window.
pub fn build_report(
    classifier: &RegimeClassifier,
    snapshot: &MarketSnapshot,
    timeframes: &[Timeframe],
) -> RegimeReport {
    let windows: Vec<WindowReport> = timeframes
        .par_iter()
        .map(|tf| evaluate_window(classifier, snapshot, *tf))
        .collect();

    RegimeReport {
        generated_at: Utc::now(),
        benchmark: classifier.universe().benchmark.clone(),
        windows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PricePoint;
    use crate::regime::PrimaryRegime;
    use crate::universe::{Bucket, UniverseConfig};

    fn classifier() -> RegimeClassifier {
        RegimeClassifier::new(UniverseConfig::with_buckets(vec![
            Bucket::new("majors", &["ethereum"]),
            Bucket::new("memes", &["dogecoin"]),
        ]))
    }

    fn snapshot() -> MarketSnapshot {
        let mut s = MarketSnapshot::new();
        for tf in [Timeframe::OneHour, Timeframe::OneDay] {
            s.insert("bitcoin", tf, PricePoint { current: 100.0, previous: 100.0 });
        }
        s.insert("ethereum", Timeframe::OneDay, PricePoint { current: 105.0, previous: 100.0 });
        s.insert("dogecoin", Timeframe::OneDay, PricePoint { current: 110.0, previous: 100.0 });
        s.insert("ethereum", Timeframe::SevenDays, PricePoint { current: 90.0, previous: 100.0 });
        s
    }

    #[test]
    fn test_report_preserves_window_order() {
        let report = build_report(&classifier(), &snapshot(), &Timeframe::ALL);
        let order: Vec<Timeframe> = report.windows.iter().map(|w| w.timeframe).collect();
        assert_eq!(order, Timeframe::ALL.to_vec());
        assert_eq!(report.benchmark, "bitcoin");
    }

    #[test]
    fn test_missing_benchmark_window() {
        let report = build_report(&classifier(), &snapshot(), &Timeframe::ALL);
        let week = report.window(Timeframe::SevenDays).unwrap();
        assert_eq!(week.outcome, WindowOutcome::MissingBenchmark);
        assert!(report.result(Timeframe::SevenDays).is_none());
    }

    #[test]
    fn test_classified_windows() {
        let report = build_report(&classifier(), &snapshot(), &Timeframe::ALL);

        let day = report.result(Timeframe::OneDay).unwrap();
        assert!((day.risk - 0.52534).abs() < 1e-4);
        assert_eq!(report.window(Timeframe::OneDay).unwrap().assets, 3);

        // Only the benchmark has 1h data
        let hour = report.result(Timeframe::OneHour).unwrap();
        assert_eq!(hour.risk, 0.0);
        assert_eq!(hour.regime.primary, PrimaryRegime::BleedingRiskOff);
    }

    #[test]
    fn test_report_json() {
        let report = build_report(&classifier(), &snapshot(), &[Timeframe::OneDay, Timeframe::SevenDays]);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["windows"][0]["timeframe"], "24h");
        assert_eq!(json["windows"][0]["outcome"]["status"], "classified");
        assert_eq!(json["windows"][1]["outcome"]["status"], "missing_benchmark");
    }
}
