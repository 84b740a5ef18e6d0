//! Log returns and benchmark-relative excess returns.

use std::collections::HashMap;

use crate::data::PricePoint;

/// Natural log return over a window.
///
/// A zero previous price yields 0.0 instead of an infinite return.
pub fn log_return(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    (current / previous).ln()
}

impl PricePoint {
    pub fn log_return(&self) -> f64 {
        log_return(self.current, self.previous)
    }
}

/// Asset log return minus benchmark log return.
pub fn excess_return(asset: &PricePoint, benchmark: &PricePoint) -> f64 {
    asset.log_return() - benchmark.log_return()
}

/// Excess return for every asset in the window except the benchmark.
///
/// Assets absent from `window` are absent from the result.
pub fn excess_returns(
    window: &HashMap<String, PricePoint>,
    benchmark_id: &str,
    benchmark: &PricePoint,
) -> HashMap<String, f64> {
    let benchmark_return = benchmark.log_return();

    window
        .iter()
        .filter(|(asset, _)| asset.as_str() != benchmark_id)
        .map(|(asset, point)| (asset.clone(), point.log_return() - benchmark_return))
        .collect()
}
