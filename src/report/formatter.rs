//! Plain-text rendering of regime reports.

use crate::data::Timeframe;
use crate::regime::RegimeResult;

use super::builder::{RegimeReport, WindowOutcome};

const WIDE_RULE: &str = "============================================================";
const NARROW_RULE: &str = "---------------------------------------------";

/// Format a ratio as a percentage with two decimals.
fn pct(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// One line per window: timeframe, RISK and the full regime string.
pub fn render_summary(report: &RegimeReport) -> String {
    let mut out = String::new();

    out.push_str(WIDE_RULE);
    out.push('\n');
    out.push_str(&format!("{:<10} {:<10} {}\n", "TIMEFRAME", "RISK", "REGIME"));
    out.push_str(WIDE_RULE);
    out.push('\n');

    for window in &report.windows {
        match &window.outcome {
            WindowOutcome::Classified(result) => {
                out.push_str(&format!(
                    "{:<10} {:<10.4} {}\n",
                    window.timeframe.as_str(),
                    result.risk,
                    result.regime.full
                ));
            }
            WindowOutcome::MissingBenchmark => {
                out.push_str(&format!(
                    "{:<10} {:<10} (Missing BTC data)\n",
                    window.timeframe.as_str(),
                    "N/A"
                ));
            }
        }
    }

    out.push_str(WIDE_RULE);
    out.push('\n');
    out
}

/// Intensities, auxiliary metrics and the per-bucket breakdown for one window.
pub fn render_detail(timeframe: Timeframe, result: &RegimeResult) -> String {
    let mut out = String::new();

    out.push_str(&format!("--- {} Deep Dive ---\n", timeframe));
    out.push_str(&format!("Risk Level:     {}\n", result.intensities.risk_level.label()));
    out.push_str(&format!("Participation:  {}\n", result.intensities.participation.label()));
    out.push_str(&format!("Structure:      {}\n", result.intensities.structure.label()));
    out.push('\n');
    out.push_str(&format!("Breadth:    {}\n", pct(result.breadth_total)));
    out.push_str(&format!("Spec Conc:  {:.2}\n", result.spec_conc));
    out.push_str(&format!("BTC Return: {}\n", pct(result.btc_return)));

    out.push_str("\nBucket Breakdown:\n");
    out.push_str(&format!("{:<15} {:<20} {}\n", "Bucket", "Score (weighted)", "Raw Q"));
    out.push_str(NARROW_RULE);
    out.push('\n');
    for bucket in &result.buckets {
        out.push_str(&format!(
            "{:<15} {:<20.4} {:.4}\n",
            bucket.name, bucket.weighted_score, bucket.score
        ));
    }

    out
}
