//! Regime report module.
//!
//! Provides:
//! - Per-timeframe evaluation of a market snapshot
//! - Summary table and single-window deep dive rendering

pub mod builder;
pub mod formatter;

pub use builder::{build_report, evaluate_window, RegimeReport, WindowOutcome, WindowReport};
pub use formatter::{render_detail, render_summary};
