//! Core price types for regime scoring.
//!
//! A `MarketSnapshot` holds, for every asset, one `PricePoint` per lookback
//! window. The classifier consumes one window at a time.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Lookback window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "24h")]
    OneDay,
    #[serde(rename = "7d")]
    SevenDays,
}

impl Timeframe {
    /// All windows, shortest first.
    pub const ALL: [Timeframe; 3] = [Self::OneHour, Self::OneDay, Self::SevenDays];

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "1h" => Some(Self::OneHour),
            "24h" | "1d" => Some(Self::OneDay),
            "7d" => Some(Self::SevenDays),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneHour => "1h",
            Self::OneDay => "24h",
            Self::SevenDays => "7d",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current and previous price of one asset over one window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub current: f64,
    pub previous: f64,
}

impl PricePoint {
    /// Build a price point, rejecting non-finite values.
    pub fn new(current: f64, previous: f64) -> Option<Self> {
        if current.is_finite() && previous.is_finite() {
            Some(Self { current, previous })
        } else {
            None
        }
    }

    /// Derive the previous price from a percentage change over the window.
    ///
    /// A missing percentage is read as no change. Returns `None` when the
    /// implied previous price is not finite (e.g. a -100% change).
    pub fn from_pct_change(current: f64, pct_change: Option<f64>) -> Option<Self> {
        let previous = match pct_change {
            Some(pct) => current / (1.0 + pct / 100.0),
            None => current,
        };
        Self::new(current, previous)
    }
}

/// Prices for every tracked asset across every window.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Asset id -> window -> price point.
    pub assets: HashMap<String, HashMap<Timeframe, PricePoint>>,
}

impl MarketSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a price point for an asset in a window.
    pub fn insert(&mut self, asset: &str, timeframe: Timeframe, point: PricePoint) {
        self.assets
            .entry(asset.to_string())
            .or_default()
            .insert(timeframe, point);
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Slice out a single window. Assets without data for it are absent.
    pub fn window(&self, timeframe: Timeframe) -> HashMap<String, PricePoint> {
        self.assets
            .iter()
            .filter_map(|(asset, windows)| {
                windows
                    .get(&timeframe)
                    .map(|point| (asset.clone(), *point))
            })
            .collect()
    }
}
