pub mod data;
pub mod regime;
pub mod report;
pub mod returns;
pub mod universe;

// Re-export commonly used types
pub use data::{CoinGeckoClient, MarketSnapshot, PricePoint, Timeframe};
pub use regime::{BucketStats, PrimaryRegime, Regime, RegimeClassifier, RegimeResult, Severity};
pub use report::{build_report, RegimeReport};
pub use returns::{excess_returns, log_return};
pub use universe::{Bucket, UniverseConfig};
