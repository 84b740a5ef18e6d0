pub mod coingecko;
pub mod types;

pub use coingecko::{parse_markets, records_to_snapshot, CoinGeckoClient, CoinGeckoError, MarketRecord};
pub use types::{MarketSnapshot, PricePoint, Timeframe};
