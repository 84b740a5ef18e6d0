//! CoinGecko API client for current prices and windowed percentage changes.
//!
//! One `/coins/markets` request returns the current price of every requested
//! id together with its 1h, 24h and 7d percentage change, which is enough to
//! reconstruct a `PricePoint` per window.
//!
//! API Constraints:
//! - Page size: 250 ids per request
//! - Public tier rate limit: roughly 30 requests/minute

use std::time::{Duration, Instant};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use super::types::{MarketSnapshot, PricePoint, Timeframe};

/// CoinGecko API base URL.
const BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Maximum ids per `/coins/markets` page.
pub const MAX_IDS_PER_REQUEST: usize = 250;

/// Request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Minimum interval between requests (2s = 30 req/min).
const MIN_REQUEST_INTERVAL: Duration = Duration::from_secs(2);

/// Header carrying a demo-tier API key.
const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// CoinGecko API errors.
#[derive(Error, Debug)]
pub enum CoinGeckoError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// One row of the `/coins/markets` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketRecord {
    pub id: String,

    #[serde(default)]
    pub symbol: Option<String>,

    #[serde(default)]
    pub current_price: Option<f64>,

    #[serde(default)]
    pub price_change_percentage_1h_in_currency: Option<f64>,

    /// The 24h change lives under the plain field name.
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,

    #[serde(default)]
    pub price_change_percentage_7d_in_currency: Option<f64>,
}

impl MarketRecord {
    /// Percentage change for a window, if reported.
    pub fn pct_change(&self, timeframe: Timeframe) -> Option<f64> {
        match timeframe {
            Timeframe::OneHour => self.price_change_percentage_1h_in_currency,
            Timeframe::OneDay => self.price_change_percentage_24h,
            Timeframe::SevenDays => self.price_change_percentage_7d_in_currency,
        }
    }

    /// Price point for a window.
    pub fn price_point(&self, timeframe: Timeframe) -> Option<PricePoint> {
        PricePoint::from_pct_change(self.current_price?, self.pct_change(timeframe))
    }
}

/// Convert `/coins/markets` rows into a snapshot.
///
/// Rows without a current price are skipped entirely; windows whose implied
/// previous price is not finite are dropped for that asset only.
pub fn records_to_snapshot(records: &[MarketRecord]) -> MarketSnapshot {
    let mut snapshot = MarketSnapshot::new();

    for record in records {
        if record.current_price.is_none() {
            debug!("{}: no current price, skipping", record.id);
            continue;
        }

        for timeframe in Timeframe::ALL {
            match record.price_point(timeframe) {
                Some(point) => snapshot.insert(&record.id, timeframe, point),
                None => debug!("{} {}: degenerate price change, skipping", record.id, timeframe),
            }
        }
    }

    snapshot
}

/// Parse a saved `/coins/markets` response body.
pub fn parse_markets(body: &str) -> Result<Vec<MarketRecord>, CoinGeckoError> {
    serde_json::from_str(body)
        .map_err(|e| CoinGeckoError::InvalidResponse(format!("Failed to parse markets: {}", e)))
}

/// CoinGecko API client.
pub struct CoinGeckoClient {
    client: Client,
    api_key: Option<String>,
    last_request: Option<Instant>,
    request_count: u64,
}

impl CoinGeckoClient {
    /// Create a new client. An API key, when given, is sent on every request.
    pub fn new(api_key: Option<String>) -> Result<Self, CoinGeckoError> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_key,
            last_request: None,
            request_count: 0,
        })
    }

    /// Rate-limited request helper.
    async fn request<T: for<'de> Deserialize<'de>>(
        &mut self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, CoinGeckoError> {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < MIN_REQUEST_INTERVAL {
                tokio::time::sleep(MIN_REQUEST_INTERVAL - elapsed).await;
            }
        }

        let url = format!("{}/{}", BASE_URL, endpoint);
        let mut builder = self.client.get(&url).query(params);
        if let Some(key) = &self.api_key {
            builder = builder.header(API_KEY_HEADER, key);
        }

        let response = builder.send().await?;

        self.last_request = Some(Instant::now());
        self.request_count += 1;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(CoinGeckoError::RateLimitExceeded);
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(CoinGeckoError::ApiError(format!("{}: {}", status, text)));
        }

        response.json().await.map_err(|e| {
            CoinGeckoError::InvalidResponse(format!("Failed to parse response: {}", e))
        })
    }

    /// Get request count for monitoring.
    pub fn request_count(&self) -> u64 {
        self.request_count
    }

    /// Fetch market rows for the given ids, one page per 250 ids.
    pub async fn get_markets(&mut self, ids: &[String]) -> Result<Vec<MarketRecord>, CoinGeckoError> {
        let mut records = Vec::with_capacity(ids.len());

        for chunk in ids.chunks(MAX_IDS_PER_REQUEST) {
            let ids_str = chunk.join(",");
            let per_page = MAX_IDS_PER_REQUEST.to_string();
            let params = [
                ("vs_currency", "usd"),
                ("ids", ids_str.as_str()),
                ("order", "market_cap_desc"),
                ("per_page", per_page.as_str()),
                ("page", "1"),
                ("sparkline", "false"),
                ("price_change_percentage", "1h,24h,7d"),
            ];

            let page: Vec<MarketRecord> = self.request("coins/markets", &params).await?;
            if page.len() < chunk.len() {
                warn!(
                    "CoinGecko returned {} of {} requested ids",
                    page.len(),
                    chunk.len()
                );
            }
            records.extend(page);
        }

        Ok(records)
    }

    /// Fetch a snapshot of every window for the given ids.
    pub async fn fetch_snapshot(&mut self, ids: &[String]) -> Result<MarketSnapshot, CoinGeckoError> {
        let records = self.get_markets(ids).await?;
        Ok(records_to_snapshot(&records))
    }
}
