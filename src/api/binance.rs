use crate::models::Tick;
use crate::Result;
use chrono::DateTime;
use reqwest::Client;
use serde::Deserialize;
use tokio::time::{sleep, Duration};

const BINANCE_API_BASE: &str = "https://api.binance.com";
const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 2000;

/// Client for the Binance public market-data API
///
/// Polls the latest 1-minute kline and maps it to a [`Tick`]: close as
/// the ask, plus the bar's high and low.
#[derive(Clone)]
pub struct BinanceClient {
    client: Client,
    base_url: String,
}

/// Kline row: open time, OHLCV strings, close time, then fields we ignore
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct KlineRow(
    i64,
    String,
    String,
    String,
    String,
    String,
    i64,
    serde_json::Value,
    serde_json::Value,
    serde_json::Value,
    serde_json::Value,
    serde_json::Value,
);

impl BinanceClient {
    pub fn new() -> Self {
        Self::with_base_url(BINANCE_API_BASE.to_string())
    }

    /// Override the endpoint, used by tests against a local mock server
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Fetch the latest tick for a symbol
    ///
    /// Retries transient failures with exponential backoff.
    pub async fn latest_tick(&self, symbol: &str) -> Result<Tick> {
        let mut last_error = None;

        for attempt in 1..=MAX_RETRIES {
            match self.fetch_once(symbol).await {
                Ok(tick) => {
                    if attempt > 1 {
                        tracing::info!("Fetched {} after {} attempts", symbol, attempt);
                    }
                    return Ok(tick);
                }
                Err(e) => {
                    last_error = Some(e);

                    if attempt < MAX_RETRIES {
                        let backoff_ms = INITIAL_BACKOFF_MS * 2_u64.pow(attempt - 1);
                        tracing::warn!(
                            "Attempt {}/{} failed for {}: {}. Retrying in {}ms...",
                            attempt,
                            MAX_RETRIES,
                            symbol,
                            last_error.as_ref().map(|e| e.to_string()).unwrap_or_default(),
                            backoff_ms
                        );
                        sleep(Duration::from_millis(backoff_ms)).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| "All retry attempts failed".into()))
    }

    async fn fetch_once(&self, symbol: &str) -> Result<Tick> {
        let url = format!("{}/api/v3/klines", self.base_url);

        let rows: Vec<KlineRow> = self
            .client
            .get(&url)
            .query(&[("symbol", symbol), ("interval", "1m"), ("limit", "1")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let row = rows.into_iter().next().ok_or("Empty kline response")?;

        Ok(Tick {
            ask: row.4.parse()?,
            high: row.2.parse()?,
            low: row.3.parse()?,
            bid: None,
            timestamp: DateTime::from_timestamp_millis(row.6),
        })
    }
}

impl Default for BinanceClient {
    fn default() -> Self {
        Self::new()
    }
}
