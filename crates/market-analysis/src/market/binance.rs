//! Binance Market Data Client
//!
//! Klines endpoint for the crypto venue. No authentication needed for
//! market data. Rows come back as positional arrays with prices encoded as
//! strings.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;

use super::{FetchWindow, MarketDataClient, FETCH_TIMEOUT};
use crate::bar::Bar;
use crate::error::{AnalysisError, Result};
use crate::instrument::Instrument;

const BINANCE_KLINES_URL: &str = "https://api.binance.com/api/v3/klines";

pub struct BinanceClient {
    client: Client,
    base_url: String,
}

impl BinanceClient {
    pub fn new() -> Self {
        Self::with_base_url(BINANCE_KLINES_URL.to_string())
    }

    /// Custom base URL (for testing).
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(FETCH_TIMEOUT)
                .build()
                .expect("failed to build reqwest client"),
            base_url,
        }
    }
}

impl Default for BinanceClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataClient for BinanceClient {
    fn name(&self) -> &str {
        "binance"
    }

    async fn fetch_bars(&self, instrument: &Instrument, window: &FetchWindow) -> Result<Vec<Bar>> {
        // "BTC/USDT" on the wire is "BTCUSDT"
        let symbol = instrument.symbol.replace('/', "");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("symbol", symbol.as_str()),
                ("interval", window.interval.token()),
                ("limit", &window.limit.to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Api { status, message });
        }

        let rows: Vec<Vec<Value>> = response
            .json()
            .await
            .map_err(|e| AnalysisError::Malformed(format!("kline body: {e}")))?;

        parse_klines(&rows)
    }
}

/// Positional kline row layout:
/// `[open_time_ms, open, high, low, close, volume, close_time, ...]`
/// with prices and volume as strings.
fn parse_klines(rows: &[Vec<Value>]) -> Result<Vec<Bar>> {
    let mut bars = Vec::with_capacity(rows.len());

    for row in rows {
        if row.len() < 6 {
            return Err(AnalysisError::Malformed(format!(
                "kline row has {} fields, expected at least 6",
                row.len()
            )));
        }

        let open_time = row[0]
            .as_i64()
            .ok_or_else(|| AnalysisError::Malformed("kline open time is not an integer".into()))?;
        let timestamp = Utc
            .timestamp_millis_opt(open_time)
            .single()
            .ok_or_else(|| AnalysisError::Malformed(format!("invalid kline timestamp: {open_time}")))?;

        bars.push(Bar {
            timestamp,
            open: decimal_field(&row[1], "open")?,
            high: decimal_field(&row[2], "high")?,
            low: decimal_field(&row[3], "low")?,
            close: decimal_field(&row[4], "close")?,
            volume: decimal_field(&row[5], "volume")?,
        });
    }

    bars.sort_by_key(|b| b.timestamp);
    Ok(bars)
}

fn decimal_field(value: &Value, field: &str) -> Result<Decimal> {
    let text = value
        .as_str()
        .ok_or_else(|| AnalysisError::Malformed(format!("kline {field} is not a string")))?;
    text.parse::<Decimal>()
        .map_err(|e| AnalysisError::Malformed(format!("kline {field} {text:?}: {e}")))
}
