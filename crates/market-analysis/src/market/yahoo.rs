//! Yahoo Finance Market Data Client
//!
//! Chart endpoint for the generic venue: equities, futures-style commodity
//! codes, forex tickers. No authentication required. The body is columnar -
//! one timestamp array plus parallel open/high/low/close/volume arrays that
//! may contain nulls for halted intervals; null rows are skipped rather than
//! zero-filled.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::{FetchWindow, MarketDataClient, FETCH_TIMEOUT};
use crate::bar::Bar;
use crate::error::{AnalysisError, Result};
use crate::instrument::Instrument;

const YAHOO_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

pub struct YahooClient {
    client: Client,
    base_url: String,
}

impl YahooClient {
    pub fn new() -> Self {
        Self::with_base_url(YAHOO_CHART_URL.to_string())
    }

    /// Custom base URL (for testing).
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: Client::builder()
                .user_agent("Mozilla/5.0")
                .timeout(FETCH_TIMEOUT)
                .build()
                .expect("failed to build reqwest client"),
            base_url,
        }
    }
}

impl Default for YahooClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketDataClient for YahooClient {
    fn name(&self) -> &str {
        "yahoo-finance"
    }

    async fn fetch_bars(&self, instrument: &Instrument, window: &FetchWindow) -> Result<Vec<Bar>> {
        // The chart endpoint takes an absolute unix range, so derive it from
        // the requested trailing window.
        let span = window.interval.seconds() * window.limit as i64;
        let end_ts = Utc::now().timestamp();
        let start_ts = end_ts - span;

        let response = self
            .client
            .get(format!("{}/{}", self.base_url, instrument.symbol))
            .query(&[
                ("period1", start_ts.to_string().as_str()),
                ("period2", end_ts.to_string().as_str()),
                ("interval", window.interval.token()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Api { status, message });
        }

        let body: ChartResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::Malformed(format!("chart body: {e}")))?;

        parse_chart(body)
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<QuoteColumns>,
}

#[derive(Debug, Deserialize)]
struct QuoteColumns {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<f64>>,
}

fn parse_chart(body: ChartResponse) -> Result<Vec<Bar>> {
    if let Some(error) = body.chart.error {
        return Err(AnalysisError::Api {
            status: 0,
            message: format!("{}: {}", error.code, error.description),
        });
    }

    let results = body
        .chart
        .result
        .ok_or_else(|| AnalysisError::Malformed("chart has neither result nor error".into()))?;

    let Some(result) = results.first() else {
        return Ok(Vec::new());
    };

    let timestamps = result
        .timestamp
        .as_ref()
        .ok_or_else(|| AnalysisError::Malformed("chart result missing timestamps".into()))?;

    let Some(quote) = result.indicators.quote.first() else {
        return Ok(Vec::new());
    };

    let mut bars = Vec::with_capacity(timestamps.len());

    for (i, &ts) in timestamps.iter().enumerate() {
        // Any missing price voids the whole row.
        let (Some(open), Some(high), Some(low), Some(close)) = (
            column(&quote.open, i),
            column(&quote.high, i),
            column(&quote.low, i),
            column(&quote.close, i),
        ) else {
            continue;
        };

        let timestamp = Utc
            .timestamp_opt(ts, 0)
            .single()
            .ok_or_else(|| AnalysisError::Malformed(format!("invalid unix timestamp: {ts}")))?;

        bars.push(Bar {
            timestamp,
            open: to_decimal(open)?,
            high: to_decimal(high)?,
            low: to_decimal(low)?,
            close: to_decimal(close)?,
            volume: to_decimal(column(&quote.volume, i).unwrap_or(0.0))?,
        });
    }

    bars.sort_by_key(|b| b.timestamp);
    Ok(bars)
}

fn column(values: &[Option<f64>], index: usize) -> Option<f64> {
    values.get(index).copied().flatten()
}

fn to_decimal(value: f64) -> Result<Decimal> {
    Decimal::try_from(value)
        .map_err(|e| AnalysisError::Malformed(format!("invalid decimal value {value}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_chart_rows() {
        let json = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1736942400, 1736946000],
                    "indicators": {
                        "quote": [{
                            "open": [150.12, 150.99],
                            "high": [151.50, 152.00],
                            "low": [149.00, 150.50],
                            "close": [150.99, 151.75],
                            "volume": [1000, 2000]
                        }]
                    }
                }],
                "error": null
            }
        }"#;

        let body: ChartResponse = serde_json::from_str(json).unwrap();
        let bars = parse_chart(body).unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].volume, dec!(1000));
        assert!(bars[0].close > dec!(150.9) && bars[0].close < dec!(151.0));
    }

    #[test]
    fn parse_skips_null_rows() {
        let json = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1736942400, 1736946000, 1736949600],
                    "indicators": {
                        "quote": [{
                            "open": [150.12, null, 151.00],
                            "high": [151.50, null, 152.00],
                            "low": [149.00, null, 150.50],
                            "close": [150.99, null, 151.75],
                            "volume": [1000, null, 2000]
                        }]
                    }
                }],
                "error": null
            }
        }"#;

        let body: ChartResponse = serde_json::from_str(json).unwrap();
        let bars = parse_chart(body).unwrap();
        assert_eq!(bars.len(), 2);
    }

    #[test]
    fn parse_error_body_is_api_error() {
        let json = r#"{
            "chart": {
                "result": null,
                "error": {
                    "code": "Not Found",
                    "description": "No data found, symbol may be delisted"
                }
            }
        }"#;

        let body: ChartResponse = serde_json::from_str(json).unwrap();
        let err = parse_chart(body).unwrap_err();
        assert!(matches!(err, AnalysisError::Api { .. }));
        assert!(err.to_string().contains("Not Found"));
    }

    #[test]
    fn parse_empty_result_list_yields_no_bars() {
        let json = r#"{"chart": {"result": [], "error": null}}"#;
        let body: ChartResponse = serde_json::from_str(json).unwrap();
        assert!(parse_chart(body).unwrap().is_empty());
    }
}
