//! Mock Market Data
//!
//! Deterministic synthetic bars for tests and offline demo runs. Selected
//! explicitly - a real provider failing never falls back to this client, so
//! a caller can always tell synthetic data from a genuine outage.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{FetchWindow, MarketDataClient};
use crate::bar::Bar;
use crate::error::Result;
use crate::instrument::Instrument;

/// Fixed epoch for the first synthetic bar; keeps generated windows
/// reproducible run to run.
const MOCK_EPOCH: i64 = 1_700_000_000;

/// Per-step drift cycle: mixed gains and losses with a mild net uptrend, so
/// RSI lands strictly inside (0, 100) and the trend is stable.
const DRIFT_CYCLE: [Decimal; 5] = [
    dec!(1.006),
    dec!(0.997),
    dec!(1.005),
    dec!(0.998),
    dec!(1.004),
];

pub struct MockMarketData {
    label: &'static str,
}

impl Default for MockMarketData {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMarketData {
    pub fn new() -> Self {
        Self { label: "mock" }
    }

    /// Realistic-looking anchor price for known symbols.
    fn base_price(symbol: &str) -> Decimal {
        let base = symbol.split('/').next().unwrap_or(symbol);
        match base {
            "BTC" => dec!(97500),
            "ETH" => dec!(3450),
            "SOL" => dec!(195),
            "ADA" => dec!(0.95),
            "XRP" => dec!(2.35),
            "DOGE" => dec!(0.38),
            "DOT" => dec!(7.20),
            "BNB" => dec!(695),
            "MATIC" => dec!(0.52),
            "AAPL" => dec!(190),
            "TSLA" => dec!(245),
            "MSFT" => dec!(375),
            "AMZN" => dec!(150),
            "GOOGL" => dec!(140),
            "NVDA" => dec!(135),
            "META" => dec!(560),
            "GC=F" => dec!(2034),
            "SI=F" => dec!(24.5),
            "CL=F" => dec!(78),
            "EURUSD=X" => dec!(1.0956),
            "INR=X" => dec!(83.25),
            _ => dec!(100),
        }
    }
}

#[async_trait]
impl MarketDataClient for MockMarketData {
    fn name(&self) -> &str {
        self.label
    }

    async fn fetch_bars(&self, instrument: &Instrument, window: &FetchWindow) -> Result<Vec<Bar>> {
        let step = window.interval.seconds();
        let mut close = Self::base_price(&instrument.symbol);
        let mut bars = Vec::with_capacity(window.limit);

        for i in 0..window.limit {
            let open = close;
            close = open * DRIFT_CYCLE[i % DRIFT_CYCLE.len()];

            let (upper, lower) = if close >= open { (close, open) } else { (open, close) };
            let timestamp = Utc
                .timestamp_opt(MOCK_EPOCH + i as i64 * step, 0)
                .single()
                .unwrap_or_else(Utc::now);

            bars.push(Bar {
                timestamp,
                open,
                high: upper * dec!(1.002),
                low: lower * dec!(0.998),
                close,
                volume: dec!(1000) + Decimal::from(i as u64 % 50) * dec!(10),
            });
        }

        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Snapshot;

    #[tokio::test]
    async fn generates_the_requested_window() {
        let mock = MockMarketData::new();
        let window = FetchWindow::default();
        let bars = mock
            .fetch_bars(&Instrument::crypto("BTC", "USDT"), &window)
            .await
            .unwrap();

        assert_eq!(bars.len(), window.limit);
        assert!(bars.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert!(bars.iter().all(|b| b.low <= b.open && b.low <= b.close));
        assert!(bars.iter().all(|b| b.high >= b.open && b.high >= b.close));
    }

    #[tokio::test]
    async fn output_is_deterministic() {
        let mock = MockMarketData::new();
        let window = FetchWindow::default();
        let instrument = Instrument::generic("AAPL");

        let a = mock.fetch_bars(&instrument, &window).await.unwrap();
        let b = mock.fetch_bars(&instrument, &window).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn window_supports_a_full_snapshot() {
        let mock = MockMarketData::new();
        let bars = mock
            .fetch_bars(&Instrument::crypto("ETH", "USDT"), &FetchWindow::default())
            .await
            .unwrap();

        let snap = Snapshot::compute("mock", &bars).unwrap();
        assert!(snap.rsi > Decimal::ZERO && snap.rsi < Decimal::ONE_HUNDRED);
        assert!(snap.stop_loss < snap.price && snap.price < snap.take_profit);
    }
}
