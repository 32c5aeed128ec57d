//! Market Data Fetching
//!
//! Venue-dispatched OHLC retrieval. Every provider normalizes its wire shape
//! into [`Bar`]s; the router picks the provider for an instrument's venue,
//! applies one bounded retry on transient failures, and rejects empty result
//! sets so the rest of the pipeline only ever sees usable windows.

mod binance;
mod mock;
mod yahoo;

pub use binance::BinanceClient;
pub use mock::MockMarketData;
pub use yahoo::YahooClient;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::bar::Bar;
use crate::error::Result;
use crate::instrument::{Instrument, Venue};

/// Request timeout applied to every provider HTTP call.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Bar sampling interval.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BarInterval {
    OneMinute,
    FiveMinutes,
    OneHour,
    OneDay,
}

impl BarInterval {
    /// Interval token in Binance kline notation ("1h"); Yahoo happens to use
    /// the same tokens for these intervals.
    pub fn token(self) -> &'static str {
        match self {
            Self::OneMinute => "1m",
            Self::FiveMinutes => "5m",
            Self::OneHour => "1h",
            Self::OneDay => "1d",
        }
    }

    pub fn seconds(self) -> i64 {
        match self {
            Self::OneMinute => 60,
            Self::FiveMinutes => 300,
            Self::OneHour => 3_600,
            Self::OneDay => 86_400,
        }
    }
}

impl std::fmt::Display for BarInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// The trailing window a fetch asks for.
#[derive(Clone, Copy, Debug)]
pub struct FetchWindow {
    pub interval: BarInterval,
    pub limit: usize,
}

impl Default for FetchWindow {
    /// Last 100 hourly bars - comfortably more than the longest indicator
    /// window.
    fn default() -> Self {
        Self {
            interval: BarInterval::OneHour,
            limit: 100,
        }
    }
}

/// A fetched window together with the provider it came from.
#[derive(Clone, Debug)]
pub struct MarketHistory {
    pub source: String,
    pub bars: Vec<Bar>,
}

/// Market-data provider contract.
///
/// Implementations normalize into chronological [`Bar`]s and surface every
/// failure as a typed [`crate::AnalysisError`]; none of them may panic on
/// provider garbage or synthesize prices on failure.
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    /// Provider name, used as the snapshot's `source` tag.
    fn name(&self) -> &str;

    async fn fetch_bars(&self, instrument: &Instrument, window: &FetchWindow) -> Result<Vec<Bar>>;
}

/// Dispatches fetches to the venue-appropriate provider.
pub struct MarketDataRouter {
    crypto: Arc<dyn MarketDataClient>,
    generic: Arc<dyn MarketDataClient>,
    window: FetchWindow,
}

impl MarketDataRouter {
    pub fn new(crypto: Arc<dyn MarketDataClient>, generic: Arc<dyn MarketDataClient>) -> Self {
        Self {
            crypto,
            generic,
            window: FetchWindow::default(),
        }
    }

    pub fn with_window(mut self, window: FetchWindow) -> Self {
        self.window = window;
        self
    }

    fn client_for(&self, venue: Venue) -> &Arc<dyn MarketDataClient> {
        match venue {
            Venue::Crypto => &self.crypto,
            Venue::Generic => &self.generic,
        }
    }

    /// Fetch the configured window for an instrument.
    ///
    /// One retry on transient failures (transport errors, 5xx, 429), then the
    /// error stands. A clean-but-empty response is `FetchEmpty`.
    pub async fn fetch(&self, instrument: &Instrument) -> Result<MarketHistory> {
        let client = self.client_for(instrument.venue);

        let bars = match client.fetch_bars(instrument, &self.window).await {
            Ok(bars) => bars,
            Err(err) if err.is_transient() => {
                tracing::warn!(
                    symbol = %instrument.symbol,
                    provider = client.name(),
                    error = %err,
                    "fetch failed, retrying once"
                );
                client.fetch_bars(instrument, &self.window).await?
            }
            Err(err) => return Err(err),
        };

        if bars.is_empty() {
            return Err(crate::AnalysisError::FetchEmpty(instrument.symbol.clone()));
        }

        Ok(MarketHistory {
            source: client.name().to_string(),
            bars,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticClient {
        name: &'static str,
        bars: Vec<Bar>,
    }

    #[async_trait]
    impl MarketDataClient for StaticClient {
        fn name(&self) -> &str {
            self.name
        }

        async fn fetch_bars(&self, _: &Instrument, _: &FetchWindow) -> Result<Vec<Bar>> {
            Ok(self.bars.clone())
        }
    }

    /// Fails with a transient error a fixed number of times, then succeeds.
    struct FlakyClient {
        failures_left: AtomicUsize,
        bars: Vec<Bar>,
    }

    #[async_trait]
    impl MarketDataClient for FlakyClient {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn fetch_bars(&self, _: &Instrument, _: &FetchWindow) -> Result<Vec<Bar>> {
            if self.failures_left.fetch_sub(1, Ordering::SeqCst) > 0 {
                return Err(AnalysisError::Api {
                    status: 503,
                    message: "upstream busy".into(),
                });
            }
            Ok(self.bars.clone())
        }
    }

    fn one_bar() -> Vec<Bar> {
        vec![Bar {
            timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            open: dec!(1),
            high: dec!(2),
            low: dec!(1),
            close: dec!(2),
            volume: dec!(10),
        }]
    }

    #[tokio::test]
    async fn dispatches_by_venue() {
        let router = MarketDataRouter::new(
            Arc::new(StaticClient { name: "crypto-side", bars: one_bar() }),
            Arc::new(StaticClient { name: "generic-side", bars: one_bar() }),
        );

        let history = router.fetch(&Instrument::crypto("BTC", "USDT")).await.unwrap();
        assert_eq!(history.source, "crypto-side");

        let history = router.fetch(&Instrument::generic("AAPL")).await.unwrap();
        assert_eq!(history.source, "generic-side");
    }

    #[tokio::test]
    async fn empty_result_is_fetch_empty() {
        let router = MarketDataRouter::new(
            Arc::new(StaticClient { name: "a", bars: Vec::new() }),
            Arc::new(StaticClient { name: "b", bars: Vec::new() }),
        );

        let err = router.fetch(&Instrument::generic("TSLA")).await.unwrap_err();
        assert!(matches!(err, AnalysisError::FetchEmpty(symbol) if symbol == "TSLA"));
    }

    #[tokio::test]
    async fn transient_failure_is_retried_once() {
        let router = MarketDataRouter::new(
            Arc::new(FlakyClient { failures_left: AtomicUsize::new(1), bars: one_bar() }),
            Arc::new(StaticClient { name: "unused", bars: Vec::new() }),
        );

        let history = router.fetch(&Instrument::crypto("ETH", "USDT")).await.unwrap();
        assert_eq!(history.bars.len(), 1);
    }

    #[tokio::test]
    async fn persistent_failure_is_not_retried_forever() {
        let router = MarketDataRouter::new(
            Arc::new(FlakyClient { failures_left: AtomicUsize::new(5), bars: one_bar() }),
            Arc::new(StaticClient { name: "unused", bars: Vec::new() }),
        );

        let err = router.fetch(&Instrument::crypto("ETH", "USDT")).await.unwrap_err();
        assert!(matches!(err, AnalysisError::Api { status: 503, .. }));
    }
}
