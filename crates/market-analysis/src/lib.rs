//! # market-analysis
//!
//! Query-to-instrument resolution and the technical snapshot pipeline behind
//! the trading assistant.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────┐   ┌──────────────┐   ┌───────────────┐   ┌───────────┐
//! │ Resolver │──▶│   Fetcher    │──▶│   Indicator   │──▶│ Formatter │
//! │ (query → │   │ (venue → OHLC│   │    Engine     │   │ (summary  │
//! │  symbol) │   │   window)    │   │ (RSI/ATR/SMA) │   │  string)  │
//! └──────────┘   └──────────────┘   └───────────────┘   └───────────┘
//! ```
//!
//! A single query triggers exactly one Resolve → Fetch → Compute → Format
//! pass. There is no feedback loop, no retry beyond one bounded attempt in
//! the fetcher, and no state shared between invocations. Anything that goes
//! wrong past resolution collapses into a typed [`AnalysisError`] which the
//! chat layer renders as a single "unavailable" line.
//!
//! Resolution itself never fails: an unmatched query falls back to the
//! configured default instrument, with the fallback observable on the
//! returned [`Resolution`].

pub mod analyst;
pub mod bar;
pub mod error;
pub mod indicators;
pub mod instrument;
pub mod market;
pub mod snapshot;

pub use analyst::{Analysis, MarketAnalyst};
pub use bar::Bar;
pub use error::{AnalysisError, Result};
pub use instrument::{Instrument, Resolution, Resolver, ResolverConfig, Venue};
pub use market::{
    BarInterval, BinanceClient, FetchWindow, MarketDataClient, MarketDataRouter, MarketHistory,
    MockMarketData, YahooClient,
};
pub use snapshot::{Snapshot, Trend};

/// System prompt for narrating a technical snapshot conversationally.
///
/// The snapshot summary is injected into the user turn; the model's job is
/// tone, not numbers.
pub const MARKET_NARRATOR_PROMPT: &str = r#"You are a friendly trading assistant chatting with a retail user.

You will be given a technical snapshot for one instrument: price, RSI, trend,
and a suggested stop-loss/take-profit band. Restate it conversationally.

Rules:

1. Use ONLY the numbers provided in the snapshot. Never invent prices,
   percentages, or indicator values.
2. Keep it short - two to four sentences.
3. Mention the trend and what the RSI level suggests (above 70 overbought,
   below 30 oversold, otherwise neutral momentum).
4. Always close with a reminder that this is not financial advice.

If the snapshot says data is unavailable, apologize briefly and suggest the
user try again or ask about a different asset. Do not speculate about prices."#;
