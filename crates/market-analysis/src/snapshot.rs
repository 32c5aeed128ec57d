//! Technical Snapshot
//!
//! The derived view of one bar window: latest price, RSI, ATR, trend against
//! the 20-period SMA, and the suggested stop-loss/take-profit band. Computed
//! fresh on every query; nothing here is cached or persisted.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::bar::Bar;
use crate::error::{AnalysisError, Result};
use crate::indicators::{self, ATR_PERIOD, RSI_PERIOD, SMA_PERIOD};

/// Stop-loss sits two ATRs below the latest close.
const STOP_LOSS_ATR: Decimal = dec!(2);

/// Take-profit sits three ATRs above it (risk:reward 1:1.5).
const TAKE_PROFIT_ATR: Decimal = dec!(3);

/// Prices below one unit get four decimals, everything else two.
const SUB_UNIT_DECIMALS: u32 = 4;
const PRICE_DECIMALS: u32 = 2;

/// Trend against the moving average. Strictly binary at this layer; any
/// "sideways" nuance belongs to downstream narration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Bullish,
    Bearish,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "bullish"),
            Self::Bearish => write!(f, "bearish"),
        }
    }
}

/// The computed technical state of one instrument.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Name of the provider the bars came from.
    pub source: String,

    /// Latest close.
    pub price: Decimal,

    /// RSI(14), in [0, 100].
    pub rsi: Decimal,

    /// ATR(14), never negative.
    pub atr: Decimal,

    /// Close versus SMA(20).
    pub trend: Trend,

    /// `price - 2 * ATR`.
    pub stop_loss: Decimal,

    /// `price + 3 * ATR`.
    pub take_profit: Decimal,
}

impl Snapshot {
    /// Compute a snapshot from a chronological bar window.
    ///
    /// Needs at least [`SMA_PERIOD`] bars - the longest indicator window.
    /// Shorter input (including an empty window) is `InsufficientHistory`,
    /// never a zero-filled snapshot.
    pub fn compute(source: impl Into<String>, bars: &[Bar]) -> Result<Self> {
        if bars.len() < SMA_PERIOD {
            return Err(AnalysisError::InsufficientHistory {
                have: bars.len(),
                need: SMA_PERIOD,
            });
        }

        let closes: Vec<Decimal> = bars.iter().map(|b| b.close).collect();
        let price = closes.last().copied().ok_or(AnalysisError::InsufficientHistory {
            have: 0,
            need: SMA_PERIOD,
        })?;

        let rsi = indicators::rsi(&closes, RSI_PERIOD)
            .ok_or(AnalysisError::InsufficientHistory { have: bars.len(), need: RSI_PERIOD + 1 })?;
        let atr = indicators::atr(bars, ATR_PERIOD)
            .ok_or(AnalysisError::InsufficientHistory { have: bars.len(), need: ATR_PERIOD + 1 })?;
        let sma = indicators::sma(&closes, SMA_PERIOD)
            .ok_or(AnalysisError::InsufficientHistory { have: bars.len(), need: SMA_PERIOD })?;

        let trend = if price > sma { Trend::Bullish } else { Trend::Bearish };

        Ok(Self {
            source: source.into(),
            price,
            rsi,
            atr,
            trend,
            stop_loss: price - STOP_LOSS_ATR * atr,
            take_profit: price + TAKE_PROFIT_ATR * atr,
        })
    }

    /// Render the snapshot as a short human-readable summary.
    ///
    /// Pure formatting: same snapshot, same string, every time.
    pub fn render(&self) -> String {
        let dp = price_decimals(self.price) as usize;
        format!(
            "price: {price:.dp$} (source: {source})\n\
             RSI(14): {rsi:.2} | trend: {trend}\n\
             stop-loss: {stop:.dp$} | take-profit: {take:.dp$}",
            price = self.price,
            source = self.source,
            rsi = self.rsi,
            trend = self.trend,
            stop = self.stop_loss,
            take = self.take_profit,
        )
    }
}

fn price_decimals(price: Decimal) -> u32 {
    if price.abs() < Decimal::ONE {
        SUB_UNIT_DECIMALS
    } else {
        PRICE_DECIMALS
    }
}
