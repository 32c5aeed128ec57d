//! Technical Indicators
//!
//! RSI, ATR, and SMA over a trailing bar window, all in `Decimal`. Each
//! function returns `None` when the input is shorter than its window; the
//! caller decides how that surfaces (the snapshot layer turns it into
//! `InsufficientHistory`).

use rust_decimal::Decimal;

use crate::bar::Bar;

/// RSI lookback (Wilder's original).
pub const RSI_PERIOD: usize = 14;

/// ATR lookback.
pub const ATR_PERIOD: usize = 14;

/// Moving-average window; the longest window the engine needs.
pub const SMA_PERIOD: usize = 20;

/// Simple moving average over the trailing `period` values.
pub fn sma(values: &[Decimal], period: usize) -> Option<Decimal> {
    if period == 0 || values.len() < period {
        return None;
    }
    let window = &values[values.len() - period..];
    let sum: Decimal = window.iter().copied().sum();
    Some(sum / Decimal::from(period as u64))
}

/// Relative Strength Index with Wilder smoothing.
///
/// Seeds with simple averages of gains and losses over the first `period`
/// deltas, then applies `avg = (prev_avg * (period - 1) + current) / period`
/// for the rest. Output lies in [0, 100] by construction: an all-loss window
/// yields 0, a window with no losses yields 100.
pub fn rsi(closes: &[Decimal], period: usize) -> Option<Decimal> {
    if period == 0 || closes.len() < period + 1 {
        return None;
    }

    let n = Decimal::from(period as u64);

    let mut gain_sum = Decimal::ZERO;
    let mut loss_sum = Decimal::ZERO;
    for pair in closes[..=period].windows(2) {
        let delta = pair[1] - pair[0];
        if delta >= Decimal::ZERO {
            gain_sum += delta;
        } else {
            loss_sum -= delta;
        }
    }

    let mut avg_gain = gain_sum / n;
    let mut avg_loss = loss_sum / n;

    for pair in closes[period..].windows(2) {
        let delta = pair[1] - pair[0];
        let (gain, loss) = if delta >= Decimal::ZERO {
            (delta, Decimal::ZERO)
        } else {
            (Decimal::ZERO, -delta)
        };
        avg_gain = (avg_gain * (n - Decimal::ONE) + gain) / n;
        avg_loss = (avg_loss * (n - Decimal::ONE) + loss) / n;
    }

    if avg_loss.is_zero() {
        return Some(Decimal::ONE_HUNDRED);
    }

    let rs = avg_gain / avg_loss;
    Some(Decimal::ONE_HUNDRED - Decimal::ONE_HUNDRED / (Decimal::ONE + rs))
}

/// Average True Range with Wilder smoothing.
///
/// True ranges are taken from the second bar onward (each needs the previous
/// close), so `period + 1` bars are required. Non-negative by construction.
pub fn atr(bars: &[Bar], period: usize) -> Option<Decimal> {
    if period == 0 || bars.len() < period + 1 {
        return None;
    }

    let true_ranges: Vec<Decimal> = bars
        .windows(2)
        .map(|pair| pair[1].true_range(pair[0].close))
        .collect();

    let n = Decimal::from(period as u64);
    let seed: Decimal = true_ranges[..period].iter().copied().sum();
    let mut atr = seed / n;

    for tr in &true_ranges[period..] {
        atr = (atr * (n - Decimal::ONE) + *tr) / n;
    }

    Some(atr)
}
