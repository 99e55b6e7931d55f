//! Momentum, trend strength and volatility over the close column.
//!
//! Windows shrink to the series length when the series is shorter. Momentum
//! and volatility need at least 2 closes in their window and a non-zero
//! denominator; otherwise they are `None` (undefined) rather than a
//! division fault or a meaningless 1-bar value.

use crate::config::ANALYSIS;
use crate::models::PriceSeries;
use crate::utils::maths_utils::{coefficient_of_variation, tail, trailing_sma};

/// Fewest closes a shrunken window may hold
const MIN_WINDOW_BARS: usize = 2;

fn effective_window<'a>(closes: &'a [f64], window: usize) -> Option<&'a [f64]> {
    let recent = tail(closes, window);
    (recent.len() >= MIN_WINDOW_BARS).then_some(recent)
}

/// Fractional change from the first to the last close of the window.
pub fn momentum(series: &PriceSeries, window: usize) -> Option<f64> {
    let recent = effective_window(series.closes(), window)?;
    let base = recent[0];
    if base == 0.0 {
        return None;
    }
    Some((recent[recent.len() - 1] - base) / base)
}

/// Population std dev of the window's closes over their mean.
pub fn volatility(series: &PriceSeries, window: usize) -> Option<f64> {
    let recent = effective_window(series.closes(), window)?;
    coefficient_of_variation(recent)
}

/// Share of {price > short MA, price > long MA, short MA > long MA} that hold:
/// one of 0, 1/3, 2/3, 1. Series shorter than the long MA get the neutral 0.5.
pub fn trend_strength(series: &PriceSeries) -> f64 {
    let settings = &ANALYSIS.indicators;
    let closes = series.closes();

    let (Some(short_ma), Some(long_ma)) = (
        trailing_sma(closes, settings.short_ma_window),
        trailing_sma(closes, settings.long_ma_window),
    ) else {
        return settings.neutral_trend_strength;
    };

    let price = series.last_close();
    let votes = [price > short_ma, price > long_ma, short_ma > long_ma]
        .into_iter()
        .filter(|&vote| vote)
        .count();

    votes as f64 / 3.0
}

/// The three indicators at their configured windows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSnapshot {
    pub momentum: Option<f64>,
    pub trend_strength: f64,
    pub volatility: Option<f64>,
}

pub fn snapshot(series: &PriceSeries) -> IndicatorSnapshot {
    let settings = &ANALYSIS.indicators;
    IndicatorSnapshot {
        momentum: momentum(series, settings.momentum_window),
        trend_strength: trend_strength(series),
        volatility: volatility(series, settings.volatility_window),
    }
}
