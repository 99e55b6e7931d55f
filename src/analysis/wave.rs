//! Wave analysis: trend, Fibonacci levels, target projection and confidence,
//! all derived from the most recent swing points of a series.

use itertools::Itertools;
use serde::Serialize;
use strum_macros::Display;

use crate::analysis::fibonacci::{self, FibonacciKind, FibonacciLevelSet};
use crate::analysis::swing::{self, SwingPoint};
use crate::config::ANALYSIS;
use crate::models::{AnalysisOutcome, PriceSeries};
use crate::utils::maths_utils::{coefficient_of_variation, mean, round_to};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveAnalysis {
    pub trend: Trend,
    /// Close of the last bar
    pub current_price: f64,
    pub last_swing: SwingPoint,
    /// The most recent swing points only (see `ANALYSIS.swing.reported_swings`)
    pub swing_points: Vec<SwingPoint>,
    /// Retracement between the last two swing prices
    pub fibonacci_levels: FibonacciLevelSet,
    pub total_swing_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceTargets {
    pub conservative: f64,
    pub moderate: f64,
    pub aggressive: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveTarget {
    pub current_price: f64,
    pub trend: Trend,
    pub targets: PriceTargets,
    /// Absolute price distance between the last two swing points
    pub wave_size: f64,
    pub confidence: f64,
}

/// Sign of the mean price change across consecutive swing points.
/// A zero mean (or nothing to average) is reported as bearish.
pub fn trend_from_swings(swings: &[SwingPoint]) -> Trend {
    let deltas: Vec<f64> = swings
        .iter()
        .tuple_windows()
        .map(|(prev, next)| next.price - prev.price)
        .collect();

    match mean(&deltas) {
        Some(avg) if avg > 0.0 => Trend::Bullish,
        _ => Trend::Bearish,
    }
}

pub fn analyze_current_wave(series: &PriceSeries) -> AnalysisOutcome<WaveAnalysis> {
    let settings = &ANALYSIS.swing;
    let swing_points = swing::swing_points(series, settings.order);
    let total_swing_count = swing_points.len();

    if total_swing_count < settings.min_swing_points {
        return AnalysisOutcome::insufficient_data(
            format!(
                "Wave analysis needs at least {} swing points, found {}",
                settings.min_swing_points, total_swing_count
            ),
            total_swing_count,
            Some(settings.min_swing_points),
        );
    }

    let trend_from = total_swing_count.saturating_sub(settings.trend_window);
    let trend = trend_from_swings(&swing_points[trend_from..]);

    let fibonacci_levels = match &swing_points[..] {
        [.., previous, last] => {
            fibonacci::levels(previous.price, last.price, FibonacciKind::Retracement)
        }
        _ => FibonacciLevelSet::default(),
    };

    let reported_from = total_swing_count.saturating_sub(settings.reported_swings);
    let last_swing = swing_points[total_swing_count - 1];

    AnalysisOutcome::Success(WaveAnalysis {
        trend,
        current_price: series.last_close(),
        last_swing,
        swing_points: swing_points[reported_from..].to_vec(),
        fibonacci_levels,
        total_swing_count,
    })
}

pub fn predict_next_target(series: &PriceSeries) -> AnalysisOutcome<WaveTarget> {
    let analysis = match analyze_current_wave(series).into_success() {
        Ok(analysis) => analysis,
        Err(failure) => return failure,
    };

    let swings = &analysis.swing_points;
    let [.., previous, last] = &swings[..] else {
        return AnalysisOutcome::insufficient_data(
            "Target prediction needs at least 2 swing points",
            swings.len(),
            Some(2),
        );
    };

    let wave_size = (last.price - previous.price).abs();
    let current_price = analysis.current_price;
    let ratios = &ANALYSIS.targets;
    let project = |ratio: f64| match analysis.trend {
        Trend::Bullish => current_price + wave_size * ratio,
        Trend::Bearish => current_price - wave_size * ratio,
    };

    AnalysisOutcome::Success(WaveTarget {
        current_price,
        trend: analysis.trend,
        targets: PriceTargets {
            conservative: project(ratios.conservative_ratio),
            moderate: project(ratios.moderate_ratio),
            aggressive: project(ratios.aggressive_ratio),
        },
        wave_size,
        confidence: confidence(swings),
    })
}

/// Weighted blend of how many swing points back the call and how calm their
/// recent prices are, rounded to 2 decimals and bounded to [0, 1].
///
/// The count is the length of `swing_points` as given; the wave target passes
/// the reported (most recent) swings, not the full history.
pub fn confidence(swing_points: &[SwingPoint]) -> f64 {
    let settings = &ANALYSIS.confidence;

    let count_score =
        (swing_points.len() as f64 / settings.saturation_swing_count as f64).min(1.0);

    let recent_start = swing_points.len().saturating_sub(settings.volatility_window);
    let recent_prices: Vec<f64> = swing_points[recent_start..]
        .iter()
        .map(|sp| sp.price)
        .collect();

    let volatility_score = if recent_prices.len() > 1 {
        coefficient_of_variation(&recent_prices)
            .map(|cv| (1.0 - cv).clamp(0.0, 1.0))
            .unwrap_or(settings.fallback_volatility_score)
    } else {
        settings.fallback_volatility_score
    };

    round_to(
        count_score * settings.swing_count_weight + volatility_score * settings.volatility_weight,
        2,
    )
}
