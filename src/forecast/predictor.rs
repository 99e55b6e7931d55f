//! Horizon forecasts built from the wave target, scaled by how far out the
//! horizon is and how strongly the moving averages agree with the trend.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::analysis::indicators;
use crate::analysis::wave::{self, Trend, WaveAnalysis};
use crate::config::ANALYSIS;
use crate::models::{AnalysisOutcome, PriceSeries};
use crate::utils::maths_utils::round_to;
use crate::utils::time_utils::add_business_days;

/// Indicator readings behind a prediction. `None` marks an undefined value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionMetrics {
    pub momentum: Option<f64>,
    pub trend_strength: f64,
    pub volatility: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionTarget {
    pub horizon_days: u32,
    pub current_price: f64,
    pub predicted_price: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub price_change: f64,
    /// Percent, not fraction
    pub price_change_pct: f64,
    /// `horizon_days` business days after the last bar; `None` for undated series
    /// or when that day is past the last representable date
    pub prediction_date: Option<NaiveDate>,
    pub trend: Trend,
    pub confidence: f64,
    pub metrics: PredictionMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionSummary {
    pub current_price: f64,
    pub predictions: BTreeMap<u32, AnalysisOutcome<PredictionTarget>>,
    pub wave_analysis: AnalysisOutcome<WaveAnalysis>,
    pub generated_at: DateTime<Utc>,
}

/// `ln(1 + days) / ln(1 + 30)`, capped at 1.0. Exactly 1.0 at 30 days.
pub fn time_weight(days: u32) -> f64 {
    let full = ANALYSIS.forecast.full_weight_horizon_days as f64;
    ((days as f64).ln_1p() / full.ln_1p()).min(1.0)
}

pub fn predict_price(series: &PriceSeries, days: u32) -> AnalysisOutcome<PredictionTarget> {
    let target = match wave::predict_next_target(series).into_success() {
        Ok(target) => target,
        Err(failure) => return failure,
    };

    let settings = &ANALYSIS.indicators;
    let momentum = indicators::momentum(series, settings.momentum_window);
    let trend_strength = indicators::trend_strength(series);
    let Some(volatility) = indicators::volatility(series, settings.volatility_window) else {
        return AnalysisOutcome::insufficient_data(
            "Volatility is undefined for this series (too few bars or zero mean price)",
            series.len(),
            None,
        );
    };

    let forecast = &ANALYSIS.forecast;
    let current_price = target.current_price;
    let base_target = target.targets.moderate;
    let weight = time_weight(days) * trend_strength;
    let uncertainty = volatility * (days as f64).sqrt() * current_price;

    let (predicted_price, lower_bound, upper_bound) = match target.trend {
        Trend::Bullish => {
            let predicted = current_price + (base_target - current_price) * weight;
            (
                predicted,
                (current_price * forecast.bullish_floor_ratio).max(predicted - uncertainty),
                predicted + uncertainty,
            )
        }
        Trend::Bearish => {
            let predicted = current_price - (current_price - base_target) * weight;
            (
                predicted,
                predicted - uncertainty,
                (current_price * forecast.bearish_ceiling_ratio).min(predicted + uncertainty),
            )
        }
    };

    let price_change = predicted_price - current_price;

    AnalysisOutcome::Success(PredictionTarget {
        horizon_days: days,
        current_price: round_to(current_price, 2),
        predicted_price: round_to(predicted_price, 2),
        lower_bound: round_to(lower_bound, 2),
        upper_bound: round_to(upper_bound, 2),
        price_change: round_to(price_change, 2),
        price_change_pct: round_to(price_change / current_price * 100.0, 2),
        prediction_date: series.last_date().and_then(|d| add_business_days(d, days)),
        trend: target.trend,
        confidence: target.confidence,
        metrics: PredictionMetrics {
            momentum: momentum.map(|m| round_to(m, 4)),
            trend_strength: round_to(trend_strength, 2),
            volatility: Some(round_to(volatility, 4)),
        },
    })
}

/// One independent prediction per horizon, keyed by horizon.
pub fn predict_multiple_periods(
    series: &PriceSeries,
    horizons: &[u32],
) -> BTreeMap<u32, AnalysisOutcome<PredictionTarget>> {
    horizons
        .iter()
        .map(|&days| (days, predict_price(series, days)))
        .collect()
}

/// Predictions at the default horizons plus the wave analysis, stamped now.
pub fn summarize(series: &PriceSeries) -> PredictionSummary {
    summarize_at(series, Utc::now())
}

pub fn summarize_at(series: &PriceSeries, generated_at: DateTime<Utc>) -> PredictionSummary {
    summarize_horizons(series, &ANALYSIS.forecast.default_horizons, generated_at)
}

pub fn summarize_horizons(
    series: &PriceSeries,
    horizons: &[u32],
    generated_at: DateTime<Utc>,
) -> PredictionSummary {
    let predictions = predict_multiple_periods(series, horizons);
    let wave_analysis = wave::analyze_current_wave(series);

    log::debug!(
        "Summary over {} bars: wave {}, {}/{} horizons predicted",
        series.len(),
        wave_analysis.status(),
        predictions.values().filter(|p| p.is_success()).count(),
        predictions.len()
    );

    PredictionSummary {
        current_price: round_to(series.last_close(), 2),
        predictions,
        wave_analysis,
        generated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::wave::tests::sawtooth;
    use crate::models::AnalysisStatus;
    use approx::assert_abs_diff_eq;
    use chrono::{Datelike, Days, TimeZone, Weekday};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn bullish_series() -> PriceSeries {
        sawtooth(300, 100.0, 10, |cycle| 110.0 + cycle as f64)
            .truncated(292)
            .unwrap()
    }

    fn bearish_series() -> PriceSeries {
        sawtooth(300, 100.0, 10, |_| 110.0)
    }

    fn dated(series: PriceSeries, first: NaiveDate) -> PriceSeries {
        let dates = (0..series.len() as u64)
            .map(|offset| first + Days::new(offset))
            .collect();
        series.with_dates(dates).unwrap()
    }

    #[test]
    fn time_weight_grows_to_one_at_thirty_days() {
        assert_eq!(time_weight(30), 1.0);
        assert_eq!(time_weight(0), 0.0);
        assert_eq!(time_weight(90), 1.0);
        for days in 1..30 {
            assert!(time_weight(days) < time_weight(days + 1));
        }
        assert_abs_diff_eq!(time_weight(1), 2f64.ln() / 31f64.ln(), epsilon = 1e-12);
    }

    #[test]
    fn bullish_prediction_moves_toward_moderate_target() {
        let series = bullish_series();
        let target = wave::predict_next_target(&series).success().cloned().unwrap();
        let strength = indicators::trend_strength(&series);
        let volatility = indicators::volatility(&series, 20).unwrap();

        let prediction = predict_price(&series, 5).success().cloned().unwrap();
        assert_eq!(prediction.trend, Trend::Bullish);
        assert_eq!(prediction.horizon_days, 5);
        assert_eq!(prediction.confidence, target.confidence);

        let current = target.current_price;
        let expected = current + (target.targets.moderate - current) * time_weight(5) * strength;
        assert_abs_diff_eq!(prediction.predicted_price, expected, epsilon = 0.01);

        let uncertainty = volatility * 5f64.sqrt() * current;
        assert_abs_diff_eq!(prediction.upper_bound, expected + uncertainty, epsilon = 0.01);
        assert!(prediction.lower_bound >= round_to(current * 0.7, 2));
        assert_eq!(prediction.metrics.trend_strength, round_to(strength, 2));
    }

    #[test]
    fn bearish_prediction_mirrors_and_caps_upper_bound() {
        let series = bearish_series();
        let prediction = predict_price(&series, 30).success().cloned().unwrap();
        assert_eq!(prediction.trend, Trend::Bearish);
        assert!(prediction.predicted_price <= prediction.current_price);
        assert!(prediction.upper_bound <= prediction.current_price * 1.3 + 0.01);
        assert!(prediction.lower_bound <= prediction.predicted_price);
    }

    #[test]
    fn output_is_rounded() {
        let prediction = predict_price(&bullish_series(), 10).success().cloned().unwrap();
        for money in [
            prediction.current_price,
            prediction.predicted_price,
            prediction.lower_bound,
            prediction.upper_bound,
            prediction.price_change,
            prediction.price_change_pct,
        ] {
            assert_eq!(money, round_to(money, 2));
        }
        let volatility = prediction.metrics.volatility.unwrap();
        assert_eq!(volatility, round_to(volatility, 4));
    }

    #[test]
    fn failures_propagate_unchanged() {
        let closes: Vec<f64> = (0..200).map(|i| 10.0 + i as f64).collect();
        let series = PriceSeries::from_closes(&closes).unwrap();

        let wave_outcome = wave::predict_next_target(&series);
        let prediction = predict_price(&series, 5);
        assert_eq!(prediction.status(), AnalysisStatus::InsufficientData);
        assert_eq!(prediction.shortfall(), wave_outcome.shortfall());
    }

    #[test]
    fn prediction_date_counts_business_days() {
        // 2024-01-01 is a Monday; the 292-bar series ends on a calendar day
        let series = dated(bullish_series(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let last = series.last_date().unwrap();

        for days in [1, 5, 10, 30] {
            let prediction = predict_price(&series, days).success().cloned().unwrap();
            let date = prediction.prediction_date.unwrap();
            assert_eq!(Some(date), add_business_days(last, days));
            assert!(!matches!(date.weekday(), Weekday::Sat | Weekday::Sun));
        }

        let undated = predict_price(&bullish_series(), 5).success().cloned().unwrap();
        assert_eq!(undated.prediction_date, None);
    }

    #[test]
    fn horizon_beyond_the_calendar_has_no_date() {
        let series = dated(bullish_series(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        let prediction = predict_price(&series, 100_000_000).success().cloned().unwrap();
        assert_eq!(prediction.prediction_date, None);
        assert_eq!(prediction.trend, Trend::Bullish);
        assert!(prediction.upper_bound.is_finite());
    }

    #[test]
    fn bounds_respect_sanity_clamps() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut checked = 0;
        for _ in 0..150 {
            let mut price: f64 = rng.gen_range(5.0..500.0);
            let jitter = price * rng.gen_range(0.01..0.1);
            let closes: Vec<f64> = (0..rng.gen_range(60..220))
                .map(|_| {
                    price = (price + rng.gen_range(-jitter..jitter)).max(0.5);
                    price
                })
                .collect();
            let series = PriceSeries::from_closes(&closes).unwrap();

            for days in [1, 5, 10, 30] {
                let Some(p) = predict_price(&series, days).success().cloned() else {
                    continue;
                };
                // Bounds are rounded after clamping; allow the rounding step
                match p.trend {
                    Trend::Bullish => assert!(p.lower_bound >= p.current_price * 0.7 - 0.01),
                    Trend::Bearish => assert!(p.upper_bound <= p.current_price * 1.3 + 0.01),
                }
                assert!(p.lower_bound <= p.upper_bound);
                checked += 1;
            }
        }
        assert!(checked > 100);
    }

    #[test]
    fn multiple_periods_are_keyed_by_horizon() {
        let series = bullish_series();
        let predictions = predict_multiple_periods(&series, &[30, 1, 5]);
        assert_eq!(predictions.keys().copied().collect::<Vec<_>>(), vec![1, 5, 30]);
        for (days, outcome) in &predictions {
            assert_eq!(outcome, &predict_price(&series, *days));
        }
    }

    #[test]
    fn summary_bundles_default_horizons_and_wave() {
        let series = bullish_series();
        let at = Utc.with_ymd_and_hms(2024, 6, 3, 12, 0, 0).unwrap();
        let summary = summarize_at(&series, at);

        assert_eq!(summary.generated_at, at);
        assert_eq!(summary.current_price, round_to(series.last_close(), 2));
        assert_eq!(
            summary.predictions.keys().copied().collect::<Vec<_>>(),
            vec![1, 5, 10, 30]
        );
        assert_eq!(summary.wave_analysis, wave::analyze_current_wave(&series));

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["predictions"]["5"]["status"], "success");
        assert_eq!(json["wave_analysis"]["status"], "success");
    }

    #[test]
    fn summary_of_thin_series_carries_statuses() {
        let series = PriceSeries::from_closes(&[1.0, 2.0, 3.0]).unwrap();
        let summary = summarize(&series);
        assert!(summary.predictions.values().all(|p| !p.is_success()));
        assert_eq!(summary.wave_analysis.status(), AnalysisStatus::InsufficientData);
        assert_eq!(summary.current_price, 3.0);
    }
}
