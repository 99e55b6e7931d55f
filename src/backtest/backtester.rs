//! Walk-forward backtest of the predictor.
//!
//! Each sample truncates the series at a past bar, runs the full prediction
//! pipeline on that prefix only, and scores the result against the close
//! `test_period` bars later. Samples are independent, so they can run on a
//! rayon pool; results are merged back in bar order.

use std::time::Duration;

use rayon::prelude::*;
use serde::Serialize;

use crate::config::{ANALYSIS, PRINT_BACKTEST_ITERATIONS};
use crate::domain::SeriesStamp;
use crate::forecast::predictor;
use crate::models::{AnalysisOutcome, PriceSeries};
use crate::utils::app_time::{AppInstant, deadline_after, deadline_passed};
use crate::utils::maths_utils::mean;

/// Parameter bundle for one backtest run.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestParams {
    /// How many bars before the last scorable bar the walk starts
    pub days_back: usize,
    /// Prediction horizon in bars
    pub test_period: u32,
    /// Bars between samples
    pub step: usize,
    /// Stop issuing samples once this much wall time has passed
    pub time_budget: Option<Duration>,
    pub parallel: bool,
}

impl Default for BacktestParams {
    fn default() -> Self {
        let settings = &ANALYSIS.backtest;
        Self {
            days_back: settings.days_back,
            test_period: settings.test_period,
            step: settings.step,
            time_budget: None,
            parallel: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestRecord {
    /// Bar the prediction was made at
    pub date: SeriesStamp,
    /// Close `test_period` bars later
    pub actual_price: f64,
    /// Close at the prediction bar
    pub baseline_price: f64,
    pub predicted_price: f64,
    pub direction_correct: bool,
    pub error_pct: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestMetrics {
    /// Percent of samples whose predicted direction matched
    pub directional_accuracy: f64,
    pub mape: f64,
    pub rmse: f64,
    pub avg_confidence: f64,
    pub sample_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BacktestReport {
    pub metrics: BacktestMetrics,
    pub records: Vec<BacktestRecord>,
}

/// Bars a series needs before a backtest with `params` is attempted.
pub fn required_bars(params: &BacktestParams) -> usize {
    params.days_back + params.test_period as usize + ANALYSIS.backtest.warmup_margin
}

pub fn backtest(series: &PriceSeries, params: &BacktestParams) -> AnalysisOutcome<BacktestReport> {
    let required = required_bars(params);
    if series.len() < required {
        return AnalysisOutcome::insufficient_data(
            format!(
                "Backtest needs at least {} bars (days_back {} + test_period {} + {} warm-up), found {}",
                required,
                params.days_back,
                params.test_period,
                ANALYSIS.backtest.warmup_margin,
                series.len()
            ),
            series.len(),
            Some(required),
        );
    }

    let horizon = params.test_period as usize;
    let start = series.len() - params.days_back - horizon;
    let end = series.len() - horizon;
    let indices: Vec<usize> = (start..end).step_by(params.step.max(1)).collect();
    let deadline = deadline_after(params.time_budget);

    let records: Vec<BacktestRecord> = if params.parallel {
        indices
            .par_iter()
            .filter_map(|&idx| run_sample(series, idx, params.test_period, deadline))
            .collect()
    } else {
        indices
            .iter()
            .filter_map(|&idx| run_sample(series, idx, params.test_period, deadline))
            .collect()
    };

    if deadline_passed(deadline) {
        log::warn!(
            "Backtest time budget of {:?} ran out; scored {} of {} samples",
            params.time_budget.unwrap_or_default(),
            records.len(),
            indices.len()
        );
    }

    let Some(metrics) = compute_metrics(&records) else {
        return AnalysisOutcome::no_results(format!(
            "None of the {} backtest samples produced a prediction",
            indices.len()
        ));
    };

    log::info!(
        "Backtest over {} samples: {:.1}% directional accuracy, MAPE {:.2}%",
        metrics.sample_count,
        metrics.directional_accuracy,
        metrics.mape
    );

    AnalysisOutcome::Success(BacktestReport { metrics, records })
}

/// Predict from the prefix ending at `idx` and score it against the full series.
/// `None` when the prediction was not a success, the actual close is zero, or
/// the deadline has passed.
fn run_sample(
    series: &PriceSeries,
    idx: usize,
    test_period: u32,
    deadline: Option<AppInstant>,
) -> Option<BacktestRecord> {
    if deadline_passed(deadline) {
        return None;
    }

    let prefix = match series.truncated(idx + 1) {
        Ok(prefix) => prefix,
        Err(e) => {
            log::error!("Backtest sample at bar {} skipped: {}", idx, e);
            return None;
        }
    };

    let prediction = match predictor::predict_price(&prefix, test_period).into_success::<()>() {
        Ok(prediction) => prediction,
        Err(failure) => {
            if cfg!(debug_assertions) && PRINT_BACKTEST_ITERATIONS {
                log::debug!("Bar {}: no prediction ({})", idx, failure.status());
            }
            return None;
        }
    };

    let closes = series.closes();
    let baseline_price = closes[idx];
    let actual_price = closes[idx + test_period as usize];
    if actual_price == 0.0 {
        log::warn!("Backtest sample at bar {} skipped: actual close is zero", idx);
        return None;
    }

    let predicted_price = prediction.predicted_price;
    // Flat moves count as down on both sides
    let direction_correct = (predicted_price > baseline_price) == (actual_price > baseline_price);
    let error_pct = (predicted_price - actual_price).abs() / actual_price * 100.0;

    if cfg!(debug_assertions) && PRINT_BACKTEST_ITERATIONS {
        log::debug!(
            "Bar {}: baseline {:.2}, predicted {:.2}, actual {:.2}, error {:.2}%",
            idx,
            baseline_price,
            predicted_price,
            actual_price,
            error_pct
        );
    }

    Some(BacktestRecord {
        date: series.stamp(idx),
        actual_price,
        baseline_price,
        predicted_price,
        direction_correct,
        error_pct,
        confidence: prediction.confidence,
    })
}

/// Aggregate accuracy over the records; `None` when there are none.
pub fn compute_metrics(records: &[BacktestRecord]) -> Option<BacktestMetrics> {
    if records.is_empty() {
        return None;
    }

    let hits: Vec<f64> = records
        .iter()
        .map(|r| if r.direction_correct { 1.0 } else { 0.0 })
        .collect();
    let errors: Vec<f64> = records.iter().map(|r| r.error_pct).collect();
    let squared: Vec<f64> = records
        .iter()
        .map(|r| (r.predicted_price - r.actual_price).powi(2))
        .collect();
    let confidences: Vec<f64> = records.iter().map(|r| r.confidence).collect();

    Some(BacktestMetrics {
        directional_accuracy: mean(&hits)? * 100.0,
        mape: mean(&errors)?,
        rmse: mean(&squared)?.sqrt(),
        avg_confidence: mean(&confidences)?,
        sample_count: records.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::wave::tests::sawtooth;
    use crate::models::AnalysisStatus;
    use approx::assert_abs_diff_eq;

    fn waves(len: usize) -> PriceSeries {
        sawtooth(len, 100.0, 10, |cycle| 110.0 + cycle as f64)
    }

    fn sequential() -> BacktestParams {
        BacktestParams {
            parallel: false,
            ..BacktestParams::default()
        }
    }

    fn record(predicted: f64, actual: f64, correct: bool, confidence: f64) -> BacktestRecord {
        BacktestRecord {
            date: SeriesStamp::Index(0),
            actual_price: actual,
            baseline_price: 100.0,
            predicted_price: predicted,
            direction_correct: correct,
            error_pct: (predicted - actual).abs() / actual * 100.0,
            confidence,
        }
    }

    #[test]
    fn default_params_follow_config() {
        let params = BacktestParams::default();
        assert_eq!(params.days_back, 60);
        assert_eq!(params.test_period, 5);
        assert_eq!(params.step, 2);
        assert!(params.parallel);
        assert_eq!(required_bars(&params), 115);
    }

    #[test]
    fn one_bar_short_of_margin_is_insufficient() {
        let params = sequential();
        let outcome = backtest(&waves(60 + 5 + 49), &params);
        assert_eq!(outcome.status(), AnalysisStatus::InsufficientData);
        let shortfall = outcome.shortfall().unwrap();
        assert_eq!(shortfall.available, Some(114));
        assert_eq!(shortfall.required, Some(115));

        let outcome = backtest(&waves(60 + 5 + 50), &params);
        assert_ne!(outcome.status(), AnalysisStatus::InsufficientData);
    }

    #[test]
    fn walk_forward_over_waves() {
        let series = waves(300);
        let report = backtest(&series, &sequential()).success().cloned().unwrap();

        // Samples at bars 235, 237, .., 293
        assert!(!report.records.is_empty());
        assert!(report.records.len() <= 30);
        assert_eq!(report.metrics.sample_count, report.records.len());

        let closes = series.closes();
        for record in &report.records {
            let SeriesStamp::Index(idx) = record.date else {
                panic!("undated series should stamp by index");
            };
            assert!((235..295).contains(&idx));
            assert_eq!((idx - 235) % 2, 0);
            assert_eq!(record.baseline_price, closes[idx]);
            assert_eq!(record.actual_price, closes[idx + 5]);
            assert!((0.0..=1.0).contains(&record.confidence));
        }
        assert!((0.0..=100.0).contains(&report.metrics.directional_accuracy));
        assert!(report.metrics.rmse >= 0.0);
    }

    #[test]
    fn parallel_matches_sequential() {
        let series = waves(300);
        let parallel = backtest(&series, &BacktestParams::default());
        assert_eq!(parallel, backtest(&series, &sequential()));
    }

    #[test]
    fn zero_actual_close_skips_only_that_sample() {
        let series = waves(300);
        let mut closes = series.closes().to_vec();
        closes[250] = 0.0;
        let zeroed = PriceSeries::from_closes(&closes).unwrap();

        let full = backtest(&series, &sequential()).success().cloned().unwrap();
        let outcome = backtest(&zeroed, &sequential());
        assert_eq!(outcome.status(), AnalysisStatus::Success);
        let report = outcome.success().cloned().unwrap();

        let has_sample = |records: &[BacktestRecord], idx: usize| {
            records.iter().any(|r| r.date == SeriesStamp::Index(idx))
        };
        assert!(has_sample(&full.records, 245));
        assert!(!has_sample(&report.records, 245));
        assert!(report.records.iter().all(|r| r.actual_price != 0.0));

        // Samples whose window ends before the zero are untouched
        let before = |records: &[BacktestRecord]| -> Vec<BacktestRecord> {
            records
                .iter()
                .filter(|r| matches!(r.date, SeriesStamp::Index(i) if i < 245))
                .cloned()
                .collect()
        };
        assert_eq!(before(&report.records), before(&full.records));
    }

    #[test]
    fn samples_without_predictions_give_no_results() {
        // Enough bars, but a straight line never forms swing points
        let closes: Vec<f64> = (0..200).map(|i| 20.0 + i as f64).collect();
        let series = PriceSeries::from_closes(&closes).unwrap();
        let outcome = backtest(&series, &sequential());
        assert_eq!(outcome.status(), AnalysisStatus::NoResults);
    }

    #[test]
    fn exhausted_time_budget_stops_sampling() {
        let params = BacktestParams {
            time_budget: Some(Duration::ZERO),
            ..sequential()
        };
        assert_eq!(backtest(&waves(300), &params).status(), AnalysisStatus::NoResults);
    }

    #[test]
    fn metrics_aggregate_records() {
        let records = vec![
            record(110.0, 100.0, true, 0.5),
            record(90.0, 100.0, false, 0.7),
            record(100.0, 100.0, true, 0.9),
            record(104.0, 100.0, true, 0.3),
        ];
        let metrics = compute_metrics(&records).unwrap();
        assert_abs_diff_eq!(metrics.directional_accuracy, 75.0, epsilon = 1e-12);
        assert_abs_diff_eq!(metrics.mape, 6.0, epsilon = 1e-12);
        // sqrt((100 + 100 + 0 + 16) / 4)
        assert_abs_diff_eq!(metrics.rmse, 54f64.sqrt(), epsilon = 1e-12);
        assert_abs_diff_eq!(metrics.avg_confidence, 0.6, epsilon = 1e-12);
        assert_eq!(metrics.sample_count, 4);

        assert!(compute_metrics(&[]).is_none());
    }
}
