// Core modules
pub mod analysis;
pub mod backtest;
pub mod config;
pub mod data;
pub mod domain;
pub mod forecast;
pub mod models;
pub mod utils;

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::backtest::backtester;
use crate::config::{ANALYSIS, DEFAULT_DATA_DIR};
use crate::forecast::predictor;

// Re-export commonly used types
pub use backtest::{BacktestParams, BacktestReport};
pub use data::{TickerData, fetch_ticker_data};
pub use domain::{BarInterval, HistoryPeriod, PricePoint, ProfileSummary, SecurityProfile};
pub use forecast::{PredictionSummary, PredictionTarget};
pub use models::{AnalysisOutcome, AnalysisStatus, PriceSeries};
pub use utils::app_time;

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Ticker symbol to analyse, e.g. NVDA
    pub ticker: String,

    /// Directory holding <TICKER>.json histories, profiles and the series cache
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// History to load: 1mo, 3mo, 6mo, 1y, 2y, 5y or max
    #[arg(long, default_value_t = HistoryPeriod::OneYear)]
    pub period: HistoryPeriod,

    /// Bar width: 1d, 1h, 1wk or 1mo
    #[arg(long, default_value_t = BarInterval::Daily)]
    pub interval: BarInterval,

    /// Forecast horizons in business days, comma separated
    #[arg(long, value_delimiter = ',', default_values_t = ANALYSIS.forecast.default_horizons)]
    pub horizons: Vec<u32>,

    /// Also run the walk-forward backtest
    #[arg(long, default_value_t = false)]
    pub backtest: bool,

    #[arg(long, default_value_t = ANALYSIS.backtest.days_back)]
    pub days_back: usize,

    #[arg(long, default_value_t = ANALYSIS.backtest.test_period)]
    pub test_period: u32,

    /// Stop issuing backtest samples after this many seconds
    #[arg(long)]
    pub time_budget_secs: Option<u64>,

    /// Read the bincode series cache before the JSON files
    #[arg(long, default_value_t = false)]
    pub prefer_cache: bool,

    /// Pretty-print the JSON report
    #[arg(long, default_value_t = false)]
    pub pretty: bool,
}

impl Cli {
    pub fn backtest_params(&self) -> BacktestParams {
        BacktestParams {
            days_back: self.days_back,
            test_period: self.test_period,
            time_budget: self.time_budget_secs.map(Duration::from_secs),
            ..BacktestParams::default()
        }
    }
}

/// What the CLI prints: profile, forecast summary and optional backtest.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastReport {
    pub ticker: String,
    pub data_source: &'static str,
    pub profile: ProfileSummary,
    pub resolved_current_price: f64,
    pub summary: PredictionSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backtest: Option<AnalysisOutcome<BacktestReport>>,
}

pub fn build_report(data: &TickerData, args: &Cli, generated_at: DateTime<Utc>) -> ForecastReport {
    let summary = predictor::summarize_horizons(&data.series, &args.horizons, generated_at);
    let backtest = args
        .backtest
        .then(|| backtester::backtest(&data.series, &args.backtest_params()));

    ForecastReport {
        ticker: data.ticker.clone(),
        data_source: data.source,
        profile: data.profile.summary(&data.series),
        resolved_current_price: data.profile.resolved_current_price(&data.series),
        summary,
        backtest,
    }
}
