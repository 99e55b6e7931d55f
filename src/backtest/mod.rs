// Walk-forward backtesting of the predictor
pub mod backtester;

// Re-export commonly used types
pub use backtester::{BacktestMetrics, BacktestParams, BacktestRecord, BacktestReport};
