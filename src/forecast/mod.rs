// Price forecasting over wave targets and indicators
pub mod predictor;

// Re-export commonly used types
pub use predictor::{PredictionMetrics, PredictionSummary, PredictionTarget};
