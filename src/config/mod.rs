//! Configuration module for the wave-forecast pipeline.

pub mod analysis;

mod debug; // Private: files use crate::config::debug flags through the re-exports below
pub use debug::{
    PRINT_BACKTEST_ITERATIONS, PRINT_PROVIDER_FALLBACK, PRINT_SWING_DETECTION,
};

pub mod persistence;

// Re-export commonly used items
pub use analysis::{
    ANALYSIS, AnalysisConfig, BacktestSettings, ConfidenceSettings, ForecastSettings,
    IndicatorSettings, SwingSettings, TargetSettings,
};
pub use persistence::{
    DEFAULT_DATA_DIR, SERIES_CACHE_DIR, SERIES_CACHE_VERSION, series_cache_filename,
};
