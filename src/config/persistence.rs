//! File persistence and serialization configuration

/// Default directory holding `<TICKER>.json` history files and profiles
pub const DEFAULT_DATA_DIR: &str = "market_data";

/// Sub-directory (under the data dir) for bincode series caches
pub const SERIES_CACHE_DIR: &str = "series_cache";

/// Current version of the series cache serialization format
pub const SERIES_CACHE_VERSION: f64 = 1.0;

use crate::domain::BarInterval;

/// Generate ticker- and interval-specific cache filename
/// Example: "NVDA_1d_v1.bin"
pub fn series_cache_filename(ticker: &str, interval: BarInterval) -> String {
    format!(
        "{}_{}_v{}.bin",
        ticker.to_uppercase(),
        interval,
        SERIES_CACHE_VERSION
    )
}
