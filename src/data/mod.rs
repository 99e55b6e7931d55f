// Market data loading and caching
pub mod pre_main_async;
pub mod timeseries;

// Re-export commonly used types
pub use pre_main_async::{TickerData, fetch_ticker_data};
pub use timeseries::{MarketDataProvider, fetch_history_with_fallback};
