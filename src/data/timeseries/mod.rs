pub mod cache_file;
pub mod json_version;
pub mod serde_version;

use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::Days;

use crate::config::PRINT_PROVIDER_FALLBACK;
use crate::domain::{BarInterval, HistoryPeriod, SecurityProfile};
use crate::models::PriceSeries;

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// History for `ticker` covering `period`, counted back from the last bar.
    /// An empty history is an error, never an empty series.
    async fn fetch_history(
        &self,
        ticker: &str,
        period: HistoryPeriod,
        interval: BarInterval,
    ) -> Result<PriceSeries>;

    /// Descriptive profile. Providers that know nothing about the ticker
    /// return a bare profile rather than an error.
    async fn fetch_profile(&self, ticker: &str) -> Result<SecurityProfile>;

    /// A unique identifier for this implementation (so that afterwards we know which one we used).
    fn signature(&self) -> &'static str;
}

/// Try each provider in turn and return the first history that loads, along
/// with the signature of the provider that served it.
pub async fn fetch_history_with_fallback(
    providers: &[Box<dyn MarketDataProvider>],
    ticker: &str,
    period: HistoryPeriod,
    interval: BarInterval,
) -> Result<(PriceSeries, &'static str)> {
    let mut failures = Vec::new();
    for provider in providers {
        match provider.fetch_history(ticker, period, interval).await {
            Ok(series) => {
                if PRINT_PROVIDER_FALLBACK {
                    log::info!(
                        "{} {} history ({} bars) served by {}",
                        ticker,
                        period,
                        series.len(),
                        provider.signature()
                    );
                }
                return Ok((series, provider.signature()));
            }
            Err(e) => {
                if PRINT_PROVIDER_FALLBACK {
                    log::info!("{} could not serve {}: {:#}", provider.signature(), ticker, e);
                }
                failures.push(format!("{}: {:#}", provider.signature(), e));
            }
        }
    }
    bail!(
        "All providers failed to load history for {}: [{}]",
        ticker,
        failures.join("; ")
    )
}

/// Upper-cased, trimmed ticker. Blank tickers are rejected.
pub fn normalize_ticker(ticker: &str) -> Result<String> {
    let ticker = ticker.trim().to_uppercase();
    if ticker.is_empty() {
        bail!("Ticker symbol is empty");
    }
    Ok(ticker)
}

/// Keep the bars within `period` calendar days of the last bar.
/// Undated series are returned whole.
pub fn trim_to_period(series: PriceSeries, period: HistoryPeriod) -> Result<PriceSeries> {
    let Some(last) = series.last_date() else {
        return Ok(series);
    };
    match last.checked_sub_days(Days::new(period.calendar_days() as u64)) {
        Some(cutoff) => series.since(cutoff),
        None => Ok(series),
    }
}
