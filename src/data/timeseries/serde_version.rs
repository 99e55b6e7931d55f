use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use std::path::PathBuf;

use crate::config::SERIES_CACHE_VERSION;
use crate::data::timeseries::cache_file::SeriesCacheFile;
use crate::data::timeseries::{MarketDataProvider, normalize_ticker, trim_to_period};
use crate::domain::{BarInterval, HistoryPeriod, SecurityProfile};
use crate::models::PriceSeries;

/// Reject caches written by another format version, or for another
/// ticker or interval than the one requested.
pub fn check_cache_validity(
    cache: &SeriesCacheFile,
    ticker: &str,
    interval: BarInterval,
) -> Result<()> {
    if cache.version != SERIES_CACHE_VERSION {
        bail!(
            "Cache version mismatch: file v{} vs required v{}",
            cache.version,
            SERIES_CACHE_VERSION
        );
    }
    if cache.ticker != ticker {
        bail!("Cache ticker mismatch: file has {}, expected {}", cache.ticker, ticker);
    }
    if cache.interval != interval {
        bail!(
            "Cache interval mismatch: file has {} bars, expected {}",
            cache.interval,
            interval
        );
    }
    Ok(())
}

/// Write one ticker's history and profile to its bincode cache file.
/// Returns the path written.
pub fn write_series_cache_locally(
    data_dir: &std::path::Path,
    ticker: &str,
    interval: BarInterval,
    profile: SecurityProfile,
    series: PriceSeries,
) -> Result<PathBuf> {
    let ticker = normalize_ticker(ticker)?;
    let full_path = SeriesCacheFile::cache_path(data_dir, &ticker, interval);
    SeriesCacheFile::new(&ticker, interval, profile, series).save_to_path(&full_path)?;
    Ok(full_path)
}

/// Serves histories and profiles from bincode caches under `data_dir`.
pub struct CacheFileProvider {
    pub data_dir: PathBuf,
}

impl CacheFileProvider {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    async fn load(&self, ticker: &str, interval: BarInterval) -> Result<SeriesCacheFile> {
        let full_path = SeriesCacheFile::cache_path(&self.data_dir, ticker, interval);
        let cache = tokio::task::spawn_blocking(move || SeriesCacheFile::load_from_path(&full_path))
            .await
            .context("Deserialization task panicked")?
            .context("Failed to load cache file")?;
        check_cache_validity(&cache, ticker, interval)?;
        Ok(cache)
    }
}

#[async_trait]
impl MarketDataProvider for CacheFileProvider {
    fn signature(&self) -> &'static str {
        "Local Cache"
    }

    async fn fetch_history(
        &self,
        ticker: &str,
        period: HistoryPeriod,
        interval: BarInterval,
    ) -> Result<PriceSeries> {
        let ticker = normalize_ticker(ticker)?;
        let cache = self.load(&ticker, interval).await?;
        trim_to_period(cache.series, period)
    }

    // Profiles are read from the daily cache
    async fn fetch_profile(&self, ticker: &str) -> Result<SecurityProfile> {
        let ticker = normalize_ticker(ticker)?;
        Ok(self.load(&ticker, BarInterval::Daily).await?.profile)
    }
}
