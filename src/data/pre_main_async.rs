// Async loading run by the CLI before any analysis starts

use anyhow::Result;

use crate::Cli;
use crate::config::PRINT_PROVIDER_FALLBACK;
use crate::data::timeseries::json_version::JsonFileProvider;
use crate::data::timeseries::serde_version::CacheFileProvider;
use crate::data::timeseries::{MarketDataProvider, fetch_history_with_fallback, normalize_ticker};
use crate::domain::SecurityProfile;
use crate::models::PriceSeries;

/// Everything the analysis needs about one ticker.
#[derive(Debug, Clone)]
pub struct TickerData {
    pub ticker: String,
    pub series: PriceSeries,
    pub profile: SecurityProfile,
    /// Signature of the provider that served the history
    pub source: &'static str,
}

/// Provider chain for `args`: JSON files first, or the bincode cache first
/// when `--prefer-cache` is set.
pub fn build_providers(args: &Cli) -> Vec<Box<dyn MarketDataProvider>> {
    let json: Box<dyn MarketDataProvider> = Box::new(JsonFileProvider::new(&args.data_dir));
    let cache: Box<dyn MarketDataProvider> = Box::new(CacheFileProvider::new(&args.data_dir));
    if args.prefer_cache {
        vec![cache, json] // cache first
    } else {
        vec![json, cache] // files first
    }
}

pub async fn fetch_ticker_data(args: &Cli) -> Result<TickerData> {
    let ticker = normalize_ticker(&args.ticker)?;
    let providers = build_providers(args);

    let (series, source) =
        fetch_history_with_fallback(&providers, &ticker, args.period, args.interval).await?;

    // Profile comes from the provider that served the history; failures degrade to bare
    let profile = match providers.iter().find(|p| p.signature() == source) {
        Some(provider) => provider.fetch_profile(&ticker).await.unwrap_or_else(|e| {
            log::warn!("⚠️  Profile for {} unavailable: {:#}", ticker, e);
            SecurityProfile::bare(&ticker)
        }),
        None => SecurityProfile::bare(&ticker),
    };

    if PRINT_PROVIDER_FALLBACK {
        log::info!(
            "Loaded {} bars for {} ({}) from {}",
            series.len(),
            ticker,
            profile.name(),
            source
        );
    }

    Ok(TickerData {
        ticker,
        series,
        profile,
        source,
    })
}
