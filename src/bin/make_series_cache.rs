use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::runtime::Runtime;

use wave_forecast::config::DEFAULT_DATA_DIR;
use wave_forecast::data::MarketDataProvider;
use wave_forecast::data::timeseries::json_version::JsonFileProvider;
use wave_forecast::data::timeseries::serde_version::write_series_cache_locally;
use wave_forecast::BarInterval;

/// Convert <TICKER>.json histories (and profiles) into bincode series caches
#[derive(Parser, Debug)]
struct Args {
    /// Tickers to convert
    #[arg(required = true)]
    tickers: Vec<String>,

    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    #[arg(long, default_value_t = BarInterval::Daily)]
    interval: BarInterval,
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    let rt = Runtime::new().context("Failed to create Tokio runtime")?;
    rt.block_on(build_series_caches(&args))
}

async fn build_series_caches(args: &Args) -> Result<()> {
    let provider = JsonFileProvider::new(&args.data_dir);

    for ticker in &args.tickers {
        // Whole file; the period trim happens when the cache is read
        let series = provider
            .load_series(ticker, args.interval)
            .await
            .with_context(|| format!("Failed to load source history for {}", ticker))?;
        let profile = provider.fetch_profile(ticker).await?;

        println!(
            "Loaded {} bars for {} from {:?}",
            series.len(),
            profile.ticker,
            provider.history_path(ticker, args.interval)
        );

        let bars = series.len();
        let output_path =
            write_series_cache_locally(&args.data_dir, ticker, args.interval, profile, series)?;

        println!("✅ Series cache written to {:?} with {} bars.", output_path, bars);
    }
    Ok(())
}
