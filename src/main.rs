use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tokio::runtime::Runtime;

use wave_forecast::{Cli, build_report, fetch_ticker_data};

fn main() -> Result<()> {
    // A. Init Logging
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {:?}", panic_info);
    }));
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // B. Parse Args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    // C. Data Loading (Blocking)
    let rt = Runtime::new().context("Failed to create Tokio runtime")?;
    let data = rt
        .block_on(fetch_ticker_data(&args))
        .with_context(|| format!("Failed to load market data for {}", args.ticker))?;

    // D. Analysis
    let report = build_report(&data, &args, Utc::now());

    // E. Output
    let json = if args.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("Failed to serialize report")?;
    println!("{}", json);

    Ok(())
}
