use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::data::timeseries::{MarketDataProvider, normalize_ticker, trim_to_period};
use crate::domain::{BarInterval, HistoryPeriod, PricePoint, SecurityProfile};
use crate::models::PriceSeries;

/// Serves histories from `<data_dir>/<TICKER>.json` (a list of OHLCV rows) and
/// profiles from the optional `<data_dir>/<TICKER>.profile.json`.
/// Non-daily bars live in `<TICKER>_<interval>.json`.
pub struct JsonFileProvider {
    pub data_dir: PathBuf,
}

impl JsonFileProvider {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn history_path(&self, ticker: &str, interval: BarInterval) -> PathBuf {
        let ticker = ticker.to_uppercase();
        let filename = match interval {
            BarInterval::Daily => format!("{}.json", ticker),
            other => format!("{}_{}.json", ticker, other),
        };
        self.data_dir.join(filename)
    }

    pub fn profile_path(&self, ticker: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.profile.json", ticker.to_uppercase()))
    }

    /// Every row in the history file, with no period trim applied.
    pub async fn load_series(&self, ticker: &str, interval: BarInterval) -> Result<PriceSeries> {
        let ticker = normalize_ticker(ticker)?;
        let path = self.history_path(&ticker, interval);
        let text = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read history file {:?}", path))?;
        let rows: Vec<PricePoint> = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse history file {:?}", path))?;
        if rows.is_empty() {
            bail!("No data for ticker {}", ticker);
        }
        PriceSeries::new(rows).with_context(|| format!("Invalid history in {:?}", path))
    }
}

#[async_trait]
impl MarketDataProvider for JsonFileProvider {
    fn signature(&self) -> &'static str {
        "JSON Files"
    }

    async fn fetch_history(
        &self,
        ticker: &str,
        period: HistoryPeriod,
        interval: BarInterval,
    ) -> Result<PriceSeries> {
        let series = self.load_series(ticker, interval).await?;
        trim_to_period(series, period)
    }

    async fn fetch_profile(&self, ticker: &str) -> Result<SecurityProfile> {
        let ticker = normalize_ticker(ticker)?;
        let path = self.profile_path(&ticker);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => {
                let mut profile: SecurityProfile = serde_json::from_str(&text)
                    .with_context(|| format!("Failed to parse profile file {:?}", path))?;
                profile.ticker = ticker;
                Ok(profile)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No profile file for {}; using a bare profile", ticker);
                Ok(SecurityProfile::bare(&ticker))
            }
            Err(e) => Err(e).with_context(|| format!("Failed to read profile file {:?}", path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const ROWS: &str = r#"[
        {"date":"2024-03-01","open":10,"high":11,"low":9.5,"close":10.5,"volume":1000},
        {"date":"2024-03-04","open":10.5,"high":12,"low":10,"close":11.8,"volume":1500},
        {"date":"2024-03-05","open":11.8,"high":12.2,"low":11,"close":11.2,"volume":900}
    ]"#;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("wave_forecast_{}_{}", tag, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn loads_rows_and_profile() {
        let dir = temp_dir("json_rows");
        std::fs::write(dir.join("TSLA.json"), ROWS).unwrap();
        std::fs::write(
            dir.join("TSLA.profile.json"),
            r#"{"long_name":"Tesla, Inc.","market_cap":5.5e11,"current_price":11.3}"#,
        )
        .unwrap();

        let provider = JsonFileProvider::new(&dir);
        let series = provider
            .fetch_history("tsla", HistoryPeriod::OneYear, BarInterval::Daily)
            .await
            .unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.last_date(), NaiveDate::from_ymd_opt(2024, 3, 5));
        assert_eq!(series.last_close(), 11.2);

        let profile = provider.fetch_profile("tsla").await.unwrap();
        assert_eq!(profile.ticker, "TSLA");
        assert_eq!(profile.name(), "Tesla, Inc.");
        assert_eq!(profile.resolved_current_price(&series), 11.3);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn missing_profile_degrades_to_bare() {
        let dir = temp_dir("json_bare");
        let provider = JsonFileProvider::new(&dir);
        let profile = provider.fetch_profile("qqq").await.unwrap();
        assert_eq!(profile, SecurityProfile::bare("QQQ"));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn empty_or_missing_history_is_an_error() {
        let dir = temp_dir("json_empty");
        std::fs::write(dir.join("EMPTY.json"), "[]").unwrap();
        let provider = JsonFileProvider::new(&dir);

        let err = provider
            .fetch_history("EMPTY", HistoryPeriod::OneYear, BarInterval::Daily)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("No data for ticker EMPTY"));

        assert!(
            provider
                .fetch_history("NOPE", HistoryPeriod::OneYear, BarInterval::Daily)
                .await
                .is_err()
        );
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn full_load_keeps_bars_older_than_max_period() {
        let dir = temp_dir("json_full");
        std::fs::write(
            dir.join("OLD.json"),
            r#"[
                {"date":"2000-01-03","open":1,"high":1,"low":1,"close":1.0},
                {"date":"2012-06-01","open":2,"high":2,"low":2,"close":2.0},
                {"date":"2024-03-01","open":3,"high":3,"low":3,"close":3.0}
            ]"#,
        )
        .unwrap();
        let provider = JsonFileProvider::new(&dir);

        let full = provider.load_series("old", BarInterval::Daily).await.unwrap();
        assert_eq!(full.len(), 3);
        assert_eq!(full.closes()[0], 1.0);

        let trimmed = provider
            .fetch_history("old", HistoryPeriod::Max, BarInterval::Daily)
            .await
            .unwrap();
        assert_eq!(trimmed.closes(), &[3.0]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn interval_selects_the_file() {
        let provider = JsonFileProvider::new("data");
        assert_eq!(
            provider.history_path("nvda", BarInterval::Daily),
            PathBuf::from("data/NVDA.json")
        );
        assert_eq!(
            provider.history_path("nvda", BarInterval::Weekly),
            PathBuf::from("data/NVDA_1wk.json")
        );
    }
}
