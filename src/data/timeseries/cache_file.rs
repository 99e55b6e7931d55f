use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::{SERIES_CACHE_DIR, SERIES_CACHE_VERSION, series_cache_filename};
use crate::domain::{BarInterval, SecurityProfile};
use crate::models::PriceSeries;

/// Serialized cache wrapper: one ticker's full history plus its profile.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SeriesCacheFile {
    pub version: f64,
    pub timestamp_ms: i64,
    pub ticker: String,
    pub interval: BarInterval,
    pub profile: SecurityProfile,
    pub series: PriceSeries,
}

impl SeriesCacheFile {
    pub fn new(
        ticker: &str,
        interval: BarInterval,
        profile: SecurityProfile,
        series: PriceSeries,
    ) -> Self {
        Self {
            version: SERIES_CACHE_VERSION,
            timestamp_ms: Utc::now().timestamp_millis(),
            ticker: ticker.to_uppercase(),
            interval,
            profile,
            series,
        }
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).context(format!("Failed to open cache file: {:?}", path))?;
        let mut reader = BufReader::new(file);
        let cache = bincode::deserialize_from(&mut reader)
            .context(format!("Failed to deserialize cache: {:?}", path))?;
        Ok(cache)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .context(format!("Failed to create directory: {}", parent.display()))?;
        }
        let file =
            File::create(path).context(format!("Failed to create file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        bincode::serialize_into(&mut writer, self)
            .context(format!("Failed to serialize cache to: {}", path.display()))
    }

    /// `<data_dir>/series_cache/<TICKER>_<interval>_v<version>.bin`
    pub fn cache_path(data_dir: &Path, ticker: &str, interval: BarInterval) -> PathBuf {
        data_dir
            .join(SERIES_CACHE_DIR)
            .join(series_cache_filename(ticker, interval))
    }
}
