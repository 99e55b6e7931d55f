use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::time_utils::format_date;

/// One OHLCV bar. `date` is absent for purely index-based series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}

impl PricePoint {
    pub fn new(
        date: Option<NaiveDate>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        PricePoint {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Position of a bar in a series, used wherever the output needs a "date".
/// Falls back to the positional index when the series carries no dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeriesStamp {
    Date(NaiveDate),
    Index(usize),
}

impl fmt::Display for SeriesStamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SeriesStamp::Date(date) => write!(f, "{}", format_date(*date)),
            SeriesStamp::Index(idx) => write!(f, "#{}", idx),
        }
    }
}
