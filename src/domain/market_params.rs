use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// How much history to request from a market-data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter)]
pub enum HistoryPeriod {
    #[strum(serialize = "1mo")]
    OneMonth,
    #[strum(serialize = "3mo")]
    ThreeMonths,
    #[strum(serialize = "6mo")]
    SixMonths,
    #[default]
    #[strum(serialize = "1y")]
    OneYear,
    #[strum(serialize = "2y")]
    TwoYears,
    #[strum(serialize = "5y")]
    FiveYears,
    // Roughly ten years
    #[strum(serialize = "max")]
    Max,
}

impl HistoryPeriod {
    /// Calendar days of history covered by this period
    pub fn calendar_days(&self) -> i64 {
        match self {
            HistoryPeriod::OneMonth => 30,
            HistoryPeriod::ThreeMonths => 90,
            HistoryPeriod::SixMonths => 180,
            HistoryPeriod::OneYear => 365,
            HistoryPeriod::TwoYears => 730,
            HistoryPeriod::FiveYears => 1825,
            HistoryPeriod::Max => 3650,
        }
    }
}

/// Bar width of a history request.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
pub enum BarInterval {
    #[default]
    #[strum(serialize = "1d")]
    #[serde(rename = "1d")]
    Daily,
    #[strum(serialize = "1h")]
    #[serde(rename = "1h")]
    Hourly,
    #[strum(serialize = "1wk")]
    #[serde(rename = "1wk")]
    Weekly,
    #[strum(serialize = "1mo")]
    #[serde(rename = "1mo")]
    Monthly,
}
