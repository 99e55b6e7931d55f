//! Descriptive data about a security, as handed over by a market-data provider.
//!
//! Providers fill in whatever they know; every field is optional. Callers go
//! through the accessors, which apply a fixed fallback order instead of
//! poking at raw fields.

use serde::{Deserialize, Serialize};

use crate::models::PriceSeries;

/// Marker shown in place of a profile field the provider did not supply
pub const UNAVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityProfile {
    #[serde(default)]
    pub ticker: String,
    #[serde(default)]
    pub long_name: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub regular_market_price: Option<f64>,
}

impl SecurityProfile {
    /// A profile that knows nothing but the ticker.
    pub fn bare(ticker: &str) -> Self {
        Self {
            ticker: ticker.to_uppercase(),
            ..Default::default()
        }
    }

    /// long name → short name → ticker
    pub fn name(&self) -> &str {
        self.long_name
            .as_deref()
            .or(self.short_name.as_deref())
            .unwrap_or(&self.ticker)
    }

    pub fn sector(&self) -> &str {
        self.sector.as_deref().unwrap_or(UNAVAILABLE)
    }

    pub fn industry(&self) -> &str {
        self.industry.as_deref().unwrap_or(UNAVAILABLE)
    }

    pub fn market_cap_display(&self) -> String {
        match self.market_cap {
            Some(cap) => format!("{:.0}", cap),
            None => UNAVAILABLE.to_string(),
        }
    }

    /// Quoted price from the profile alone: current price → regular market price.
    /// Zero or non-finite quotes count as missing.
    pub fn quoted_price(&self) -> Option<f64> {
        let usable = |p: &f64| p.is_finite() && *p > 0.0;
        self.current_price
            .filter(usable)
            .or(self.regular_market_price.filter(usable))
    }

    /// current price → regular market price → last close of `series`
    pub fn resolved_current_price(&self, series: &PriceSeries) -> f64 {
        self.quoted_price().unwrap_or_else(|| series.last_close())
    }

    /// Flattened view with the unavailable marker applied, for display layers.
    pub fn summary(&self, series: &PriceSeries) -> ProfileSummary {
        ProfileSummary {
            name: self.name().to_string(),
            sector: self.sector().to_string(),
            industry: self.industry().to_string(),
            market_cap: self.market_cap_display(),
            current_price: self.resolved_current_price(series),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSummary {
    pub name: String,
    pub sector: String,
    pub industry: String,
    pub market_cap: String,
    pub current_price: f64,
}
