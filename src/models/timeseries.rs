use anyhow::{Result, anyhow, bail};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{PricePoint, SeriesStamp};

// ============================================================================
// PriceSeries: validated, immutable OHLCV history for one security
// ============================================================================

/// Columnar OHLCV history, sorted by date ascending with no duplicate dates.
///
/// Construction is the only place that can fail: once built, a series is
/// non-empty and every column has the same length, so analysis code indexes
/// freely. Dates are optional; a series built without them is analysed by
/// position only.
///
/// Serialized as a plain list of [`PricePoint`] rows and re-validated on the
/// way back in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PricePoint>", into = "Vec<PricePoint>")]
pub struct PriceSeries {
    dates: Option<Vec<NaiveDate>>,

    // Prices
    open_prices: Vec<f64>,
    high_prices: Vec<f64>,
    low_prices: Vec<f64>,
    close_prices: Vec<f64>,

    volumes: Vec<f64>,
}

impl PriceSeries {
    /// Builds a series from rows. Either every row has a date or none does.
    pub fn new(points: Vec<PricePoint>) -> Result<Self> {
        let dates = match points.first().and_then(|p| p.date) {
            Some(_) => Some(
                points
                    .iter()
                    .enumerate()
                    .map(|(idx, p)| {
                        p.date
                            .ok_or_else(|| anyhow!("Row {} has no date but row 0 does", idx))
                    })
                    .collect::<Result<Vec<_>>>()?,
            ),
            None => {
                if let Some(idx) = points.iter().position(|p| p.date.is_some()) {
                    bail!("Row {} has a date but row 0 does not", idx);
                }
                None
            }
        };

        Self::from_columns(
            dates,
            points.iter().map(|p| p.open).collect(),
            points.iter().map(|p| p.high).collect(),
            points.iter().map(|p| p.low).collect(),
            points.iter().map(|p| p.close).collect(),
            points.iter().map(|p| p.volume).collect(),
        )
    }

    pub fn from_columns(
        dates: Option<Vec<NaiveDate>>,
        open_prices: Vec<f64>,
        high_prices: Vec<f64>,
        low_prices: Vec<f64>,
        close_prices: Vec<f64>,
        volumes: Vec<f64>,
    ) -> Result<Self> {
        let len = close_prices.len();
        if len == 0 {
            bail!("Price series must contain at least one bar");
        }

        let column_lengths = [
            ("open", open_prices.len()),
            ("high", high_prices.len()),
            ("low", low_prices.len()),
            ("volume", volumes.len()),
            ("date", dates.as_ref().map_or(len, Vec::len)),
        ];
        if let Some((name, other)) = column_lengths.iter().find(|(_, l)| *l != len) {
            bail!(
                "Column '{}' has {} entries but 'close' has {}",
                name,
                other,
                len
            );
        }

        if let Some(dates) = &dates
            && let Some(idx) = dates.windows(2).position(|w| w[0] >= w[1])
        {
            bail!(
                "Dates must be strictly ascending: {} at row {} is followed by {}",
                dates[idx],
                idx,
                dates[idx + 1]
            );
        }

        for (name, column) in [
            ("open", &open_prices),
            ("high", &high_prices),
            ("low", &low_prices),
            ("close", &close_prices),
        ] {
            if let Some(idx) = column.iter().position(|p| !p.is_finite()) {
                bail!("Non-finite {} price at row {}", name, idx);
            }
        }

        Ok(PriceSeries {
            dates,
            open_prices,
            high_prices,
            low_prices,
            close_prices,
            volumes,
        })
    }

    /// Undated series whose open/high/low all equal the close.
    pub fn from_closes(closes: &[f64]) -> Result<Self> {
        Self::from_columns(
            None,
            closes.to_vec(),
            closes.to_vec(),
            closes.to_vec(),
            closes.to_vec(),
            vec![0.0; closes.len()],
        )
    }

    /// Same bars, with `dates` attached.
    pub fn with_dates(self, dates: Vec<NaiveDate>) -> Result<Self> {
        Self::from_columns(
            Some(dates),
            self.open_prices,
            self.high_prices,
            self.low_prices,
            self.close_prices,
            self.volumes,
        )
    }

    pub fn len(&self) -> usize {
        self.close_prices.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.close_prices.is_empty()
    }

    pub fn highs(&self) -> &[f64] {
        &self.high_prices
    }

    pub fn lows(&self) -> &[f64] {
        &self.low_prices
    }

    pub fn closes(&self) -> &[f64] {
        &self.close_prices
    }

    pub fn dates(&self) -> Option<&[NaiveDate]> {
        self.dates.as_deref()
    }

    pub fn point(&self, idx: usize) -> PricePoint {
        PricePoint::new(
            self.dates.as_ref().map(|d| d[idx]),
            self.open_prices[idx],
            self.high_prices[idx],
            self.low_prices[idx],
            self.close_prices[idx],
            self.volumes[idx],
        )
    }

    pub fn stamp(&self, idx: usize) -> SeriesStamp {
        match &self.dates {
            Some(dates) => SeriesStamp::Date(dates[idx]),
            None => SeriesStamp::Index(idx),
        }
    }

    pub fn points(&self) -> impl Iterator<Item = PricePoint> + '_ {
        (0..self.len()).map(|idx| self.point(idx))
    }

    pub fn last_close(&self) -> f64 {
        self.close_prices[self.len() - 1]
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.as_ref().and_then(|d| d.last().copied())
    }

    /// Copy of the first `len` bars.
    pub fn truncated(&self, len: usize) -> Result<Self> {
        if len == 0 || len > self.len() {
            bail!(
                "Cannot truncate a {}-bar series to {} bars",
                self.len(),
                len
            );
        }
        Ok(PriceSeries {
            dates: self.dates.as_ref().map(|d| d[..len].to_vec()),
            open_prices: self.open_prices[..len].to_vec(),
            high_prices: self.high_prices[..len].to_vec(),
            low_prices: self.low_prices[..len].to_vec(),
            close_prices: self.close_prices[..len].to_vec(),
            volumes: self.volumes[..len].to_vec(),
        })
    }

    /// Copy of the bars dated on or after `cutoff`. Undated series are returned whole.
    pub fn since(&self, cutoff: NaiveDate) -> Result<Self> {
        let Some(dates) = &self.dates else {
            return Ok(self.clone());
        };
        let start = dates.partition_point(|d| *d < cutoff);
        if start == self.len() {
            bail!("No bars on or after {}", cutoff);
        }
        Ok(PriceSeries {
            dates: Some(dates[start..].to_vec()),
            open_prices: self.open_prices[start..].to_vec(),
            high_prices: self.high_prices[start..].to_vec(),
            low_prices: self.low_prices[start..].to_vec(),
            close_prices: self.close_prices[start..].to_vec(),
            volumes: self.volumes[start..].to_vec(),
        })
    }
}

impl TryFrom<Vec<PricePoint>> for PriceSeries {
    type Error = anyhow::Error;

    fn try_from(points: Vec<PricePoint>) -> Result<Self> {
        PriceSeries::new(points)
    }
}

impl From<PriceSeries> for Vec<PricePoint> {
    fn from(series: PriceSeries) -> Self {
        series.points().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn bar(date: Option<NaiveDate>, close: f64) -> PricePoint {
        PricePoint::new(date, close, close + 1.0, close - 1.0, close, 100.0)
    }

    #[test]
    fn empty_series_is_rejected() {
        assert!(PriceSeries::new(Vec::new()).is_err());
        assert!(PriceSeries::from_closes(&[]).is_err());
    }

    #[test]
    fn unsorted_or_duplicate_dates_are_rejected() {
        let unsorted = vec![bar(Some(day(3)), 1.0), bar(Some(day(2)), 2.0)];
        assert!(PriceSeries::new(unsorted).is_err());

        let duplicated = vec![bar(Some(day(2)), 1.0), bar(Some(day(2)), 2.0)];
        assert!(PriceSeries::new(duplicated).is_err());
    }

    #[test]
    fn mixed_dated_and_undated_rows_are_rejected() {
        assert!(PriceSeries::new(vec![bar(Some(day(2)), 1.0), bar(None, 2.0)]).is_err());
        assert!(PriceSeries::new(vec![bar(None, 1.0), bar(Some(day(2)), 2.0)]).is_err());
    }

    #[test]
    fn mismatched_columns_are_rejected() {
        let err = PriceSeries::from_columns(
            None,
            vec![1.0, 2.0],
            vec![1.0, 2.0],
            vec![1.0],
            vec![1.0, 2.0],
            vec![0.0, 0.0],
        )
        .unwrap_err();
        assert!(err.to_string().contains("low"));
    }

    #[test]
    fn non_finite_prices_are_rejected() {
        assert!(PriceSeries::from_closes(&[1.0, f64::NAN]).is_err());
    }

    #[test]
    fn truncation_keeps_prefix() {
        let series = PriceSeries::new((1..=5).map(|d| bar(Some(day(d)), d as f64)).collect())
            .unwrap();
        let head = series.truncated(3).unwrap();
        assert_eq!(head.len(), 3);
        assert_eq!(head.last_close(), 3.0);
        assert_eq!(head.last_date(), Some(day(3)));
        assert!(series.truncated(0).is_err());
        assert!(series.truncated(6).is_err());
    }

    #[test]
    fn since_trims_by_date() {
        let series = PriceSeries::new((1..=5).map(|d| bar(Some(day(d)), d as f64)).collect())
            .unwrap();
        let tail = series.since(day(4)).unwrap();
        assert_eq!(tail.closes(), &[4.0, 5.0]);
        assert!(series.since(day(9)).is_err());

        let undated = PriceSeries::from_closes(&[1.0, 2.0]).unwrap();
        assert_eq!(undated.since(day(9)).unwrap().len(), 2);
    }

    #[test]
    fn deserializing_rows_revalidates() {
        let json = r#"[
            {"date":"2024-01-02","open":1,"high":2,"low":0.5,"close":1.5,"volume":10},
            {"date":"2024-01-03","open":1.5,"high":2.5,"low":1,"close":2,"volume":12}
        ]"#;
        let series: PriceSeries = serde_json::from_str(json).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.stamp(1), SeriesStamp::Date(day(3)));

        let bad = r#"[
            {"date":"2024-01-03","open":1,"high":2,"low":0.5,"close":1.5},
            {"date":"2024-01-02","open":1.5,"high":2.5,"low":1,"close":2}
        ]"#;
        assert!(serde_json::from_str::<PriceSeries>(bad).is_err());
    }
}
