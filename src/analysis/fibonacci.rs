//! Fibonacci retracement and extension levels between two prices.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use strum_macros::{Display, EnumIter};

pub const RETRACEMENT_RATIOS: [f64; 5] = [0.236, 0.382, 0.5, 0.618, 0.786];
pub const EXTENSION_RATIOS: [f64; 5] = [1.0, 1.272, 1.618, 2.0, 2.618];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FibonacciKind {
    Retracement,
    Extension,
}

impl FibonacciKind {
    pub fn ratios(&self) -> &'static [f64] {
        match self {
            FibonacciKind::Retracement => &RETRACEMENT_RATIOS,
            FibonacciKind::Extension => &EXTENSION_RATIOS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FibonacciLevel {
    /// Ratio printed with three decimals, e.g. "0.618"
    pub label: String,
    pub ratio: f64,
    pub price: f64,
}

/// Price levels for one (start, end, kind) triple, in ratio order.
/// Serializes as a `{"0.618": price, ..}` map keyed by label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FibonacciLevelSet {
    levels: Vec<FibonacciLevel>,
}

impl Serialize for FibonacciLevelSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.levels.len()))?;
        for level in &self.levels {
            map.serialize_entry(&level.label, &level.price)?;
        }
        map.end()
    }
}

impl FibonacciLevelSet {
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FibonacciLevel> {
        self.levels.iter()
    }

    /// Level price by its label ("0.500")
    pub fn get(&self, label: &str) -> Option<f64> {
        self.levels
            .iter()
            .find(|level| level.label == label)
            .map(|level| level.price)
    }

    pub fn at_ratio(&self, ratio: f64) -> Option<f64> {
        self.get(&ratio_label(ratio))
    }
}

pub fn ratio_label(ratio: f64) -> String {
    format!("{:.3}", ratio)
}

/// Retracements walk back from `end_price` toward `start_price`:
/// `end - (end - start) * ratio`. Extensions project from `start_price`
/// through `end_price`: `start + (end - start) * ratio`.
///
/// Equal prices give every level equal to that price.
pub fn levels(start_price: f64, end_price: f64, kind: FibonacciKind) -> FibonacciLevelSet {
    let diff = end_price - start_price;
    let levels = kind
        .ratios()
        .iter()
        .map(|&ratio| {
            let price = match kind {
                FibonacciKind::Retracement => end_price - diff * ratio,
                FibonacciKind::Extension => start_price + diff * ratio,
            };
            FibonacciLevel {
                label: ratio_label(ratio),
                ratio,
                price,
            }
        })
        .collect();

    FibonacciLevelSet { levels }
}
