//! Swing point (local extremum) detection.
//!
//! A peak at index `i` is a bar whose high is strictly greater than every high
//! within `order` bars on either side. Neighbour indices that fall off either
//! end of the series are clamped to the first/last bar, so the first and last
//! bars compare against themselves and can never qualify. Troughs mirror this
//! on lows. Ties never qualify: a flat top or bottom produces no swing point.

use itertools::Itertools;
use serde::Serialize;
use std::cmp::Ordering;
use strum_macros::Display;

use crate::config::PRINT_SWING_DETECTION;
use crate::domain::SeriesStamp;
use crate::models::PriceSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SwingKind {
    Peak,
    Trough,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SwingPoint {
    /// Position of the bar in the series it was detected in
    pub index: usize,
    /// Bar date, or the position again for undated series
    pub date: SeriesStamp,
    /// High for peaks, low for troughs
    pub price: f64,
    pub kind: SwingKind,
}

/// Ascending bar indices of the detected peaks and troughs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwingIndices {
    pub peaks: Vec<usize>,
    pub troughs: Vec<usize>,
}

/// Indices `i` where `values[i]` compares as `wanted` against every clamped
/// neighbour within `order` bars.
fn relative_extrema(values: &[f64], order: usize, wanted: Ordering) -> Vec<usize> {
    if order == 0 || values.is_empty() {
        return Vec::new();
    }
    let last = values.len() - 1;

    (0..values.len())
        .filter(|&i| {
            (1..=order).all(|shift| {
                let left = values[i.saturating_sub(shift)];
                let right = values[(i + shift).min(last)];
                values[i].partial_cmp(&left) == Some(wanted)
                    && values[i].partial_cmp(&right) == Some(wanted)
            })
        })
        .collect()
}

/// Detection over raw high/low columns. Empty input gives empty output.
pub fn detect_in(highs: &[f64], lows: &[f64], order: usize) -> SwingIndices {
    if order == 0 {
        log::warn!("Swing detection called with order 0; no swing points reported");
    }

    let indices = SwingIndices {
        peaks: relative_extrema(highs, order, Ordering::Greater),
        troughs: relative_extrema(lows, order, Ordering::Less),
    };

    if cfg!(debug_assertions) && PRINT_SWING_DETECTION {
        log::debug!(
            "Swing detection (order {}) over {} bars: peaks {:?}, troughs {:?}",
            order,
            highs.len(),
            indices.peaks,
            indices.troughs
        );
    }

    indices
}

pub fn detect(series: &PriceSeries, order: usize) -> SwingIndices {
    detect_in(series.highs(), series.lows(), order)
}

/// Merge peaks and troughs into one list ordered by bar index.
/// A bar that is both a peak and a trough yields the peak first.
pub fn to_swing_points(series: &PriceSeries, indices: &SwingIndices) -> Vec<SwingPoint> {
    let peaks = indices.peaks.iter().map(|&idx| SwingPoint {
        index: idx,
        date: series.stamp(idx),
        price: series.highs()[idx],
        kind: SwingKind::Peak,
    });
    let troughs = indices.troughs.iter().map(|&idx| SwingPoint {
        index: idx,
        date: series.stamp(idx),
        price: series.lows()[idx],
        kind: SwingKind::Trough,
    });

    peaks.merge_by(troughs, |a, b| a.index <= b.index).collect()
}

/// `detect` followed by `to_swing_points`.
pub fn swing_points(series: &PriceSeries, order: usize) -> Vec<SwingPoint> {
    to_swing_points(series, &detect(series, order))
}
