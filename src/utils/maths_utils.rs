use statrs::statistics::Statistics;

/// Round to `decimals` places. Exact halves go to the even neighbour,
/// so `100.125` becomes `100.12` and `100.375` becomes `100.38`.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.mean())
}

/// Population standard deviation (divides by `n`, not `n - 1`).
pub fn population_std_dev(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.population_std_dev())
}

/// Population standard deviation over mean.
/// `None` when empty or when the mean is zero (the ratio is undefined).
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    let mean = mean(values)?;
    if mean == 0.0 {
        return None;
    }
    let cv = population_std_dev(values)? / mean;
    cv.is_finite().then_some(cv)
}

/// Simple moving average of the last `window` values.
/// `None` if fewer than `window` values exist (or window is zero).
pub fn trailing_sma(values: &[f64], window: usize) -> Option<f64> {
    if window == 0 || values.len() < window {
        return None;
    }
    mean(&values[values.len() - window..])
}

/// The last `window` values, or all of them if there are fewer.
pub fn tail(values: &[f64], window: usize) -> &[f64] {
    &values[values.len().saturating_sub(window)..]
}
