//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep them `false` by default so release
//! builds remain quiet. Most call sites are further gated by `cfg!(debug_assertions)`.

/// Emit the peak/trough indices found by every swing detection pass.
/// Very noisy during backtests (one pass per simulated prediction).
pub const PRINT_SWING_DETECTION: bool = false;

/// Emit one line per backtest iteration (index, baseline, predicted, actual).
pub const PRINT_BACKTEST_ITERATIONS: bool = false;

/// Emit which market-data provider served a request, and why earlier ones failed.
pub const PRINT_PROVIDER_FALLBACK: bool = true;
