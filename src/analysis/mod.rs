// Analysis algorithms: swing points, Fibonacci levels, wave structure, indicators
pub mod fibonacci;
pub mod indicators;
pub mod swing;
pub mod wave;

// Re-export commonly used types
pub use fibonacci::{FibonacciKind, FibonacciLevel, FibonacciLevelSet};
pub use indicators::IndicatorSnapshot;
pub use swing::{SwingIndices, SwingKind, SwingPoint};
pub use wave::{PriceTargets, Trend, WaveAnalysis, WaveTarget};
