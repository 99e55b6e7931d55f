// Core data models shared by every analysis stage.
// Pure data: no I/O, no presentation.

pub mod outcome;
pub mod timeseries;

// Re-export key types for convenience
pub use outcome::{AnalysisOutcome, AnalysisStatus, Shortfall};
pub use timeseries::PriceSeries;
