// Domain types and value objects
pub mod market_params;
pub mod price_point;
pub mod security_profile;

// Re-export commonly used types
pub use market_params::{BarInterval, HistoryPeriod};
pub use price_point::{PricePoint, SeriesStamp};
pub use security_profile::{ProfileSummary, SecurityProfile, UNAVAILABLE};
