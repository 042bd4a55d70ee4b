//! Data models for coinboard pipelines and commands
//!
//! Plain data only. Everything here is built fresh per request and never
//! mutated after construction.

pub mod asset;
pub mod chart;
pub mod comparison;
pub mod dashboard;

// Re-export commonly used types for convenience
pub use asset::Asset;
pub use chart::{HistoryWindow, PricePoint, PriceSeries};
pub use comparison::{ComparisonReport, ComparisonRow};
pub use dashboard::{DashboardView, Timeframe};
