//! Price series models

use chrono::{DateTime, Utc};

/// A single data point on a price chart
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

/// Points in the order the source returned them (not re-sorted)
pub type PriceSeries = Vec<PricePoint>;

/// Window for a historical price request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryWindow {
    /// Trailing window ending now
    Days(u32),
    /// Explicit [from, to] range
    Range {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },
}
