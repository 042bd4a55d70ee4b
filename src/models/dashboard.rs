//! Dashboard models

use super::asset::Asset;
use super::chart::PriceSeries;

/// Timeframes offered by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timeframe {
    Week,
    Month,
    Year,
}

impl Timeframe {
    pub const ALL: [Timeframe; 3] = [Timeframe::Week, Timeframe::Month, Timeframe::Year];

    pub fn days(self) -> u32 {
        match self {
            Timeframe::Week => 7,
            Timeframe::Month => 30,
            Timeframe::Year => 365,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Timeframe::Week => "7 Days",
            Timeframe::Month => "30 Days",
            Timeframe::Year => "365 Days",
        }
    }

    pub fn from_days(days: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.days() == days)
    }

    /// Parse user input such as `7`, `7d`, `30days` or `365 Days`
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim().to_lowercase();
        let digits: String = input.chars().take_while(|c| c.is_ascii_digit()).collect();
        let unit = input[digits.len()..].trim();

        if !matches!(unit, "" | "d" | "day" | "days") {
            return None;
        }

        digits.parse().ok().and_then(Self::from_days)
    }
}

/// A fetched dashboard selection, ready for rendering
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub asset: Asset,
    pub timeframe: Timeframe,
    pub series: PriceSeries,
}

impl DashboardView {
    /// Price of the last point in the series
    pub fn latest_price(&self) -> Option<f64> {
        self.series.last().map(|p| p.price)
    }

    pub fn title(&self) -> String {
        format!("{} Price Chart - Last {}", self.asset.name, self.timeframe.label())
    }

    pub fn metric_label(&self) -> String {
        format!("Current {} Price (USD)", self.asset.name)
    }
}
