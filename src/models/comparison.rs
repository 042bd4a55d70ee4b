//! Weekly price comparison models

use crate::utils::round_to;

/// CSV / table column headers, in output order
pub const REPORT_HEADERS: [&str; 4] = [
    "Coin",
    "Price 1 Week Ago (USD)",
    "Current Price (USD)",
    "Change (%)",
];

const PRICE_DECIMALS: u32 = 4;
const CHANGE_DECIMALS: u32 = 2;

/// One asset's line in the comparison report
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub name: String,
    pub past_price: Option<f64>,
    pub current_price: Option<f64>,
    pub change_pct: Option<f64>,
}

impl ComparisonRow {
    /// Build a row, computing the percent change when both prices are known.
    /// A zero past or current price leaves the change absent.
    pub fn new(name: impl Into<String>, past_price: Option<f64>, current_price: Option<f64>) -> Self {
        let change_pct = match (past_price, current_price) {
            (Some(past), Some(current)) if past != 0.0 && current != 0.0 => Some((current - past) / past * 100.0),
            _ => None,
        };

        Self {
            name: name.into(),
            past_price,
            current_price,
            change_pct,
        }
    }

    /// Display rounding: prices to 4 places, change to 2
    pub fn rounded(&self) -> Self {
        Self {
            name: self.name.clone(),
            past_price: self.past_price.map(|p| round_to(p, PRICE_DECIMALS)),
            current_price: self.current_price.map(|p| round_to(p, PRICE_DECIMALS)),
            change_pct: self.change_pct.map(|c| round_to(c, CHANGE_DECIMALS)),
        }
    }
}

/// Ordered rows, one per tracked asset, in declared asset order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonReport {
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonReport {
    pub fn new(rows: Vec<ComparisonRow>) -> Self {
        Self { rows }
    }

    pub fn rounded(&self) -> Self {
        Self {
            rows: self.rows.iter().map(ComparisonRow::rounded).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Number of rows with a computed change
    pub fn complete_rows(&self) -> usize {
        self.rows.iter().filter(|r| r.change_pct.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_computed_when_both_prices_present() {
        let row = ComparisonRow::new("Bitcoin", Some(45000.0), Some(50000.0)).rounded();
        assert_eq!(row.past_price, Some(45000.0));
        assert_eq!(row.current_price, Some(50000.0));
        assert_eq!(row.change_pct, Some(11.11));
    }

    #[test]
    fn test_change_absent_when_either_price_missing() {
        assert_eq!(ComparisonRow::new("Ethereum", None, Some(3000.0)).change_pct, None);
        assert_eq!(ComparisonRow::new("Cardano", Some(0.5), None).change_pct, None);
        assert_eq!(ComparisonRow::new("TRON", Some(0.0), Some(0.1)).change_pct, None);
        assert_eq!(ComparisonRow::new("X", Some(0.5), Some(0.0)).change_pct, None);
    }

    #[test]
    fn test_negative_change_and_price_rounding() {
        let row = ComparisonRow::new("Dogecoin", Some(0.123456), Some(0.1)).rounded();
        assert_eq!(row.past_price, Some(0.1235));
        assert_eq!(row.current_price, Some(0.1));
        assert_eq!(row.change_pct, Some(-19.0));
    }

    #[test]
    fn test_report_counts() {
        let report = ComparisonReport::new(vec![
            ComparisonRow::new("Bitcoin", Some(1.0), Some(2.0)),
            ComparisonRow::new("Ethereum", None, Some(2.0)),
        ]);
        assert_eq!(report.len(), 2);
        assert_eq!(report.complete_rows(), 1);
    }
}
