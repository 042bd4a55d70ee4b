use std::collections::HashMap;
use async_trait::async_trait;

use crate::api::coingecko::ApiError;
use crate::models::{HistoryWindow, PriceSeries};

/// Remote market-data source consumed by both pipelines
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Current spot prices in one batched call; unknown ids are left out of the map
    async fn current_prices(
        &self,
        asset_ids: &[&str],
        quote_currency: &str,
    ) -> Result<HashMap<String, f64>, ApiError>;

    /// Historical series for one asset, oldest first as returned by the source
    async fn price_history(
        &self,
        asset_id: &str,
        quote_currency: &str,
        window: HistoryWindow,
    ) -> Result<PriceSeries, ApiError>;
}

#[cfg(test)]
pub mod fake {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use super::PriceSource;
    use crate::api::coingecko::ApiError;
    use crate::models::{HistoryWindow, PricePoint, PriceSeries};

    /// In-memory source that records every history request
    #[derive(Default)]
    pub struct FakePriceSource {
        pub current: HashMap<String, f64>,
        pub current_fails: bool,
        pub histories: HashMap<String, PriceSeries>,
        pub failing: HashSet<String>,
        pub history_calls: Mutex<Vec<(String, HistoryWindow)>>,
    }

    impl FakePriceSource {
        pub fn with_current(mut self, id: &str, price: f64) -> Self {
            self.current.insert(id.to_string(), price);
            self
        }

        pub fn with_history(mut self, id: &str, prices: &[f64]) -> Self {
            let start = epoch();
            let series = prices
                .iter()
                .enumerate()
                .map(|(i, &price)| PricePoint {
                    timestamp: start + Duration::hours(i as i64),
                    price,
                })
                .collect();
            self.histories.insert(id.to_string(), series);
            self
        }

        pub fn with_failing_history(mut self, id: &str) -> Self {
            self.failing.insert(id.to_string());
            self
        }

        pub fn calls(&self) -> Vec<(String, HistoryWindow)> {
            self.history_calls.lock().unwrap().clone()
        }
    }

    pub fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
    }

    #[async_trait]
    impl PriceSource for FakePriceSource {
        async fn current_prices(
            &self,
            asset_ids: &[&str],
            _quote_currency: &str,
        ) -> Result<HashMap<String, f64>, ApiError> {
            if self.current_fails {
                return Err(ApiError::RequestError("connection refused".to_string()));
            }
            Ok(self
                .current
                .iter()
                .filter(|(id, _)| asset_ids.contains(&id.as_str()))
                .map(|(id, price)| (id.clone(), *price))
                .collect())
        }

        async fn price_history(
            &self,
            asset_id: &str,
            _quote_currency: &str,
            window: HistoryWindow,
        ) -> Result<PriceSeries, ApiError> {
            self.history_calls
                .lock()
                .unwrap()
                .push((asset_id.to_string(), window));

            if self.failing.contains(asset_id) {
                return Err(ApiError::ServerError(500, "upstream unavailable".to_string()));
            }
            Ok(self.histories.get(asset_id).cloned().unwrap_or_default())
        }
    }
}
