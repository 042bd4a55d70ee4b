use std::collections::HashMap;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, RETRY_AFTER};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::models::{ApiError, ErrorResponse, MarketChartResponse, SimplePriceResponse};
use crate::models::{HistoryWindow, PricePoint, PriceSeries};
use crate::services::price_source::PriceSource;

/// CoinGecko v3 REST client, shared by every request in a run
pub struct CoinGeckoClient {
    http_client: HttpClient,
    api_key: Option<String>,
    base_url: String,
}

impl CoinGeckoClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.coingecko.com/api/v3";

    /// Create a new client against the public API
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, Self::DEFAULT_BASE_URL.to_string())
    }

    /// Create a new client with custom base URL (pro endpoint or a local mock)
    pub fn with_base_url(api_key: Option<String>, base_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn create_headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(key) = &self.api_key {
            let value = HeaderValue::from_str(key)
                .map_err(|e| ApiError::RequestError(format!("Invalid API key header: {}", e)))?;
            headers.insert("x-cg-demo-api-key", value);
        }

        Ok(headers)
    }

    /// Parse error response based on HTTP status code
    async fn handle_error_response(response: reqwest::Response) -> ApiError {
        let status_code = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok());
        let body_text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body_text)
            .ok()
            .and_then(|e| e.message())
            .unwrap_or(body_text);

        match status_code {
            400 => ApiError::BadRequest(message),
            401 | 403 => ApiError::Unauthorized(message),
            404 => ApiError::NotFound(message),
            429 => {
                warn!("Price API rate limited, retry after {:?} s", retry_after);
                ApiError::RateLimited { retry_after }
            }
            500..=599 => {
                warn!("Price API server error {}: {}", status_code, message);
                ApiError::ServerError(status_code as i32, message)
            }
            _ => ApiError::HttpError(status_code as i32, message),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} {:?}", url, query);

        let response = self.http_client
            .get(&url)
            .headers(self.create_headers()?)
            .query(query)
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::handle_error_response(response).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::DeserializationError(format!("Failed to parse response: {}", e)))
    }

    /// GET /simple/price
    ///
    /// One batched call for every id. Ids missing from the response are simply
    /// absent from the returned map.
    pub async fn get_current_prices(
        &self,
        asset_ids: &[&str],
        quote_currency: &str,
    ) -> Result<HashMap<String, f64>, ApiError> {
        let query = [
            ("ids", asset_ids.join(",")),
            ("vs_currencies", quote_currency.to_string()),
        ];
        let response: SimplePriceResponse = self.get_json("/simple/price", &query).await?;

        Ok(prices_for_quote(response, quote_currency))
    }

    /// GET /coins/{id}/market_chart or /coins/{id}/market_chart/range
    pub async fn get_price_history(
        &self,
        asset_id: &str,
        quote_currency: &str,
        window: HistoryWindow,
    ) -> Result<PriceSeries, ApiError> {
        let response: MarketChartResponse = match window {
            HistoryWindow::Days(days) => {
                let query = [
                    ("vs_currency", quote_currency.to_string()),
                    ("days", days.to_string()),
                ];
                self.get_json(&format!("/coins/{}/market_chart", asset_id), &query)
                    .await?
            }
            HistoryWindow::Range { from, to } => {
                let query = [
                    ("vs_currency", quote_currency.to_string()),
                    ("from", from.timestamp().to_string()),
                    ("to", to.timestamp().to_string()),
                ];
                self.get_json(&format!("/coins/{}/market_chart/range", asset_id), &query)
                    .await?
            }
        };

        series_from_chart(&response)
    }
}

/// Flatten a simple-price response to id -> price for one quote currency
pub fn prices_for_quote(response: SimplePriceResponse, quote_currency: &str) -> HashMap<String, f64> {
    response
        .into_iter()
        .filter_map(|(id, quotes)| quotes.get(quote_currency).map(|price| (id, *price)))
        .collect()
}

/// Convert `[ms, price]` pairs to calendar-time points, keeping source order
pub fn series_from_chart(response: &MarketChartResponse) -> Result<PriceSeries, ApiError> {
    response
        .prices
        .iter()
        .map(|&(millis, price)| {
            DateTime::<Utc>::from_timestamp_millis(millis as i64)
                .map(|timestamp| PricePoint { timestamp, price })
                .ok_or_else(|| {
                    ApiError::DeserializationError(format!("Timestamp out of range: {}", millis))
                })
        })
        .collect()
}

#[async_trait]
impl PriceSource for CoinGeckoClient {
    async fn current_prices(
        &self,
        asset_ids: &[&str],
        quote_currency: &str,
    ) -> Result<HashMap<String, f64>, ApiError> {
        self.get_current_prices(asset_ids, quote_currency).await
    }

    async fn price_history(
        &self,
        asset_id: &str,
        quote_currency: &str,
        window: HistoryWindow,
    ) -> Result<PriceSeries, ApiError> {
        self.get_price_history(asset_id, quote_currency, window).await
    }
}
