use tracing::info;

use super::comparison_service::QUOTE_CURRENCY;
use super::price_source::PriceSource;
use crate::api::coingecko::ApiError;
use crate::models::{Asset, DashboardView, HistoryWindow, Timeframe};
use crate::utils::format_usd;

/// Fetch the selected asset's history as a trailing day-count window.
/// Exactly one history request; failures propagate to the caller.
pub async fn load_dashboard(
    source: &dyn PriceSource,
    asset: Asset,
    timeframe: Timeframe,
) -> Result<DashboardView, ApiError> {
    let series = source
        .price_history(asset.id, QUOTE_CURRENCY, HistoryWindow::Days(timeframe.days()))
        .await?;

    info!(
        "📈 Loaded {} points for {} over {}",
        series.len(),
        asset.id,
        timeframe.label()
    );

    Ok(DashboardView {
        asset,
        timeframe,
        series,
    })
}

/// Metric text for the latest price, e.g. `$50,000.00`
pub fn latest_price_display(view: &DashboardView) -> String {
    view.latest_price()
        .map(format_usd)
        .unwrap_or_else(|| "n/a".to_string())
}
