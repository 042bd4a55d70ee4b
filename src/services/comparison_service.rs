use std::collections::HashMap;
use std::path::PathBuf;
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::chart_service::{self, MissingBarPolicy};
use super::price_source::PriceSource;
use super::progress::{ProgressEvent, ProgressSink};
use super::report_service::{self, ReportError};
use crate::api::coingecko::ApiError;
use crate::models::asset::display_name;
use crate::models::{Asset, ComparisonReport, ComparisonRow, HistoryWindow};

pub const LOOKBACK_DAYS: i64 = 7;
pub const QUOTE_CURRENCY: &str = "usd";

#[derive(Debug, Error)]
pub enum ComparisonError {
    /// The batched current-price call failed; nothing can be compared
    #[error("failed to fetch current prices: {0}")]
    CurrentPrices(#[from] ApiError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error("artifact task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Where the artifacts go and how absent bars are drawn
#[derive(Debug, Clone)]
pub struct ComparisonOptions {
    pub csv_path: PathBuf,
    pub chart_path: PathBuf,
    pub missing_bars: MissingBarPolicy,
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("crypto_prices.csv"),
            chart_path: PathBuf::from("crypto_changes.png"),
            missing_bars: MissingBarPolicy::default(),
        }
    }
}

/// Fetch current and week-old prices and assemble the unrounded report.
///
/// The past price is the first sample of a [now - 7d, now] range query, an
/// approximation of the price exactly seven days ago. A failed history fetch
/// only blanks that asset's row; a failed current-price fetch aborts.
pub async fn build_report(
    source: &dyn PriceSource,
    assets: &[Asset],
    now: DateTime<Utc>,
    sink: &dyn ProgressSink,
) -> Result<ComparisonReport, ApiError> {
    let ids: Vec<&str> = assets.iter().map(|a| a.id).collect();

    sink.emit(ProgressEvent::FetchingCurrent);
    let current_prices = source.current_prices(&ids, QUOTE_CURRENCY).await?;
    debug!("Received {} of {} current prices", current_prices.len(), ids.len());

    let window = HistoryWindow::Range {
        from: now - Duration::days(LOOKBACK_DAYS),
        to: now,
    };

    sink.emit(ProgressEvent::FetchingHistory);
    let mut past_prices: HashMap<&str, Option<f64>> = HashMap::new();
    for asset in assets {
        let past_price = match source.price_history(asset.id, QUOTE_CURRENCY, window).await {
            Ok(series) => {
                let past_price = series.first().map(|p| p.price);
                sink.emit(ProgressEvent::HistoryFetched {
                    asset_id: asset.id.to_string(),
                    past_price,
                });
                past_price
            }
            Err(e) => {
                warn!("History fetch failed for {}: {}", asset.id, e);
                sink.emit(ProgressEvent::HistoryFailed {
                    asset_id: asset.id.to_string(),
                    error: e.to_string(),
                });
                None
            }
        };
        past_prices.insert(asset.id, past_price);
    }

    let rows = assets
        .iter()
        .map(|asset| {
            let name = if asset.name.is_empty() {
                display_name(asset.id)
            } else {
                asset.name.to_string()
            };
            let past = past_prices.get(asset.id).copied().flatten();
            let current = current_prices.get(asset.id).copied();
            ComparisonRow::new(name, past, current)
        })
        .collect();

    Ok(ComparisonReport::new(rows))
}

/// Run the full weekly comparison: build, round, print, write CSV, draw chart.
/// Returns the rounded report that was written.
pub async fn run_weekly_comparison(
    source: &dyn PriceSource,
    assets: &[Asset],
    options: &ComparisonOptions,
    sink: &dyn ProgressSink,
) -> Result<ComparisonReport, ComparisonError> {
    let report = build_report(source, assets, Utc::now(), sink).await?.rounded();
    info!(
        "Weekly comparison built: {} rows, {} with a change",
        report.len(),
        report.complete_rows()
    );

    sink.emit(ProgressEvent::Table(report_service::render_table(&report).render_plain()));

    let csv_report = report.clone();
    let csv_path = options.csv_path.clone();
    off_executor(move || report_service::save_csv(&csv_report, &csv_path)).await?;
    sink.emit(ProgressEvent::SavedCsv(options.csv_path.clone()));

    let chart_report = report.clone();
    let (policy, chart_path) = (options.missing_bars, options.chart_path.clone());
    off_executor(move || chart_service::render_change_chart(&chart_report, policy, &chart_path)).await?;
    sink.emit(ProgressEvent::SavedChart(options.chart_path.clone()));

    Ok(report)
}

/// File writes and plotters rendering block, so they run on the blocking pool
async fn off_executor<F>(work: F) -> Result<(), ComparisonError>
where
    F: FnOnce() -> Result<(), ReportError> + Send + 'static,
{
    tokio::task::spawn_blocking(work).await??;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::asset::comparison_assets;
    use crate::services::price_source::fake::{epoch, FakePriceSource};
    use crate::services::progress::BufferedSink;

    fn two_assets() -> Vec<Asset> {
        vec![
            *Asset::by_id("bitcoin").unwrap(),
            *Asset::by_id("ethereum").unwrap(),
        ]
    }

    #[tokio::test]
    async fn test_partial_failure_is_isolated_per_asset() {
        let source = FakePriceSource::default()
            .with_current("bitcoin", 50000.0)
            .with_current("ethereum", 3000.0)
            .with_history("bitcoin", &[45000.0, 47000.0, 49000.0])
            .with_failing_history("ethereum");
        let sink = BufferedSink::new();

        let report = build_report(&source, &two_assets(), epoch(), &sink)
            .await
            .unwrap()
            .rounded();

        assert_eq!(
            report.rows,
            vec![
                ComparisonRow {
                    name: "Bitcoin".to_string(),
                    past_price: Some(45000.0),
                    current_price: Some(50000.0),
                    change_pct: Some(11.11),
                },
                ComparisonRow {
                    name: "Ethereum".to_string(),
                    past_price: None,
                    current_price: Some(3000.0),
                    change_pct: None,
                },
            ]
        );
        assert_eq!(sink.failed_assets(), vec!["ethereum".to_string()]);
    }

    #[tokio::test]
    async fn test_history_requests_use_seven_day_range_in_order() {
        let source = FakePriceSource::default();
        let sink = BufferedSink::new();
        let now = epoch();

        build_report(&source, comparison_assets(), now, &sink).await.unwrap();

        let calls = source.calls();
        let ids: Vec<&str> = calls.iter().map(|(id, _)| id.as_str()).collect();
        let expected: Vec<&str> = comparison_assets().iter().map(|a| a.id).collect();
        assert_eq!(ids, expected);

        for (_, window) in calls {
            assert_eq!(window, HistoryWindow::Range { from: now - Duration::days(7), to: now });
        }
    }

    #[tokio::test]
    async fn test_every_asset_gets_a_row_even_when_all_history_fails() {
        let mut source = FakePriceSource::default().with_current("bitcoin", 1.0);
        for asset in comparison_assets() {
            source = source.with_failing_history(asset.id);
        }
        let sink = BufferedSink::new();

        let report = build_report(&source, comparison_assets(), epoch(), &sink).await.unwrap();

        assert_eq!(report.len(), comparison_assets().len());
        assert_eq!(report.complete_rows(), 0);
        assert_eq!(report.rows[4].name, "XRP");
        assert_eq!(report.rows[0].current_price, Some(1.0));
    }

    #[tokio::test]
    async fn test_missing_current_price_and_empty_history() {
        let source = FakePriceSource::default()
            .with_current("ethereum", 3000.0)
            .with_history("bitcoin", &[45000.0])
            .with_history("ethereum", &[]);
        let sink = BufferedSink::new();

        let report = build_report(&source, &two_assets(), epoch(), &sink).await.unwrap();

        assert_eq!(report.rows[0].past_price, Some(45000.0));
        assert_eq!(report.rows[0].current_price, None);
        assert_eq!(report.rows[0].change_pct, None);
        assert_eq!(report.rows[1].past_price, None);
        assert!(sink.failed_assets().is_empty());
    }

    #[tokio::test]
    async fn test_current_price_failure_aborts_before_history() {
        let source = FakePriceSource {
            current_fails: true,
            ..Default::default()
        };
        let sink = BufferedSink::new();

        let result = build_report(&source, &two_assets(), epoch(), &sink).await;

        assert!(matches!(result, Err(ApiError::RequestError(_))));
        assert!(source.calls().is_empty());
        assert_eq!(sink.events(), vec![ProgressEvent::FetchingCurrent]);
    }

    fn scratch_options(case: &str, missing_bars: MissingBarPolicy) -> ComparisonOptions {
        let dir = std::env::temp_dir();
        let stem = format!("coinboard_run_{}_{}", std::process::id(), case);
        ComparisonOptions {
            csv_path: dir.join(format!("{}.csv", stem)),
            chart_path: dir.join(format!("{}.png", stem)),
            missing_bars,
        }
    }

    async fn assert_artifacts_written(source: &FakePriceSource, case: &str, policy: MissingBarPolicy) {
        let options = scratch_options(case, policy);
        let sink = BufferedSink::new();

        let report = run_weekly_comparison(source, comparison_assets(), &options, &sink)
            .await
            .unwrap();

        let csv = std::fs::read_to_string(&options.csv_path).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 1 + comparison_assets().len());
        assert_eq!(lines[0], crate::models::comparison::REPORT_HEADERS.join(","));
        for (line, asset) in lines[1..].iter().zip(comparison_assets()) {
            assert!(line.starts_with(&format!("{},", asset.name)), "{} out of order", line);
        }

        let png = std::fs::read(&options.chart_path).unwrap();
        assert!(png.starts_with(b"\x89PNG"));

        let events = sink.events();
        assert!(events.contains(&ProgressEvent::SavedCsv(options.csv_path.clone())));
        assert!(events.contains(&ProgressEvent::SavedChart(options.chart_path.clone())));
        assert_eq!(report.len(), comparison_assets().len());

        let _ = std::fs::remove_file(&options.csv_path);
        let _ = std::fs::remove_file(&options.chart_path);
    }

    #[tokio::test]
    async fn test_run_writes_artifacts_under_every_policy() {
        let source = FakePriceSource::default()
            .with_current("bitcoin", 50000.0)
            .with_current("ethereum", 3000.0)
            .with_current("dogecoin", 0.1)
            .with_history("bitcoin", &[45000.0])
            .with_history("ethereum", &[3300.0])
            .with_failing_history("dogecoin");

        for (case, policy) in [
            ("skip", MissingBarPolicy::Skip),
            ("zero", MissingBarPolicy::Zero),
            ("marker", MissingBarPolicy::Marker),
        ] {
            assert_artifacts_written(&source, case, policy).await;
        }
    }

    #[tokio::test]
    async fn test_run_writes_artifacts_when_every_change_is_absent() {
        let mut source = FakePriceSource::default();
        for asset in comparison_assets() {
            source = source.with_failing_history(asset.id);
        }

        for (case, policy) in [
            ("absent_skip", MissingBarPolicy::Skip),
            ("absent_zero", MissingBarPolicy::Zero),
            ("absent_marker", MissingBarPolicy::Marker),
        ] {
            assert_artifacts_written(&source, case, policy).await;
        }
    }

    #[tokio::test]
    async fn test_identical_inputs_give_identical_reports() {
        let source = FakePriceSource::default()
            .with_current("bitcoin", 61234.5)
            .with_history("bitcoin", &[60000.12346]);
        let sink = BufferedSink::new();
        let assets = vec![*Asset::by_id("bitcoin").unwrap()];

        let first = build_report(&source, &assets, epoch(), &sink).await.unwrap().rounded();
        let second = build_report(&source, &assets, epoch(), &sink).await.unwrap().rounded();

        assert_eq!(first, second);
        assert_eq!(first.rows[0].past_price, Some(60000.1235));
    }
}
