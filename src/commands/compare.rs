use std::path::{Path, PathBuf};
use serenity::all::{CreateAttachment, CreateEmbed, CreateEmbedFooter, CreateMessage};
use serenity::model::channel::Message;
use serenity::prelude::Context;

use crate::api::coingecko::CoinGeckoClient;
use crate::models::asset::comparison_assets;
use crate::services::comparison_service::{self, ComparisonOptions};
use crate::services::progress::BufferedSink;
use crate::services::report_service;

/// `$compare`: run the weekly comparison and post the table, CSV and chart
pub async fn execute(ctx: &Context, msg: &Message) -> Result<(), String> {
    tracing::info!("📊 Compare command called by {}", msg.author.id);

    let (client, config) = {
        let data = ctx.data.read().await;
        let client = data
            .get::<crate::PriceClient>()
            .cloned()
            .ok_or("Price client not initialized".to_string())?;
        let config = data
            .get::<crate::AppConfig>()
            .cloned()
            .ok_or("Configuration not initialized".to_string())?;
        (client, config)
    };

    if let Err(e) = msg.channel_id.broadcast_typing(&ctx.http).await {
        tracing::warn!("Failed to broadcast typing: {}", e);
    }

    // Each run writes into its own directory so concurrent runs never share files
    let scratch = std::env::temp_dir().join(format!("coinboard_compare_{}", msg.id));
    tokio::fs::create_dir_all(&scratch)
        .await
        .map_err(|e| format!("Failed to create scratch directory: {}", e))?;

    let options = invocation_options(&config.comparison, &scratch);
    let result = run_and_post(ctx, msg, &client, &options).await;

    if let Err(e) = tokio::fs::remove_dir_all(&scratch).await {
        tracing::warn!("Failed to remove {}: {}", scratch.display(), e);
    }

    result
}

/// Configured options with the artifact files moved into `dir`, keeping their file names
fn invocation_options(base: &ComparisonOptions, dir: &Path) -> ComparisonOptions {
    let in_dir = |path: &Path, fallback: &Path| -> PathBuf {
        dir.join(path.file_name().or_else(|| fallback.file_name()).unwrap_or_default())
    };
    let defaults = ComparisonOptions::default();

    ComparisonOptions {
        csv_path: in_dir(&base.csv_path, &defaults.csv_path),
        chart_path: in_dir(&base.chart_path, &defaults.chart_path),
        missing_bars: base.missing_bars,
    }
}

async fn run_and_post(
    ctx: &Context,
    msg: &Message,
    client: &CoinGeckoClient,
    options: &ComparisonOptions,
) -> Result<(), String> {
    let sink = BufferedSink::new();
    let report = comparison_service::run_weekly_comparison(
        client,
        comparison_assets(),
        options,
        &sink,
    )
    .await
    .map_err(|e| format!("❌ Weekly comparison failed: {}", e))?;

    let csv = CreateAttachment::path(&options.csv_path)
        .await
        .map_err(|e| format!("Failed to attach CSV: {}", e))?;
    let chart = CreateAttachment::path(&options.chart_path)
        .await
        .map_err(|e| format!("Failed to attach chart: {}", e))?;

    let mut embed = CreateEmbed::default()
        .title("📊 Weekly Comparison")
        .description(report_service::render_table(&report).render())
        .image(format!("attachment://{}", chart.filename))
        .footer(CreateEmbedFooter::new(format!(
            "{} of {} coins compared · prices in USD",
            report.complete_rows(),
            report.len()
        )))
        .color(0x00ff00);

    let failed = sink.failed_assets();
    if !failed.is_empty() {
        embed = embed.field("❌ History unavailable", failed.join(", "), false);
    }

    msg.channel_id
        .send_message(ctx, CreateMessage::default().embed(embed).add_files(vec![csv, chart]))
        .await
        .map_err(|e| e.to_string())?;

    Ok(())
}
