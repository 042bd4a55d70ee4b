use serenity::builder::CreateEmbed;
use serenity::model::channel::Message;
use serenity::prelude::Context;

use crate::models::asset::DASHBOARD_ASSETS;
use crate::utils::get_cooldown_seconds;

pub async fn execute(ctx: &Context, msg: &Message) -> Result<(), String> {
    let coins = DASHBOARD_ASSETS
        .iter()
        .map(|a| a.name)
        .collect::<Vec<_>>()
        .join(", ");

    let embed = CreateEmbed::default()
        .title("📖 Coinboard Commands Help")
        .description("Cryptocurrency prices and weekly comparisons using data from CoinGecko.")
        .color(0x00b0f4)
        .field(
            "📊 Dashboard",
            "`$dashboard [coin] [timeframe]` - Price chart and latest price\nUse the menu and buttons under the chart to switch coin or timeframe",
            false,
        )
        .field(
            "📈 Weekly Comparison",
            "`$compare` - Current vs. one week ago for every tracked coin, with CSV and chart",
            false,
        )
        .field("🪙 Coins", coins, false)
        .field("🕒 Timeframes", "7 Days, 30 Days, 365 Days", false)
        .field(
            "⚡ Rate Limiting",
            format!("{}-second cooldown per command per user", get_cooldown_seconds()),
            false,
        );

    msg.channel_id
        .send_message(ctx, serenity::builder::CreateMessage::default().embed(embed))
        .await
        .map_err(|e| format!("Failed to send help message: {}", e))?;

    Ok(())
}
