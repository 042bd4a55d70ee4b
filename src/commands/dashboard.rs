use std::sync::Arc;
use serenity::all::{
    ButtonStyle, ComponentInteraction, ComponentInteractionDataKind, CreateActionRow,
    CreateAttachment, CreateButton, CreateEmbed, CreateInteractionResponse, CreateMessage,
    CreateSelectMenu, CreateSelectMenuKind, CreateSelectMenuOption, EditInteractionResponse,
};
use serenity::model::channel::Message;
use serenity::prelude::Context;

use crate::api::coingecko::CoinGeckoClient;
use crate::models::asset::DASHBOARD_ASSETS;
use crate::models::{Asset, Timeframe};
use crate::services::{chart_service, dashboard_service};

const CHART_FILE: &str = "price_chart.png";
const CHART_SIZE: (u32, u32) = (1024, 768);

/// Select menu id: `dash:asset:<days>` (the chosen asset arrives as the menu value)
const ASSET_MENU_PREFIX: &str = "dash:asset:";
/// Button id: `dash:tf:<asset_id>:<days>`
const TIMEFRAME_BUTTON_PREFIX: &str = "dash:tf:";

/// Dashboard selection; carried in component ids so no state is kept between clicks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub asset: Asset,
    pub timeframe: Timeframe,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            asset: DASHBOARD_ASSETS[0],
            timeframe: Timeframe::Week,
        }
    }
}

/// `$dashboard [coin] [timeframe]`
pub fn parse_args(args: &[&str]) -> Result<Selection, String> {
    let mut selection = Selection::default();

    if let Some(coin) = args.first() {
        selection.asset = *Asset::by_name(coin).ok_or_else(|| {
            format!(
                "❌ Unknown coin '{}'. Choose one of: {}",
                coin,
                DASHBOARD_ASSETS.iter().map(|a| a.name).collect::<Vec<_>>().join(", ")
            )
        })?;
    }

    if args.len() > 1 {
        let raw = args[1..].join(" ");
        selection.timeframe = Timeframe::parse(&raw)
            .ok_or_else(|| format!("❌ Unknown timeframe '{}'. Use: 7, 30 or 365 days", raw))?;
    }

    Ok(selection)
}

/// Decode a component click back into a selection
pub fn parse_component(custom_id: &str, values: &[String]) -> Option<Selection> {
    if let Some(days) = custom_id.strip_prefix(ASSET_MENU_PREFIX) {
        let timeframe = Timeframe::from_days(days.parse().ok()?)?;
        let asset = *Asset::by_id(values.first()?)?;
        return Some(Selection { asset, timeframe });
    }

    if let Some(rest) = custom_id.strip_prefix(TIMEFRAME_BUTTON_PREFIX) {
        let (asset_id, days) = rest.split_once(':')?;
        let asset = *Asset::by_id(asset_id)?;
        let timeframe = Timeframe::from_days(days.parse().ok()?)?;
        return Some(Selection { asset, timeframe });
    }

    None
}

/// Whether a component id belongs to the dashboard
pub fn owns_component(custom_id: &str) -> bool {
    custom_id.starts_with(ASSET_MENU_PREFIX) || custom_id.starts_with(TIMEFRAME_BUTTON_PREFIX)
}

fn components(selection: Selection) -> Vec<CreateActionRow> {
    let options = DASHBOARD_ASSETS
        .iter()
        .map(|a| CreateSelectMenuOption::new(a.name, a.id).default_selection(*a == selection.asset))
        .collect();

    let menu = CreateSelectMenu::new(
        format!("{}{}", ASSET_MENU_PREFIX, selection.timeframe.days()),
        CreateSelectMenuKind::String { options },
    )
    .placeholder("Choose a cryptocurrency:");

    let buttons = Timeframe::ALL
        .iter()
        .map(|tf| {
            let style = if *tf == selection.timeframe {
                ButtonStyle::Primary
            } else {
                ButtonStyle::Secondary
            };
            CreateButton::new(format!(
                "{}{}:{}",
                TIMEFRAME_BUTTON_PREFIX,
                selection.asset.id,
                tf.days()
            ))
            .label(tf.label())
            .style(style)
        })
        .collect();

    vec![CreateActionRow::SelectMenu(menu), CreateActionRow::Buttons(buttons)]
}

async fn price_client(ctx: &Context) -> Result<Arc<CoinGeckoClient>, String> {
    let data = ctx.data.read().await;
    data.get::<crate::PriceClient>()
        .cloned()
        .ok_or_else(|| "Price client not initialized".to_string())
}

/// Fetch and draw the selection: embed with the latest-price metric plus the chart file
async fn render(ctx: &Context, selection: Selection) -> Result<(CreateEmbed, CreateAttachment), String> {
    let client = price_client(ctx).await?;

    let view = dashboard_service::load_dashboard(&*client, selection.asset, selection.timeframe)
        .await
        .map_err(|e| format!("❌ Failed to fetch {} prices: {}", selection.asset.name, e))?;

    let image = chart_service::generate_price_chart(&view, CHART_SIZE.0, CHART_SIZE.1)
        .map_err(|e| format!("❌ {}", e))?;
    tracing::debug!("Chart generated: {} bytes", image.len());

    let embed = CreateEmbed::default()
        .title(format!("📊 {}", view.title()))
        .description("Track prices and view historical trends using data from CoinGecko.")
        .field(view.metric_label(), dashboard_service::latest_price_display(&view), false)
        .image(format!("attachment://{}", CHART_FILE))
        .color(0x00b0f4);

    Ok((embed, CreateAttachment::bytes(image, CHART_FILE)))
}

fn error_embed(message: &str) -> CreateEmbed {
    CreateEmbed::default()
        .title("Dashboard Error")
        .description(message)
        .color(0xff0000)
}

pub async fn execute(ctx: &Context, msg: &Message, args: &[&str]) -> Result<(), String> {
    tracing::info!("📊 Dashboard command called with args: {:?}", args);

    let selection = parse_args(args)?;

    if let Err(e) = msg.channel_id.broadcast_typing(&ctx.http).await {
        tracing::warn!("Failed to broadcast typing: {}", e);
    }

    let (embed, attachment) = render(ctx, selection).await?;

    msg.channel_id
        .send_message(
            ctx,
            CreateMessage::default()
                .embed(embed)
                .add_file(attachment)
                .components(components(selection)),
        )
        .await
        .map_err(|e| e.to_string())?;

    Ok(())
}

/// Re-render the dashboard message in place after a menu or button click
pub async fn handle_component(ctx: &Context, component: &ComponentInteraction) -> Result<(), String> {
    let values = match &component.data.kind {
        ComponentInteractionDataKind::StringSelect { values } => values.clone(),
        _ => Vec::new(),
    };

    let selection = parse_component(&component.data.custom_id, &values)
        .ok_or_else(|| format!("Unrecognised dashboard component '{}'", component.data.custom_id))?;
    tracing::info!(
        "📊 Dashboard selection from {}: {} / {}",
        component.user.id,
        selection.asset.id,
        selection.timeframe.label()
    );

    component
        .create_response(ctx, CreateInteractionResponse::Acknowledge)
        .await
        .map_err(|e| e.to_string())?;

    let edit = match render(ctx, selection).await {
        Ok((embed, attachment)) => EditInteractionResponse::new()
            .embed(embed)
            .components(components(selection))
            .new_attachment(attachment),
        Err(message) => {
            tracing::warn!("Dashboard render failed: {}", message);
            EditInteractionResponse::new()
                .embed(error_embed(&message))
                .components(components(selection))
        }
    };

    component
        .edit_response(ctx, edit)
        .await
        .map_err(|e| e.to_string())?;

    Ok(())
}
