pub mod compare;
pub mod dashboard;
pub mod help;

use serenity::builder::{CreateEmbed, CreateMessage};
use serenity::model::application::Interaction;
use serenity::model::channel::Message;
use serenity::prelude::Context;

use crate::utils::check_cooldown;

pub async fn handle_message(ctx: &Context, msg: &Message) {
    if msg.author.bot {
        return;
    }

    // Parse command and arguments
    let parts: Vec<&str> = msg.content.split_whitespace().collect();
    let Some((&command, args)) = parts.split_first() else {
        return;
    };

    if !matches!(command, "$dashboard" | "$dash" | "$compare" | "$help") {
        return;
    }

    if let Err(remaining) = check_cooldown(msg.author.id, command).await {
        let _ = msg.channel_id.send_message(
            ctx,
            CreateMessage::default().embed(
                CreateEmbed::default()
                    .title("Command Cooldown")
                    .description(format!("⏳ Please wait {} seconds before using this command again.", remaining))
                    .color(0xffa500)
            )
        ).await;
        return;
    }

    let result = match command {
        "$dashboard" | "$dash" => dashboard::execute(ctx, msg, args).await,
        "$compare" => compare::execute(ctx, msg).await,
        "$help" => help::execute(ctx, msg).await,
        _ => return,
    };

    if let Err(e) = result {
        tracing::error!("❌ Error executing command {}: {}", command, e);

        let user_message = if e.contains("Rate Limited") || e.contains("429") {
            "⚠️ **Rate Limited**: The price API is rate limiting us. Please try again in a moment.".to_string()
        } else if e.contains("Request Error") || e.contains("HTTP request") {
            "⚠️ **Network Error**: Having trouble reaching the price API. Please try again.".to_string()
        } else if e.starts_with('❌') {
            e
        } else {
            format!("❌ {}", e)
        };

        let embed = CreateEmbed::default()
            .title("Command Error")
            .description(user_message)
            .color(0xff0000);

        let _ = msg.channel_id
            .send_message(ctx, CreateMessage::default().embed(embed))
            .await;
    }
}

pub async fn handle_interaction(ctx: &Context, interaction: &Interaction) {
    let Interaction::Component(component) = interaction else {
        return;
    };

    if !dashboard::owns_component(&component.data.custom_id) {
        return;
    }

    if let Err(e) = dashboard::handle_component(ctx, component).await {
        tracing::error!("❌ Error handling component {}: {}", component.data.custom_id, e);
    }
}
