use serenity::async_trait;
use serenity::model::application::Interaction;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, error};
use tracing_subscriber::EnvFilter;

mod api;
mod commands;
mod config;
mod models;
mod services;
mod utils;

use api::coingecko::CoinGeckoClient;
use config::Config;
use services::comparison_service;
use services::progress::ConsoleSink;

struct Handler;

struct PriceClient;

impl TypeMapKey for PriceClient {
    type Value = Arc<CoinGeckoClient>;
}

struct AppConfig;

impl TypeMapKey for AppConfig {
    type Value = Arc<Config>;
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        commands::handle_message(&ctx, &msg).await;
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        commands::handle_interaction(&ctx, &interaction).await;
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);
    }
}

/// `coinboard compare`: one weekly comparison run, progress on stdout
async fn run_compare(config: &Config) -> ExitCode {
    let client = config.price_client();

    match comparison_service::run_weekly_comparison(
        &client,
        models::asset::comparison_assets(),
        &config.comparison,
        &ConsoleSink,
    )
    .await
    {
        Ok(report) => {
            info!("Comparison finished: {} rows", report.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Comparison aborted: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// `coinboard [bot]`: the interactive dashboard bot
async fn run_bot(config: Config) -> ExitCode {
    let token = match config.require_discord_token() {
        Ok(token) => token.to_string(),
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let intents = GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MESSAGES;

    let mut client = match Client::builder(&token, intents).event_handler(Handler).await {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // One price client for the whole process
    {
        let mut data = client.data.write().await;
        data.insert::<PriceClient>(Arc::new(config.price_client()));
        data.insert::<AppConfig>(Arc::new(config));
    }

    if let Err(e) = client.start().await {
        error!("Client error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("coinboard=debug,serenity=warn")
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mode = std::env::args().nth(1).unwrap_or_else(|| "bot".to_string());
    match mode.as_str() {
        "compare" => run_compare(&config).await,
        "bot" => {
            info!("🤖 Starting coinboard dashboard bot...");
            run_bot(config).await
        }
        other => {
            eprintln!("Unknown mode '{}'. Usage: coinboard [bot|compare]", other);
            ExitCode::from(2)
        }
    }
}
