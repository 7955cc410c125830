use serenity::async_trait;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn, error, debug};
use tracing_subscriber::EnvFilter;

mod api;
mod commands;
mod config;
mod models;
mod services;
mod utils;

use api::dashboard::DashboardClient;
use config::Config;
use services::session_service::SessionStore;

struct Handler;

struct BotData;

impl TypeMapKey for BotData {
    type Value = Instant;
}

struct DashboardApi;

impl TypeMapKey for DashboardApi {
    type Value = Arc<DashboardClient>;
}

struct Settings;

impl TypeMapKey for Settings {
    type Value = Arc<Config>;
}

struct DashboardSessions;

impl TypeMapKey for DashboardSessions {
    type Value = Arc<tokio::sync::Mutex<SessionStore>>;
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, ctx: Context, msg: Message) {
        commands::handle_message(&ctx, &msg).await;
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);

        debug!("Checking dashboard API reachability...");
        match services::api_client(&ctx).await {
            Ok(client) => match client.health().await {
                Ok(health) => info!("Dashboard API at {} reports '{}'", client.base_url(), health.status),
                Err(e) => warn!("Dashboard API at {} is not healthy yet: {}", client.base_url(), e),
            },
            Err(e) => warn!("{}", e),
        }
    }
}

fn env_filter() -> EnvFilter {
    let mut filter = EnvFilter::from_default_env();
    for directive in ["fitdash=debug", "serenity=warn"] {
        match directive.parse() {
            Ok(d) => filter = filter.add_directive(d),
            Err(e) => eprintln!("Ignoring log directive {}: {}", directive, e),
        }
    }
    filter
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("📈 Starting fitdash v{}...", env!("CARGO_PKG_VERSION"));

    let config = match Config::from_env() {
        Ok(c) => Arc::new(c),
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };
    info!(
        "Dashboard API: {} (timeout {:?}, adherence threshold {:.0}%)",
        config.api_url, config.api_timeout, config.adherence_threshold
    );

    let api = match DashboardClient::new(&config.api_url, config.api_timeout) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            error!("Failed to build dashboard API client: {}", e);
            return;
        }
    };

    let intents = GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT
        | GatewayIntents::GUILD_MESSAGES;

    let mut client = match Client::builder(&config.discord_token, intents)
        .event_handler(Handler)
        .await
    {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create client: {}", e);
            return;
        }
    };

    {
        let mut data = client.data.write().await;
        data.insert::<BotData>(Instant::now());
        data.insert::<DashboardApi>(api);
        data.insert::<Settings>(config);
        data.insert::<DashboardSessions>(Arc::new(tokio::sync::Mutex::new(SessionStore::new())));
    }

    if let Err(e) = client.start().await {
        error!("Client error: {}", e);
    }
}
