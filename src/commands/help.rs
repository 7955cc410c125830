use serenity::builder::CreateEmbed;
use serenity::model::channel::Message;
use serenity::prelude::Context;

use crate::utils::get_cooldown_seconds;

pub async fn execute(ctx: &Context, msg: &Message) -> Result<(), String> {
    let embed = CreateEmbed::default()
        .title("📖 fitdash Commands Help")
        .description("**fitdash** - wearables research dashboard\nBrowse participants, chart their physiological series and follow up on low adherence.")
        .color(0x00b0f4)
        .field(
            "🎯 General",
            "`$ping` - Check bot and dashboard API latency\n`$help` - Show this help message",
            false,
        )
        .field(
            "👥 Selection",
            "`$participants [page]` - List participants (alias `$users`)\n`$metrics` - List metrics\n`$set <user|metric|start|end|range> <value>` - Change the selection",
            false,
        )
        .field(
            "📈 Dashboard",
            "`$load [user] [metric] [start] [end]` - Fetch and draw the dashboard\n`$dash` - Show the last loaded dashboard (alias `$state`)",
            false,
        )
        .field(
            "📋 Adherence",
            "`$adherence` - Show adherence cards (alias `$adh`)\n`$notify [reason...]` - Email a participant whose adherence is low",
            false,
        )
        .field(
            "⚡ Rate Limiting",
            format!("{}-second cooldown per command per user\nGlobal 50 requests/second limit", get_cooldown_seconds()),
            false,
        );

    msg.channel_id
        .send_message(ctx, serenity::builder::CreateMessage::default().embed(embed))
        .await
        .map_err(|e| format!("Failed to send help message: {}", e))?;

    Ok(())
}
