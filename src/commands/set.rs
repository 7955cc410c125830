use serenity::model::channel::Message;
use serenity::prelude::Context;

use crate::models::Metric;
use crate::services::dashboard_service;
use crate::services::session_service::DashboardEvent;
use crate::utils::args::{parse_date, parse_user_id};

const USAGE: &str = "❌ Usage: `$set user <id>`, `$set metric <name>`, `$set start <YYYY-MM-DD>`, `$set end <YYYY-MM-DD>` or `$set range <start> <end>`";

/// Turn `$set` arguments into one dashboard event
pub fn parse_set_args(args: &[&str]) -> Result<DashboardEvent, String> {
    let (field, values) = args.split_first().ok_or(USAGE.to_string())?;

    match (field.to_lowercase().as_str(), values) {
        ("user" | "participant", [id]) => Ok(DashboardEvent::SelectUser(parse_user_id(id)?)),
        ("metric", [name]) => Ok(DashboardEvent::SelectMetric(name.parse::<Metric>()?)),
        ("start", [date]) => Ok(DashboardEvent::SetStart(parse_date(date)?)),
        ("end", [date]) => Ok(DashboardEvent::SetEnd(parse_date(date)?)),
        ("range", [start, end]) => Ok(DashboardEvent::SetRange(parse_date(start)?, parse_date(end)?)),
        _ => Err(USAGE.to_string()),
    }
}

pub async fn execute(ctx: &Context, msg: &Message, args: &[&str]) -> Result<(), String> {
    if args.is_empty() {
        let help_embed = serenity::builder::CreateEmbed::default()
            .title("🎛️ Set Command")
            .description("Change what this channel's dashboard shows. The dashboard reloads after every change.")
            .field("Usage",
                "`$set user <id>`\n\
                 `$set metric <name>`\n\
                 `$set start <YYYY-MM-DD>`\n\
                 `$set end <YYYY-MM-DD>`\n\
                 `$set range <start> <end>`",
                false)
            .field("Examples",
                "`$set user 12`\n\
                 `$set metric spo2`\n\
                 `$set range 2024-01-01 2024-01-14`",
                false)
            .field("Notes",
                "• The end date may not be earlier than the start date\n\
                 • Each channel keeps its own selection\n\
                 • See `$metrics` for metric names",
                false)
            .color(0x00ff00);

        msg.channel_id
            .send_message(ctx, serenity::builder::CreateMessage::default().embed(help_embed))
            .await
            .map_err(|e| e.to_string())?;
        return Ok(());
    }

    let event = parse_set_args(args)?;
    let sessions = crate::services::sessions(ctx).await?;
    let selection = sessions.lock().await.apply(msg.channel_id.get(), event)?;
    tracing::info!("Channel {} selection now {:?}", msg.channel_id, selection);

    dashboard_service::refresh(ctx, msg).await
}
