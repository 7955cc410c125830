use serenity::model::channel::Message;
use serenity::prelude::Context;

use crate::services::dashboard_service;

/// Re-render the channel's dashboard from its cached state, without fetching
pub async fn execute(ctx: &Context, msg: &Message) -> Result<(), String> {
    let config = crate::services::settings(ctx).await?;
    let sessions = crate::services::sessions(ctx).await?;
    let state = sessions.lock().await.state(msg.channel_id.get());

    if state.points.is_none() && state.adherence.is_none() {
        let embed = serenity::builder::CreateEmbed::default()
            .title("📈 Wearables Dashboard")
            .description(format!(
                "{}\n\nNothing loaded yet. Use `$load` to fetch data.",
                dashboard_service::selection_text(&state.selection)
            ))
            .color(0xffa500);

        msg.channel_id
            .send_message(ctx, serenity::builder::CreateMessage::default().embed(embed))
            .await
            .map_err(|e| e.to_string())?;
        return Ok(());
    }

    dashboard_service::render(ctx, msg.channel_id, &state, &config).await
}
