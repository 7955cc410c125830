use serenity::model::channel::Message;
use serenity::prelude::Context;

use crate::services::{adherence_service, notify_service};

pub async fn execute(ctx: &Context, msg: &Message, args: &[&str]) -> Result<(), String> {
    let client = crate::services::api_client(ctx).await?;
    let config = crate::services::settings(ctx).await?;
    let sessions = crate::services::sessions(ctx).await?;
    let selection = sessions.lock().await.state(msg.channel_id.get()).selection;

    // Always decide on fresh numbers, not whatever the dashboard last showed
    let report = adherence_service::fetch_adherence(&client, &selection).await?;

    let custom_reason = (!args.is_empty()).then(|| args.join(" "));
    let request = notify_service::build_notify_request(
        &selection,
        &report,
        config.adherence_threshold,
        custom_reason,
    )?;

    let result = notify_service::send_notification(&client, request).await?;
    let embed = notify_service::create_notify_embed(&result);

    msg.channel_id
        .send_message(ctx, serenity::builder::CreateMessage::default().embed(embed))
        .await
        .map_err(|e| e.to_string())?;

    Ok(())
}
