use serenity::model::channel::Message;
use serenity::prelude::Context;

use crate::services::adherence_service;
use crate::services::session_service::RequestKind;

pub async fn execute(ctx: &Context, msg: &Message) -> Result<(), String> {
    let client = crate::services::api_client(ctx).await?;
    let config = crate::services::settings(ctx).await?;
    let sessions = crate::services::sessions(ctx).await?;
    let channel = msg.channel_id.get();

    let ticket = sessions.lock().await.begin(channel, RequestKind::Adherence);
    let result = adherence_service::fetch_adherence(&client, &ticket.selection).await;

    let report = {
        let mut store = sessions.lock().await;
        match result {
            Ok(report) => {
                if !store.commit_adherence(&ticket, report.clone()) {
                    tracing::debug!("Adherence request #{} superseded", ticket.seq);
                    return Ok(());
                }
                report
            }
            Err(e) if store.is_current(&ticket) => return Err(e),
            Err(_) => return Ok(()),
        }
    };

    let embed = adherence_service::create_adherence_embed(&report, &ticket.selection, config.adherence_threshold);
    msg.channel_id
        .send_message(ctx, serenity::builder::CreateMessage::default().embed(embed))
        .await
        .map_err(|e| e.to_string())?;

    Ok(())
}
