use serenity::builder::{CreateEmbed, CreateEmbedFooter};
use serenity::model::channel::Message;
use serenity::prelude::Context;
use tracing::{error, info};

use crate::api::dashboard::DashboardClient;
use crate::models::Participant;
use crate::utils::{describe_api_error, Page};

const ITEMS_PER_PAGE: usize = 10;

/// Fetch the participant list, sorted by id
pub async fn fetch_participants(client: &DashboardClient) -> Result<Vec<Participant>, String> {
    let mut participants = client.get_participants().await.map_err(|e| {
        error!("Participant list fetch failed: {}", e);
        describe_api_error(&e)
    })?;
    participants.sort_by_key(|p| p.id);
    Ok(participants)
}

fn participant_lines(page: &Page<'_, Participant>, selected_user: i64) -> String {
    let mut description = String::new();
    for (idx, participant) in page.current_items().iter().enumerate() {
        let item_num = page.first_item_number() + idx;
        let marker = if participant.id == selected_user { " ◀ selected" } else { "" };
        description.push_str(&format!(
            "{}. **{}** (`#{}`){}\n",
            item_num, participant.name, participant.id, marker
        ));
    }
    description
}

/// Build the embed for one page of participants, marking the selected one
pub fn create_participant_page(page: &Page<'_, Participant>, selected_user: i64) -> CreateEmbed {
    CreateEmbed::default()
        .title("👥 Participants")
        .description(participant_lines(page, selected_user))
        .footer(CreateEmbedFooter::new(format!(
            "{} • Select with $set user <id>",
            page.footer()
        )))
        .color(0x00b0f4)
}

pub async fn list_participants(ctx: &Context, msg: &Message, page_num: usize) -> Result<(), String> {
    let client = super::api_client(ctx).await?;
    let sessions = super::sessions(ctx).await?;

    let participants = fetch_participants(&client).await?;
    info!("Fetched {} participants", participants.len());

    if participants.is_empty() {
        return Err("❌ The dashboard API returned no participants.".to_string());
    }

    let selected_user = sessions.lock().await.state(msg.channel_id.get()).selection.user_id;
    let page = Page::new(&participants, ITEMS_PER_PAGE).go_to(page_num)?;

    msg.channel_id
        .send_message(
            ctx,
            serenity::builder::CreateMessage::default().embed(create_participant_page(&page, selected_user)),
        )
        .await
        .map_err(|e| format!("Failed to send message: {}", e))?;

    Ok(())
}
