use serenity::model::channel::Message;
use serenity::prelude::Context;

use crate::services::participant_service;
use crate::utils::args::parse_page;

pub async fn execute(ctx: &Context, msg: &Message, args: &[&str]) -> Result<(), String> {
    let page_num = parse_page(args.first().copied())?;
    participant_service::list_participants(ctx, msg, page_num).await
}
