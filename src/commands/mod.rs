pub mod help;
pub mod ping;
pub mod participants;
pub mod metrics;
pub mod set;
pub mod load;
pub mod dash;
pub mod adherence;
pub mod notify;

use serenity::builder::{CreateEmbed, CreateMessage};
use serenity::model::channel::Message;
use serenity::prelude::Context;
use tracing::{debug, error, info, warn};

use crate::utils::{check_cooldown, check_global_rate_limit, user_message};

const PREFIX: char = '$';

/// Map an incoming word to its canonical command name, resolving aliases
fn canonical(command: &str) -> Option<&'static str> {
    let name = match command.to_lowercase().as_str() {
        "$help" => "help",
        "$ping" => "ping",
        "$participants" | "$users" => "participants",
        "$metrics" => "metrics",
        "$set" => "set",
        "$load" => "load",
        "$dash" | "$state" => "dash",
        "$adherence" | "$adh" => "adherence",
        "$notify" => "notify",
        _ => return None,
    };
    Some(name)
}

pub async fn handle_message(ctx: &Context, msg: &Message) {
    if msg.author.bot || !msg.content.starts_with(PREFIX) {
        return;
    }

    // Parse command and arguments
    let parts: Vec<&str> = msg.content.split_whitespace().collect();
    let Some((&command_word, args)) = parts.split_first() else {
        return;
    };
    let Some(command) = canonical(command_word) else {
        return;
    };

    if let Err(remaining_ms) = check_global_rate_limit().await {
        debug!("Global rate limit hit, dropping {} ({}ms until free)", command, remaining_ms);
        return;
    }

    if let Err((remaining, should_warn)) = check_cooldown(msg.author.id.get(), command).await {
        if should_warn {
            let _ = msg.channel_id.send_message(
                ctx,
                CreateMessage::default().embed(
                    CreateEmbed::default()
                        .title("Command Cooldown")
                        .description(format!("⏳ Please wait {} seconds before using this command again.", remaining))
                        .color(0xffa500)
                )
            ).await;
        }
        return;
    }

    info!("{} called by {} in channel {} with args: {:?}", command, msg.author.id, msg.channel_id, args);

    let result = match command {
        "help" => help::execute(ctx, msg).await,
        "ping" => ping::execute(ctx, msg).await,
        "participants" => participants::execute(ctx, msg, args).await,
        "metrics" => metrics::execute(ctx, msg).await,
        "set" => set::execute(ctx, msg, args).await,
        "load" => load::execute(ctx, msg, args).await,
        "dash" => dash::execute(ctx, msg).await,
        "adherence" => adherence::execute(ctx, msg).await,
        "notify" => notify::execute(ctx, msg, args).await,
        _ => return,
    };

    // Every failure is shown in the channel, whichever command produced it
    if let Err(e) = result {
        error!("❌ Error executing command {}: {}", command, e);

        let embed = CreateEmbed::default()
            .title("Command Error")
            .description(user_message(&e))
            .color(0xff0000);

        if let Err(send_err) = msg.channel_id
            .send_message(ctx, CreateMessage::default().embed(embed))
            .await
        {
            warn!("Failed to report error to channel {}: {}", msg.channel_id, send_err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        assert_eq!(canonical("$users"), Some("participants"));
        assert_eq!(canonical("$ADH"), Some("adherence"));
        assert_eq!(canonical("$state"), Some("dash"));
        assert_eq!(canonical("$balance"), None);
        assert_eq!(canonical("load"), None);
    }
}
