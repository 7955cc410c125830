use serenity::builder::{CreateEmbed, CreateEmbedFooter};
use serenity::model::channel::Message;
use serenity::prelude::Context;

use crate::models::Metric;

fn metric_lines(selected: Metric) -> String {
    Metric::ALL
        .iter()
        .map(|metric| {
            let unit = if metric.unit().is_empty() {
                String::new()
            } else {
                format!(" ({})", metric.unit())
            };
            let marker = if *metric == selected { " ◀ selected" } else { "" };
            format!("`{}` {}{}{}", metric.as_str(), metric.description(), unit, marker)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn execute(ctx: &Context, msg: &Message) -> Result<(), String> {
    let sessions = crate::services::sessions(ctx).await?;
    let selected = sessions.lock().await.state(msg.channel_id.get()).selection.metric;

    let embed = CreateEmbed::default()
        .title("📏 Metrics")
        .description(metric_lines(selected))
        .footer(CreateEmbedFooter::new("Select with $set metric <name>"))
        .color(0x00b0f4);

    msg.channel_id
        .send_message(ctx, serenity::builder::CreateMessage::default().embed(embed))
        .await
        .map_err(|e| e.to_string())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_lines_mark_selection() {
        let lines = metric_lines(Metric::Spo2);
        assert_eq!(lines.lines().count(), Metric::ALL.len());
        assert!(lines.contains("`hr` Heart rate (bpm)\n"));
        assert!(lines.contains("`spo2` Blood oxygen saturation (%) ◀ selected"));
        assert!(lines.ends_with("`activity` Activity"));
    }
}
