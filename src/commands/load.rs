use serenity::model::channel::Message;
use serenity::prelude::Context;

use crate::models::Metric;
use crate::services::dashboard_service;
use crate::services::session_service::DashboardEvent;
use crate::utils::args::{parse_date, parse_user_id};

/// Read optional overrides for `$load`.
///
/// Each argument is recognised by its shape: a number (or `#n`) is the
/// participant, a metric name is the metric, the first date is the start
/// and the second the end. Both dates together become a single range change
/// so an inverted intermediate state is never validated.
pub fn parse_load_args(args: &[&str]) -> Result<Vec<DashboardEvent>, String> {
    let mut events = Vec::new();
    let mut dates = Vec::new();
    let mut seen_user = false;
    let mut seen_metric = false;

    for arg in args {
        if arg.contains('-') && arg.len() == 10 {
            dates.push(parse_date(arg)?);
        } else if let Ok(metric) = arg.parse::<Metric>() {
            if seen_metric {
                return Err("❌ Only one metric may be given".to_string());
            }
            seen_metric = true;
            events.push(DashboardEvent::SelectMetric(metric));
        } else if let Ok(user_id) = parse_user_id(arg) {
            if seen_user {
                return Err("❌ Only one participant id may be given".to_string());
            }
            seen_user = true;
            events.push(DashboardEvent::SelectUser(user_id));
        } else {
            return Err(format!(
                "❌ Could not understand '{}'. Usage: `$load [user] [metric] [start] [end]`",
                arg
            ));
        }
    }

    match dates.as_slice() {
        [] => {}
        [start] => events.push(DashboardEvent::SetStart(*start)),
        [start, end] => events.push(DashboardEvent::SetRange(*start, *end)),
        _ => return Err("❌ At most two dates (start and end) may be given".to_string()),
    }

    Ok(events)
}

pub async fn execute(ctx: &Context, msg: &Message, args: &[&str]) -> Result<(), String> {
    if args.first().is_some_and(|a| a.eq_ignore_ascii_case("help")) {
        let help_embed = serenity::builder::CreateEmbed::default()
            .title("📈 Load Command")
            .description("Fetch the selected series and adherence, then draw the dashboard")
            .field("Usage", "`$load [user] [metric] [start] [end]`", false)
            .field("Examples",
                "`$load` (reload the current selection)\n\
                 `$load 3 hrv` (participant 3, heart rate variability)\n\
                 `$load 2024-02-01 2024-02-07` (new date range)",
                false)
            .field("Notes",
                "• Overrides are kept as the channel's new selection\n\
                 • Red circles mark the trailing imputed readings",
                false)
            .color(0x00ff00);

        msg.channel_id
            .send_message(ctx, serenity::builder::CreateMessage::default().embed(help_embed))
            .await
            .map_err(|e| e.to_string())?;
        return Ok(());
    }

    let events = parse_load_args(args)?;
    if !events.is_empty() {
        let sessions = crate::services::sessions(ctx).await?;
        sessions.lock().await.apply_all(msg.channel_id.get(), events)?;
    }

    dashboard_service::refresh(ctx, msg).await
}
