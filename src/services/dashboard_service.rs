//! Refresh and render cycle of a channel's dashboard.
//!
//! A refresh issues one series ticket and one adherence ticket, runs both
//! requests concurrently, commits whatever is still current and renders the
//! committed state. Results for superseded tickets are dropped silently,
//! errors included.

use serenity::all::{ChannelId, CreateAttachment};
use serenity::builder::{CreateEmbed, CreateEmbedFooter, CreateMessage};
use serenity::model::channel::Message;
use serenity::prelude::Context;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::{AdherenceReport, DisplayPoint, SeriesSummary};
use crate::services::session_service::{DashboardState, RequestKind, RequestTicket, Selection, SessionStore};
use crate::services::{adherence_service, chart_service, series_service};
use crate::utils::{describe_api_error, Align, Table};

const RECENT_ROWS: usize = 8;
const CHART_FILENAME: &str = "series.png";

fn format_value(value: Option<f64>) -> String {
    value.map(|v| format!("{:.1}", v)).unwrap_or_else(|| "—".to_string())
}

/// The most recent readings as a table, newest last
pub fn recent_readings_table(points: &[DisplayPoint], rows: usize) -> Table {
    let mut table = Table::new(vec!["Time", "Value", "Flag"]).align(1, Align::Right);
    let start = points.len().saturating_sub(rows);
    for point in &points[start..] {
        let flag = if point.show_imputed_marker {
            "imputed ●"
        } else if point.is_imputed {
            "imputed"
        } else {
            ""
        };
        let value = format_value(point.value);
        table.add_row(&[point.label.as_str(), value.as_str(), flag]);
    }
    table
}

pub fn summary_text(summary: &SeriesSummary, unit: &str) -> String {
    let unit = if unit.is_empty() { String::new() } else { format!(" {}", unit) };
    let mut text = format!(
        "**{}** readings ({} with values, {} imputed)",
        summary.total, summary.plottable, summary.imputed
    );
    if let (Some(min), Some(max), Some(mean)) = (summary.min, summary.max, summary.mean) {
        text.push_str(&format!(
            "\nmin **{:.1}**{unit} • mean **{:.1}**{unit} • max **{:.1}**{unit}",
            min, mean, max, unit = unit
        ));
    }
    if summary.trailing_imputed > 0 {
        text.push_str(&format!(
            "\n● last {} reading(s) are imputed and still awaiting real data",
            summary.trailing_imputed
        ));
    }
    text
}

fn chart_caption(selection: &Selection) -> String {
    format!(
        "Participant #{} • {} • {} → {}",
        selection.user_id,
        selection.metric.description(),
        selection.start_date,
        selection.end_date
    )
}

fn y_axis_label(selection: &Selection) -> String {
    let unit = selection.metric.unit();
    if unit.is_empty() {
        selection.metric.as_str().to_string()
    } else {
        format!("{} ({})", selection.metric.as_str(), unit)
    }
}

pub fn selection_text(selection: &Selection) -> String {
    format!(
        "Participant **#{}** • Metric **{}** ({}) • {} → {}",
        selection.user_id,
        selection.metric.as_str(),
        selection.metric.description(),
        selection.start_date,
        selection.end_date
    )
}

/// Render a dashboard snapshot into one message: embed with summary, recent
/// readings and adherence cards, plus the chart as an attachment.
pub async fn render(
    ctx: &Context,
    channel_id: ChannelId,
    state: &DashboardState,
    config: &Config,
) -> Result<(), String> {
    let selection = &state.selection;
    let mut embed = CreateEmbed::default()
        .title("📈 Wearables Dashboard")
        .color(0x00b0f4);
    let mut message = CreateMessage::default();
    let mut description = selection_text(selection);

    match &state.points {
        Some(points) if !points.is_empty() => {
            let summary = series_service::summarize(points);
            description.push_str("\n\n");
            description.push_str(&summary_text(&summary, selection.metric.unit()));
            description.push('\n');
            description.push_str(&recent_readings_table(points, RECENT_ROWS).render());

            if summary.plottable > 0 {
                let points = points.clone();
                let caption = chart_caption(selection);
                let y_desc = y_axis_label(selection);
                let (width, height) = (config.chart_width, config.chart_height);

                let chart = tokio::task::spawn_blocking(move || {
                    chart_service::generate_series_chart(&points, &caption, &y_desc, width, height)
                })
                .await
                .map_err(|e| format!("Chart task failed: {}", e))??;

                debug!("✓ Chart generated: {} bytes", chart.len());
                message = message.add_file(CreateAttachment::bytes(chart, CHART_FILENAME));
                embed = embed.attachment(CHART_FILENAME);
            }
        }
        Some(_) => description.push_str("\n\nNo readings in this range."),
        None => description.push_str("\n\nNo series loaded. Use `$load` to fetch it."),
    }

    if let Some(report) = &state.adherence {
        embed = adherence_service::add_adherence_fields(embed, report, config.adherence_threshold);
        if !report.low_metrics(config.adherence_threshold).is_empty() {
            embed = embed.footer(CreateEmbedFooter::new(format!(
                "Adherence below {:.0}% • Use $notify to queue a reminder email",
                config.adherence_threshold
            )));
        }
    }

    embed = embed.description(description);
    channel_id
        .send_message(ctx, message.embed(embed))
        .await
        .map_err(|e| format!("Failed to send dashboard: {}", e))?;

    Ok(())
}

/// Commit both halves of a refresh. Returns whether anything was stored and
/// the errors that still belong to current tickets; errors of superseded
/// tickets are dropped.
pub fn settle(
    store: &mut SessionStore,
    series_ticket: &RequestTicket,
    series_result: Result<Vec<DisplayPoint>, String>,
    adherence_ticket: &RequestTicket,
    adherence_result: Result<AdherenceReport, String>,
) -> (bool, Vec<String>) {
    let mut committed = false;
    let mut errors = Vec::new();

    match series_result {
        Ok(points) => committed |= store.commit_series(series_ticket, points),
        Err(e) if store.is_current(series_ticket) => errors.push(e),
        Err(e) => debug!("Dropping error for superseded series request: {}", e),
    }
    match adherence_result {
        Ok(report) => committed |= store.commit_adherence(adherence_ticket, report),
        Err(e) if store.is_current(adherence_ticket) => errors.push(e),
        Err(e) => debug!("Dropping error for superseded adherence request: {}", e),
    }

    (committed, errors)
}

/// Fetch series and adherence for the channel's current selection and
/// render what is still current when the responses arrive.
pub async fn refresh(ctx: &Context, msg: &Message) -> Result<(), String> {
    let client = super::api_client(ctx).await?;
    let config = super::settings(ctx).await?;
    let sessions = super::sessions(ctx).await?;
    let channel = msg.channel_id.get();

    let (series_ticket, adherence_ticket) = {
        let mut store = sessions.lock().await;
        (
            store.begin(channel, RequestKind::Series),
            store.begin(channel, RequestKind::Adherence),
        )
    };
    let selection = series_ticket.selection.clone();
    info!(
        "🔄 Refresh #{} for channel {}: user {} metric {} {}..{}",
        series_ticket.seq,
        channel,
        selection.user_id,
        selection.metric,
        selection.start_date,
        selection.end_date
    );

    if let Err(e) = msg.channel_id.broadcast_typing(ctx.http.as_ref()).await {
        warn!("Failed to broadcast typing: {}", e);
    }

    let (series_result, adherence_result) = tokio::join!(
        client.get_series(selection.user_id, selection.metric, selection.start_date, selection.end_date),
        adherence_service::fetch_adherence(&client, &selection),
    );

    let series_result = series_result
        .map_err(|e| describe_api_error(&e))
        .and_then(|response| series_service::process_response(&response).map_err(|e| format!("❌ {}", e)));

    let (state, errors) = {
        let mut store = sessions.lock().await;
        let (committed, errors) = settle(
            &mut store,
            &series_ticket,
            series_result,
            &adherence_ticket,
            adherence_result,
        );

        if !committed && errors.is_empty() {
            debug!("Refresh #{} for channel {} superseded, nothing to render", series_ticket.seq, channel);
            return Ok(());
        }
        (store.state(channel), errors)
    };

    if state.points.is_some() || state.adherence.is_some() {
        render(ctx, msg.channel_id, &state, &config).await?;
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawSample;

    fn points(flags: &[bool]) -> Vec<DisplayPoint> {
        let samples: Vec<RawSample> = flags
            .iter()
            .enumerate()
            .map(|(i, &is_imputed)| RawSample {
                timestamp: format!("2024-01-02T10:{:02}:00", i),
                value: if i == 1 { None } else { Some(70.0 + i as f64) },
                is_imputed,
            })
            .collect();
        series_service::process(&samples)
    }

    #[test]
    fn test_recent_table_flags() {
        let rendered = recent_readings_table(&points(&[true, false, false, true, true]), 8).render();
        let lines: Vec<&str> = rendered.lines().collect();
        // header, separator, five rows, fences
        assert_eq!(lines.len(), 9);
        assert!(lines[3].ends_with("imputed"));
        assert!(lines[4].contains("—"));
        assert!(lines[6].ends_with("imputed ●"));
        assert!(lines[7].ends_with("imputed ●"));
    }

    #[test]
    fn test_recent_table_keeps_newest() {
        let rendered = recent_readings_table(&points(&[false; 12]), 3).render();
        assert!(rendered.contains("01-02 10:11"));
        assert!(rendered.contains("01-02 10:09"));
        assert!(!rendered.contains("01-02 10:08"));
    }

    #[test]
    fn test_summary_text() {
        let summary = series_service::summarize(&points(&[false, false, true, true]));
        let text = summary_text(&summary, "bpm");
        assert!(text.starts_with("**4** readings (3 with values, 2 imputed)"));
        assert!(text.contains("min **70.0** bpm"));
        assert!(text.contains("last 2 reading(s) are imputed"));
    }

    #[test]
    fn test_summary_text_without_values() {
        let summary = series_service::summarize(&[]);
        assert_eq!(summary_text(&summary, ""), "**0** readings (0 with values, 0 imputed)");
    }

    #[test]
    fn test_y_axis_label() {
        let mut selection = Selection::default();
        assert_eq!(y_axis_label(&selection), "hr (bpm)");
        selection.metric = crate::models::Metric::Activity;
        assert_eq!(y_axis_label(&selection), "activity");
    }

    fn report(pct: f64) -> AdherenceReport {
        AdherenceReport {
            no_token: false,
            last_upload: None,
            sleep_upload_pct: pct,
            wear_time_pct: pct,
        }
    }

    fn tickets(store: &mut SessionStore) -> (RequestTicket, RequestTicket) {
        (
            store.begin(1, RequestKind::Series),
            store.begin(1, RequestKind::Adherence),
        )
    }

    #[test]
    fn test_settle_commits_current_results() {
        let mut store = SessionStore::new();
        let (series, adherence) = tickets(&mut store);
        let (committed, errors) = settle(&mut store, &series, Ok(points(&[false])), &adherence, Ok(report(80.0)));
        assert!(committed);
        assert!(errors.is_empty());
        let state = store.state(1);
        assert_eq!(state.points.map(|p| p.len()), Some(1));
        assert_eq!(state.adherence, Some(report(80.0)));
    }

    #[test]
    fn test_settle_surfaces_current_errors() {
        let mut store = SessionStore::new();
        let (series, adherence) = tickets(&mut store);
        let (committed, errors) = settle(
            &mut store,
            &series,
            Err("❌ No data".to_string()),
            &adherence,
            Err("❌ Server error".to_string()),
        );
        assert!(!committed);
        assert_eq!(errors, vec!["❌ No data".to_string(), "❌ Server error".to_string()]);
    }

    #[test]
    fn test_settle_drops_superseded_results_and_errors() {
        let mut store = SessionStore::new();
        let (series, adherence) = tickets(&mut store);
        // A newer refresh was issued while these were in flight
        tickets(&mut store);

        let (committed, errors) = settle(
            &mut store,
            &series,
            Err("❌ stale".to_string()),
            &adherence,
            Ok(report(10.0)),
        );
        assert!(!committed);
        assert!(errors.is_empty());
        assert_eq!(store.state(1).adherence, None);
    }

    #[test]
    fn test_settle_mixed_commit_and_error() {
        let mut store = SessionStore::new();
        let (series, adherence) = tickets(&mut store);
        let (committed, errors) = settle(
            &mut store,
            &series,
            Err("❌ No data".to_string()),
            &adherence,
            Ok(report(50.0)),
        );
        assert!(committed);
        assert_eq!(errors, vec!["❌ No data".to_string()]);
        let state = store.state(1);
        assert!(state.points.is_none());
        assert_eq!(state.adherence, Some(report(50.0)));
    }

    #[test]
    fn test_settle_only_superseded_kind_is_dropped() {
        let mut store = SessionStore::new();
        let (series, adherence) = tickets(&mut store);
        store.begin(1, RequestKind::Series);

        let (committed, errors) = settle(
            &mut store,
            &series,
            Ok(points(&[false, true])),
            &adherence,
            Err("❌ Server error".to_string()),
        );
        assert!(!committed);
        assert_eq!(errors, vec!["❌ Server error".to_string()]);
        assert!(store.state(1).points.is_none());
    }
}
