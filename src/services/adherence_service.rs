use serenity::builder::{CreateEmbed, CreateEmbedFooter};
use tracing::error;

use crate::api::dashboard::DashboardClient;
use crate::models::AdherenceReport;
use crate::services::series_service::format_label;
use crate::services::session_service::Selection;
use crate::utils::describe_api_error;

/// One adherence card: title, value, and whether it needs attention
#[derive(Debug, Clone, PartialEq)]
pub struct AdherenceCard {
    pub title: &'static str,
    pub value: String,
    pub alert: bool,
}

pub async fn fetch_adherence(
    client: &DashboardClient,
    selection: &Selection,
) -> Result<AdherenceReport, String> {
    client
        .get_adherence(selection.user_id, selection.start_date, selection.end_date)
        .await
        .map_err(|e| {
            error!("Adherence fetch failed for participant {}: {}", selection.user_id, e);
            describe_api_error(&e)
        })
}

fn pct_card(title: &'static str, pct: f64, threshold: f64) -> AdherenceCard {
    let alert = pct < threshold;
    let value = if alert {
        format!("⚠️ **{:.1}%** (below {:.0}%)", pct, threshold)
    } else {
        format!("✅ {:.1}%", pct)
    };
    AdherenceCard { title, value, alert }
}

pub fn adherence_cards(report: &AdherenceReport, threshold: f64) -> Vec<AdherenceCard> {
    let token = if report.no_token {
        AdherenceCard {
            title: "🔑 Device Token",
            value: "⚠️ No token on file".to_string(),
            alert: true,
        }
    } else {
        AdherenceCard {
            title: "🔑 Device Token",
            value: "✅ Linked".to_string(),
            alert: false,
        }
    };

    let last_upload = AdherenceCard {
        title: "📤 Last Upload",
        value: report
            .last_upload
            .as_deref()
            .map(format_label)
            .unwrap_or_else(|| "Never".to_string()),
        alert: report.last_upload.is_none(),
    };

    vec![
        token,
        last_upload,
        pct_card("😴 Sleep Uploads", report.sleep_upload_pct, threshold),
        pct_card("⌚ Wear Time", report.wear_time_pct, threshold),
    ]
}

/// Add the cards to an existing embed as inline fields
pub fn add_adherence_fields(mut embed: CreateEmbed, report: &AdherenceReport, threshold: f64) -> CreateEmbed {
    for card in adherence_cards(report, threshold) {
        embed = embed.field(card.title, card.value, true);
    }
    embed
}

pub fn create_adherence_embed(report: &AdherenceReport, selection: &Selection, threshold: f64) -> CreateEmbed {
    let needs_attention = !report.low_metrics(threshold).is_empty();
    let color = if needs_attention { 0xffa500 } else { 0x00ff00 };

    let mut embed = CreateEmbed::default()
        .title(format!("📋 Adherence • Participant #{}", selection.user_id))
        .description(format!("{} → {}", selection.start_date, selection.end_date))
        .color(color);
    embed = add_adherence_fields(embed, report, threshold);

    if needs_attention {
        embed = embed.footer(CreateEmbedFooter::new(format!(
            "Adherence below {:.0}% • Use $notify to queue a reminder email",
            threshold
        )));
    }
    embed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> AdherenceReport {
        AdherenceReport {
            no_token: false,
            last_upload: Some("2024-01-07T06:42:00".to_string()),
            sleep_upload_pct: 85.714,
            wear_time_pct: 62.5,
        }
    }

    #[test]
    fn test_cards_in_order() {
        let cards = adherence_cards(&report(), 70.0);
        let titles: Vec<&str> = cards.iter().map(|c| c.title).collect();
        assert_eq!(titles, vec!["🔑 Device Token", "📤 Last Upload", "😴 Sleep Uploads", "⌚ Wear Time"]);
    }

    #[test]
    fn test_card_values() {
        let cards = adherence_cards(&report(), 70.0);
        assert_eq!(cards[0].value, "✅ Linked");
        assert_eq!(cards[1].value, "01-07 06:42");
        assert_eq!(cards[2].value, "✅ 85.7%");
        assert!(!cards[2].alert);
        assert_eq!(cards[3].value, "⚠️ **62.5%** (below 70%)");
        assert!(cards[3].alert);
    }

    #[test]
    fn test_missing_token_and_upload_flagged() {
        let mut report = report();
        report.no_token = true;
        report.last_upload = None;
        let cards = adherence_cards(&report, 70.0);
        assert!(cards[0].alert);
        assert_eq!(cards[1].value, "Never");
        assert!(cards[1].alert);
    }
}
