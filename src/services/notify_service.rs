use serenity::builder::CreateEmbed;
use tracing::{error, info};

use crate::api::dashboard::DashboardClient;
use crate::models::{AdherenceReport, LowAdherence, NotifyRequest, NotifyResult};
use crate::services::session_service::Selection;
use crate::utils::describe_api_error;

/// Longest reason accepted; it must fit one embed field
pub const MAX_REASON_CHARS: usize = 1000;

/// Describe why a notification is being sent
pub fn build_reason(low: &[LowAdherence]) -> String {
    low.iter()
        .map(|l| format!("{} {:.1}% below {:.0}% threshold", l.name, l.pct, l.threshold))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Build the notify body for a selection.
///
/// Refuses when adherence is at or above the threshold: the email exists to
/// chase participants who have fallen behind.
pub fn build_notify_request(
    selection: &Selection,
    report: &AdherenceReport,
    threshold: f64,
    custom_reason: Option<String>,
) -> Result<NotifyRequest, String> {
    let low = report.low_metrics(threshold);
    if low.is_empty() {
        return Err(format!(
            "❌ Participant #{} is at or above the {:.0}% adherence threshold (sleep uploads {:.1}%, wear time {:.1}%). No notification sent.",
            selection.user_id, threshold, report.sleep_upload_pct, report.wear_time_pct
        ));
    }

    let reason = custom_reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| build_reason(&low));

    let length = reason.chars().count();
    if length > MAX_REASON_CHARS {
        return Err(format!(
            "❌ Reason is too long ({} characters, at most {}). No notification sent.",
            length, MAX_REASON_CHARS
        ));
    }

    Ok(NotifyRequest {
        user_id: selection.user_id,
        start_date: selection.start_date,
        end_date: selection.end_date,
        reason,
    })
}

pub async fn send_notification(
    client: &DashboardClient,
    request: NotifyRequest,
) -> Result<NotifyResult, String> {
    let acknowledgement = client.post_notify(&request).await.map_err(|e| {
        error!("Notify failed for participant {}: {}", request.user_id, e);
        describe_api_error(&e)
    })?;

    info!(
        "📧 Notification queued for participant {} ({} → {}): {}",
        request.user_id, request.start_date, request.end_date, request.reason
    );

    Ok(NotifyResult { request, acknowledgement })
}

/// Short text for the acknowledgement body, if it carries one
fn acknowledgement_text(ack: &serde_json::Value) -> Option<String> {
    match ack {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Object(map) => ["message", "status", "detail"]
            .iter()
            .find_map(|key| map.get(*key).and_then(|v| v.as_str()).map(str::to_string))
            .or_else(|| Some(ack.to_string())),
        other => Some(other.to_string()),
    }
}

pub fn create_notify_embed(result: &NotifyResult) -> CreateEmbed {
    let mut embed = CreateEmbed::default()
        .title("📧 Notification Queued")
        .field("Participant", format!("#{}", result.request.user_id), true)
        .field(
            "Range",
            format!("{} → {}", result.request.start_date, result.request.end_date),
            true,
        )
        .field("Reason", &result.request.reason, false)
        .color(0x00b0f4);

    if let Some(text) = acknowledgement_text(&result.acknowledgement) {
        embed = embed.field("Backend", text, false);
    }
    embed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn selection() -> Selection {
        Selection {
            user_id: 4,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
            ..Selection::default()
        }
    }

    fn report(sleep: f64, wear: f64) -> AdherenceReport {
        AdherenceReport {
            no_token: false,
            last_upload: None,
            sleep_upload_pct: sleep,
            wear_time_pct: wear,
        }
    }

    #[test]
    fn test_refused_when_adherent() {
        let err = build_notify_request(&selection(), &report(90.0, 70.0), 70.0, None).unwrap_err();
        assert!(err.contains("No notification sent"));
    }

    #[test]
    fn test_generated_reason() {
        let request = build_notify_request(&selection(), &report(55.0, 40.3), 70.0, None).unwrap();
        assert_eq!(request.user_id, 4);
        assert_eq!(
            request.reason,
            "sleep uploads 55.0% below 70% threshold; wear time 40.3% below 70% threshold"
        );
    }

    #[test]
    fn test_custom_reason_wins() {
        let request = build_notify_request(
            &selection(),
            &report(10.0, 95.0),
            70.0,
            Some("  watch left at home  ".to_string()),
        )
        .unwrap();
        assert_eq!(request.reason, "watch left at home");

        let request = build_notify_request(&selection(), &report(10.0, 95.0), 70.0, Some("   ".to_string())).unwrap();
        assert_eq!(request.reason, "sleep uploads 10.0% below 70% threshold");
    }

    #[test]
    fn test_request_body_shape() {
        let request = build_notify_request(&selection(), &report(10.0, 95.0), 70.0, None).unwrap();
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["user_id"], 4);
        assert_eq!(body["start_date"], "2024-01-01");
        assert_eq!(body["end_date"], "2024-01-07");
        assert!(body["reason"].is_string());
    }

    #[test]
    fn test_acknowledgement_text() {
        assert_eq!(acknowledgement_text(&serde_json::Value::Null), None);
        assert_eq!(
            acknowledgement_text(&serde_json::json!({"status": "queued", "id": 12})),
            Some("queued".to_string())
        );
        assert_eq!(
            acknowledgement_text(&serde_json::json!({"id": 12})),
            Some("{\"id\":12}".to_string())
        );
    }

    #[test]
    fn test_overlong_reason_refused_before_sending() {
        let err = build_notify_request(&selection(), &report(10.0, 10.0), 70.0, Some("x".repeat(1500)))
            .unwrap_err();
        assert!(err.contains("too long (1500 characters"));

        let request = build_notify_request(
            &selection(),
            &report(10.0, 10.0),
            70.0,
            Some("y".repeat(MAX_REASON_CHARS)),
        )
        .unwrap();
        let result = NotifyResult { request, acknowledgement: serde_json::Value::Null };
        let embed = serde_json::to_value(create_notify_embed(&result)).unwrap();
        let reason = embed["fields"][2]["value"].as_str().unwrap();
        assert_eq!(reason.chars().count(), MAX_REASON_CHARS);
        assert!(reason.chars().count() <= 1024);
    }
}
