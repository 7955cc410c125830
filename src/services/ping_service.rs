use serenity::prelude::*;
use std::time::Instant;
use tracing::warn;

use crate::models::PingMetrics;

fn format_uptime(secs: u64) -> String {
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;
    format!("{}h {}m {}s", hours, minutes, seconds)
}

pub async fn get_ping_metrics(ctx: &Context, start_time: Instant) -> Result<PingMetrics, String> {
    let response_roundtrip = start_time.elapsed().as_millis() as u64;

    // Get bot uptime from client data
    let uptime = {
        let data = ctx.data.read().await;
        data.get::<crate::BotData>()
            .map(|started| format_uptime(started.elapsed().as_secs()))
            .unwrap_or_else(|| "Unknown".to_string())
    };

    let client = super::api_client(ctx).await?;
    let health_start = Instant::now();
    let (backend_status, backend_latency) = match client.health().await {
        Ok(health) => (
            format!("✅ {} ({})", health.status, client.base_url()),
            Some(health_start.elapsed().as_millis() as u64),
        ),
        Err(e) => {
            warn!("Backend health check failed: {}", e);
            (format!("❌ Unreachable ({})", client.base_url()), None)
        }
    };

    Ok(PingMetrics {
        response_roundtrip,
        uptime,
        backend_status,
        backend_latency,
    })
}

pub fn create_ping_embed(metrics: &PingMetrics) -> serenity::builder::CreateEmbed {
    let backend_latency = metrics
        .backend_latency
        .map(|ms| format!("{}ms", ms))
        .unwrap_or_else(|| "n/a".to_string());

    serenity::builder::CreateEmbed::default()
        .title("Pong! 🏓")
        .field("Response Roundtrip", format!("{}ms", metrics.response_roundtrip), true)
        .field("API Latency", backend_latency, true)
        .field("Dashboard API", &metrics.backend_status, false)
        .field("Uptime", &metrics.uptime, false)
        .color(0x00b0f4)
}
