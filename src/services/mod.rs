use std::sync::Arc;

use serenity::prelude::Context;
use tokio::sync::Mutex;

use crate::api::dashboard::DashboardClient;
use crate::config::Config;

pub mod series_service;
pub mod session_service;
pub mod chart_service;
pub mod participant_service;
pub mod adherence_service;
pub mod notify_service;
pub mod dashboard_service;
pub mod ping_service;

use session_service::SessionStore;

/// Get the API client from context
pub async fn api_client(ctx: &Context) -> Result<Arc<DashboardClient>, String> {
    let data = ctx.data.read().await;
    data.get::<crate::DashboardApi>()
        .cloned()
        .ok_or("Dashboard API client not initialized".to_string())
}

/// Get the runtime configuration from context
pub async fn settings(ctx: &Context) -> Result<Arc<Config>, String> {
    let data = ctx.data.read().await;
    data.get::<crate::Settings>()
        .cloned()
        .ok_or("Configuration not initialized".to_string())
}

/// Get the dashboard session store from context
pub async fn sessions(ctx: &Context) -> Result<Arc<Mutex<SessionStore>>, String> {
    let data = ctx.data.read().await;
    data.get::<crate::DashboardSessions>()
        .cloned()
        .ok_or("Dashboard sessions not initialized".to_string())
}
