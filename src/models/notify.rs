//! Notification models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Request body for `POST /notify`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotifyRequest {
    pub user_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
}

/// Result struct for a queued notification
#[derive(Debug)]
pub struct NotifyResult {
    pub request: NotifyRequest,
    pub acknowledgement: serde_json::Value,
}
