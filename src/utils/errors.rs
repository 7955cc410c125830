use crate::api::dashboard::ApiError;

/// Turn an API failure into the message shown to the researcher
pub fn describe_api_error(err: &ApiError) -> String {
    match err {
        ApiError::NotFound(detail) => {
            format!("❌ No data found for this selection ({})", detail)
        }
        ApiError::BadRequest(detail) | ApiError::InvalidQuery(detail) => {
            format!("❌ The dashboard API rejected the request: {}", detail)
        }
        ApiError::ServerError(code, _) => {
            format!("⚠️ **Backend Error**: the dashboard API failed with status {}. Please try again later.", code)
        }
        ApiError::HttpError(code, detail) => {
            format!("❌ Dashboard API error ({}): {}", code, detail)
        }
        ApiError::RequestError(detail) => {
            format!("⚠️ **Network Error**: could not reach the dashboard API ({})", detail)
        }
        ApiError::DeserializationError(detail) => {
            format!("❌ Unexpected response from the dashboard API: {}", detail)
        }
    }
}

/// Normalize a command error for display
///
/// Discord transport failures are reported as such; anything else is shown
/// as-is, with a leading marker added when the message has none.
pub fn user_message(error_msg: &str) -> String {
    let trimmed = error_msg.trim();
    if trimmed.contains("429") || trimmed.to_lowercase().contains("rate limit") {
        "⚠️ **Rate Limited**: Discord is rate limiting us. Please try again in a moment.".to_string()
    } else if trimmed.is_empty() {
        "❌ An error occurred while executing the command.".to_string()
    } else if trimmed.starts_with('❌') || trimmed.starts_with('⚠') {
        trimmed.to_string()
    } else {
        format!("❌ {}", trimmed)
    }
}
