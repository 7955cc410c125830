use serde::{Deserialize, Serialize};

/// Response from GET /health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// FastAPI error body: `detail` is a string for HTTPException and a list of
/// validation entries for 422s
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Array(items) => {
                let msgs: Vec<String> = items
                    .iter()
                    .filter_map(|item| {
                        let msg = item.get("msg")?.as_str()?;
                        let field = item
                            .get("loc")
                            .and_then(|loc| loc.as_array())
                            .and_then(|loc| loc.last())
                            .and_then(|f| f.as_str());
                        Some(match field {
                            Some(field) => format!("{}: {}", field, msg),
                            None => msg.to_string(),
                        })
                    })
                    .collect();
                if msgs.is_empty() {
                    None
                } else {
                    Some(msgs.join("; "))
                }
            }
            other => Some(other.to_string()),
        }
    }
}

/// Comprehensive error type for API operations
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// 400 Bad Request
    BadRequest(String),
    /// 404 Not Found (the read-API answers 404 for ranges without data)
    NotFound(String),
    /// 422 Unprocessable Entity (query validation)
    InvalidQuery(String),
    /// 5xx Server Error
    ServerError(i32, String),
    /// Other HTTP errors
    HttpError(i32, String),
    /// Network/request error
    RequestError(String),
    /// Deserialization error
    DeserializationError(String),
}

impl ApiError {
    /// Map a non-success status and its raw body to an error
    pub fn from_status(status_code: u16, body_text: &str) -> ApiError {
        let detail = serde_json::from_str::<ErrorResponse>(body_text)
            .ok()
            .and_then(|err| err.message())
            .unwrap_or_else(|| body_text.to_string());

        match status_code {
            400 => ApiError::BadRequest(detail),
            404 => ApiError::NotFound(detail),
            422 => ApiError::InvalidQuery(detail),
            500..=599 => ApiError::ServerError(status_code as i32, detail),
            _ => ApiError::HttpError(status_code as i32, detail),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::InvalidQuery(msg) => write!(f, "Invalid Query: {}", msg),
            ApiError::ServerError(code, msg) => write!(f, "Server Error ({}): {}", code, msg),
            ApiError::HttpError(code, msg) => write!(f, "HTTP Error ({}): {}", code, msg),
            ApiError::RequestError(msg) => write!(f, "Request Error: {}", msg),
            ApiError::DeserializationError(msg) => write!(f, "Deserialization Error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}
