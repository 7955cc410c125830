use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::models::{ApiError, HealthResponse};
use crate::models::{AdherenceReport, Metric, NotifyRequest, Participant, SeriesResponse};

/// Client for the wearables read-API backing the dashboard
pub struct DashboardClient {
    http_client: HttpClient,
    base_url: String,
}

impl DashboardClient {
    /// Create a new client. Requests that take longer than `timeout` fail
    /// with `ApiError::RequestError` instead of hanging the command.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::RequestError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Parse error response based on HTTP status code
    async fn handle_error_response(response: reqwest::Response) -> ApiError {
        let status_code = response.status().as_u16();
        let body_text = response.text().await.unwrap_or_default();
        if status_code >= 500 {
            warn!("Server error {}: {}", status_code, body_text);
        }
        ApiError::from_status(status_code, &body_text)
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        if !response.status().is_success() {
            return Err(Self::handle_error_response(response).await);
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::DeserializationError(format!("Failed to parse response: {}", e)))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        debug!("GET {} {:?}", url, query);

        let response = self.http_client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

        Self::read_json(response).await
    }

    /// GET /health
    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.get_json("health", &[]).await
    }

    /// GET /participants
    ///
    /// Lists every participant enrolled in the study.
    pub async fn get_participants(&self) -> Result<Vec<Participant>, ApiError> {
        self.get_json("participants", &[]).await
    }

    /// GET /data
    ///
    /// Retrieves one metric's time series for a participant. The backend
    /// treats `end_date` as inclusive and answers 404 when the range is empty.
    ///
    /// # Returns
    /// * `Ok(SeriesResponse)` - timestamps, values and imputed flags
    /// * `Err(ApiError)` - Error with detailed error type
    pub async fn get_series(
        &self,
        user_id: i64,
        metric: Metric,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<SeriesResponse, ApiError> {
        self.get_json(
            "data",
            &[
                ("start_date", start_date.to_string()),
                ("end_date", end_date.to_string()),
                ("metric", metric.as_str().to_string()),
                ("user_id", user_id.to_string()),
            ],
        )
        .await
    }

    /// GET /adherence
    ///
    /// Retrieves token status, last upload and upload/wear percentages for
    /// a participant over a date range.
    pub async fn get_adherence(
        &self,
        user_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<AdherenceReport, ApiError> {
        self.get_json(
            "adherence",
            &[
                ("start_date", start_date.to_string()),
                ("end_date", end_date.to_string()),
                ("user_id", user_id.to_string()),
            ],
        )
        .await
    }

    /// POST /notify
    ///
    /// Queues an adherence email. The acknowledgement body is not part of a
    /// fixed contract, so it is returned as raw JSON (`null` for empty bodies).
    pub async fn post_notify(&self, body: &NotifyRequest) -> Result<serde_json::Value, ApiError> {
        let url = self.endpoint("notify");
        debug!("POST {} {:?}", url, body);

        let response = self.http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::handle_error_response(response).await);
        }

        let text = response
            .text()
            .await
            .map_err(|e| ApiError::DeserializationError(format!("Failed to read response: {}", e)))?;
        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| ApiError::DeserializationError(format!("Failed to parse response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_paths() {
        let client = DashboardClient::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.endpoint("data"), "http://localhost:8000/data");
        assert_eq!(client.endpoint("/notify"), "http://localhost:8000/notify");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_request_error() {
        // Port 9 (discard) on localhost is not expected to serve HTTP
        let client = DashboardClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = client.get_participants().await.unwrap_err();
        assert!(matches!(err, ApiError::RequestError(_)));
    }
}
