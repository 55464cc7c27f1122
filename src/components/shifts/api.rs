use super::models::{BookingRequest, CommonShiftsRequest, CommonShiftsResponse};
use super::service::ShiftService;
use crate::config::Config;
use crate::error::{config_error, network_error, BookingResult, Error};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use url::Url;

/// Path of the shift lookup endpoint
pub const COMMON_SHIFTS_PATH: &str = "employee/common-shifts/";

/// Path of the booking endpoint
pub const CREATE_BOOKING_PATH: &str = "employee/create_booking/";

/// HTTP client for the booking API
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: String,
    timeout: Duration,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client for the given API root and session token
    pub fn new(base_url: &str, token: impl Into<String>, timeout: Duration) -> BookingResult<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|e| config_error(&format!("Invalid API URL {}: {}", base_url, e)))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| network_error(&format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url,
            token: token.into(),
            timeout,
        })
    }

    /// Create a client from the loaded configuration
    pub fn from_config(config: &Config) -> BookingResult<Self> {
        Self::new(&config.api_base_url, config.auth_token.clone(), config.request_timeout())
    }

    /// Absolute URL of an endpoint path
    pub fn endpoint(&self, path: &str) -> BookingResult<Url> {
        let url_str = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        Url::parse(&url_str).map_err(|e| config_error(&format!("Failed to parse URL: {}", e)))
    }

    /// POST a JSON body and return the response if it has a 2xx status
    async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> BookingResult<Response> {
        let url = self.endpoint(path)?;
        debug!("API request: POST {}", url);
        let started = Instant::now();

        let response = self
            .client
            .post(url.clone())
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!("API request to {} failed: {}", url, e);
                if e.is_timeout() {
                    Error::Timeout(self.timeout)
                } else {
                    network_error(&format!("Request to {} failed: {}", url, e))
                }
            })?;

        let status = response.status();
        debug!(
            "API response: {} {} in {} ms",
            status.as_u16(),
            url,
            started.elapsed().as_millis()
        );

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!("API error response from {}: HTTP {} - {}", url, status, error_body);
            return Err(Error::Service {
                status: status.as_u16(),
                message: server_message(&error_body),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl ShiftService for ApiClient {
    async fn common_shifts(&self, request: &CommonShiftsRequest) -> BookingResult<CommonShiftsResponse> {
        let response = self.post_json(COMMON_SHIFTS_PATH, request).await?;
        response
            .json::<CommonShiftsResponse>()
            .await
            .map_err(|e| Error::Decode(format!("Failed to parse shifts response: {}", e)))
    }

    async fn create_booking(&self, request: &BookingRequest) -> BookingResult<()> {
        self.post_json(CREATE_BOOKING_PATH, request).await?;
        Ok(())
    }
}

/// Pull a human readable message out of an error body
pub fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "detail", "error"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_api_prefix() {
        let client = ApiClient::new("https://api.gocab.tech/api/", "token", Duration::from_secs(10)).unwrap();
        assert_eq!(
            client.endpoint(COMMON_SHIFTS_PATH).unwrap().as_str(),
            "https://api.gocab.tech/api/employee/common-shifts/"
        );
        assert_eq!(
            client.endpoint("/employee/create_booking/").unwrap().as_str(),
            "https://api.gocab.tech/api/employee/create_booking/"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(ApiClient::new("gocab", "token", Duration::from_secs(10)).is_err());
    }

    #[test]
    fn test_debug_hides_token() {
        let client = ApiClient::new("https://api.gocab.tech/api", "secret-token", Duration::from_secs(10)).unwrap();
        assert!(!format!("{:?}", client).contains("secret-token"));
    }

    #[test]
    fn test_server_message() {
        assert_eq!(
            server_message(r#"{"message": "Shift is full"}"#),
            Some("Shift is full".to_string())
        );
        assert_eq!(
            server_message(r#"{"detail": "Authentication credentials were not provided."}"#),
            Some("Authentication credentials were not provided.".to_string())
        );
        assert_eq!(server_message(r#"{"message": "", "error": "bad"}"#), Some("bad".to_string()));
        assert_eq!(server_message(r#"{"status": false}"#), None);
        assert_eq!(server_message("<html>502</html>"), None);
    }
}
