//! HTTP transport and pacing seams for the API client

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::Client;
use std::time::Duration;

use crate::api::ApiError;

const API_KEY_HEADER: &str = "X-Api-Key";

/// Raw HTTP response as seen by the retry loop
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub retry_after: Option<String>,
    pub body: String,
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET. Only connection-level failures are errors here;
    /// every HTTP status comes back as a `RawResponse`.
    async fn get(&self, url: &str) -> Result<RawResponse, ApiError>;
}

#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// reqwest-backed transport authenticating with a static API key
pub struct HttpTransport {
    http: Client,
    api_key: String,
}

impl HttpTransport {
    pub fn new(api_key: &str) -> Result<Self, ApiError> {
        let api_key = api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(ApiError::MissingApiKey);
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(format!("{}/{}", crate::APP_NAME, crate::VERSION))
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, api_key })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<RawResponse, ApiError> {
        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(RawResponse {
            status,
            retry_after,
            body,
        })
    }
}
