//! Rate-limited API client with cursor pagination

use reqwest::Url;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use crate::api::models::{
    Meeting, MeetingPage, SummaryOutcome, SummaryResponse, TranscriptEntry, TranscriptResponse,
};
use crate::api::transport::{HttpTransport, RawResponse, Sleeper, TokioSleeper, Transport};
use crate::api::ApiError;
use crate::config::{DateRange, Settings};

const MAX_ERROR_BODY_CHARS: usize = 200;

/// Pacing and retry knobs for the client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub request_delay: Duration,
    pub max_attempts: u32,
    pub default_retry_after: Duration,
    pub network_backoff: Duration,
}

impl ClientOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            base_url: settings.api.base_url.trim().trim_end_matches('/').to_string(),
            request_delay: settings.request_delay(),
            max_attempts: settings.api.max_attempts.max(1),
            default_retry_after: Duration::from_secs(settings.api.default_retry_after_secs),
            network_backoff: Duration::from_millis(settings.api.network_backoff_ms),
        }
    }
}

pub struct ApiClient {
    transport: Arc<dyn Transport>,
    sleeper: Arc<dyn Sleeper>,
    options: ClientOptions,
}

impl ApiClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        sleeper: Arc<dyn Sleeper>,
        options: ClientOptions,
    ) -> Self {
        Self {
            transport,
            sleeper,
            options,
        }
    }

    /// Build a client that talks to the configured service over HTTP
    pub fn from_settings(settings: &Settings) -> Result<Self, ApiError> {
        let transport = HttpTransport::new(&settings.api.api_key)?;
        Ok(Self::new(
            Arc::new(transport),
            Arc::new(TokioSleeper),
            ClientOptions::from_settings(settings),
        ))
    }

    /// Wait the fixed inter-request delay
    pub async fn pause(&self) {
        self.sleeper.sleep(self.options.request_delay).await;
    }

    /// List every meeting visible to the API key, following cursors to the end.
    ///
    /// Any page that fails aborts the whole listing.
    pub async fn list_meetings(&self, range: &DateRange) -> Result<Vec<Meeting>, ApiError> {
        let mut meetings = Vec::new();
        let mut cursor: Option<String> = None;
        let mut page_number = 0usize;

        loop {
            if page_number > 0 {
                self.pause().await;
            }
            page_number += 1;

            let url = self.meetings_url(cursor.as_deref(), range)?;
            let page: MeetingPage = self.fetch_json(&url).await?;

            tracing::debug!(
                "Fetched meeting page {} ({} items)",
                page_number,
                page.items.len()
            );
            meetings.extend(page.items);

            match page.next_cursor.filter(|c| !c.is_empty()) {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        tracing::info!(
            "Listed {} meetings across {} pages",
            meetings.len(),
            page_number
        );
        Ok(meetings)
    }

    pub async fn fetch_transcript(
        &self,
        recording_id: &str,
    ) -> Result<Vec<TranscriptEntry>, ApiError> {
        let url = self.recording_url(recording_id, "transcript")?;
        let response: TranscriptResponse = self.fetch_json(&url).await?;
        Ok(response.transcript)
    }

    /// Fetch the summary for a recording. Any failure degrades to `Absent`.
    pub async fn fetch_summary(&self, recording_id: &str) -> SummaryOutcome {
        let url = match self.recording_url(recording_id, "summary") {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Skipping summary for {}: {}", recording_id, e);
                return SummaryOutcome::Absent;
            }
        };

        match self.fetch_json::<SummaryResponse>(&url).await {
            Ok(response) => SummaryOutcome::from(response),
            Err(ApiError::Status { status: 404, .. }) => {
                tracing::debug!("No summary available for {}", recording_id);
                SummaryOutcome::Absent
            }
            Err(e) => {
                tracing::warn!("Summary unavailable for {}: {}", recording_id, e);
                SummaryOutcome::Absent
            }
        }
    }

    /// GET a URL and decode its JSON body, absorbing 429 responses.
    ///
    /// Network errors and 429s share one budget of `max_attempts` requests.
    /// Any other non-2xx status fails immediately.
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let max_attempts = self.options.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            let has_next = attempt < max_attempts;

            let response = match self.transport.get(url).await {
                Ok(response) => response,
                Err(ApiError::Network(message)) => {
                    tracing::warn!(
                        "Request failed (attempt {}/{}): {}",
                        attempt,
                        max_attempts,
                        message
                    );
                    if has_next {
                        self.sleeper
                            .sleep(self.options.network_backoff * attempt)
                            .await;
                    }
                    continue;
                }
                Err(other) => return Err(other),
            };

            match response.status {
                429 => {
                    let wait = retry_delay(&response, self.options.default_retry_after);
                    tracing::warn!(
                        "Rate limited (attempt {}/{}), waiting {}s",
                        attempt,
                        max_attempts,
                        wait.as_secs()
                    );
                    if has_next {
                        self.sleeper.sleep(wait).await;
                    }
                }
                200..=299 => {
                    return serde_json::from_str(&response.body).map_err(|source| {
                        ApiError::Decode {
                            url: url.to_string(),
                            source,
                        }
                    });
                }
                status => {
                    return Err(ApiError::Status {
                        status,
                        url: url.to_string(),
                        body: truncate_body(&response.body),
                    });
                }
            }
        }

        Err(ApiError::MaxRetries {
            attempts: max_attempts,
            url: url.to_string(),
        })
    }

    fn meetings_url(&self, cursor: Option<&str>, range: &DateRange) -> Result<String, ApiError> {
        let mut url = self.parse_url(&format!("{}/meetings", self.options.base_url))?;

        let pairs: Vec<(&str, &str)> = [
            ("cursor", cursor),
            ("created_after", range.created_after.as_deref()),
            ("created_before", range.created_before.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect();

        // query_pairs_mut leaves a bare '?' behind when nothing is appended
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url.to_string())
    }

    fn recording_url(&self, recording_id: &str, resource: &str) -> Result<String, ApiError> {
        let mut url = self.parse_url(&self.options.base_url)?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.options.base_url.clone()))?
            .pop_if_empty()
            .extend(["recordings", recording_id, resource]);
        Ok(url.to_string())
    }

    fn parse_url(&self, raw: &str) -> Result<Url, ApiError> {
        Url::parse(raw).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", raw, e)))
    }
}

/// Server-directed backoff for a 429, falling back to the default
fn retry_delay(response: &RawResponse, default: Duration) -> Duration {
    response
        .retry_after
        .as_deref()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}

fn truncate_body(body: &str) -> String {
    let body = body.trim();
    if body.chars().count() <= MAX_ERROR_BODY_CHARS {
        body.to_string()
    } else {
        let cut: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned responses and remembers every requested URL
    #[derive(Default)]
    struct ScriptedTransport {
        responses: Mutex<VecDeque<Result<RawResponse, ApiError>>>,
        requests: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        fn push(&self, status: u16, retry_after: Option<&str>, body: &str) {
            self.responses.lock().unwrap().push_back(Ok(RawResponse {
                status,
                retry_after: retry_after.map(str::to_string),
                body: body.to_string(),
            }));
        }

        fn push_network_error(&self) {
            self.responses
                .lock()
                .unwrap()
                .push_back(Err(ApiError::Network("connection reset".to_string())));
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn get(&self, url: &str) -> Result<RawResponse, ApiError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ApiError::Network("script exhausted".to_string())))
        }
    }

    #[derive(Default)]
    struct RecordingSleeper {
        sleeps: Mutex<Vec<Duration>>,
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.sleeps.lock().unwrap().push(duration);
        }
    }

    fn options() -> ClientOptions {
        ClientOptions {
            base_url: "https://api.test/v1".to_string(),
            request_delay: Duration::from_millis(1000),
            max_attempts: 3,
            default_retry_after: Duration::from_secs(60),
            network_backoff: Duration::from_millis(500),
        }
    }

    fn client() -> (ApiClient, Arc<ScriptedTransport>, Arc<RecordingSleeper>) {
        let transport = Arc::new(ScriptedTransport::default());
        let sleeper = Arc::new(RecordingSleeper::default());
        let client = ApiClient::new(transport.clone(), sleeper.clone(), options());
        (client, transport, sleeper)
    }

    fn meeting_json(id: u64) -> String {
        format!(
            r#"{{"recording_id": {id}, "title": "Meeting {id}", "created_at": "2024-01-0{id}T10:00:00Z"}}"#
        )
    }

    #[tokio::test]
    async fn pagination_concatenates_pages_in_order() {
        let (client, transport, sleeper) = client();
        transport.push(
            200,
            None,
            &format!(
                r#"{{"items": [{}, {}], "next_cursor": "c2"}}"#,
                meeting_json(1),
                meeting_json(2)
            ),
        );
        transport.push(
            200,
            None,
            &format!(r#"{{"items": [{}], "next_cursor": "c3"}}"#, meeting_json(3)),
        );
        transport.push(
            200,
            None,
            &format!(r#"{{"items": [{}]}}"#, meeting_json(4)),
        );

        let meetings = client.list_meetings(&DateRange::default()).await.unwrap();

        let ids: Vec<_> = meetings.iter().map(|m| m.recording_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);

        // one fewer delay than pages, never before the first page
        assert_eq!(
            *sleeper.sleeps.lock().unwrap(),
            vec![Duration::from_millis(1000); 2]
        );

        let requests = transport.requests();
        assert_eq!(requests[0], "https://api.test/v1/meetings");
        assert_eq!(requests[1], "https://api.test/v1/meetings?cursor=c2");
        assert_eq!(requests[2], "https://api.test/v1/meetings?cursor=c3");
    }

    #[tokio::test]
    async fn single_page_listing_never_sleeps() {
        let (client, transport, sleeper) = client();
        transport.push(200, None, r#"{"items": [], "next_cursor": null}"#);

        let meetings = client.list_meetings(&DateRange::default()).await.unwrap();
        assert!(meetings.is_empty());
        assert!(sleeper.sleeps.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn listing_sends_date_bounds() {
        let (client, transport, _) = client();
        transport.push(200, None, r#"{"items": []}"#);

        let range = DateRange {
            created_after: Some("2024-01-01T00:00:00Z".to_string()),
            created_before: Some("2024-02-01T00:00:00Z".to_string()),
        };
        client.list_meetings(&range).await.unwrap();

        assert_eq!(
            transport.requests()[0],
            "https://api.test/v1/meetings?created_after=2024-01-01T00%3A00%3A00Z&created_before=2024-02-01T00%3A00%3A00Z"
        );
    }

    #[tokio::test]
    async fn failed_page_aborts_listing() {
        let (client, transport, _) = client();
        transport.push(
            200,
            None,
            &format!(r#"{{"items": [{}], "next_cursor": "c2"}}"#, meeting_json(1)),
        );
        transport.push(401, None, "unauthorized");

        let err = client
            .list_meetings(&DateRange::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 401, .. }));
    }

    #[tokio::test]
    async fn rate_limit_twice_then_success() {
        let (client, transport, sleeper) = client();
        transport.push(429, Some("5"), "");
        transport.push(429, None, "");
        transport.push(200, None, r#"{"transcript": [{"timestamp": "00:00:01", "text": "hi"}]}"#);

        let entries = client.fetch_transcript("42").await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "hi");

        assert_eq!(
            *sleeper.sleeps.lock().unwrap(),
            vec![Duration::from_secs(5), Duration::from_secs(60)]
        );
        assert_eq!(
            transport.requests(),
            vec!["https://api.test/v1/recordings/42/transcript"; 3]
        );
    }

    #[tokio::test]
    async fn rate_limit_on_every_attempt_exhausts_budget() {
        let (client, transport, _) = client();
        for _ in 0..3 {
            transport.push(429, Some("1"), "");
        }

        let err = client.fetch_transcript("42").await.unwrap_err();
        assert!(matches!(err, ApiError::MaxRetries { attempts: 3, .. }));
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn hard_error_status_is_not_retried() {
        let (client, transport, sleeper) = client();
        transport.push(500, None, "boom");
        transport.push(200, None, r#"{"transcript": []}"#);

        let err = client.fetch_transcript("42").await.unwrap_err();
        match err {
            ApiError::Status { status, body, .. } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected status error, got {other:?}"),
        }
        assert_eq!(transport.requests().len(), 1);
        assert!(sleeper.sleeps.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn network_errors_share_the_attempt_budget() {
        let (client, transport, sleeper) = client();
        transport.push_network_error();
        transport.push(429, Some("2"), "");
        transport.push_network_error();

        let err = client.fetch_transcript("42").await.unwrap_err();
        assert!(matches!(err, ApiError::MaxRetries { attempts: 3, .. }));
        assert_eq!(
            *sleeper.sleeps.lock().unwrap(),
            vec![Duration::from_millis(500), Duration::from_secs(2)]
        );
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let (client, transport, _) = client();
        transport.push(200, None, "not json");

        let err = client.fetch_transcript("42").await.unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[tokio::test]
    async fn summary_failures_degrade_to_absent() {
        let (client, transport, _) = client();
        transport.push(404, None, "not found");
        assert_eq!(client.fetch_summary("1").await, SummaryOutcome::Absent);

        transport.push(503, None, "unavailable");
        assert_eq!(client.fetch_summary("2").await, SummaryOutcome::Absent);

        transport.push(200, None, r#"{"summary": {"markdown_formatted": "- point"}}"#);
        let outcome = client.fetch_summary("3").await;
        assert_eq!(
            outcome.as_summary().map(|s| s.markdown.as_str()),
            Some("- point")
        );
    }

    #[test]
    fn unparsable_retry_after_uses_default() {
        let response = RawResponse {
            status: 429,
            retry_after: Some("Wed, 21 Oct 2015 07:28:00 GMT".to_string()),
            body: String::new(),
        };
        assert_eq!(
            retry_delay(&response, Duration::from_secs(60)),
            Duration::from_secs(60)
        );
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let body = "x".repeat(500);
        let truncated = truncate_body(&body);
        assert_eq!(truncated.len(), MAX_ERROR_BODY_CHARS + 3);
        assert!(truncated.ends_with("..."));
    }
}
