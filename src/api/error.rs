use thiserror::Error;

/// Errors raised while talking to the recording service
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("API key is missing. Set api.api_key in config or TRANSCRIPTS_API_KEY.")]
    MissingApiKey,

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API returned status {status} for {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("Max retries exceeded after {attempts} attempts: {url}")]
    MaxRetries { attempts: u32, url: String },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
