//! Recording service API client
//!
//! Lists meetings with cursor pagination and fetches transcripts and
//! summaries, pacing requests to stay inside the service's rate limit.

mod client;
mod error;
mod models;
mod transport;

pub use client::{ApiClient, ClientOptions};
pub use error::ApiError;
pub use models::{Meeting, Speaker, Summary, SummaryOutcome, TranscriptEntry};
pub use transport::{HttpTransport, RawResponse, Sleeper, TokioSleeper, Transport};
