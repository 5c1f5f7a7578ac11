//! Payloads returned by the recording service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A recorded meeting as listed by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    /// Remote identifier of the recording
    #[serde(deserialize_with = "string_or_number")]
    pub recording_id: String,

    /// Meeting title
    #[serde(default)]
    pub title: Option<String>,

    /// Calendar title, used when `title` is missing
    #[serde(default)]
    pub meeting_title: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Public URL of the recording
    #[serde(default)]
    pub url: Option<String>,

    /// Share link, used when `url` is missing
    #[serde(default)]
    pub share_url: Option<String>,
}

impl Meeting {
    pub fn display_title(&self) -> &str {
        first_non_blank(&[&self.title, &self.meeting_title]).unwrap_or("Untitled")
    }

    pub fn url(&self) -> Option<&str> {
        first_non_blank(&[&self.url, &self.share_url])
    }
}

fn first_non_blank<'a>(candidates: &[&'a Option<String>]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|value| value.as_deref())
        .map(str::trim)
        .find(|value| !value.is_empty())
}

/// One page of the meeting listing
#[derive(Debug, Deserialize)]
pub struct MeetingPage {
    #[serde(default)]
    pub items: Vec<Meeting>,

    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Speaker {
    #[serde(default)]
    pub display_name: Option<String>,
}

/// A single utterance in a transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    #[serde(default)]
    pub timestamp: String,

    #[serde(default)]
    pub speaker: Option<Speaker>,

    #[serde(default)]
    pub text: String,
}

impl TranscriptEntry {
    pub fn speaker_name(&self) -> &str {
        self.speaker
            .as_ref()
            .and_then(|s| s.display_name.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or("Unknown")
    }
}

#[derive(Debug, Deserialize)]
pub struct TranscriptResponse {
    #[serde(default)]
    pub transcript: Vec<TranscriptEntry>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryResponse {
    #[serde(default)]
    pub summary: Option<SummaryBody>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryBody {
    #[serde(default)]
    pub markdown_formatted: Option<String>,
}

/// Markdown summary of a meeting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub markdown: String,
}

/// Outcome of a summary lookup. A missing summary is a normal result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    Found(Summary),
    Absent,
}

impl SummaryOutcome {
    pub fn as_summary(&self) -> Option<&Summary> {
        match self {
            Self::Found(summary) => Some(summary),
            Self::Absent => None,
        }
    }
}

impl From<SummaryResponse> for SummaryOutcome {
    fn from(response: SummaryResponse) -> Self {
        match response
            .summary
            .and_then(|s| s.markdown_formatted)
            .filter(|md| !md.trim().is_empty())
        {
            Some(markdown) => Self::Found(Summary { markdown }),
            None => Self::Absent,
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}
