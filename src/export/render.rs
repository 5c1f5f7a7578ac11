//! Markdown rendering of exported meetings

use crate::api::{Meeting, SummaryOutcome, TranscriptEntry};

/// Render one meeting as a Markdown document.
///
/// Output depends only on the inputs, so re-exporting unchanged data yields
/// identical bytes.
pub fn render_document(
    meeting: &Meeting,
    transcript: &[TranscriptEntry],
    summary: &SummaryOutcome,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", meeting.display_title()));
    output.push_str(&format!(
        "- **Date:** {}\n",
        meeting.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.push_str(&format!("- **Recording ID:** {}\n", meeting.recording_id));
    if let Some(url) = meeting.url() {
        output.push_str(&format!("- **URL:** {}\n", url));
    }

    if let Some(summary) = summary.as_summary() {
        output.push_str("\n## Summary\n\n");
        output.push_str(summary.markdown.trim());
        output.push('\n');
    }

    output.push_str("\n## Transcript\n\n");
    if transcript.is_empty() {
        output.push_str("_No transcript entries._\n");
    }

    for entry in transcript {
        output.push_str(&format!(
            "**[{}] {}:** {}\n",
            entry.timestamp.trim(),
            entry.speaker_name(),
            entry.text.trim()
        ));
    }

    output
}
