//! Output file naming and writing

use std::path::{Path, PathBuf};

use crate::api::Meeting;

const MAX_TITLE_CHARS: usize = 100;

/// `<YYYY-MM-DD>_<sanitized title>.md`
pub fn document_filename(meeting: &Meeting) -> String {
    format!(
        "{}_{}.md",
        meeting.created_at.format("%Y-%m-%d"),
        sanitize_title(meeting.display_title())
    )
}

pub fn sanitize_title(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '-' || *c == '_')
        .collect();

    let joined = kept.split_whitespace().collect::<Vec<_>>().join("_");
    let trimmed: String = joined
        .trim_matches(|c| c == '_' || c == '-')
        .chars()
        .take(MAX_TITLE_CHARS)
        .collect();

    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed
    }
}

/// Write a rendered document, replacing any file of the same name
pub fn write_document(output_dir: &Path, filename: &str, content: &str) -> std::io::Result<PathBuf> {
    let path = output_dir.join(filename);
    std::fs::write(&path, content)?;
    Ok(path)
}
