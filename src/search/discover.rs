//! Markdown file discovery

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::{Result, TranscriptsError};

/// Every `.md` file under `root`, at any depth, in path order.
///
/// Traversal is iterative and does not follow symlinks, so deep trees cannot
/// exhaust the stack.
pub fn discover_markdown_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(TranscriptsError::DirectoryNotFound(root.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() && entry.file_name().to_string_lossy().ends_with(".md") {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
