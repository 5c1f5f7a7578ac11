//! transcripts - Export meeting transcripts to Markdown and search them locally
//!
//! Two independent pipelines live here: the exporter walks the recording
//! service API and writes one Markdown document per meeting, and the search
//! engine scans those documents on disk.

pub mod api;
pub mod cli;
pub mod config;
pub mod export;
pub mod search;

use std::path::PathBuf;
use thiserror::Error;

use crate::api::ApiError;

/// Main error type for transcripts
#[derive(Error, Debug)]
pub enum TranscriptsError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, TranscriptsError>;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "transcripts";
