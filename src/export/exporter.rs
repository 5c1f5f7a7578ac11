//! Export orchestration: list meetings, fetch, render, write

use std::path::PathBuf;

use crate::api::{ApiClient, Meeting, SummaryOutcome};
use crate::config::{DateRange, Settings};
use crate::export::render::render_document;
use crate::export::writer::{document_filename, write_document};
use crate::Result;

#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub output_dir: PathBuf,
    pub include_summary: bool,
    pub range: DateRange,
}

impl ExportOptions {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Ok(Self {
            output_dir: settings.export.output_dir.clone(),
            include_summary: settings.export.include_summary,
            range: settings.date_range()?,
        })
    }
}

/// Final counts for a download run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub exported: usize,
    pub failed: usize,
    pub output_dir: PathBuf,
}

/// A meeting together with the file it would be written to
#[derive(Debug, Clone)]
pub struct PlannedExport {
    pub meeting: Meeting,
    pub filename: String,
}

pub struct Exporter<'a> {
    client: &'a ApiClient,
    options: ExportOptions,
}

impl<'a> Exporter<'a> {
    pub fn new(client: &'a ApiClient, options: ExportOptions) -> Self {
        Self { client, options }
    }

    /// List meetings and the filenames they map to without fetching anything else
    pub async fn plan(&self) -> Result<Vec<PlannedExport>> {
        let meetings = self.client.list_meetings(&self.options.range).await?;
        Ok(meetings
            .into_iter()
            .map(|meeting| PlannedExport {
                filename: document_filename(&meeting),
                meeting,
            })
            .collect())
    }

    /// Export every listed meeting.
    ///
    /// A failing listing aborts the run; a failing meeting is logged,
    /// counted and skipped.
    pub async fn run(&self) -> Result<ExportReport> {
        std::fs::create_dir_all(&self.options.output_dir)?;

        let meetings = self.client.list_meetings(&self.options.range).await?;
        let total = meetings.len();
        tracing::info!("Exporting {} meetings", total);

        let mut report = ExportReport {
            exported: 0,
            failed: 0,
            output_dir: self.options.output_dir.clone(),
        };

        for (index, meeting) in meetings.iter().enumerate() {
            match self.export_meeting(meeting).await {
                Ok(path) => {
                    report.exported += 1;
                    tracing::info!(
                        "[{}/{}] Saved {}",
                        index + 1,
                        total,
                        path.display()
                    );
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::error!(
                        "[{}/{}] Failed to export '{}' ({}): {}",
                        index + 1,
                        total,
                        meeting.display_title(),
                        meeting.recording_id,
                        e
                    );
                }
            }
        }

        Ok(report)
    }

    async fn export_meeting(&self, meeting: &Meeting) -> Result<PathBuf> {
        self.client.pause().await;
        let transcript = self.client.fetch_transcript(&meeting.recording_id).await?;

        let summary = if self.options.include_summary {
            self.client.pause().await;
            self.client.fetch_summary(&meeting.recording_id).await
        } else {
            SummaryOutcome::Absent
        };

        let content = render_document(meeting, &transcript, &summary);
        let path = write_document(
            &self.options.output_dir,
            &document_filename(meeting),
            &content,
        )?;
        Ok(path)
    }
}
