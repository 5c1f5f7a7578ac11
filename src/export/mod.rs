//! Markdown export of meeting transcripts

mod exporter;
mod render;
mod writer;

pub use exporter::{ExportOptions, ExportReport, Exporter, PlannedExport};
pub use render::render_document;
pub use writer::{document_filename, sanitize_title, write_document};
