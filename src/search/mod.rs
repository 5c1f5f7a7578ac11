//! Local search over exported transcripts
//!
//! Every search re-scans the Markdown files on disk; nothing is indexed.

mod discover;
mod exact;
mod fuzzy;
mod output;

pub use discover::discover_markdown_files;
pub use exact::{
    exact_search, scan_lines, search_file, ExactOptions, ExactReport, FileMatches, LineMatcher,
    MatchBlock,
};
pub use fuzzy::{fuzzy_search, highlight, FuzzyMatch, FuzzyOptions, FuzzyReport};
pub use output::{write_exact_report, write_fuzzy_report};

/// A numbered line shown in search output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextLine {
    /// 1-based line number
    pub number: usize,
    pub text: String,
    pub is_hit: bool,
}

impl ContextLine {
    pub fn hit(number: usize, text: String) -> Self {
        Self {
            number,
            text,
            is_hit: true,
        }
    }

    pub fn context(number: usize, text: String) -> Self {
        Self {
            number,
            text,
            is_hit: false,
        }
    }
}
