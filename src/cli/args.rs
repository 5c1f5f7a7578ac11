//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// transcripts - Export meeting transcripts to Markdown and search them
#[derive(Parser, Debug)]
#[command(name = "transcripts")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download every meeting transcript as a Markdown file
    Download {
        /// Output directory (overrides config and TRANSCRIPTS_OUTPUT_DIR)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Skip fetching meeting summaries
        #[arg(long)]
        no_summary: bool,

        /// List the meetings that would be exported without downloading
        #[arg(long)]
        dry_run: bool,
    },

    /// Search exported transcripts
    Search {
        /// Text to search for
        query: String,

        /// Directory to search (defaults to the export directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Lines of context around each match
        #[arg(short = 'C', long)]
        context: Option<usize>,

        /// Match case exactly
        #[arg(short, long)]
        case_sensitive: bool,

        /// Rank lines by fuzzy score instead of substring matching
        #[arg(short, long)]
        fuzzy: bool,

        /// Maximum number of fuzzy results
        #[arg(short, long)]
        limit: Option<usize>,

        /// Minimum fuzzy score to report
        #[arg(long, allow_hyphen_values = true)]
        min_score: Option<i64>,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show current configuration (API key redacted)
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}
