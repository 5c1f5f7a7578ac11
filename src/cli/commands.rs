//! CLI command implementations

use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::Shell;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::api::ApiClient;
use crate::cli::args::{Cli, ConfigCommand};
use crate::config::Settings;
use crate::export::{ExportOptions, Exporter};
use crate::search::{
    exact_search, fuzzy_search, write_exact_report, write_fuzzy_report, ExactOptions,
    FuzzyOptions,
};

/// Flags accepted by the search command
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub dir: Option<PathBuf>,
    pub context: Option<usize>,
    pub case_sensitive: bool,
    pub fuzzy: bool,
    pub limit: Option<usize>,
    pub min_score: Option<i64>,
}

/// Export every meeting to Markdown
pub async fn download(
    settings: &Settings,
    output_dir: Option<PathBuf>,
    no_summary: bool,
    dry_run: bool,
) -> Result<()> {
    let mut options = ExportOptions::from_settings(settings)?;
    if let Some(dir) = output_dir {
        options.output_dir = dir;
    }
    if no_summary {
        options.include_summary = false;
    }

    let client = ApiClient::from_settings(settings)?;
    let exporter = Exporter::new(&client, options);

    if dry_run {
        let planned = exporter.plan().await.context("Failed to list meetings")?;
        if planned.is_empty() {
            println!("No meetings found");
            return Ok(());
        }

        println!("{:<12} {:<14} {:<40} File", "Date", "Recording", "Title");
        println!("{}", "-".repeat(90));
        for item in &planned {
            println!(
                "{:<12} {:<14} {:<40} {}",
                item.meeting.created_at.format("%Y-%m-%d"),
                item.meeting.recording_id,
                truncate(item.meeting.display_title(), 38),
                item.filename
            );
        }
        println!();
        println!("{} meetings would be exported", planned.len());
        return Ok(());
    }

    let report = exporter.run().await.context("Export aborted")?;

    println!("Exported: {}", report.exported);
    println!("Errors:   {}", report.failed);
    println!("Output:   {}", resolve_path(&report.output_dir).display());

    Ok(())
}

/// Search exported transcripts on disk
pub fn search(settings: &Settings, request: SearchRequest) -> Result<()> {
    let root = resolve_path(&request.dir.unwrap_or_else(|| settings.search_dir()));
    if !root.is_dir() {
        anyhow::bail!("Search directory not found: {}", root.display());
    }

    let context = request.context.unwrap_or(settings.search.context_lines);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if request.fuzzy {
        let options = FuzzyOptions {
            limit: request.limit.unwrap_or(settings.search.limit),
            min_score: request.min_score.unwrap_or(i64::MIN),
            context,
            case_sensitive: request.case_sensitive,
        };
        let report = fuzzy_search(&root, &request.query, &options)
            .with_context(|| format!("Search failed in {}", root.display()))?;
        write_fuzzy_report(&mut out, &report)?;
    } else {
        let options = ExactOptions {
            case_sensitive: request.case_sensitive,
            context,
        };
        let report = exact_search(&root, &request.query, &options)
            .with_context(|| format!("Search failed in {}", root.display()))?;
        write_exact_report(&mut out, &report)?;
    }

    out.flush()?;
    Ok(())
}

/// Handle config subcommands
pub fn config_command(settings: &Settings, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let toml = toml::to_string_pretty(&settings.redacted())?;
            println!("{}", toml);
        }
        ConfigCommand::Path => {
            let path = Settings::config_path()?;
            println!("{}", path.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

/// Print the completion script for `shell` to stdout
pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
}

// Helper functions

fn resolve_path(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
