//! transcripts - Export meeting transcripts and search them locally
//!
//! Entry point for the transcripts CLI application.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use transcripts::cli::commands::{self, SearchRequest};
use transcripts::cli::{Cli, Commands};
use transcripts::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Completions need neither configuration nor logging
    if let Commands::Completions { shell } = cli.command {
        commands::print_completions(shell);
        return Ok(());
    }

    let settings = Settings::load()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.log_filter(cli.verbose))),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match cli.command {
        Commands::Download {
            output_dir,
            no_summary,
            dry_run,
        } => {
            commands::download(&settings, output_dir, no_summary, dry_run).await?;
        }
        Commands::Search {
            query,
            dir,
            context,
            case_sensitive,
            fuzzy,
            limit,
            min_score,
        } => {
            commands::search(
                &settings,
                SearchRequest {
                    query,
                    dir,
                    context,
                    case_sensitive,
                    fuzzy,
                    limit,
                    min_score,
                },
            )?;
        }
        Commands::Config(config_cmd) => {
            commands::config_command(&settings, config_cmd)?;
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}
