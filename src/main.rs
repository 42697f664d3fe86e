//! Lectern CLI entry point.

use anyhow::Result;
use clap::Parser;
use lectern::cli::commands::{self, ChunkOverrides, RerankFlags};
use lectern::cli::preflight::{self, Operation};
use lectern::cli::{Cli, Commands};
use lectern::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = match &cli.config {
        Some(path) => Settings::expand_path(path),
        None => Settings::default_config_path(),
    };
    let settings = Settings::load_from(Some(config_path.as_path()))?;

    // Initialize logging
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("lectern={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Execute command
    match &cli.command {
        Commands::Parse { file, format, output } => {
            commands::run_parse(file, format, output.as_deref())?;
        }

        Commands::Detect { file } => {
            commands::run_detect(file, &settings)?;
        }

        Commands::Chunk {
            files,
            no_trim,
            min_tokens,
            max_tokens,
            overlap,
            output,
        } => {
            let overrides = ChunkOverrides {
                no_trim: *no_trim,
                min_tokens: *min_tokens,
                max_tokens: *max_tokens,
                overlap: *overlap,
            };
            commands::run_chunk(files, overrides, output.as_deref(), settings)?;
        }

        Commands::Rerank {
            results,
            query,
            limit,
            no_recent,
            no_technical,
            no_titles,
        } => {
            let flags = RerankFlags {
                no_recent: *no_recent,
                no_technical: *no_technical,
                no_titles: *no_titles,
            };
            commands::run_rerank(results, query, *limit, flags, &settings)?;
        }

        Commands::Search {
            query,
            transcripts,
            resources,
            limit,
        } => {
            preflight::check(Operation::Search, &settings)?;
            commands::run_search(query, transcripts, resources.as_deref(), *limit, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings, &config_path)?;
        }
    }

    Ok(())
}
