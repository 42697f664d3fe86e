//! CLI module for Lectern.

pub mod commands;
mod output;
pub mod preflight;

pub use output::{format_duration, Output};

use clap::{Parser, Subcommand};

/// Lectern - lecture transcript segmentation and hybrid reranking
///
/// Parses WebVTT transcripts, trims pre-lecture chatter, cuts token-bounded
/// chunks for retrieval, and reranks search candidates.
#[derive(Parser, Debug)]
#[command(name = "lectern")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a WebVTT transcript into segments
    Parse {
        /// Transcript file
        file: String,

        /// Output format (json, srt, vtt)
        #[arg(long, default_value = "json")]
        format: String,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Detect where the lecture content begins
    Detect {
        /// Transcript file
        file: String,
    },

    /// Split transcripts into token-bounded chunks
    Chunk {
        /// Transcript files
        #[arg(required = true)]
        files: Vec<String>,

        /// Keep the intro instead of trimming to the lecture start
        #[arg(long)]
        no_trim: bool,

        /// Override the minimum chunk size in tokens
        #[arg(long)]
        min_tokens: Option<usize>,

        /// Override the maximum chunk size in tokens
        #[arg(long)]
        max_tokens: Option<usize>,

        /// Override the overlap in tokens
        #[arg(long)]
        overlap: Option<usize>,

        /// Write chunks as JSON to this file
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Rerank search candidates from a JSON file
    Rerank {
        /// JSON file with an array of search results
        results: String,

        /// The query the candidates were retrieved for
        query: String,

        /// Maximum number of results to show
        #[arg(short, long, default_value = "10")]
        limit: usize,

        /// Disable the recency boost
        #[arg(long)]
        no_recent: bool,

        /// Disable the code-pattern boost
        #[arg(long)]
        no_technical: bool,

        /// Disable title and metadata matching
        #[arg(long)]
        no_titles: bool,
    },

    /// Index transcripts and resources, then search them
    Search {
        /// Search query
        query: String,

        /// Transcript files to index
        #[arg(short, long = "transcript", required = true)]
        transcripts: Vec<String>,

        /// JSON file with an array of external resources
        #[arg(short, long)]
        resources: Option<String>,

        /// Maximum number of results
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "chunking.max_tokens")
        key: String,
        /// Configuration value
        value: String,
    },

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_chunk_args() {
        let cli = Cli::parse_from([
            "lectern", "-v", "chunk", "a.vtt", "b.vtt", "--no-trim", "--max-tokens", "300",
        ]);
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Chunk {
                files,
                no_trim,
                max_tokens,
                min_tokens,
                ..
            } => {
                assert_eq!(files, vec!["a.vtt", "b.vtt"]);
                assert!(no_trim);
                assert_eq!(max_tokens, Some(300));
                assert_eq!(min_tokens, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_search_args() {
        let cli = Cli::parse_from([
            "lectern", "search", "recursion", "-t", "a.vtt", "--transcript", "b.vtt",
        ]);
        match cli.command {
            Commands::Search {
                query,
                transcripts,
                limit,
                resources,
            } => {
                assert_eq!(query, "recursion");
                assert_eq!(transcripts.len(), 2);
                assert_eq!(limit, 5);
                assert!(resources.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
