//! Rerank command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::rerank::{rerank_stats, Reranker, SearchResult};
use anyhow::{Context, Result};

/// Toggle overrides from the command line.
#[derive(Debug, Default, Clone, Copy)]
pub struct RerankFlags {
    pub no_recent: bool,
    pub no_technical: bool,
    pub no_titles: bool,
}

/// Run the rerank command.
pub fn run_rerank(
    results_path: &str,
    query: &str,
    limit: usize,
    flags: RerankFlags,
    settings: &Settings,
) -> Result<()> {
    let content = std::fs::read_to_string(results_path)
        .with_context(|| format!("Failed to read {}", results_path))?;
    let candidates: Vec<SearchResult> = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a JSON array of search results", results_path))?;

    let mut options = settings.rerank.options();
    options.boost_recent &= !flags.no_recent;
    options.boost_technical &= !flags.no_technical;
    options.boost_titles &= !flags.no_titles;

    let reranker = Reranker::new(settings.rerank.weights.clone(), options);
    let mut ranked = reranker.rerank(candidates, query);
    let stats = rerank_stats(&ranked);
    ranked.truncate(limit);

    if ranked.is_empty() {
        Output::warning("No candidates to rerank.");
        return Ok(());
    }

    for (i, result) in ranked.iter().enumerate() {
        Output::reranked_result(i + 1, result);
    }
    Output::rerank_stats(&stats);

    Ok(())
}
