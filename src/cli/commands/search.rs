//! Search command implementation.

use super::read_transcript;
use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::{ExternalResource, Pipeline, TranscriptSource};
use crate::rerank::rerank_stats;
use anyhow::{Context, Result};

/// Run the search command.
pub async fn run_search(
    query: &str,
    transcripts: &[String],
    resources: Option<&str>,
    limit: usize,
    settings: Settings,
) -> Result<()> {
    let pipeline = Pipeline::with_openai(settings)?;

    let pb = Output::progress_bar(transcripts.len() as u64, "Indexing transcripts");
    for file in transcripts {
        let (id, raw) = read_transcript(file)?;
        pb.set_message(id.clone());
        let result = pipeline
            .ingest_transcript(TranscriptSource::new(id), &raw)
            .await
            .with_context(|| format!("Failed to index {}", file))?;
        pb.println(format!(
            "  {}: {} chunks (quality {:.2})",
            result.source_id, result.chunks_indexed, result.analysis.quality_score
        ));
        pb.inc(1);
    }
    pb.finish_and_clear();

    if let Some(path) = resources {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
        let resources: Vec<ExternalResource> = serde_json::from_str(&content)
            .with_context(|| format!("{} is not a JSON array of resources", path))?;
        let count = resources.len();
        for resource in resources {
            pipeline.ingest_resource(resource).await?;
        }
        Output::info(&format!("Indexed {} external resources", count));
    }

    let spinner = Output::spinner("Searching...");
    let results = pipeline.search(query, limit).await;
    spinner.finish_and_clear();

    match results {
        Ok(results) => {
            if results.is_empty() {
                Output::warning("No results found matching your query.");
            } else {
                Output::success(&format!("Found {} results", results.len()));
                for (i, result) in results.iter().enumerate() {
                    Output::reranked_result(i + 1, result);
                }
                Output::rerank_stats(&rerank_stats(&results));
            }
        }
        Err(e) => {
            Output::error(&format!("Search failed: {}", e));
            return Err(anyhow::anyhow!("{}", e));
        }
    }

    pipeline.close();
    Ok(())
}
