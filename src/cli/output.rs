//! CLI output formatting utilities.

use crate::chunking::ChunkAnalysis;
use crate::rerank::{RerankStats, RerankedResult};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(msg: &str) {
        println!("  {} {}", style("*").cyan(), msg);
    }

    /// Print chunk quality metrics.
    pub fn chunk_analysis(analysis: &ChunkAnalysis) {
        Output::kv("Chunks", &analysis.chunk_count.to_string());
        Output::kv("Avg tokens", &format!("{:.1}", analysis.avg_tokens));
        Output::kv(
            "Token range",
            &format!("{} - {}", analysis.min_tokens, analysis.max_tokens),
        );
        Output::kv("Overlap ratio", &format!("{:.2}", analysis.overlap_ratio));
        Output::kv("Quality", &format!("{:.2}", analysis.quality_score));
    }

    /// Print one reranked result with its score breakdown.
    pub fn reranked_result(rank: usize, ranked: &RerankedResult) {
        let result = &ranked.result;
        let title = result.metadata.title.as_deref().unwrap_or(&result.id);
        println!(
            "\n{} {}. {} (score: {:.3}, similarity: {:.3})",
            style(">>").green(),
            rank,
            style(title).bold(),
            ranked.final_score,
            ranked.factors.base_similarity
        );
        if let Some(start) = result.metadata.extra.get("start_time").and_then(|v| v.as_str()) {
            println!("   {}", style(format!("@ {}", start)).cyan());
        }
        println!("   {}", content_preview(&result.text, 200));

        let f = &ranked.factors;
        println!(
            "   {}",
            style(format!(
                "recency +{:.3}  metadata +{:.3}  code +{:.3}  type +{:.3}  title +{:.3}",
                f.recency, f.metadata_match, f.code_boost, f.type_relevance, f.title_relevance
            ))
            .dim()
        );
        if let Some(u) = result.metadata.url.as_deref() {
            println!("   {}", style(u).dim());
        }
    }

    /// Print rerank statistics.
    pub fn rerank_stats(stats: &RerankStats) {
        Output::header("Rerank statistics");
        Output::kv("Results", &stats.result_count.to_string());
        Output::kv("Mean score", &format!("{:.3}", stats.mean_score));
        Output::kv(
            "Score range",
            &format!("{:.3} - {:.3}", stats.score_range.0, stats.score_range.1),
        );
        for (kind, total) in &stats.top_factors {
            if *total > 0.0 {
                Output::list_item(&format!("{}: {:.3}", kind, total));
            }
        }
    }

    /// Create a progress bar.
    pub fn progress_bar(len: u64, msg: &str) -> ProgressBar {
        let pb = ProgressBar::new(len);
        if let Ok(bar_style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(bar_style.progress_chars("#>-"));
        }
        pb.set_message(msg.to_string());
        pb
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) =
            ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
        {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Format duration in seconds to a human-readable string.
pub fn format_duration(seconds: f64) -> String {
    let total_seconds = seconds as u32;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, secs)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Truncate content with ellipsis, on a char boundary.
fn content_preview(content: &str, max_chars: usize) -> String {
    let content = content.replace('\n', " ");
    if content.chars().count() <= max_chars {
        content
    } else {
        let cut: String = content.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}
