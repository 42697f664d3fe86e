//! Chunk command implementation.

use super::{read_transcript, write_output};
use crate::chunking::{analyze_chunks, Chunk, ChunkAnalysis, SemanticChunker};
use crate::cli::Output;
use crate::config::Settings;
use crate::transcription::{parse_vtt, LectureStartAnalysis, LectureStartDetector};
use anyhow::{Context, Result};
use serde::Serialize;
use tracing::warn;

/// Chunking result for one transcript file.
#[derive(Debug, Serialize)]
pub struct ChunkedTranscript {
    pub source_id: String,
    pub lecture_start: Option<LectureStartAnalysis>,
    pub analysis: ChunkAnalysis,
    pub chunks: Vec<Chunk>,
}

/// Overrides from the command line.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChunkOverrides {
    pub no_trim: bool,
    pub min_tokens: Option<usize>,
    pub max_tokens: Option<usize>,
    pub overlap: Option<usize>,
}

/// Run the chunk command.
pub fn run_chunk(
    files: &[String],
    overrides: ChunkOverrides,
    output: Option<&str>,
    mut settings: Settings,
) -> Result<()> {
    if let Some(min) = overrides.min_tokens {
        settings.chunking.min_tokens = min;
    }
    if let Some(max) = overrides.max_tokens {
        settings.chunking.max_tokens = max;
    }
    if let Some(overlap) = overrides.overlap {
        settings.chunking.overlap = overlap;
    }
    let trim = settings.chunking.trim_intro && !overrides.no_trim;

    let chunker = SemanticChunker::new(settings.chunking.to_config())?;
    let detector = LectureStartDetector::new(settings.detection.clone());

    let progress = (files.len() > 1).then(|| Output::progress_bar(files.len() as u64, "Chunking"));

    let mut results = Vec::with_capacity(files.len());
    for file in files {
        if let Some(pb) = &progress {
            pb.set_message(file.clone());
        }

        let (source_id, raw) = read_transcript(file)?;
        let segments = parse_vtt(&raw).with_context(|| format!("Failed to parse {}", file))?;

        let (lecture_start, start) = if trim {
            let analysis = detector.analyze(&segments);
            let start = analysis.start_index;
            (Some(analysis), start)
        } else {
            (None, 0)
        };

        let chunks = chunker.chunk(&segments[start..]);
        if chunks.is_empty() {
            warn!("{} produced no chunks", file);
        }
        let analysis = analyze_chunks(&chunks);

        results.push(ChunkedTranscript {
            source_id,
            lecture_start,
            analysis,
            chunks,
        });

        if let Some(pb) = &progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    for result in &results {
        Output::header(&result.source_id);
        if let Some(start) = &result.lecture_start {
            Output::kv(
                "Lecture start",
                &format!("segment {} ({})", start.start_index, start.confidence),
            );
        }
        Output::chunk_analysis(&result.analysis);
    }

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&results)?;
        write_output(Some(path), &json)?;
        if path != "-" {
            Output::success(&format!("Wrote chunks to {}", path));
        }
    }

    Ok(())
}
