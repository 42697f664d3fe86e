//! Summary statistics over a chunking result.

use super::Chunk;
use serde::Serialize;

/// Weight of token-count consistency in the quality score; overlap coverage
/// takes the rest.
const CONSISTENCY_WEIGHT: f64 = 0.7;

/// Shape of a chunk list.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChunkAnalysis {
    pub chunk_count: usize,
    pub avg_tokens: f64,
    pub min_tokens: usize,
    pub max_tokens: usize,
    /// Fraction of chunks carrying overlap from their predecessor.
    pub overlap_ratio: f64,
    /// 0..1, higher when chunk sizes are even and overlap is present.
    pub quality_score: f64,
}

/// Analyze a list of chunks.
pub fn analyze_chunks(chunks: &[Chunk]) -> ChunkAnalysis {
    if chunks.is_empty() {
        return ChunkAnalysis::default();
    }

    let n = chunks.len() as f64;
    let counts: Vec<f64> = chunks.iter().map(|c| c.token_count as f64).collect();
    let avg = counts.iter().sum::<f64>() / n;
    let variance = counts.iter().map(|c| (c - avg).powi(2)).sum::<f64>() / n;
    let std_dev = variance.sqrt();

    let consistency = if avg > 0.0 {
        1.0 - (std_dev / avg).min(1.0)
    } else {
        0.0
    };
    let overlap_ratio = chunks.iter().filter(|c| c.metadata.has_overlap).count() as f64 / n;

    ChunkAnalysis {
        chunk_count: chunks.len(),
        avg_tokens: avg,
        min_tokens: chunks.iter().map(|c| c.token_count).min().unwrap_or(0),
        max_tokens: chunks.iter().map(|c| c.token_count).max().unwrap_or(0),
        overlap_ratio,
        quality_score: CONSISTENCY_WEIGHT * consistency
            + (1.0 - CONSISTENCY_WEIGHT) * overlap_ratio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::ChunkMetadata;
    use crate::transcription::Timestamp;

    fn chunk(index: usize, tokens: usize) -> Chunk {
        Chunk {
            text: "x".repeat(tokens * 4),
            start_time: Timestamp::ZERO,
            end_time: Timestamp::from_millis(1_000),
            token_count: tokens,
            metadata: ChunkMetadata {
                chunk_index: index,
                has_overlap: index > 0,
                below_min_tokens: false,
                truncated: false,
            },
        }
    }

    #[test]
    fn test_empty() {
        assert_eq!(analyze_chunks(&[]), ChunkAnalysis::default());
    }

    #[test]
    fn test_uniform_chunks() {
        let chunks: Vec<Chunk> = (0..4).map(|i| chunk(i, 100)).collect();
        let analysis = analyze_chunks(&chunks);

        assert_eq!(analysis.chunk_count, 4);
        assert_eq!(analysis.avg_tokens, 100.0);
        assert_eq!(analysis.min_tokens, 100);
        assert_eq!(analysis.max_tokens, 100);
        assert_eq!(analysis.overlap_ratio, 0.75);
        assert!((analysis.quality_score - (0.7 + 0.3 * 0.75)).abs() < 1e-9);
    }

    #[test]
    fn test_uneven_chunks_score_lower() {
        let even: Vec<Chunk> = (0..4).map(|i| chunk(i, 100)).collect();
        let uneven = vec![chunk(0, 10), chunk(1, 200), chunk(2, 30), chunk(3, 160)];

        let a = analyze_chunks(&even);
        let b = analyze_chunks(&uneven);
        assert!(b.quality_score < a.quality_score);
        assert_eq!(b.min_tokens, 10);
        assert_eq!(b.max_tokens, 200);
    }

    #[test]
    fn test_single_chunk_has_no_overlap() {
        let analysis = analyze_chunks(&[chunk(0, 42)]);
        assert_eq!(analysis.overlap_ratio, 0.0);
        assert!((analysis.quality_score - 0.7).abs() < 1e-9);
    }
}
