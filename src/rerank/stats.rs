//! Observability summary over a reranked result set.

use super::{FactorKind, RerankedResult};
use serde::Serialize;

/// Aggregate view of a rerank call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RerankStats {
    pub result_count: usize,
    pub mean_score: f64,
    /// (min, max) final score.
    pub score_range: (f64, f64),
    /// Boost dimensions ordered by summed contribution, largest first.
    pub top_factors: Vec<(FactorKind, f64)>,
}

/// Summarize reranked results.
pub fn rerank_stats(results: &[RerankedResult]) -> RerankStats {
    let mut top_factors: Vec<(FactorKind, f64)> = FactorKind::ALL
        .into_iter()
        .map(|kind| (kind, results.iter().map(|r| r.factors.get(kind)).sum()))
        .collect();
    top_factors.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    if results.is_empty() {
        return RerankStats {
            result_count: 0,
            mean_score: 0.0,
            score_range: (0.0, 0.0),
            top_factors,
        };
    }

    let scores = results.iter().map(|r| r.final_score);
    let min = scores.clone().fold(f64::INFINITY, f64::min);
    let max = scores.clone().fold(f64::NEG_INFINITY, f64::max);
    let mean = scores.sum::<f64>() / results.len() as f64;

    RerankStats {
        result_count: results.len(),
        mean_score: mean,
        score_range: (min, max),
        top_factors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rerank::{RankingFactors, ResultKind, SearchResult};

    fn reranked(score: f64, factors: RankingFactors) -> RerankedResult {
        RerankedResult {
            result: SearchResult::new("x", ResultKind::PrimaryTranscript, "t", score),
            final_score: score,
            factors,
        }
    }

    #[test]
    fn test_empty_stats() {
        let stats = rerank_stats(&[]);
        assert_eq!(stats.result_count, 0);
        assert_eq!(stats.mean_score, 0.0);
        assert_eq!(stats.score_range, (0.0, 0.0));
        assert_eq!(stats.top_factors.len(), 5);
        assert!(stats.top_factors.iter().all(|(_, v)| *v == 0.0));
    }

    #[test]
    fn test_mean_range_and_factor_order() {
        let results = vec![
            reranked(
                0.9,
                RankingFactors {
                    recency: 0.02,
                    title_relevance: 0.1,
                    ..RankingFactors::default()
                },
            ),
            reranked(
                0.5,
                RankingFactors {
                    recency: 0.03,
                    code_boost: 0.04,
                    title_relevance: 0.05,
                    ..RankingFactors::default()
                },
            ),
        ];

        let stats = rerank_stats(&results);
        assert_eq!(stats.result_count, 2);
        assert!((stats.mean_score - 0.7).abs() < 1e-9);
        assert_eq!(stats.score_range, (0.5, 0.9));

        let order: Vec<FactorKind> = stats.top_factors.iter().map(|(k, _)| *k).collect();
        assert_eq!(order[0], FactorKind::TitleRelevance);
        assert_eq!(order[1], FactorKind::Recency);
        assert_eq!(order[2], FactorKind::CodeBoost);
        assert!((stats.top_factors[0].1 - 0.15).abs() < 1e-9);
    }
}
