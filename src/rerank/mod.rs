//! Hybrid reranking of vector-search candidates.
//!
//! Each candidate starts from its embedding similarity and picks up small,
//! bounded boosts from recency, title and author matches, code content and
//! resource type. The result is deterministic and every contribution is
//! reported in [`RankingFactors`].
//!
//! # Example
//!
//! ```rust
//! use lectern::rerank::{rerank_results, RerankOptions, ResultKind, SearchResult};
//!
//! let candidates = vec![
//!     SearchResult::new("a", ResultKind::PrimaryTranscript, "Binary trees recap", 0.71),
//!     SearchResult::new("b", ResultKind::ExternalResource, "Heap allocation notes", 0.74),
//! ];
//! let ranked = rerank_results(candidates, "binary trees", RerankOptions::default());
//! assert_eq!(ranked.len(), 2);
//! assert!(ranked.iter().all(|r| (0.0..=1.0).contains(&r.final_score)));
//! ```

pub mod factors;
pub mod stats;

pub use factors::{FactorKind, QueryContext, RankingFactor};
pub use stats::{rerank_stats, RerankStats};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Where a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResultKind {
    PrimaryTranscript,
    ExternalResource,
}

impl std::fmt::Display for ResultKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultKind::PrimaryTranscript => write!(f, "primary-transcript"),
            ResultKind::ExternalResource => write!(f, "external-resource"),
        }
    }
}

/// Metadata stored alongside a candidate at ingestion time. Every field is
/// optional; unknown keys are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Authoring entity (instructor, channel, publisher).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Sub-type tag such as `github`, `youtube`, `article` or `rss`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A candidate returned by vector search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ResultKind,
    pub text: String,
    /// Embedding similarity in 0..1.
    pub similarity: f64,
    #[serde(default)]
    pub metadata: ResultMetadata,
}

impl SearchResult {
    pub fn new(
        id: impl Into<String>,
        kind: ResultKind,
        text: impl Into<String>,
        similarity: f64,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            text: text.into(),
            similarity,
            metadata: ResultMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: ResultMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Per-dimension contributions to a final score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingFactors {
    pub base_similarity: f64,
    pub recency: f64,
    pub metadata_match: f64,
    pub code_boost: f64,
    pub type_relevance: f64,
    pub title_relevance: f64,
}

impl RankingFactors {
    /// Contribution of a single boost dimension.
    pub fn get(&self, kind: FactorKind) -> f64 {
        match kind {
            FactorKind::Recency => self.recency,
            FactorKind::MetadataMatch => self.metadata_match,
            FactorKind::CodeBoost => self.code_boost,
            FactorKind::TypeRelevance => self.type_relevance,
            FactorKind::TitleRelevance => self.title_relevance,
        }
    }

    fn set(&mut self, kind: FactorKind, value: f64) {
        match kind {
            FactorKind::Recency => self.recency = value,
            FactorKind::MetadataMatch => self.metadata_match = value,
            FactorKind::CodeBoost => self.code_boost = value,
            FactorKind::TypeRelevance => self.type_relevance = value,
            FactorKind::TitleRelevance => self.title_relevance = value,
        }
    }

    /// Sum of all boosts, excluding the base similarity.
    pub fn total_boost(&self) -> f64 {
        FactorKind::ALL.iter().map(|k| self.get(*k)).sum()
    }
}

/// A candidate with its composite score.
#[derive(Debug, Clone, Serialize)]
pub struct RerankedResult {
    #[serde(flatten)]
    pub result: SearchResult,
    /// Composite score, clamped to 0..1.
    pub final_score: f64,
    pub factors: RankingFactors,
}

/// Feature toggles for a rerank call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RerankOptions {
    pub boost_recent: bool,
    pub boost_technical: bool,
    pub boost_titles: bool,
}

impl Default for RerankOptions {
    fn default() -> Self {
        Self {
            boost_recent: true,
            boost_technical: true,
            boost_titles: true,
        }
    }
}

/// Caps and step sizes for every boost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RerankWeights {
    /// Boost for a brand-new item, decaying to zero over `fresh_days`.
    pub recency_fresh: f64,
    /// Boost at the start of the second window, decaying over `recent_days`.
    pub recency_recent: f64,
    /// Flat boost for anything older.
    pub recency_floor: f64,
    pub fresh_days: f64,
    pub recent_days: f64,

    pub title_exact: f64,
    pub title_partial: f64,
    pub author_match: f64,
    pub metadata_cap: f64,

    pub code_pattern: f64,
    pub code_cap: f64,

    pub type_match: f64,
    pub feed_type_match: f64,
    pub type_cap: f64,

    pub title_words: f64,
}

impl Default for RerankWeights {
    fn default() -> Self {
        Self {
            recency_fresh: 0.10,
            recency_recent: 0.05,
            recency_floor: 0.01,
            fresh_days: 30.0,
            recent_days: 60.0,
            title_exact: 0.10,
            title_partial: 0.05,
            author_match: 0.05,
            metadata_cap: 0.15,
            code_pattern: 0.01,
            code_cap: 0.08,
            type_match: 0.06,
            feed_type_match: 0.04,
            type_cap: 0.12,
            title_words: 0.10,
        }
    }
}

/// Weighted-sum reranker over a set of [`RankingFactor`] strategies.
pub struct Reranker {
    factors: Vec<Box<dyn RankingFactor>>,
    options: RerankOptions,
}

impl Reranker {
    /// Build a reranker with the standard factor set.
    pub fn new(weights: RerankWeights, options: RerankOptions) -> Self {
        Self {
            factors: factors::standard_factors(&weights),
            options,
        }
    }

    /// Build a reranker from an explicit factor list.
    pub fn with_factors(factors: Vec<Box<dyn RankingFactor>>, options: RerankOptions) -> Self {
        Self { factors, options }
    }

    pub fn options(&self) -> RerankOptions {
        self.options
    }

    /// Rerank candidates against `query` using the current time.
    pub fn rerank(&self, results: Vec<SearchResult>, query: &str) -> Vec<RerankedResult> {
        self.rerank_at(results, query, Utc::now())
    }

    /// Rerank candidates as of `now`.
    ///
    /// The output is sorted by descending `final_score`. The sort is stable, so
    /// exact ties keep their input order.
    #[instrument(skip(self, results, query), fields(candidates = results.len()))]
    pub fn rerank_at(
        &self,
        results: Vec<SearchResult>,
        query: &str,
        now: DateTime<Utc>,
    ) -> Vec<RerankedResult> {
        if results.is_empty() {
            return Vec::new();
        }

        let ctx = QueryContext::new(query, now);
        let mut ranked: Vec<RerankedResult> = results
            .into_iter()
            .map(|result| self.score(result, &ctx))
            .collect();

        ranked.sort_by(|a, b| {
            b.final_score
                .partial_cmp(&a.final_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        debug!(
            "Reranked {} candidates (top score {:.3})",
            ranked.len(),
            ranked.first().map(|r| r.final_score).unwrap_or(0.0)
        );
        ranked
    }

    fn score(&self, result: SearchResult, ctx: &QueryContext) -> RerankedResult {
        let base = if result.similarity.is_finite() {
            result.similarity.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let mut factors = RankingFactors {
            base_similarity: base,
            ..RankingFactors::default()
        };

        for factor in &self.factors {
            if !factor.kind().enabled(&self.options) {
                continue;
            }
            let value = factor.score(&result, ctx).max(0.0);
            factors.set(factor.kind(), factors.get(factor.kind()) + value);
        }

        let final_score = (base + factors.total_boost()).clamp(0.0, 1.0);
        RerankedResult {
            result,
            final_score,
            factors,
        }
    }
}

impl Default for Reranker {
    fn default() -> Self {
        Self::new(RerankWeights::default(), RerankOptions::default())
    }
}

/// Rerank with the default weights.
pub fn rerank_results(
    results: Vec<SearchResult>,
    query: &str,
    options: RerankOptions,
) -> Vec<RerankedResult> {
    Reranker::new(RerankWeights::default(), options).rerank(results, query)
}
