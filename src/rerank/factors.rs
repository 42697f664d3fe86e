//! Scoring dimensions for the hybrid reranker.
//!
//! Every dimension is a [`RankingFactor`]; the reranker only sums what they
//! return. Swapping a heuristic for a learned scorer means swapping one of
//! these objects.

use super::{RerankOptions, RerankWeights, SearchResult};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// The boost dimensions, excluding base similarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    Recency,
    MetadataMatch,
    CodeBoost,
    TypeRelevance,
    TitleRelevance,
}

impl FactorKind {
    pub const ALL: [FactorKind; 5] = [
        FactorKind::Recency,
        FactorKind::MetadataMatch,
        FactorKind::CodeBoost,
        FactorKind::TypeRelevance,
        FactorKind::TitleRelevance,
    ];

    /// Whether the call's toggles allow this dimension.
    pub fn enabled(&self, options: &RerankOptions) -> bool {
        match self {
            FactorKind::Recency => options.boost_recent,
            FactorKind::MetadataMatch | FactorKind::TitleRelevance => options.boost_titles,
            FactorKind::CodeBoost => options.boost_technical,
            FactorKind::TypeRelevance => true,
        }
    }
}

impl std::fmt::Display for FactorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FactorKind::Recency => "recency",
            FactorKind::MetadataMatch => "metadata_match",
            FactorKind::CodeBoost => "code_boost",
            FactorKind::TypeRelevance => "type_relevance",
            FactorKind::TitleRelevance => "title_relevance",
        };
        f.write_str(name)
    }
}

/// Query text pre-processed once per rerank call.
#[derive(Debug, Clone)]
pub struct QueryContext {
    /// Lowercased, trimmed query.
    pub text: String,
    /// Whitespace-separated words, lowercased, edge punctuation removed.
    pub words: Vec<String>,
    /// Alphanumeric terms, for trigger-word lookups.
    pub terms: Vec<String>,
    pub now: DateTime<Utc>,
}

impl QueryContext {
    pub fn new(query: &str, now: DateTime<Utc>) -> Self {
        let text = query.trim().to_lowercase();
        let words = text
            .split_whitespace()
            .map(trim_punctuation)
            .filter(|w| !w.is_empty())
            .map(String::from)
            .collect();
        let terms = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect();
        Self { text, words, terms, now }
    }

    /// Words longer than two characters.
    pub fn significant_words(&self) -> impl Iterator<Item = &str> {
        self.words
            .iter()
            .map(String::as_str)
            .filter(|w| w.chars().count() > 2)
    }

    pub fn has_term(&self, term: &str) -> bool {
        self.terms.iter().any(|t| t == term)
    }
}

/// One scoring dimension.
pub trait RankingFactor: Send + Sync {
    fn kind(&self) -> FactorKind;

    /// Non-negative boost for `result` given the query.
    fn score(&self, result: &SearchResult, ctx: &QueryContext) -> f64;
}

/// The five standard dimensions, configured from `weights`.
pub fn standard_factors(weights: &RerankWeights) -> Vec<Box<dyn RankingFactor>> {
    vec![
        Box::new(RecencyFactor::from_weights(weights)),
        Box::new(MetadataMatchFactor::from_weights(weights)),
        Box::new(CodeBoostFactor::from_weights(weights)),
        Box::new(TypeRelevanceFactor::from_weights(weights)),
        Box::new(TitleRelevanceFactor::from_weights(weights)),
    ]
}

/// Piecewise-linear decay on the creation date.
#[derive(Debug, Clone)]
pub struct RecencyFactor {
    fresh: f64,
    recent: f64,
    floor: f64,
    fresh_days: f64,
    recent_days: f64,
}

impl RecencyFactor {
    pub fn from_weights(w: &RerankWeights) -> Self {
        Self {
            fresh: w.recency_fresh,
            recent: w.recency_recent,
            floor: w.recency_floor,
            fresh_days: w.fresh_days,
            recent_days: w.recent_days,
        }
    }

    /// Boost for an item `age_days` old.
    pub fn boost_for_age(&self, age_days: f64) -> f64 {
        let age = age_days.max(0.0);
        if age <= self.fresh_days {
            self.fresh * (1.0 - age / self.fresh_days)
        } else if age <= self.fresh_days + self.recent_days {
            self.recent * (1.0 - (age - self.fresh_days) / self.recent_days)
        } else {
            self.floor
        }
    }
}

impl RankingFactor for RecencyFactor {
    fn kind(&self) -> FactorKind {
        FactorKind::Recency
    }

    fn score(&self, result: &SearchResult, ctx: &QueryContext) -> f64 {
        let Some(created) = result.metadata.created_at else {
            return 0.0;
        };
        let age_days = (ctx.now - created).num_milliseconds() as f64 / 86_400_000.0;
        self.boost_for_age(age_days)
    }
}

/// Title and author matches against the whole query.
#[derive(Debug, Clone)]
pub struct MetadataMatchFactor {
    exact: f64,
    partial: f64,
    author: f64,
    cap: f64,
}

impl MetadataMatchFactor {
    pub fn from_weights(w: &RerankWeights) -> Self {
        Self {
            exact: w.title_exact,
            partial: w.title_partial,
            author: w.author_match,
            cap: w.metadata_cap,
        }
    }
}

impl RankingFactor for MetadataMatchFactor {
    fn kind(&self) -> FactorKind {
        FactorKind::MetadataMatch
    }

    fn score(&self, result: &SearchResult, ctx: &QueryContext) -> f64 {
        if ctx.text.is_empty() {
            return 0.0;
        }
        let mut score = 0.0;

        if let Some(title) = result.metadata.title.as_deref() {
            let title = title.to_lowercase();
            if title.contains(&ctx.text) {
                score += self.exact;
            }

            let title_words: Vec<&str> = title
                .split_whitespace()
                .map(trim_punctuation)
                .filter(|w| !w.is_empty())
                .collect();
            let query_words: Vec<&str> = ctx.significant_words().collect();
            if !query_words.is_empty() {
                let found = query_words.iter().filter(|q| title_words.contains(*q)).count();
                score += self.partial * found as f64 / query_words.len() as f64;
            }
        }

        if let Some(author) = result.metadata.author.as_deref() {
            let author = author.trim().to_lowercase();
            if !author.is_empty() && (ctx.text.contains(&author) || author.contains(&ctx.text)) {
                score += self.author;
            }
        }

        score.min(self.cap)
    }
}

const TECHNICAL_TRIGGERS: &[&str] = &[
    "code", "coding", "function", "functions", "api", "docker", "implementation", "implement",
    "syntax", "library", "framework", "install", "script", "programming", "sdk", "cli", "class",
    "method", "debug", "error", "example", "snippet", "command", "terminal", "git", "python",
    "javascript", "typescript", "rust", "sql",
];

static CODE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"```",
        r"\bfunction\b",
        r"\bclass\s+\w+",
        r"\bimport\s+[\w{*.]",
        r"\bconst\s+\w+",
        r"\bdef\s+\w+",
        r"\b[\w-]+\.(?:js|ts|jsx|tsx|py|rs|go|java|rb|cpp|c|h|json|ya?ml|toml|sh|sql)\b",
        r"\b(?:npm|pip3?|cargo|yarn|pnpm|gem|brew|apt(?:-get)?)\s+(?:install|add|get|run|build)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("Invalid code pattern"))
    .collect()
});

/// Rewards code-like text, but only for technical queries.
#[derive(Debug, Clone)]
pub struct CodeBoostFactor {
    per_pattern: f64,
    cap: f64,
}

impl CodeBoostFactor {
    pub fn from_weights(w: &RerankWeights) -> Self {
        Self {
            per_pattern: w.code_pattern,
            cap: w.code_cap,
        }
    }

    pub fn is_technical_query(ctx: &QueryContext) -> bool {
        TECHNICAL_TRIGGERS.iter().any(|t| ctx.has_term(t))
    }

    /// Number of distinct code pattern families present in `text`.
    pub fn pattern_families(text: &str) -> usize {
        CODE_PATTERNS.iter().filter(|re| re.is_match(text)).count()
    }
}

impl RankingFactor for CodeBoostFactor {
    fn kind(&self) -> FactorKind {
        FactorKind::CodeBoost
    }

    fn score(&self, result: &SearchResult, ctx: &QueryContext) -> f64 {
        if !Self::is_technical_query(ctx) {
            return 0.0;
        }
        (Self::pattern_families(&result.text) as f64 * self.per_pattern).min(self.cap)
    }
}

/// Known resource categories and the query words that ask for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceCategory {
    Repository,
    Video,
    Article,
    Feed,
}

impl ResourceCategory {
    const ALL: [ResourceCategory; 4] = [
        ResourceCategory::Repository,
        ResourceCategory::Video,
        ResourceCategory::Article,
        ResourceCategory::Feed,
    ];

    fn tags(&self) -> &'static [&'static str] {
        match self {
            ResourceCategory::Repository => {
                &["github", "gitlab", "bitbucket", "repository", "repo"]
            }
            ResourceCategory::Video => &["youtube", "vimeo", "video"],
            ResourceCategory::Article => &["article", "blog", "medium", "post"],
            ResourceCategory::Feed => &["rss", "atom", "feed"],
        }
    }

    fn hosts(&self) -> &'static [&'static str] {
        match self {
            ResourceCategory::Repository => &["github.com", "gitlab.com", "bitbucket.org"],
            ResourceCategory::Video => &["youtube.com", "youtu.be", "vimeo.com"],
            ResourceCategory::Article => &["medium.com", "dev.to", "substack.com", "hashnode.dev"],
            ResourceCategory::Feed => &[],
        }
    }

    fn triggers(&self) -> &'static [&'static str] {
        match self {
            ResourceCategory::Repository => {
                &[
                    "code",
                    "repo",
                    "repository",
                    "github",
                    "source",
                    "implementation",
                    "example",
                    "library",
                ]
            }
            ResourceCategory::Video => &["video", "watch", "tutorial", "demo", "lecture", "talk"],
            ResourceCategory::Article => {
                &["article", "blog", "read", "guide", "post", "explain", "explanation"]
            }
            ResourceCategory::Feed => &["news", "latest", "update", "updates", "recent", "feed"],
        }
    }

    /// Categories indicated by a sub-type tag or URL.
    pub fn detect(resource_type: Option<&str>, url: Option<&str>) -> Vec<ResourceCategory> {
        let tag = resource_type.map(|t| t.to_lowercase());
        let parsed = url.and_then(|u| url::Url::parse(u).ok());
        let host = parsed
            .as_ref()
            .and_then(|u| u.host_str())
            .map(|h| h.trim_start_matches("www.").to_lowercase());
        let path = parsed.as_ref().map(|u| u.path().to_lowercase());

        Self::ALL
            .into_iter()
            .filter(|category| {
                let by_tag = tag
                    .as_deref()
                    .is_some_and(|t| category.tags().iter().any(|k| t.contains(k)));
                let by_host = host.as_deref().is_some_and(|h| {
                    category
                        .hosts()
                        .iter()
                        .any(|known| h == *known || h.ends_with(&format!(".{}", known)))
                });
                let by_path = *category == ResourceCategory::Feed
                    && path.as_deref().is_some_and(|p| {
                        p.contains("/feed")
                            || p.contains("rss")
                            || p.ends_with(".xml")
                            || p.contains("atom")
                    });
                by_tag || by_host || by_path
            })
            .collect()
    }
}

/// Boosts resources whose category the query asks for.
#[derive(Debug, Clone)]
pub struct TypeRelevanceFactor {
    match_boost: f64,
    feed_boost: f64,
    cap: f64,
}

impl TypeRelevanceFactor {
    pub fn from_weights(w: &RerankWeights) -> Self {
        Self {
            match_boost: w.type_match,
            feed_boost: w.feed_type_match,
            cap: w.type_cap,
        }
    }
}

impl RankingFactor for TypeRelevanceFactor {
    fn kind(&self) -> FactorKind {
        FactorKind::TypeRelevance
    }

    fn score(&self, result: &SearchResult, ctx: &QueryContext) -> f64 {
        let categories = ResourceCategory::detect(
            result.metadata.resource_type.as_deref(),
            result.metadata.url.as_deref(),
        );

        let score: f64 = categories
            .into_iter()
            .filter(|c| c.triggers().iter().any(|t| ctx.has_term(t)))
            .map(|c| match c {
                ResourceCategory::Feed => self.feed_boost,
                _ => self.match_boost,
            })
            .sum();
        score.min(self.cap)
    }
}

/// Share of query words that overlap a title word.
#[derive(Debug, Clone)]
pub struct TitleRelevanceFactor {
    max_boost: f64,
}

impl TitleRelevanceFactor {
    pub fn from_weights(w: &RerankWeights) -> Self {
        Self {
            max_boost: w.title_words,
        }
    }
}

impl RankingFactor for TitleRelevanceFactor {
    fn kind(&self) -> FactorKind {
        FactorKind::TitleRelevance
    }

    fn score(&self, result: &SearchResult, ctx: &QueryContext) -> f64 {
        let Some(title) = result.metadata.title.as_deref() else {
            return 0.0;
        };
        let title = title.to_lowercase();
        let title_words: Vec<&str> = title
            .split_whitespace()
            .map(trim_punctuation)
            .filter(|w| !w.is_empty())
            .collect();

        let query_words: Vec<&str> = ctx.significant_words().collect();
        if query_words.is_empty() || title_words.is_empty() {
            return 0.0;
        }

        let matched = query_words
            .iter()
            .filter(|q| title_words.iter().any(|t| t.contains(*q) || q.contains(t)))
            .count();

        self.max_boost * matched as f64 / query_words.len() as f64
    }
}

fn trim_punctuation(word: &str) -> &str {
    word.trim_matches(|c: char| !c.is_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rerank::{ResultKind, ResultMetadata};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
    }

    fn ctx(query: &str) -> QueryContext {
        QueryContext::new(query, now())
    }

    fn result_with(metadata: ResultMetadata, text: &str) -> SearchResult {
        SearchResult::new("id", ResultKind::ExternalResource, text, 0.5).with_metadata(metadata)
    }

    fn weights() -> RerankWeights {
        RerankWeights::default()
    }

    #[test]
    fn test_recency_curve() {
        let f = RecencyFactor::from_weights(&weights());
        assert!((f.boost_for_age(0.0) - 0.10).abs() < 1e-9);
        assert!((f.boost_for_age(15.0) - 0.05).abs() < 1e-9);
        assert!(f.boost_for_age(30.0).abs() < 1e-9);
        assert!((f.boost_for_age(30.001) - 0.05).abs() < 1e-4);
        assert!((f.boost_for_age(60.0) - 0.025).abs() < 1e-9);
        assert!(f.boost_for_age(90.0).abs() < 1e-9);
        assert!((f.boost_for_age(365.0) - 0.01).abs() < 1e-9);
        // Future dates count as brand new.
        assert!((f.boost_for_age(-3.0) - 0.10).abs() < 1e-9);
    }

    #[test]
    fn test_recency_missing_date() {
        let f = RecencyFactor::from_weights(&weights());
        assert_eq!(f.score(&result_with(ResultMetadata::default(), ""), &ctx("q")), 0.0);

        let dated = ResultMetadata {
            created_at: Some(now() - Duration::days(15)),
            ..ResultMetadata::default()
        };
        assert!((f.score(&result_with(dated, ""), &ctx("q")) - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_metadata_match() {
        let f = MetadataMatchFactor::from_weights(&weights());
        let meta = ResultMetadata {
            title: Some("Intro to Graph Algorithms".to_string()),
            author: Some("Prof. Okafor".to_string()),
            ..ResultMetadata::default()
        };
        let r = result_with(meta, "");

        // Exact phrase plus every word present: capped.
        assert!((f.score(&r, &ctx("graph algorithms")) - 0.15).abs() < 1e-9);
        // Half the significant words.
        assert!((f.score(&r, &ctx("graph theory")) - 0.025).abs() < 1e-9);
        // Author named in the query.
        assert!((f.score(&r, &ctx("what did prof. okafor say")) - 0.05).abs() < 1e-9);
        assert_eq!(f.score(&r, &ctx("")), 0.0);
    }

    #[test]
    fn test_code_boost_requires_technical_query() {
        let f = CodeBoostFactor::from_weights(&weights());
        let r = result_with(
            ResultMetadata::default(),
            "Run `pip install requests` then def fetch(url): and import json",
        );

        assert_eq!(f.score(&r, &ctx("history of the printing press")), 0.0);
        // pip install, def, import
        assert!((f.score(&r, &ctx("python example")) - 0.03).abs() < 1e-9);
        // "rapid" must not trigger on "api".
        assert_eq!(f.score(&r, &ctx("rapid prototyping")), 0.0);
    }

    #[test]
    fn test_code_boost_cap() {
        let f = CodeBoostFactor::from_weights(&weights());
        let text = concat!(
            "```js\nfunction a() {}\n``` class B {} import c from 'd'; ",
            "const e = 1; def f(): app.py cargo add serde",
        );
        assert_eq!(CodeBoostFactor::pattern_families(text), 8);
        let score = f.score(&result_with(ResultMetadata::default(), text), &ctx("code"));
        assert!((score - 0.08).abs() < 1e-9);
    }

    #[test]
    fn test_resource_category_detection() {
        assert_eq!(
            ResourceCategory::detect(None, Some("https://www.github.com/rust-lang/rust")),
            vec![ResourceCategory::Repository]
        );
        assert_eq!(
            ResourceCategory::detect(Some("YouTube"), None),
            vec![ResourceCategory::Video]
        );
        assert_eq!(
            ResourceCategory::detect(None, Some("https://blog.example.com/feed.xml")),
            vec![ResourceCategory::Feed]
        );
        assert!(ResourceCategory::detect(None, Some("not a url")).is_empty());
    }

    #[test]
    fn test_type_relevance() {
        let f = TypeRelevanceFactor::from_weights(&weights());
        let video = result_with(
            ResultMetadata {
                url: Some("https://youtu.be/xyz".to_string()),
                ..ResultMetadata::default()
            },
            "",
        );
        assert!((f.score(&video, &ctx("sorting video")) - 0.06).abs() < 1e-9);
        assert_eq!(f.score(&video, &ctx("sorting")), 0.0);

        let feed = result_with(
            ResultMetadata {
                resource_type: Some("rss".to_string()),
                ..ResultMetadata::default()
            },
            "",
        );
        assert!((f.score(&feed, &ctx("latest compiler news")) - 0.04).abs() < 1e-9);

        let both = result_with(
            ResultMetadata {
                resource_type: Some("github".to_string()),
                url: Some("https://www.youtube.com/watch?v=1".to_string()),
                ..ResultMetadata::default()
            },
            "",
        );
        assert!((f.score(&both, &ctx("code walkthrough video")) - 0.12).abs() < 1e-9);
    }

    #[test]
    fn test_title_relevance() {
        let f = TitleRelevanceFactor::from_weights(&weights());
        let r = result_with(
            ResultMetadata {
                title: Some("Hashing and Hashtables".to_string()),
                ..ResultMetadata::default()
            },
            "",
        );

        // "hash" is inside "hashing"; "maps" neither contains nor is inside a title word.
        assert!((f.score(&r, &ctx("hash maps")) - 0.05).abs() < 1e-9);
        assert!((f.score(&r, &ctx("hash tables")) - 0.10).abs() < 1e-9);
        // Short words are ignored entirely.
        assert_eq!(f.score(&r, &ctx("a an")), 0.0);
        assert!((f.score(&r, &ctx("hashtables")) - 0.10).abs() < 1e-9);
    }

    #[test]
    fn test_title_relevance_matches_short_title_words() {
        let f = TitleRelevanceFactor::from_weights(&weights());
        let r = result_with(
            ResultMetadata {
                title: Some("Go: An Intro".to_string()),
                ..ResultMetadata::default()
            },
            "",
        );

        // "golang" contains the title word "go", "handbook" contains "an".
        assert!((f.score(&r, &ctx("golang handbook")) - 0.10).abs() < 1e-9);
        assert!((f.score(&r, &ctx("golang basics")) - 0.05).abs() < 1e-9);
    }

    #[test]
    fn test_toggle_mapping() {
        let off = RerankOptions {
            boost_recent: false,
            boost_technical: false,
            boost_titles: false,
        };
        let enabled: Vec<FactorKind> =
            FactorKind::ALL.into_iter().filter(|k| k.enabled(&off)).collect();
        assert_eq!(enabled, vec![FactorKind::TypeRelevance]);
    }
}
