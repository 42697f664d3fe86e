//! Lecture-start detection.
//!
//! Finds the first segment of substantive content so intros, music and
//! housekeeping can be trimmed before chunking. Detection never fails; without
//! a confident signal the whole transcript is used.

use super::Segment;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Tunables for lecture-start detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Opening phrases that mark the start of content (matched lowercase).
    pub keywords: Vec<String>,
    /// How many leading segments the keyword tier inspects.
    pub keyword_scan_limit: usize,
    /// A keyword segment must be longer than this (characters).
    pub min_keyword_text_len: usize,
    /// The time fallback only considers segments starting after this offset.
    pub fallback_after_seconds: f64,
    /// A fallback segment must be longer than this (characters).
    pub fallback_min_text_len: usize,
    /// Fallback matches starting before this offset get medium confidence.
    pub medium_confidence_limit_seconds: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            keywords: [
                "today",
                "let's start",
                "let's begin",
                "let's get started",
                "let's dive",
                "welcome to",
                "in this lecture",
                "in this video",
                "in this session",
                "in this course",
                "agenda",
                "first topic",
                "we're going to",
                "we are going to",
                "we'll cover",
                "we will cover",
                "our topic",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            keyword_scan_limit: 20,
            min_keyword_text_len: 20,
            fallback_after_seconds: 600.0,
            fallback_min_text_len: 50,
            medium_confidence_limit_seconds: 900.0,
        }
    }
}

/// How the start index was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    Keyword,
    TimeFallback,
    Default,
}

/// Confidence in the detected start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::High => write!(f, "high"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::Low => write!(f, "low"),
        }
    }
}

/// Detailed result of lecture-start detection.
#[derive(Debug, Clone, Serialize)]
pub struct LectureStartAnalysis {
    pub start_index: usize,
    pub method: DetectionMethod,
    pub confidence: Confidence,
    /// The phrase that triggered a keyword match.
    pub matched_keyword: Option<String>,
    /// Number of segments before the detected start.
    pub skipped_segments: usize,
    /// Offset of the detected start, in seconds.
    pub skipped_seconds: f64,
}

/// Keyword-then-time lecture-start detector.
#[derive(Debug, Clone, Default)]
pub struct LectureStartDetector {
    config: DetectionConfig,
}

impl LectureStartDetector {
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Index of the first segment of substantive content (0 when unsure).
    pub fn find_start(&self, segments: &[Segment]) -> usize {
        self.detect(segments).map(|(index, _, _)| index).unwrap_or(0)
    }

    /// Detect the start and classify how confident the match is.
    pub fn analyze(&self, segments: &[Segment]) -> LectureStartAnalysis {
        let Some((index, method, keyword)) = self.detect(segments) else {
            return LectureStartAnalysis {
                start_index: 0,
                method: DetectionMethod::Default,
                confidence: Confidence::Low,
                matched_keyword: None,
                skipped_segments: 0,
                skipped_seconds: 0.0,
            };
        };

        let start_seconds = segments[index].start_seconds();
        let confidence = match method {
            DetectionMethod::Keyword => Confidence::High,
            DetectionMethod::TimeFallback
                if start_seconds < self.config.medium_confidence_limit_seconds =>
            {
                Confidence::Medium
            }
            _ => Confidence::Low,
        };

        LectureStartAnalysis {
            start_index: index,
            method,
            confidence,
            matched_keyword: keyword,
            skipped_segments: index,
            skipped_seconds: start_seconds,
        }
    }

    fn detect(&self, segments: &[Segment]) -> Option<(usize, DetectionMethod, Option<String>)> {
        if let Some((index, keyword)) = self.keyword_match(segments) {
            debug!("Lecture start at segment {} (keyword {:?})", index, keyword);
            return Some((index, DetectionMethod::Keyword, Some(keyword)));
        }

        let index = segments.iter().position(|s| {
            s.start_seconds() > self.config.fallback_after_seconds
                && s.text.chars().count() > self.config.fallback_min_text_len
        })?;
        debug!("Lecture start at segment {} (time fallback)", index);
        Some((index, DetectionMethod::TimeFallback, None))
    }

    fn keyword_match(&self, segments: &[Segment]) -> Option<(usize, String)> {
        segments
            .iter()
            .take(self.config.keyword_scan_limit)
            .enumerate()
            .find_map(|(i, s)| {
                if s.text.chars().count() <= self.config.min_keyword_text_len {
                    return None;
                }
                let lower = s.text.to_lowercase();
                self.config
                    .keywords
                    .iter()
                    .find(|k| lower.contains(k.to_lowercase().as_str()))
                    .map(|k| (i, k.clone()))
            })
    }
}

/// Find the lecture start with the default configuration.
pub fn find_lecture_start(segments: &[Segment]) -> usize {
    LectureStartDetector::default().find_start(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcription::Timestamp;

    fn seg(index: usize, start: f64, text: &str) -> Segment {
        Segment::new(
            index,
            Timestamp::from_seconds(start),
            Timestamp::from_seconds(start + 5.0),
            text,
        )
    }

    #[test]
    fn test_keyword_tier_wins() {
        let segments = vec![
            seg(0, 0.0, "[music]"),
            seg(1, 5.0, "Hi everyone"),
            seg(2, 10.0, "Today we are going to look at binary search trees"),
            seg(
                3,
                700.0,
                "A long segment well past ten minutes that has plenty of characters in it",
            ),
        ];
        let detector = LectureStartDetector::default();
        assert_eq!(detector.find_start(&segments), 2);

        let analysis = detector.analyze(&segments);
        assert_eq!(analysis.method, DetectionMethod::Keyword);
        assert_eq!(analysis.confidence, Confidence::High);
        assert_eq!(analysis.matched_keyword.as_deref(), Some("today"));
        assert_eq!(analysis.skipped_segments, 2);
    }

    #[test]
    fn test_short_greeting_rejected() {
        // "welcome to class" has the phrase but is too short.
        let segments = vec![seg(0, 0.0, "Welcome to class"), seg(1, 5.0, "ok")];
        assert_eq!(find_lecture_start(&segments), 0);
    }

    #[test]
    fn test_keyword_scan_is_limited() {
        let mut segments: Vec<Segment> =
            (0..20).map(|i| seg(i, i as f64, "filler chatter")).collect();
        segments.push(seg(20, 20.0, "Let's start with the first theorem of the day"));
        assert_eq!(find_lecture_start(&segments), 0);
    }

    #[test]
    fn test_time_fallback() {
        let text = "x".repeat(60);
        let segments = vec![
            seg(0, 0.0, "music"),
            seg(1, 300.0, &"y".repeat(80)),
            seg(2, 650.0, &text),
        ];
        let detector = LectureStartDetector::default();
        assert_eq!(detector.find_start(&segments), 2);

        let analysis = detector.analyze(&segments);
        assert_eq!(analysis.method, DetectionMethod::TimeFallback);
        assert_eq!(analysis.confidence, Confidence::Medium);
        assert_eq!(analysis.skipped_seconds, 650.0);
    }

    #[test]
    fn test_late_fallback_is_low_confidence() {
        let segments = vec![seg(0, 0.0, "intro"), seg(1, 1_000.0, &"z".repeat(55))];
        let analysis = LectureStartDetector::default().analyze(&segments);
        assert_eq!(analysis.start_index, 1);
        assert_eq!(analysis.confidence, Confidence::Low);
    }

    #[test]
    fn test_default_when_nothing_matches() {
        assert_eq!(find_lecture_start(&[]), 0);

        let segments = vec![seg(0, 0.0, "short"), seg(1, 700.0, "still short")];
        let analysis = LectureStartDetector::default().analyze(&segments);
        assert_eq!(analysis.start_index, 0);
        assert_eq!(analysis.method, DetectionMethod::Default);
        assert_eq!(analysis.confidence, Confidence::Low);
    }

    #[test]
    fn test_custom_keywords() {
        let config = DetectionConfig {
            keywords: vec!["lemma".to_string()],
            ..DetectionConfig::default()
        };
        let segments = vec![
            seg(0, 0.0, "Today is a lovely day, is it not?"),
            seg(1, 5.0, "The first lemma concerns compactness"),
        ];
        assert_eq!(LectureStartDetector::new(config).find_start(&segments), 1);
    }
}
