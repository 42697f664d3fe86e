//! Detect command implementation.

use super::read_transcript;
use crate::cli::Output;
use crate::config::Settings;
use crate::transcription::{format_timestamp, parse_vtt, LectureStartDetector};
use anyhow::Result;

/// Run the detect command.
pub fn run_detect(file: &str, settings: &Settings) -> Result<()> {
    let (id, raw) = read_transcript(file)?;
    let segments = parse_vtt(&raw)?;

    let detector = LectureStartDetector::new(settings.detection.clone());
    let analysis = detector.analyze(&segments);

    Output::header(&format!("Lecture start: {}", id));
    Output::kv("Segment", &analysis.start_index.to_string());
    Output::kv("Method", &format!("{:?}", analysis.method));
    Output::kv("Confidence", &analysis.confidence.to_string());
    if let Some(keyword) = &analysis.matched_keyword {
        Output::kv("Keyword", keyword);
    }
    Output::kv(
        "Skipped",
        &format!(
            "{} segments ({})",
            analysis.skipped_segments,
            format_timestamp(analysis.skipped_seconds)
        ),
    );

    if let Some(first) = segments.get(analysis.start_index) {
        Output::kv("First line", &first.text);
    }

    Ok(())
}
