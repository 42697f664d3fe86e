//! Segment output formatting (JSON, SRT, VTT).
//!
//! The VTT writer produces text that [`parse_vtt`](super::parse_vtt) reads back
//! into the same segments.

use super::{Segment, Timestamp};
use serde::Serialize;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Json,
    Srt,
    Vtt,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "srt" => Ok(OutputFormat::Srt),
            "vtt" | "webvtt" => Ok(OutputFormat::Vtt),
            _ => Err(format!("Unknown format: {}. Use json, srt, or vtt.", s)),
        }
    }
}

/// JSON-serializable segment list for export.
#[derive(Debug, Serialize)]
pub struct SegmentsExport<'a> {
    pub segment_count: usize,
    pub duration_seconds: f64,
    pub segments: &'a [Segment],
}

/// Format segments for output.
pub fn format_segments(segments: &[Segment], format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => format_json(segments),
        OutputFormat::Srt => format_srt(segments),
        OutputFormat::Vtt => format_vtt(segments),
    }
}

fn format_json(segments: &[Segment]) -> String {
    let export = SegmentsExport {
        segment_count: segments.len(),
        duration_seconds: segments.last().map(|s| s.end_seconds()).unwrap_or(0.0),
        segments,
    };
    serde_json::to_string_pretty(&export).unwrap_or_else(|_| "{}".to_string())
}

/// Format as SRT (SubRip).
fn format_srt(segments: &[Segment]) -> String {
    let mut output = String::new();

    for (i, segment) in segments.iter().enumerate() {
        output.push_str(&format!("{}\n", i + 1));
        output.push_str(&format!(
            "{} --> {}\n",
            format_srt_timestamp(segment.start_time),
            format_srt_timestamp(segment.end_time)
        ));
        output.push_str(&segment.text);
        output.push_str("\n\n");
    }

    output
}

/// Format as WebVTT.
fn format_vtt(segments: &[Segment]) -> String {
    let mut output = String::from("WEBVTT\n\n");

    for (i, segment) in segments.iter().enumerate() {
        output.push_str(&format!("{}\n", i + 1));
        output.push_str(&format!("{} --> {}\n", segment.start_time, segment.end_time));
        output.push_str(&segment.text);
        output.push_str("\n\n");
    }

    output
}

/// SRT uses a comma before the milliseconds.
fn format_srt_timestamp(ts: Timestamp) -> String {
    ts.to_string().replacen('.', ",", 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcription::parse_vtt;

    fn sample_segments() -> Vec<Segment> {
        vec![
            Segment::new(
                0,
                Timestamp::from_millis(0),
                Timestamp::from_millis(3_000),
                "Hello world",
            ),
            Segment::new(
                1,
                Timestamp::from_millis(3_000),
                Timestamp::from_millis(6_000),
                "This is a test",
            ),
        ]
    }

    #[test]
    fn test_format_json() {
        let json = format_segments(&sample_segments(), OutputFormat::Json);
        assert!(json.contains("\"segment_count\": 2"));
        assert!(json.contains("\"start_time\": \"00:00:03.000\""));
    }

    #[test]
    fn test_format_srt() {
        let srt = format_segments(&sample_segments(), OutputFormat::Srt);
        assert!(srt.contains("1\n00:00:00,000 --> 00:00:03,000"));
        assert!(srt.contains("Hello world"));
    }

    #[test]
    fn test_vtt_reparses_to_same_segments() {
        let original = sample_segments();
        let vtt = format_segments(&original, OutputFormat::Vtt);
        assert!(vtt.starts_with("WEBVTT"));

        let reparsed = parse_vtt(&vtt).unwrap();
        assert_eq!(reparsed, original);

        let again = parse_vtt(&format_segments(&reparsed, OutputFormat::Vtt)).unwrap();
        assert_eq!(again, original);
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("srt".parse::<OutputFormat>().unwrap(), OutputFormat::Srt);
        assert_eq!("webvtt".parse::<OutputFormat>().unwrap(), OutputFormat::Vtt);
        assert!("docx".parse::<OutputFormat>().is_err());
    }
}
