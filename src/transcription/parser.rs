//! WebVTT caption-track parser.
//!
//! Turns raw caption text into an ordered list of [`Segment`]s. Damaged cue
//! timing lines are skipped instead of failing the whole transcript.

use super::timestamp::parse_time_range;
use super::Segment;
use crate::error::{LecternError, Result};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, instrument, warn};

const HEADER_TOKEN: &str = "WEBVTT";

// Voice spans, class spans and inline karaoke timestamps.
static MARKUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid markup regex"));

/// Parse WebVTT text into segments.
///
/// Fails only when the input is empty. A header-only file yields no segments.
#[instrument(skip(raw), fields(bytes = raw.len()))]
pub fn parse_vtt(raw: &str) -> Result<Vec<Segment>> {
    if raw.trim().is_empty() {
        return Err(LecternError::Parse("transcript input is empty".to_string()));
    }

    let lines: Vec<&str> = raw.lines().collect();
    let mut segments: Vec<Segment> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = clean_line(lines[i]);
        i += 1;

        if line.is_empty() || is_header(line) || is_sequence_number(line) {
            continue;
        }

        let Some((start, end)) = parse_time_range(line) else {
            if line.contains("-->") {
                warn!("Skipping malformed cue timing line {}: {:?}", i, line);
            }
            // Cue identifiers, NOTE/STYLE blocks, stray text outside a cue.
            continue;
        };

        let mut parts: Vec<&str> = Vec::new();
        while i < lines.len() {
            let next = clean_line(lines[i]);
            if next.is_empty() || is_sequence_number(next) || parse_time_range(next).is_some() {
                break;
            }
            parts.push(next);
            i += 1;
        }

        let text = normalize_text(&parts.join(" "));
        if text.is_empty() {
            debug!("Dropping empty cue at {}", start);
            continue;
        }
        if end <= start {
            debug!("Dropping cue with non-positive duration at {}", start);
            continue;
        }

        segments.push(Segment::new(segments.len(), start, end, text));
    }

    debug!("Parsed {} segments", segments.len());
    Ok(segments)
}

fn clean_line(line: &str) -> &str {
    line.trim_start_matches('\u{feff}').trim()
}

fn is_header(line: &str) -> bool {
    line == HEADER_TOKEN
        || line
            .strip_prefix(HEADER_TOKEN)
            .is_some_and(|rest| rest.starts_with(char::is_whitespace))
}

/// True when the whole trimmed line is digits (a cue sequence number).
fn is_sequence_number(line: &str) -> bool {
    !line.is_empty() && line.chars().all(|c| c.is_ascii_digit())
}

fn normalize_text(text: &str) -> String {
    let stripped = MARKUP_RE.replace_all(text, "");
    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}
