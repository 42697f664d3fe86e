//! Data models for parsed captions.

use super::Timestamp;
use serde::{Deserialize, Serialize};

/// One timed caption cue after parsing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Position in the parsed sequence (zero-based, assigned after filtering).
    pub index: usize,
    /// Cue start.
    pub start_time: Timestamp,
    /// Cue end (strictly after `start_time`).
    pub end_time: Timestamp,
    /// Whitespace-normalized, single-line cue text.
    pub text: String,
}

impl Segment {
    /// Create a new segment.
    pub fn new(
        index: usize,
        start_time: Timestamp,
        end_time: Timestamp,
        text: impl Into<String>,
    ) -> Self {
        Self {
            index,
            start_time,
            end_time,
            text: text.into(),
        }
    }

    /// Start offset in seconds.
    pub fn start_seconds(&self) -> f64 {
        self.start_time.as_seconds()
    }

    /// End offset in seconds.
    pub fn end_seconds(&self) -> f64 {
        self.end_time.as_seconds()
    }
}

/// Format seconds as MM:SS or HH:MM:SS.
pub fn format_timestamp(seconds: f64) -> String {
    let total_seconds = seconds as u32;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}
