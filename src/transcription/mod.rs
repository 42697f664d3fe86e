//! Transcript ingestion for Lectern.
//!
//! Parses WebVTT caption tracks into timed segments and locates where the
//! lecture content actually begins.
//!
//! # Pipeline
//!
//! - **timestamp**: `HH:MM:SS.mmm` codec and cue timing matcher.
//! - **parser**: caption text to [`Segment`]s, recovering from damaged cues.
//! - **lecture_start**: keyword and time-based intro detection.
//! - **format**: writing segments back out as JSON, SRT or VTT.

mod format;
mod lecture_start;
mod models;
mod parser;
pub mod timestamp;

pub use format::{format_segments, OutputFormat, SegmentsExport};
pub use lecture_start::{
    find_lecture_start, Confidence, DetectionConfig, DetectionMethod, LectureStartAnalysis,
    LectureStartDetector,
};
pub use models::{format_timestamp, Segment};
pub use parser::parse_vtt;
pub use timestamp::{
    is_valid_timestamp, parse_time_range, seconds_to_timestamp, timestamp_to_seconds, Timestamp,
};
