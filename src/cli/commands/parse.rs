//! Parse command implementation.

use super::{read_transcript, write_output};
use crate::cli::{format_duration, Output};
use crate::transcription::{format_segments, parse_vtt, OutputFormat};
use anyhow::Result;

/// Run the parse command.
pub fn run_parse(file: &str, format: &str, output: Option<&str>) -> Result<()> {
    let output_format: OutputFormat = format.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    let (_, raw) = read_transcript(file)?;
    let segments = parse_vtt(&raw)?;
    let rendered = format_segments(&segments, output_format);

    if write_output(output, &rendered)? {
        let duration = segments.last().map(|s| s.end_seconds()).unwrap_or(0.0);
        Output::success(&format!(
            "Wrote {} segments ({}) to {}",
            segments.len(),
            format_duration(duration),
            output.unwrap_or_default()
        ));
    }

    Ok(())
}
