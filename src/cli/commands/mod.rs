//! CLI command implementations.

mod chunk;
mod config;
mod detect;
mod parse;
mod rerank;
mod search;

pub use chunk::{run_chunk, ChunkOverrides, ChunkedTranscript};
pub use config::run_config;
pub use detect::run_detect;
pub use parse::run_parse;
pub use rerank::{run_rerank, RerankFlags};
pub use search::run_search;

use anyhow::{Context, Result};
use std::path::Path;

/// Read a transcript file, returning its source ID (the file stem) and contents.
fn read_transcript(path: &str) -> Result<(String, String)> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    let id = Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());
    Ok((id, raw))
}

/// Write to a file, or stdout when `output` is None or "-".
fn write_output(output: Option<&str>, content: &str) -> Result<bool> {
    match output {
        Some(path) if path != "-" => {
            std::fs::write(path, content).with_context(|| format!("Failed to write {}", path))?;
            Ok(true)
        }
        _ => {
            println!("{}", content);
            Ok(false)
        }
    }
}
