//! Token-bounded chunking of transcript segments for embedding.
//!
//! Segments are packed greedily into chunks that stay under a token budget,
//! with a short tail of each chunk repeated at the head of the next one.

mod analysis;
mod semantic;
pub mod tokens;

pub use analysis::{analyze_chunks, ChunkAnalysis};
pub use semantic::{chunk_segments, SemanticChunker};
pub use tokens::{estimate_tokens, max_chars_for_tokens, tokens_for_chars};

use crate::error::{LecternError, Result};
use crate::transcription::Timestamp;
use serde::{Deserialize, Serialize};

/// A retrieval unit built from one or more segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk text, including any carried-over overlap.
    pub text: String,
    /// Start of the first contributing segment.
    pub start_time: Timestamp,
    /// End of the last contributing segment.
    pub end_time: Timestamp,
    /// Estimated token count of `text`.
    pub token_count: usize,
    pub metadata: ChunkMetadata,
}

/// Bookkeeping attached to every emitted chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    /// Zero-based emission order.
    pub chunk_index: usize,
    /// True for every chunk but the first.
    pub has_overlap: bool,
    /// Set when the chunk came out under `min_tokens`.
    #[serde(default)]
    pub below_min_tokens: bool,
    /// Set when the chunk had to be cut down to `max_tokens`.
    #[serde(default)]
    pub truncated: bool,
}

/// Configuration for chunking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Chunks below this size are kept but flagged.
    pub min_tokens: usize,
    /// Hard upper bound on chunk size.
    pub max_tokens: usize,
    /// Tokens carried from the tail of one chunk into the next.
    pub overlap: usize,
    /// Preferred break strings, most preferred first. Used when a chunk has to
    /// be truncated.
    pub respect_boundaries: Vec<String>,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            min_tokens: 200,
            max_tokens: 500,
            overlap: 50,
            respect_boundaries: default_boundaries(),
        }
    }
}

impl ChunkingConfig {
    /// Check the ordering constraints between the three token sizes.
    pub fn validate(&self) -> Result<()> {
        if self.min_tokens == 0 {
            return Err(LecternError::Config("min_tokens must be greater than 0".to_string()));
        }
        if self.max_tokens <= self.min_tokens {
            return Err(LecternError::Config(format!(
                "max_tokens ({}) must be greater than min_tokens ({})",
                self.max_tokens, self.min_tokens
            )));
        }
        if self.overlap >= self.min_tokens {
            return Err(LecternError::Config(format!(
                "overlap ({}) must be less than min_tokens ({})",
                self.overlap, self.min_tokens
            )));
        }
        Ok(())
    }
}

/// Paragraph, sentence, then clause terminators.
pub fn default_boundaries() -> Vec<String> {
    ["\n\n", ". ", "? ", "! ", "; ", ", "]
        .into_iter()
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ChunkingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_sizes() {
        let zero_min = ChunkingConfig {
            min_tokens: 0,
            ..ChunkingConfig::default()
        };
        assert!(matches!(zero_min.validate(), Err(LecternError::Config(_))));

        let inverted = ChunkingConfig {
            min_tokens: 100,
            max_tokens: 100,
            ..ChunkingConfig::default()
        };
        assert!(inverted.validate().is_err());

        let big_overlap = ChunkingConfig {
            min_tokens: 50,
            max_tokens: 100,
            overlap: 50,
            ..ChunkingConfig::default()
        };
        assert!(big_overlap.validate().is_err());

        let no_overlap = ChunkingConfig {
            min_tokens: 50,
            max_tokens: 100,
            overlap: 0,
            ..ChunkingConfig::default()
        };
        assert!(no_overlap.validate().is_ok());
    }
}
