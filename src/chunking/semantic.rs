//! Greedy, boundary-respecting chunk packing.
//!
//! Single pass over the segments with no lookahead. The buffer size is tracked
//! as a running character count, so each append is estimated in O(1) and
//! already-emitted text is only touched again by the bounded overlap walk.

use super::tokens::{max_chars_for_tokens, tokens_for_chars};
use super::{Chunk, ChunkMetadata, ChunkingConfig};
use crate::error::Result;
use crate::transcription::{Segment, Timestamp};
use tracing::{debug, instrument, warn};

/// Packs segments into overlapping, token-bounded chunks.
#[derive(Debug, Clone)]
pub struct SemanticChunker {
    config: ChunkingConfig,
}

impl SemanticChunker {
    /// Create a chunker, rejecting inconsistent token sizes.
    pub fn new(config: ChunkingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }

    /// Split segments into chunks.
    #[instrument(skip(self, segments), fields(segments = segments.len()))]
    pub fn chunk(&self, segments: &[Segment]) -> Vec<Chunk> {
        let mut builder = ChunkBuilder::new(&self.config);
        for segment in segments {
            builder.push_segment(segment);
        }
        let chunks = builder.finish();
        debug!("Created {} chunks", chunks.len());
        chunks
    }
}

/// Chunk segments with the given configuration.
pub fn chunk_segments(segments: &[Segment], config: &ChunkingConfig) -> Result<Vec<Chunk>> {
    Ok(SemanticChunker::new(config.clone())?.chunk(segments))
}

struct ChunkBuilder<'a> {
    config: &'a ChunkingConfig,
    buffer: String,
    buffer_chars: usize,
    start: Timestamp,
    end: Timestamp,
    chunks: Vec<Chunk>,
}

impl<'a> ChunkBuilder<'a> {
    fn new(config: &'a ChunkingConfig) -> Self {
        Self {
            config,
            buffer: String::new(),
            buffer_chars: 0,
            start: Timestamp::ZERO,
            end: Timestamp::ZERO,
            chunks: Vec::new(),
        }
    }

    fn push_segment(&mut self, segment: &Segment) {
        let text = segment.text.trim();
        let seg_chars = text.chars().count();
        if seg_chars == 0 {
            return;
        }

        if self.fits(seg_chars) {
            if self.buffer.is_empty() {
                self.start = segment.start_time;
            }
            self.append(text, seg_chars);
            self.end = segment.end_time;
            return;
        }

        let oversized = tokens_for_chars(seg_chars) > self.config.max_tokens;
        if !self.buffer.is_empty() {
            // The seeded tail must leave room for whatever gets appended next.
            let next_chars = if oversized {
                text.split_whitespace().next().map_or(0, |w| w.chars().count())
            } else {
                seg_chars
            };
            self.flush_and_seed(next_chars);
        }

        self.start = segment.start_time;
        self.end = segment.end_time;

        if oversized {
            self.append_words(text);
        } else {
            self.append(text, seg_chars);
        }
    }

    /// Split one oversized segment word by word. The last partial piece stays
    /// in the buffer so later segments can join it.
    fn append_words(&mut self, text: &str) {
        for word in text.split_whitespace() {
            let word_chars = word.chars().count();
            if !self.fits(word_chars) && !self.buffer.is_empty() {
                self.flush_and_seed(word_chars);
            }
            self.append(word, word_chars);
        }
    }

    fn fits(&self, chars: usize) -> bool {
        let tentative = if self.buffer.is_empty() {
            chars
        } else {
            self.buffer_chars + 1 + chars
        };
        tokens_for_chars(tentative) <= self.config.max_tokens
    }

    fn append(&mut self, text: &str, chars: usize) {
        if !self.buffer.is_empty() {
            self.buffer.push(' ');
            self.buffer_chars += 1;
        }
        self.buffer.push_str(text);
        self.buffer_chars += chars;
    }

    fn flush_and_seed(&mut self, next_chars: usize) {
        let chunk = self.finalize();

        let room = max_chars_for_tokens(self.config.max_tokens).saturating_sub(next_chars + 1);
        let budget = max_chars_for_tokens(self.config.overlap).min(room);
        let (tail, tail_chars) = overlap_tail(&chunk.text, budget);

        self.chunks.push(chunk);
        self.buffer = tail;
        self.buffer_chars = tail_chars;
    }

    fn finalize(&mut self) -> Chunk {
        let chunk_index = self.chunks.len();
        let mut text = std::mem::take(&mut self.buffer);
        let mut token_count = tokens_for_chars(self.buffer_chars);
        self.buffer_chars = 0;

        let mut truncated = false;
        if token_count > self.config.max_tokens {
            let max_chars = max_chars_for_tokens(self.config.max_tokens);
            text = truncate_at_boundary(&text, max_chars, &self.config.respect_boundaries);
            token_count = tokens_for_chars(text.chars().count());
            truncated = true;
            warn!(
                chunk_index = chunk_index,
                "Chunk exceeded {} tokens and was truncated", self.config.max_tokens
            );
        }

        let below_min_tokens = token_count < self.config.min_tokens;
        if below_min_tokens {
            warn!(
                chunk_index = chunk_index,
                "Chunk has {} tokens, below the minimum of {}", token_count, self.config.min_tokens
            );
        }

        Chunk {
            text,
            start_time: self.start,
            end_time: self.end,
            token_count,
            metadata: ChunkMetadata {
                chunk_index,
                has_overlap: chunk_index > 0,
                below_min_tokens,
                truncated,
            },
        }
    }

    fn finish(mut self) -> Vec<Chunk> {
        if !self.buffer.trim().is_empty() {
            let chunk = self.finalize();
            self.chunks.push(chunk);
        }
        self.chunks
    }
}

/// Whole words from the end of `text`, at most `max_chars` characters long
/// once joined with spaces.
fn overlap_tail(text: &str, max_chars: usize) -> (String, usize) {
    let mut words: Vec<&str> = Vec::new();
    let mut chars = 0;

    for word in text.split_whitespace().rev() {
        let word_chars = word.chars().count();
        let next = if words.is_empty() { word_chars } else { chars + 1 + word_chars };
        if next > max_chars {
            break;
        }
        words.push(word);
        chars = next;
    }

    words.reverse();
    (words.join(" "), chars)
}

/// Cut `text` to at most `max_chars` characters, preferring a configured
/// boundary in the back half of the window, then a word break.
fn truncate_at_boundary(text: &str, max_chars: usize, boundaries: &[String]) -> String {
    let Some((cut, next_char)) = text.char_indices().nth(max_chars) else {
        return text.to_string();
    };
    let window = &text[..cut];

    for boundary in boundaries {
        if boundary.is_empty() {
            continue;
        }
        if let Some(pos) = window.rfind(boundary.as_str()) {
            if pos > 0 && pos >= window.len() / 2 {
                let end = pos + boundary.trim_end().len();
                return window[..end].trim_end().to_string();
            }
        }
    }

    if next_char.is_whitespace() {
        return window.trim_end().to_string();
    }
    match window.rfind(char::is_whitespace) {
        Some(pos) if pos > 0 => window[..pos].trim_end().to_string(),
        _ => window.to_string(),
    }
}
