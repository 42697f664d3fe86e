//! Character-ratio token estimation.
//!
//! Embedding models bill and truncate by tokens; about four characters per
//! token is close enough for English prose to size chunks without a tokenizer.

/// Average characters per model token.
pub const CHARS_PER_TOKEN: usize = 4;

/// Estimate how many tokens a string will consume.
pub fn estimate_tokens(text: &str) -> usize {
    tokens_for_chars(text.chars().count())
}

/// Estimate tokens from a precomputed character count.
pub fn tokens_for_chars(chars: usize) -> usize {
    chars.div_ceil(CHARS_PER_TOKEN)
}

/// Largest character count that still fits in `tokens`.
pub fn max_chars_for_tokens(tokens: usize) -> usize {
    tokens * CHARS_PER_TOKEN
}
