//! Streaming word splitter.
//!
//! Second stage of the phrase pipeline: takes text that already went through
//! [`TextNormalizer`](super::TextNormalizer) and emits each word as a slice of
//! the input, left to right:
//!
//! ```text
//! "adam mickiewicz"   ->   "adam", "mickiewicz"
//! ```
//!
//! ## The Input Contract
//!
//! - lowercase alphanumeric words
//! - exactly one ASCII space between words
//! - no leading or trailing space
//!
//! Violations panic in debug builds.

use memchr::memchr_iter;

/// Zero-allocation tokenizer over normalized text.
///
/// Splits on ASCII space (0x20) with a `memchr` scan. Words are slices of the
/// input; nothing is copied.
///
/// ## Example
///
/// ```
/// use setdex_core::analyzer::Tokenizer;
///
/// let mut words = Vec::new();
/// Tokenizer::new().tokenize("hello wide world", |word| words.push(word));
/// assert_eq!(words, ["hello", "wide", "world"]);
/// ```
#[derive(Debug, Default, Copy, Clone)]
pub struct Tokenizer;

impl Tokenizer {
    /// Creates a new tokenizer.
    #[inline]
    pub const fn new() -> Self {
        Self
    }

    /// Tokenizes normalized input and emits each word.
    #[inline(always)]
    pub fn tokenize<'n, F>(&self, normalized: &'n str, mut emit: F)
    where
        F: FnMut(&'n str),
    {
        let bytes = normalized.as_bytes();

        debug_assert!(
            bytes.first().is_none_or(|&b| b != b' '),
            "tokenizer: leading space, normalizer contract violated"
        );
        debug_assert!(
            bytes.last().is_none_or(|&b| b != b' '),
            "tokenizer: trailing space, normalizer contract violated"
        );
        debug_assert!(
            !normalized.contains("  "),
            "tokenizer: consecutive spaces, normalizer contract violated"
        );

        if bytes.is_empty() {
            return;
        }

        let mut start = 0usize;
        for i in memchr_iter(b' ', bytes) {
            // 0x20 is never a UTF-8 continuation byte, so both ends sit on char boundaries.
            if start < i {
                emit(&normalized[start..i]);
            }
            start = i + 1;
        }

        if start < bytes.len() {
            emit(&normalized[start..]);
        }
    }
}
