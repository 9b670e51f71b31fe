//! Phrase analysis pipeline.
//!
//! - **Normalizer**: lowercases and collapses separator runs to single spaces
//! - **Tokenizer**: splits normalized text into words
//! - **Trigram**: pads each word and extracts its 3-character windows

pub mod normalizer;
pub mod tokenizer;
pub mod trigram;

pub use normalizer::TextNormalizer;
pub use tokenizer::Tokenizer;
pub use trigram::{extract_trigrams, get_trigrams, phrase_similarity, word_trigrams, TrigramSet};
