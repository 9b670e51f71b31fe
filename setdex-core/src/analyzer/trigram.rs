//! Trigram extraction.
//!
//! A phrase is normalized into words and every word is padded with two
//! leading spaces and one trailing space before the 3-character windows are
//! taken:
//!
//! ```text
//! "It's"  ->  "it" "s"  ->  "  it "  "  s "  ->  {"  i", " it", "it ", "  s", " s "}
//! ```
//!
//! Windows are taken over chars, not bytes, so a trigram always holds three
//! whole Unicode scalar values.

use rustc_hash::FxHashSet;
use setdex_types::{similarity, Trigram};

use crate::analyzer::{TextNormalizer, Tokenizer};

/// The distinct trigrams of a phrase.
pub type TrigramSet = FxHashSet<Trigram>;

/// Emits the trigrams of one word padded as `"  word "`.
///
/// A word of N chars yields N + 1 trigrams, repeats included. An empty word
/// yields nothing.
#[inline(always)]
pub fn word_trigrams<F>(word: &str, mut callback: F)
where
    F: FnMut(Trigram),
{
    if word.is_empty() {
        return;
    }
    let (mut c0, mut c1) = (' ', ' ');
    for c2 in word.chars() {
        callback(Trigram::from_chars(c0, c1, c2));
        c0 = c1;
        c1 = c2;
    }
    callback(Trigram::from_chars(c0, c1, ' '));
}

/// Emits the trigrams of every word of `phrase`, repeats included.
///
/// # Example
///
/// ```
/// use setdex_core::analyzer::extract_trigrams;
///
/// let mut trigrams = Vec::new();
/// extract_trigrams("Hi, Bob", |t| trigrams.push(t.to_string()));
/// assert_eq!(trigrams, ["  h", " hi", "hi ", "  b", " bo", "bob", "ob "]);
/// ```
pub fn extract_trigrams<F>(phrase: &str, mut callback: F)
where
    F: FnMut(Trigram),
{
    let normalized = TextNormalizer::new().normalize(phrase);
    Tokenizer::new().tokenize(&normalized, |word| word_trigrams(word, &mut callback));
}

/// The trigram set of a phrase.
///
/// ```
/// use setdex_core::analyzer::get_trigrams;
/// use setdex_core::Trigram;
///
/// let trigrams = get_trigrams("It's");
/// assert_eq!(trigrams.len(), 5);
/// assert!(trigrams.contains(&Trigram::parse(" s ").unwrap()));
/// ```
pub fn get_trigrams(phrase: &str) -> TrigramSet {
    let mut set = TrigramSet::default();
    extract_trigrams(phrase, |t| {
        set.insert(t);
    });
    set
}

/// Similarity of two phrases' trigram sets.
///
/// Agrees with the score `find_similar` reports for the same pair.
pub fn phrase_similarity(a: &str, b: &str) -> f64 {
    similarity(&get_trigrams(a), &get_trigrams(b))
}
