//! Phrase normalization.
//!
//! Turns a raw phrase into lowercase words separated by single ASCII spaces.
//! Every run of characters that are not alphanumeric (punctuation, symbols,
//! whitespace, underscores) becomes one break:
//!
//! ```text
//! "  It's  a_B-52!"   ->   "it s a b 52"
//! ```
//!
//! Lowercasing is Unicode-aware and context-sensitive (a word-final `'Σ'`
//! lowers to `'ς'`). It may expand one character into several (`'İ'` lowers
//! to `"i\u{307}"`); each lowered character is classified on its own.

use unicode_normalization::char::is_combining_mark;

/// Unicode-aware phrase normalizer.
///
/// The output contract consumed by [`Tokenizer`](super::Tokenizer):
/// - no leading or trailing space
/// - no consecutive spaces
/// - every non-space character is alphanumeric and lowercase
///
/// # Examples
///
/// ```
/// use setdex_core::analyzer::TextNormalizer;
///
/// let normalizer = TextNormalizer::new();
/// assert_eq!(normalizer.normalize("  HELLO,  World!! "), "hello world");
/// assert_eq!(normalizer.normalize("Straße_Nr.5"), "straße nr 5");
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct TextNormalizer;

impl TextNormalizer {
    /// Creates a new normalizer.
    #[inline]
    pub const fn new() -> Self {
        Self
    }

    /// Normalizes text into an existing String buffer.
    ///
    /// Clears the buffer before writing and reuses its capacity.
    #[inline]
    pub fn normalize_into(&self, input: &str, out: &mut String) {
        out.clear();
        out.reserve(input.len());

        let bytes = input.as_bytes();
        let mut pending_break = false;

        // ASCII prefix skips UTF-8 decoding and the lowercase allocation.
        let mut i = 0usize;
        while i < bytes.len() && bytes[i] < 128 {
            let b = bytes[i];
            if b.is_ascii_alphanumeric() {
                push_word_char(out, &mut pending_break, b.to_ascii_lowercase() as char);
            } else {
                pending_break = true;
            }
            i += 1;
        }
        if i == bytes.len() {
            return;
        }

        // Final sigma depends on the surrounding word, so the whole phrase is
        // lowered at once. ASCII lowering keeps byte offsets, so `i` is still
        // the boundary of the unprocessed tail.
        let lowered = input.to_lowercase();
        for c in lowered[i..].chars() {
            if is_word_char(c) {
                push_word_char(out, &mut pending_break, c);
            } else {
                pending_break = true;
            }
        }
    }

    /// Normalizes text and returns a new String.
    #[inline]
    pub fn normalize(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        self.normalize_into(input, &mut out);
        out
    }
}

/// Letters and numbers count as word characters; marks and symbols do not.
///
/// `char::is_alphabetic` also admits combining marks (Devanagari vowel
/// signs) and enclosed letters, which are breaks here.
#[inline]
fn is_word_char(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_alphanumeric();
    }
    c.is_numeric() || (c.is_alphabetic() && !is_combining_mark(c) && !is_enclosed_letter(c))
}

/// Enclosed Latin letters (circled, squared, negative), which carry the
/// Alphabetic property but are symbols.
#[inline]
fn is_enclosed_letter(c: char) -> bool {
    matches!(
        c,
        '\u{24B6}'..='\u{24E9}'
            | '\u{1F130}'..='\u{1F149}'
            | '\u{1F150}'..='\u{1F169}'
            | '\u{1F170}'..='\u{1F189}'
    )
}

#[inline(always)]
fn push_word_char(out: &mut String, pending_break: &mut bool, c: char) {
    if *pending_break && !out.is_empty() {
        out.push(' ');
    }
    *pending_break = false;
    out.push(c);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn norm(input: &str) -> String {
        TextNormalizer::new().normalize(input)
    }

    #[test]
    fn ascii_basic_lowercase() {
        assert_eq!(norm("HELLO"), "hello");
        assert_eq!(norm("Hello World"), "hello world");
    }

    #[test]
    fn punctuation_breaks_words() {
        assert_eq!(norm("It's"), "it s");
        assert_eq!(norm("rock'n'roll"), "rock n roll");
        assert_eq!(norm("a,b;c"), "a b c");
    }

    #[test]
    fn underscore_is_a_break() {
        assert_eq!(norm("snake_case_name"), "snake case name");
    }

    #[test]
    fn runs_collapse_and_trim() {
        assert_eq!(norm("  --hello--  ,, world!!  "), "hello world");
        assert_eq!(norm("\tone\n\ntwo\r\n"), "one two");
    }

    #[test]
    fn digits_are_word_characters() {
        assert_eq!(norm("B-52s 1999"), "b 52s 1999");
    }

    #[test]
    fn empty_and_separator_only() {
        assert_eq!(norm(""), "");
        assert_eq!(norm("   "), "");
        assert_eq!(norm("!?_-.,"), "");
    }

    #[test]
    fn unicode_lowercase() {
        assert_eq!(norm("ŻÓŁĆ"), "żółć");
        assert_eq!(norm("ΑΒΓ"), "αβγ");
        assert_eq!(norm("Москва"), "москва");
    }

    #[test]
    fn unicode_punctuation_breaks() {
        assert_eq!(norm("«Hello»—world"), "hello world");
        assert_eq!(norm("emoji🎬title"), "emoji title");
    }

    #[test]
    fn expanding_lowercase_is_classified_per_char() {
        // U+0130 lowers to 'i' followed by a combining dot, which is not alphanumeric.
        assert_eq!(norm("İstanbul"), "i stanbul");
    }

    #[test]
    fn final_sigma_matches_lowercase_input() {
        assert_eq!(norm("ΟΔΟΣ"), "οδος");
        assert_eq!(norm("ΟΔΟΣ"), norm("οδος"));
        assert_eq!(norm("ΣΟΦΟΣ ΟΔΟΣ"), "σοφος οδος");
    }

    #[test]
    fn final_sigma_sees_ascii_context() {
        assert_eq!(norm("AΣ"), "aς");
    }

    #[test]
    fn combining_marks_are_breaks() {
        // Vowel signs and the virama split the word into its consonants.
        assert_eq!(norm("हिन्दी"), "ह न द");
        assert_eq!(norm("Café"), "café");
    }

    #[test]
    fn enclosed_letters_are_breaks() {
        assert_eq!(norm("Ⓐbc"), "bc");
    }

    #[test]
    fn letter_numbers_are_word_characters() {
        assert_eq!(norm("Louis Ⅻ"), "louis ⅻ");
    }

    #[test]
    fn cjk_is_alphanumeric() {
        assert_eq!(norm("東京 タワー"), "東京 タワー");
    }

    #[test]
    fn mixed_ascii_and_unicode_runs() {
        assert_eq!(norm("Café au lait, s'il vous plaît"), "café au lait s il vous plaît");
    }

    #[test]
    fn normalize_into_reuses_buffer() {
        let normalizer = TextNormalizer::new();
        let mut buf = String::with_capacity(64);
        normalizer.normalize_into("FIRST phrase", &mut buf);
        assert_eq!(buf, "first phrase");
        let cap = buf.capacity();

        normalizer.normalize_into("2nd", &mut buf);
        assert_eq!(buf, "2nd");
        assert_eq!(buf.capacity(), cap);
    }

    #[test]
    fn idempotent() {
        for input in ["Hello, World", "It's  Straße!", "  x_y  "] {
            let once = norm(input);
            assert_eq!(norm(&once), once);
        }
    }

    #[test]
    fn output_contract() {
        for input in ["  a  b  ", "__x__", "Ünïcödé — text", "1,2,,3"] {
            let out = norm(input);
            assert!(!out.starts_with(' '));
            assert!(!out.ends_with(' '));
            assert!(!out.contains("  "));
            assert!(out.chars().all(|c| c == ' ' || c.is_alphanumeric()));
        }
    }
}
