//! Fuzzy phrase index over trigram sets.
//!
//! [`PhraseIndex`] turns phrases into trigram sets (see
//! [`get_trigrams`](crate::analyzer::get_trigrams)) and forwards them to a
//! set-intersection index, so approximate string search becomes set search.
//! Inputs that already are trigram collections are forwarded as they are.

use std::collections::hash_set;
use std::iter::Copied;
use std::marker::PhantomData;
use std::slice;

use setdex_types::{IndexConfig, Result, SetId, Trigram};
use tracing::debug;

use crate::analyzer::{get_trigrams, TrigramSet};
use crate::index::{MostFrequent, SearchResult, SetIndex, SetIntersectionIndex};

/// Default number of distinct phrases a [`PhraseIndex`] supports.
pub const DEFAULT_MAX_PHRASES: u64 = 1 << 32;

/// Default number of distinct trigrams a [`PhraseIndex`] supports.
pub const DEFAULT_MAX_TRIGRAMS: u64 = 1 << 16;

/// Input accepted wherever a phrase is expected.
///
/// Strings are analyzed into their trigram set; trigram collections pass
/// through unchanged.
pub trait IntoTrigrams {
    /// The trigrams handed to the index.
    type Trigrams: IntoIterator<Item = Trigram>;

    /// Converts the input into trigrams.
    fn into_trigrams(self) -> Self::Trigrams;
}

impl IntoTrigrams for &str {
    type Trigrams = TrigramSet;

    #[inline]
    fn into_trigrams(self) -> TrigramSet {
        get_trigrams(self)
    }
}

impl IntoTrigrams for &String {
    type Trigrams = TrigramSet;

    #[inline]
    fn into_trigrams(self) -> TrigramSet {
        get_trigrams(self)
    }
}

impl IntoTrigrams for TrigramSet {
    type Trigrams = TrigramSet;

    #[inline]
    fn into_trigrams(self) -> TrigramSet {
        self
    }
}

impl<'a> IntoTrigrams for &'a TrigramSet {
    type Trigrams = Copied<hash_set::Iter<'a, Trigram>>;

    #[inline]
    fn into_trigrams(self) -> Self::Trigrams {
        self.iter().copied()
    }
}

impl IntoTrigrams for Vec<Trigram> {
    type Trigrams = Vec<Trigram>;

    #[inline]
    fn into_trigrams(self) -> Vec<Trigram> {
        self
    }
}

impl<'a> IntoTrigrams for &'a [Trigram] {
    type Trigrams = Copied<slice::Iter<'a, Trigram>>;

    #[inline]
    fn into_trigrams(self) -> Self::Trigrams {
        self.iter().copied()
    }
}

/// Trigram phrase index.
///
/// Phrases with the same trigram set (for example differing only in case or
/// punctuation) share one set id and accumulate their payloads.
///
/// # Example
///
/// ```
/// use setdex_core::PhraseIndex;
///
/// let mut titles: PhraseIndex = PhraseIndex::new();
/// titles.add("The Godfather").unwrap();
/// titles.add("The Godfather: Part II").unwrap();
/// titles.add("Goodfellas").unwrap();
///
/// let mut found = titles.find_similar("the godfater", 0.5).unwrap();
/// assert_eq!(found.get_list(None)[0].1, ["The Godfather"]);
/// ```
#[derive(Debug)]
pub struct PhraseIndex<P = String, I = SetIndex<Trigram, P>> {
    index: I,
    _payload: PhantomData<fn() -> P>,
}

impl<P> PhraseIndex<P> {
    /// Creates an empty index for 2^32 phrases and 2^16 trigrams.
    pub fn new() -> Self {
        Self::with_index(SetIndex::new())
    }

    /// Creates an empty index sized for the given numbers of distinct
    /// phrases and trigrams.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvalidCapacity` if either request is zero.
    pub fn with_capacity(max_phrases: u64, max_trigrams: u64) -> Result<Self> {
        let index = SetIndex::with_config(IndexConfig::new(max_phrases, max_trigrams))?;
        Ok(Self::with_index(index))
    }
}

impl<P> Default for PhraseIndex<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, I: SetIntersectionIndex<Trigram, P>> PhraseIndex<P, I> {
    /// Wraps an existing set index.
    pub fn with_index(index: I) -> Self {
        debug!(
            max_phrases = %index.max_sets(),
            max_trigrams = %index.max_symbols(),
            "created phrase index"
        );
        Self {
            index,
            _payload: PhantomData,
        }
    }

    /// Adds a phrase with the phrase itself as payload.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::CapacityExceeded` if the phrase would introduce a
    /// trigram or a distinct phrase beyond the configured capacity.
    pub fn add(&mut self, phrase: &str) -> Result<SetId>
    where
        P: for<'s> From<&'s str>,
    {
        self.index.add_with(get_trigrams(phrase), P::from(phrase))
    }

    /// Adds a phrase or trigram collection with an explicit payload.
    ///
    /// # Errors
    ///
    /// Same as [`PhraseIndex::add`].
    pub fn add_with<T: IntoTrigrams>(&mut self, phrase: T, payload: P) -> Result<SetId> {
        self.index.add_with(phrase.into_trigrams(), payload)
    }

    /// Phrases sharing at least `threshold` trigrams with `phrase`.
    ///
    /// A negative `threshold` is relative to the number of trigrams in
    /// `phrase`.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvalidThreshold` if `threshold` is zero or
    /// resolves below 1.
    pub fn find<T: IntoTrigrams>(
        &self,
        phrase: T,
        threshold: i64,
        max_results: Option<usize>,
    ) -> Result<SearchResult<'_, P, u64>> {
        self.index.find(phrase.into_trigrams(), threshold, max_results)
    }

    /// Phrases whose trigram similarity to `phrase` is at least `threshold`.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvalidThreshold` unless `0 < threshold <= 1`,
    /// and `IndexError::UnsupportedOperation` if the backing index does not
    /// support similarity search.
    pub fn find_similar<T: IntoTrigrams>(
        &self,
        phrase: T,
        threshold: f64,
    ) -> Result<SearchResult<'_, P, f64>> {
        self.index.find_similar(phrase.into_trigrams(), threshold)
    }

    /// The most frequent trigrams, see [`SetIndex::most_frequent`].
    ///
    /// # Errors
    ///
    /// Returns `IndexError::UnsupportedOperation` if the backing index does
    /// not count occurrences and `IndexError::InvalidThreshold` outside
    /// `[0, 1]`.
    pub fn most_frequent(
        &self,
        threshold: f64,
        max_results: Option<usize>,
    ) -> Result<MostFrequent<'_, Trigram>> {
        self.index.most_frequent(threshold, max_results)
    }

    /// Number of distinct trigrams.
    pub fn trigram_count(&self) -> usize {
        self.index.symbol_count()
    }

    /// Number of distinct (trigram-equivalent) phrases.
    pub fn phrase_count(&self) -> u64 {
        self.index.set_count()
    }

    /// Distinct trigrams in first-seen order.
    pub fn trigrams(&self) -> impl Iterator<Item = &Trigram> + '_ {
        self.index.symbols()
    }

    /// All payloads, grouped by phrase.
    pub fn payloads<'a>(&'a self) -> impl Iterator<Item = &'a P> + 'a
    where
        P: 'a,
    {
        self.index.payloads()
    }

    /// The backing set index.
    pub fn index(&self) -> &I {
        &self.index
    }

    /// Consumes the façade, returning the backing set index.
    pub fn into_index(self) -> I {
        self.index
    }
}
