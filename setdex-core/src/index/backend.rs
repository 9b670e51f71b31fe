//! Backend selection and the index interface façades build on.

use core::fmt;
use core::str::FromStr;
use std::hash::Hash;

use setdex_types::{IndexConfig, IndexError, Result, SetId};

use crate::index::frequent::MostFrequent;
use crate::index::results::SearchResult;
use crate::index::types::SetIndex;

/// Operations every set-intersection index implementation provides.
///
/// See [`SetIndex`] for the semantics of each call.
pub trait SetIntersectionIndex<S, P> {
    /// Adds a set with an explicit payload and returns its id.
    fn add_with<I>(&mut self, symbols: I, payload: P) -> Result<SetId>
    where
        I: IntoIterator<Item = S>;

    /// Sets sharing at least `threshold` distinct symbols with the query.
    fn find<I>(
        &self,
        symbols: I,
        threshold: i64,
        max_results: Option<usize>,
    ) -> Result<SearchResult<'_, P, u64>>
    where
        I: IntoIterator<Item = S>;

    /// Sets at least `threshold` similar to the query.
    fn find_similar<I>(&self, symbols: I, threshold: f64) -> Result<SearchResult<'_, P, f64>>
    where
        I: IntoIterator<Item = S>;

    /// The most frequent symbols with their occurrence counts.
    fn most_frequent(
        &self,
        threshold: f64,
        max_results: Option<usize>,
    ) -> Result<MostFrequent<'_, S>>;

    /// Number of distinct symbols.
    fn symbol_count(&self) -> usize;

    /// Number of distinct sets.
    fn set_count(&self) -> u64;

    /// Distinct symbols in first-seen order.
    fn symbols<'a>(&'a self) -> impl Iterator<Item = &'a S> + 'a
    where
        S: 'a;

    /// All payloads, set-major.
    fn payloads<'a>(&'a self) -> impl Iterator<Item = &'a P> + 'a
    where
        P: 'a;

    /// Whether `most_frequent` is available.
    fn supports_most_frequent(&self) -> bool;

    /// Whether `find_similar` is available.
    fn supports_find_similar(&self) -> bool;

    /// Committed set ceiling, possibly above the requested capacity.
    fn max_sets(&self) -> u128;

    /// Committed symbol ceiling, possibly above the requested capacity.
    fn max_symbols(&self) -> u128;
}

impl<S: Hash + Eq, P> SetIntersectionIndex<S, P> for SetIndex<S, P> {
    #[inline]
    fn add_with<I>(&mut self, symbols: I, payload: P) -> Result<SetId>
    where
        I: IntoIterator<Item = S>,
    {
        SetIndex::add_with(self, symbols, payload)
    }

    #[inline]
    fn find<I>(
        &self,
        symbols: I,
        threshold: i64,
        max_results: Option<usize>,
    ) -> Result<SearchResult<'_, P, u64>>
    where
        I: IntoIterator<Item = S>,
    {
        SetIndex::find(self, symbols, threshold, max_results)
    }

    #[inline]
    fn find_similar<I>(&self, symbols: I, threshold: f64) -> Result<SearchResult<'_, P, f64>>
    where
        I: IntoIterator<Item = S>,
    {
        SetIndex::find_similar(self, symbols, threshold)
    }

    #[inline]
    fn most_frequent(
        &self,
        threshold: f64,
        max_results: Option<usize>,
    ) -> Result<MostFrequent<'_, S>> {
        SetIndex::most_frequent(self, threshold, max_results)
    }

    fn symbol_count(&self) -> usize {
        SetIndex::symbol_count(self)
    }

    fn set_count(&self) -> u64 {
        SetIndex::set_count(self)
    }

    fn symbols<'a>(&'a self) -> impl Iterator<Item = &'a S> + 'a
    where
        S: 'a,
    {
        SetIndex::symbols(self)
    }

    fn payloads<'a>(&'a self) -> impl Iterator<Item = &'a P> + 'a
    where
        P: 'a,
    {
        SetIndex::payloads(self)
    }

    fn supports_most_frequent(&self) -> bool {
        SetIndex::supports_most_frequent(self)
    }

    fn supports_find_similar(&self) -> bool {
        SetIndex::supports_find_similar(self)
    }

    fn max_sets(&self) -> u128 {
        SetIndex::max_sets(self)
    }

    fn max_symbols(&self) -> u128 {
        SetIndex::max_symbols(self)
    }
}

/// Available index implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Backend {
    /// Inverted postings buckets with grouped intersection counting.
    #[default]
    Postings,
}

impl Backend {
    /// All backends.
    pub const ALL: [Backend; 1] = [Backend::Postings];

    /// The canonical name of this backend.
    pub const fn name(self) -> &'static str {
        match self {
            Backend::Postings => "postings",
        }
    }

    /// Builds an empty index of this kind.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvalidCapacity` if `config` is invalid.
    pub fn open<S: Hash + Eq, P>(self, config: IndexConfig) -> Result<SetIndex<S, P>> {
        match self {
            Backend::Postings => SetIndex::with_config(config),
        }
    }
}

impl FromStr for Backend {
    type Err = IndexError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "postings" | "default" => Ok(Backend::Postings),
            other => Err(IndexError::UnsupportedBackend(other.to_string())),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Builds an empty index of the backend named `name`.
///
/// # Errors
///
/// Returns `IndexError::UnsupportedBackend` for an unknown name and
/// `IndexError::InvalidCapacity` if `config` is invalid.
///
/// # Example
///
/// ```
/// use setdex_core::{open_index, IndexConfig, SetIndex};
///
/// let index: SetIndex<u32, String> = open_index("default", IndexConfig::default()).unwrap();
/// assert!(index.is_empty());
/// assert!(open_index::<u32, String>("bitmap", IndexConfig::default()).is_err());
/// ```
pub fn open_index<S: Hash + Eq, P>(name: &str, config: IndexConfig) -> Result<SetIndex<S, P>> {
    name.parse::<Backend>()?.open(config)
}
