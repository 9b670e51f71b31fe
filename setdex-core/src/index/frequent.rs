//! Most frequent symbols.

use std::hash::Hash;
use std::iter::FusedIterator;

use setdex_types::{IndexError, Result};

use crate::index::types::SetIndex;

/// Lazily yields `(symbol, count)` pairs in descending count order, stopping
/// at the first count below the limit.
///
/// Counts are the number of distinct sets containing the symbol.
#[derive(Debug)]
pub struct MostFrequent<'a, S> {
    ranked: std::vec::IntoIter<(&'a S, u64)>,
    limit: f64,
    done: bool,
}

impl<'a, S> MostFrequent<'a, S> {
    /// Wraps symbols already ranked by descending count.
    pub fn new(ranked: Vec<(&'a S, u64)>, limit: f64) -> Self {
        Self {
            ranked: ranked.into_iter(),
            limit,
            done: false,
        }
    }

    /// An iterator that yields nothing.
    pub fn empty() -> Self {
        Self::new(Vec::new(), 0.0)
    }

    /// Drops the counts.
    pub fn symbols(self) -> impl Iterator<Item = &'a S> {
        self.map(|(symbol, _)| symbol)
    }
}

impl<'a, S> Iterator for MostFrequent<'a, S> {
    type Item = (&'a S, u64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.ranked.next() {
            Some((symbol, count)) if count as f64 >= self.limit => Some((symbol, count)),
            _ => {
                self.done = true;
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            (0, self.ranked.size_hint().1)
        }
    }
}

impl<S> FusedIterator for MostFrequent<'_, S> {}

impl<S: Hash + Eq, P> SetIndex<S, P> {
    /// Symbols whose occurrence count is at least `threshold` times the
    /// highest count, most frequent first, at most `max_results` of them.
    ///
    /// Equal counts rank the later-registered symbol first. An empty index
    /// yields nothing, and so does `max_results == Some(0)`; pass `None` for
    /// no cap.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::UnsupportedOperation` if the index was built
    /// without `most_frequent` support, and `IndexError::InvalidThreshold` if
    /// `threshold` is outside `[0, 1]`.
    pub fn most_frequent(
        &self,
        threshold: f64,
        max_results: Option<usize>,
    ) -> Result<MostFrequent<'_, S>> {
        let counts = self
            .symbol_counts
            .as_ref()
            .ok_or(IndexError::UnsupportedOperation("most_frequent"))?;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(IndexError::InvalidThreshold {
                value: threshold,
                reason: "must be within [0, 1]",
            });
        }
        self.record_query();

        if self.set_count == 0 {
            return Ok(MostFrequent::empty());
        }

        let mut ranked: Vec<(usize, u64)> = (0..self.symbols.len())
            .map(|id| (id, counts.get(id)))
            .collect();
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));

        let max = ranked.first().map_or(0, |&(_, count)| count);
        if let Some(n) = max_results {
            ranked.truncate(n);
        }

        let ranked = ranked
            .into_iter()
            .filter_map(|(id, count)| Some((self.symbols.symbol(id)?, count)))
            .collect();
        Ok(MostFrequent::new(ranked, max as f64 * threshold))
    }
}
