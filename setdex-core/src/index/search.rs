//! Search algorithm logic.
//!
//! Both queries share one counting pass: the postings of every known query
//! symbol are concatenated, sorted, and run-length counted. Because a set id
//! appears at most once per bucket, the run length of a set id is exactly the
//! number of distinct query symbols the set shares with the query.
//!
//! ```text
//! query {a, b, c}     a -> [0, 2]   b -> [2, 3]   c -> [2]
//! concatenated        [0, 2, 2, 3, 2]
//! sorted              [0, 2, 2, 2, 3]
//! counted             set 0: 1   set 2: 3   set 3: 1
//! ```

use std::hash::Hash;

use rustc_hash::FxHashSet;
use setdex_types::{IndexError, Result, SetId};
use tracing::trace;

use crate::index::api::IdScratch;
use crate::index::results::SearchResult;
use crate::index::scoring::overlap;
use crate::index::types::SetIndex;

/// Grouped intersection counts of one query, in ascending set-id order.
#[derive(Debug, Default)]
pub(crate) struct QueryCounts {
    /// Distinct query symbols, known or not.
    pub(crate) query_size: usize,
    pub(crate) set_ids: Vec<SetId>,
    pub(crate) counts: Vec<u64>,
}

impl<S: Hash + Eq, P> SetIndex<S, P> {
    /// Finds sets sharing at least `threshold` distinct symbols with the query.
    ///
    /// A negative `threshold` is relative to the query size: `-1` asks for
    /// sets sharing all but one of the query's distinct symbols. Scores are
    /// intersection counts; `max_results` caps every window read from the
    /// returned result.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvalidThreshold` if `threshold` is zero or
    /// resolves below 1.
    #[inline(never)]
    pub fn find<I>(
        &self,
        symbols: I,
        threshold: i64,
        max_results: Option<usize>,
    ) -> Result<SearchResult<'_, P, u64>>
    where
        I: IntoIterator<Item = S>,
    {
        if threshold == 0 {
            return Err(IndexError::InvalidThreshold {
                value: 0.0,
                reason: "must be at least 1 or negative",
            });
        }

        let found = self.count_intersections(symbols);

        let min_count = if threshold < 0 {
            let resolved = found.query_size as i64 + threshold;
            if resolved < 1 {
                return Err(IndexError::InvalidThreshold {
                    value: threshold as f64,
                    reason: "resolves below 1 for this query",
                });
            }
            resolved as u64
        } else {
            threshold as u64
        };

        let (set_ids, counts): (Vec<SetId>, Vec<u64>) = found
            .set_ids
            .into_iter()
            .zip(found.counts)
            .filter(|&(_, count)| count >= min_count)
            .unzip();

        trace!(min_count, matches = set_ids.len(), "find");
        Ok(SearchResult::new(set_ids, counts, self.sets.as_slice(), max_results))
    }

    /// Finds sets whose similarity `i / (|set| + |query| - i)` to the query is
    /// at least `threshold`.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvalidThreshold` unless `0 < threshold <= 1`, and
    /// `IndexError::UnsupportedOperation` if the index was built without
    /// `find_similar` support.
    #[inline(never)]
    pub fn find_similar<I>(&self, symbols: I, threshold: f64) -> Result<SearchResult<'_, P, f64>>
    where
        I: IntoIterator<Item = S>,
    {
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(IndexError::InvalidThreshold {
                value: threshold,
                reason: "must be within (0, 1]",
            });
        }
        let sizes = self
            .set_sizes
            .as_ref()
            .ok_or(IndexError::UnsupportedOperation("find_similar"))?;

        let found = self.count_intersections(symbols);
        let query_size = found.query_size as u64;

        let mut set_ids = Vec::new();
        let mut scores = Vec::new();
        for (&set_id, &common) in found.set_ids.iter().zip(&found.counts) {
            let score = overlap(common, sizes.get(set_id as usize), query_size);
            if score >= threshold {
                set_ids.push(set_id);
                scores.push(score);
            }
        }

        trace!(threshold, matches = set_ids.len(), "find_similar");
        Ok(SearchResult::new(set_ids, scores, self.sets.as_slice(), None))
    }

    /// Counts, for every set sharing a symbol with the query, how many
    /// distinct query symbols it contains.
    pub(crate) fn count_intersections<I>(&self, symbols: I) -> QueryCounts
    where
        I: IntoIterator<Item = S>,
    {
        self.record_query();

        let mut known = IdScratch::new();
        let mut unknown: FxHashSet<S> = FxHashSet::default();
        for symbol in symbols {
            match self.symbols.lookup(&symbol) {
                Some(id) => known.push(id),
                None => {
                    unknown.insert(symbol);
                }
            }
        }
        known.sort_unstable();
        known.dedup();

        let mut hits: Vec<u64> = Vec::new();
        for &id in &known {
            if let Some(bucket) = self.symbols.bucket(id) {
                bucket.extend_into(&mut hits);
            }
        }
        hits.sort_unstable();

        let mut set_ids = Vec::new();
        let mut counts = Vec::new();
        for run in hits.chunk_by(|a, b| a == b) {
            set_ids.push(run[0]);
            counts.push(run.len() as u64);
        }

        QueryCounts {
            query_size: known.len() + unknown.len(),
            set_ids,
            counts,
        }
    }
}
