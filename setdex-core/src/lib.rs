//! setdex: a set-intersection index for fuzzy matching.
//!
//! Indexes many sets of hashable symbols and answers:
//! - which indexed sets share at least `k` symbols with a query set
//!   ([`SetIndex::find`])
//! - which indexed sets are most similar to a query set
//!   ([`SetIndex::find_similar`])
//! - which symbols occur in the most sets ([`SetIndex::most_frequent`])
//!
//! Phrases decomposed into trigrams make this an approximate string matcher,
//! see [`PhraseIndex`].
//!
//! ```
//! use setdex_core::SetIndex;
//!
//! let mut index: SetIndex<u32, Vec<u32>> = SetIndex::new();
//! index.add(vec![1, 2, 3, 4]).unwrap();
//! index.add(vec![1, 3, 5, 6]).unwrap();
//! index.add(vec![2, 4, 6, 7]).unwrap();
//!
//! let mut found = index.find([1, 2, 3], 2, None).unwrap();
//! let list = found.get_list(None);
//! assert_eq!(list[0], (3, &[vec![1, 2, 3, 4]][..]));
//! assert_eq!(list[1], (2, &[vec![1, 3, 5, 6]][..]));
//! ```

pub mod analyzer;
pub mod growable;
pub mod index;
pub mod phrase;

pub use index::{
    open_index, Backend, EngineMetrics, IndexStats, MostFrequent, Payloads, SearchResult,
    SetIndex, SetIntersectionIndex,
};
pub use phrase::{IntoTrigrams, PhraseIndex};
pub use setdex_types::{
    similarity, Capacity, CapacityPlan, IdSpace, IdWidth, IndexConfig, IndexError, Result, SetId,
    SymbolId, Trigram, DEFAULT_FIND_THRESHOLD, DEFAULT_FREQUENCY_THRESHOLD,
    DEFAULT_SIMILARITY_THRESHOLD, MIN_BUCKET_SIZE,
};
