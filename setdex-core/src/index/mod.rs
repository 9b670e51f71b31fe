//! Inverted set-intersection index.
//!
//! Sets of symbols are indexed so that, for a query set, every indexed set
//! sharing at least `k` symbols with it (or at least a given similarity) is
//! found without comparing against each set.
//!
//! Memory Layout:
//! - Each distinct symbol owns a postings bucket of set ids, stored at the
//!   narrowest width the set capacity allows
//! - Structurally identical sets are deduplicated through a byte signature
//!   of their sorted symbol ids; payloads accumulate on the shared set
//! - Per-set sizes and per-symbol occurrence counts are optional tables,
//!   kept only when `find_similar` and `most_frequent` are enabled
//!
//! Threading:
//! - Queries take `&self` and may run concurrently with each other.
//!   `add` takes `&mut self`, and every [`SearchResult`] borrows the index,
//!   so the borrow checker serializes writes against readers.

mod api;
mod backend;
mod builder;
mod frequent;
mod results;
mod scoring;
mod search;
mod signature;
mod stats;
mod symbols;
mod types;

pub use backend::{open_index, Backend, SetIntersectionIndex};
pub use frequent::MostFrequent;
pub use results::SearchResult;
pub use stats::IndexStats;
pub use types::{EngineMetrics, Payloads, SetIndex, INITIAL_SET_SLOTS, STAT_SLOTS_PER_BUCKET};
