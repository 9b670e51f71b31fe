//! Symbol registration and per-symbol postings buckets.

use std::hash::Hash;

use indexmap::map::Entry;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use setdex_types::{Capacity, IdSpace, IdWidth, IndexError, Result, SetId};
use tracing::{trace, warn};

use crate::growable::IdArray;

/// Set ids containing one symbol, in insertion (ascending) order.
///
/// A set id is appended at most once per bucket.
#[derive(Debug, Clone)]
pub(crate) struct PostingBucket {
    len: usize,
    ids: IdArray,
}

impl PostingBucket {
    pub(crate) fn new(width: IdWidth, init_size: usize) -> Self {
        Self {
            len: 0,
            ids: IdArray::zeroed(width, init_size),
        }
    }

    #[inline(always)]
    pub(crate) fn push(&mut self, set_id: SetId) {
        self.ids.set(self.len, set_id);
        self.len += 1;
    }

    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Appends the filled slots to `out`.
    #[inline]
    pub(crate) fn extend_into(&self, out: &mut Vec<u64>) {
        self.ids.extend_into(0..self.len, out);
    }

    pub(crate) fn heap_bytes(&self) -> usize {
        self.ids.heap_bytes()
    }
}

/// Maps symbols to dense ids in first-seen order and owns their buckets.
///
/// The symbol id is the insertion position in the map, so enumeration order
/// and id order coincide.
#[derive(Debug)]
pub(crate) struct SymbolTable<S> {
    buckets: IndexMap<S, PostingBucket, FxBuildHasher>,
    capacity: Capacity,
    set_width: IdWidth,
    init_bucket_size: usize,
}

impl<S: Hash + Eq> SymbolTable<S> {
    pub(crate) fn new(capacity: Capacity, set_width: IdWidth, init_bucket_size: usize) -> Self {
        Self {
            buckets: IndexMap::with_hasher(FxBuildHasher),
            capacity,
            set_width,
            init_bucket_size,
        }
    }

    /// Returns the id of `symbol`, registering it with an empty bucket if new.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::CapacityExceeded` if a new id would reach the
    /// symbol ceiling.
    pub(crate) fn resolve(&mut self, symbol: S) -> Result<usize> {
        let next = self.buckets.len();
        match self.buckets.entry(symbol) {
            Entry::Occupied(entry) => Ok(entry.index()),
            Entry::Vacant(entry) => {
                if !self.capacity.admits(next as u64) {
                    warn!(ceiling = %self.capacity.ceiling, "symbol capacity exhausted");
                    return Err(IndexError::CapacityExceeded {
                        space: IdSpace::Symbols,
                        ceiling: self.capacity.ceiling,
                    });
                }
                let id = entry.index();
                entry.insert(PostingBucket::new(self.set_width, self.init_bucket_size));
                trace!(symbol_id = id, "registered symbol");
                Ok(id)
            }
        }
    }

    /// Returns the id of `symbol` without registering it.
    #[inline]
    pub(crate) fn lookup(&self, symbol: &S) -> Option<usize> {
        self.buckets.get_index_of(symbol)
    }
}

impl<S> SymbolTable<S> {
    #[inline]
    pub(crate) fn bucket(&self, id: usize) -> Option<&PostingBucket> {
        self.buckets.get_index(id).map(|(_, bucket)| bucket)
    }

    #[inline]
    pub(crate) fn bucket_mut(&mut self, id: usize) -> Option<&mut PostingBucket> {
        self.buckets.get_index_mut(id).map(|(_, bucket)| bucket)
    }

    #[inline]
    pub(crate) fn symbol(&self, id: usize) -> Option<&S> {
        self.buckets.get_index(id).map(|(symbol, _)| symbol)
    }

    /// Symbols in first-seen order.
    pub(crate) fn symbols(&self) -> impl Iterator<Item = &S> + '_ {
        self.buckets.keys()
    }

    /// All buckets, in symbol-id order.
    pub(crate) fn buckets(&self) -> impl Iterator<Item = &PostingBucket> + '_ {
        self.buckets.values()
    }

    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        self.buckets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(max_symbols: u64) -> SymbolTable<&'static str> {
        let cap = Capacity::for_request(max_symbols).unwrap();
        SymbolTable::new(cap, IdWidth::U8, 4)
    }

    #[test]
    fn ids_in_first_seen_order() {
        let mut t = table(10);
        assert_eq!(t.resolve("b").unwrap(), 0);
        assert_eq!(t.resolve("a").unwrap(), 1);
        assert_eq!(t.resolve("b").unwrap(), 0);
        assert_eq!(t.len(), 2);
        assert_eq!(t.symbols().copied().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(t.symbol(1), Some(&"a"));
        assert_eq!(t.lookup(&"a"), Some(1));
        assert_eq!(t.lookup(&"zzz"), None);
    }

    #[test]
    fn capacity_exceeded_on_new_symbol() {
        let mut t = table(1);
        for i in 0..256u32 {
            let s: &'static str = Box::leak(i.to_string().into_boxed_str());
            t.resolve(s).unwrap();
        }
        let err = t.resolve("overflow").unwrap_err();
        assert_eq!(
            err,
            IndexError::CapacityExceeded {
                space: IdSpace::Symbols,
                ceiling: 256,
            }
        );
        // Known symbols still resolve once full.
        assert_eq!(t.resolve("0").unwrap(), 0);
        assert_eq!(t.len(), 256);
    }

    #[test]
    fn bucket_push_grows() {
        let mut bucket = PostingBucket::new(IdWidth::U16, 4);
        for id in 0..10 {
            bucket.push(id * 3);
        }
        assert_eq!(bucket.len(), 10);
        let mut out = Vec::new();
        bucket.extend_into(&mut out);
        assert_eq!(out, (0..10).map(|i| i * 3).collect::<Vec<u64>>());
    }
}
