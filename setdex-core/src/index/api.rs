//! Public API for adding sets and looking them up.

use std::hash::Hash;

use setdex_types::{IndexError, Result, SetId};
use smallvec::SmallVec;

use crate::index::types::SetIndex;

/// Symbol ids of one input, before sorting and deduplication.
pub(crate) type IdScratch = SmallVec<[usize; 32]>;

impl<S: Hash + Eq, P> SetIndex<S, P> {
    /// Adds a set, storing the collection itself as its payload.
    ///
    /// Equivalent to `add_with(symbols.clone(), symbols.into())`.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::CapacityExceeded` if a new symbol or a new set
    /// would exceed the committed ceiling.
    pub fn add<C>(&mut self, symbols: C) -> Result<SetId>
    where
        C: IntoIterator<Item = S> + Clone + Into<P>,
    {
        let payload = symbols.clone().into();
        self.add_with(symbols, payload)
    }

    /// Adds a set with an explicit payload and returns its id.
    ///
    /// Element order and repetition in `symbols` are irrelevant: two calls
    /// with the same distinct symbols share one set id, and the second call
    /// only appends its payload.
    ///
    /// Symbols registered before a `CapacityExceeded` error stay registered
    /// with empty postings.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::CapacityExceeded` if a new symbol or a new set
    /// would exceed the committed ceiling.
    #[inline(never)]
    pub fn add_with<I>(&mut self, symbols: I, payload: P) -> Result<SetId>
    where
        I: IntoIterator<Item = S>,
    {
        self.adds_executed += 1;

        let mut ids = IdScratch::new();
        for symbol in symbols {
            ids.push(self.symbols.resolve(symbol)?);
        }
        ids.sort_unstable();
        ids.dedup();

        self.codec.encode(&ids, &mut self.sig_buf);
        let set_id = match self.by_signature.get(self.sig_buf.as_slice()) {
            Some(&set_id) => set_id,
            None => self.register_set(&ids)?,
        };

        if let Some(slot) = self.sets.get_mut(set_id as usize) {
            slot.push(payload);
        }
        Ok(set_id)
    }

    /// Adds many `(symbols, payload)` pairs in order.
    ///
    /// Stops at the first error, since every `add` error is a full index.
    /// Returns the number of pairs added and the error that stopped the batch.
    pub fn add_batch<B, I>(&mut self, items: B) -> (usize, Option<IndexError>)
    where
        B: IntoIterator<Item = (I, P)>,
        I: IntoIterator<Item = S>,
    {
        let mut added = 0;
        for (symbols, payload) in items {
            match self.add_with(symbols, payload) {
                Ok(_) => added += 1,
                Err(e) => return (added, Some(e)),
            }
        }
        (added, None)
    }

    /// Returns the id of the set with exactly these distinct symbols, if indexed.
    pub fn set_id_of<I>(&self, symbols: I) -> Option<SetId>
    where
        I: IntoIterator<Item = S>,
    {
        let mut ids = IdScratch::new();
        for symbol in symbols {
            ids.push(self.symbols.lookup(&symbol)?);
        }
        ids.sort_unstable();
        ids.dedup();

        let mut key = Vec::new();
        self.codec.encode(&ids, &mut key);
        self.by_signature.get(key.as_slice()).copied()
    }

    /// Returns `true` if a set with exactly these distinct symbols is indexed.
    #[inline]
    pub fn contains_set<I>(&self, symbols: I) -> bool
    where
        I: IntoIterator<Item = S>,
    {
        self.set_id_of(symbols).is_some()
    }
}
