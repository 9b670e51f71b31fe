//! Set registration.

use setdex_types::{IdSpace, IndexError, Result, SetId};
use tracing::{trace, warn};

use crate::index::types::SetIndex;

impl<S, P> SetIndex<S, P> {
    /// Registers a new set for the signature currently in `sig_buf`.
    ///
    /// `ids` are the set's distinct symbol ids, ascending. Each bucket receives
    /// the new set id exactly once, so a set appears at most once per bucket.
    pub(crate) fn register_set(&mut self, ids: &[usize]) -> Result<SetId> {
        let set_id = self.set_count;
        if !self.plan.sets.admits(set_id) {
            warn!(ceiling = %self.plan.sets.ceiling, "set capacity exhausted");
            return Err(IndexError::CapacityExceeded {
                space: IdSpace::Sets,
                ceiling: self.plan.sets.ceiling,
            });
        }

        let slot = set_id as usize;
        self.set_count += 1;
        self.sets.ensure(slot);

        if let Some(sizes) = self.set_sizes.as_mut() {
            sizes.set(slot, ids.len() as u64);
        }

        for &id in ids {
            if let Some(bucket) = self.symbols.bucket_mut(id) {
                bucket.push(set_id);
            }
        }

        if let Some(counts) = self.symbol_counts.as_mut() {
            for &id in ids {
                counts.increment(id);
            }
        }

        self.by_signature.insert(self.sig_buf.as_slice().into(), set_id);

        trace!(set_id, size = ids.len(), "registered set");
        Ok(set_id)
    }
}

#[cfg(test)]
mod tests {
    use crate::index::SetIndex;
    use setdex_types::{IdSpace, IndexConfig, IndexError};

    #[test]
    fn postings_hold_each_set_once() {
        let mut index: SetIndex<char, ()> = SetIndex::new();
        index.add_with("abca".chars(), ()).unwrap();
        index.add_with("bc".chars(), ()).unwrap();
        index.add_with("cab".chars(), ()).unwrap();

        let mut out = Vec::new();
        for id in 0..3 {
            out.clear();
            index.symbols.bucket(id).unwrap().extend_into(&mut out);
            match id {
                0 => assert_eq!(out, vec![0]),
                _ => assert_eq!(out, vec![0, 1]),
            }
        }
    }

    #[test]
    fn set_sizes_are_distinct_symbol_counts() {
        let mut index: SetIndex<u32, ()> = SetIndex::new();
        index.add_with([1, 1, 2, 2, 3], ()).unwrap();
        index.add_with([4], ()).unwrap();
        let sizes = index.set_sizes.as_ref().unwrap();
        assert_eq!(sizes.get(0), 3);
        assert_eq!(sizes.get(1), 1);
    }

    #[test]
    fn occurrence_counts_ignore_repeats() {
        let mut index: SetIndex<u32, ()> = SetIndex::new();
        index.add_with([1, 1, 1, 2], ()).unwrap();
        index.add_with([2, 1], ()).unwrap();
        index.add_with([2, 3], ()).unwrap();
        let counts = index.symbol_counts.as_ref().unwrap();
        assert_eq!(counts.get(0), 1);
        assert_eq!(counts.get(1), 2);
        assert_eq!(counts.get(2), 1);
    }

    #[test]
    fn set_ceiling_is_enforced() {
        let mut index: SetIndex<u32, ()> =
            SetIndex::with_config(IndexConfig::new(1, 1_000)).unwrap();
        for i in 0..256 {
            index.add_with([i], ()).unwrap();
        }
        let err = index.add_with([999], ()).unwrap_err();
        assert_eq!(
            err,
            IndexError::CapacityExceeded {
                space: IdSpace::Sets,
                ceiling: 256,
            }
        );
        assert_eq!(index.set_count(), 256);

        // Existing sets still accept payloads.
        assert_eq!(index.add_with([7], ()).unwrap(), 7);
    }

    #[test]
    fn auxiliary_tables_grow_past_initial_slots() {
        let config = IndexConfig::default().with_init_bucket_size(4);
        let mut index: SetIndex<u32, ()> = SetIndex::with_config(config).unwrap();
        for i in 0..500u32 {
            index.add_with([i, i + 1], ()).unwrap();
        }
        let sizes = index.set_sizes.as_ref().unwrap();
        assert!(sizes.capacity() >= 500);
        assert_eq!(sizes.get(499), 2);
        let counts = index.symbol_counts.as_ref().unwrap();
        assert_eq!(counts.get(0), 1);
        assert_eq!(counts.get(250), 2);
    }
}
