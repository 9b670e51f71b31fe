//! Statistics and IndexStats.

use core::mem::size_of;

use setdex_types::{IdWidth, SetId};

use crate::index::types::SetIndex;

/// A snapshot of index statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    /// Number of distinct sets.
    pub num_sets: u64,
    /// Number of distinct symbols.
    pub num_symbols: usize,
    /// Number of stored payloads (one per `add` call).
    pub num_payloads: usize,
    /// Total number of postings across all buckets.
    pub total_postings: usize,
    /// Storage width of set ids.
    pub set_width: IdWidth,
    /// Storage width of symbol ids.
    pub symbol_width: IdWidth,
    /// Approximate heap bytes held by the index structures, excluding the
    /// symbols and payloads themselves.
    pub heap_bytes: usize,
}

impl<S, P> SetIndex<S, P> {
    /// Returns index statistics.
    pub fn stats(&self) -> IndexStats {
        let mut total_postings = 0;
        let mut heap_bytes = 0;
        for bucket in self.symbols.buckets() {
            total_postings += bucket.len();
            heap_bytes += bucket.heap_bytes();
        }

        heap_bytes += self.sets.heap_bytes();
        heap_bytes += self.set_sizes.as_ref().map_or(0, |a| a.heap_bytes());
        heap_bytes += self.symbol_counts.as_ref().map_or(0, |a| a.heap_bytes());
        heap_bytes += self.by_signature.capacity() * size_of::<(Box<[u8]>, SetId)>();
        heap_bytes += self.by_signature.keys().map(|k| k.len()).sum::<usize>();

        IndexStats {
            num_sets: self.set_count,
            num_symbols: self.symbols.len(),
            num_payloads: self.payloads().count(),
            total_postings,
            set_width: self.plan.sets.width,
            symbol_width: self.plan.symbols.width,
            heap_bytes,
        }
    }
}

impl IndexStats {
    /// Bytes the postings would take packed at the set-id width.
    pub fn postings_bytes(&self) -> usize {
        self.total_postings * self.set_width.bytes()
    }

    /// Average number of sets per symbol.
    pub fn mean_bucket_len(&self) -> f64 {
        if self.num_symbols == 0 {
            return 0.0;
        }
        self.total_postings as f64 / self.num_symbols as f64
    }
}

impl core::fmt::Display for IndexStats {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} sets, {} symbols, {} payloads, {} postings ({} set ids, {} symbol ids), ~{} KiB",
            self.num_sets,
            self.num_symbols,
            self.num_payloads,
            self.total_postings,
            self.set_width,
            self.symbol_width,
            self.heap_bytes / 1024
        )
    }
}

#[cfg(test)]
mod tests {
    use crate::index::SetIndex;
    use setdex_types::{IdWidth, IndexConfig};

    #[test]
    fn counts_and_widths() {
        let mut index: SetIndex<u32, &str> = SetIndex::new();
        index.add_with([1, 2, 3], "a").unwrap();
        index.add_with([3, 2, 1], "b").unwrap();
        index.add_with([3, 4], "c").unwrap();

        let stats = index.stats();
        assert_eq!(stats.num_sets, 2);
        assert_eq!(stats.num_symbols, 4);
        assert_eq!(stats.num_payloads, 3);
        assert_eq!(stats.total_postings, 5);
        assert_eq!(stats.set_width, IdWidth::U32);
        assert_eq!(stats.symbol_width, IdWidth::U16);
        assert_eq!(stats.postings_bytes(), 20);
        assert!(stats.heap_bytes > 0);
        assert!((stats.mean_bucket_len() - 1.25).abs() < 1e-12);
    }

    #[test]
    fn narrow_index_reports_narrow_widths() {
        let index: SetIndex<u32, ()> =
            SetIndex::with_config(IndexConfig::new(100, 100)).unwrap();
        let stats = index.stats();
        assert_eq!(stats.set_width, IdWidth::U8);
        assert_eq!(stats.symbol_width, IdWidth::U8);
        assert_eq!(stats.mean_bucket_len(), 0.0);
    }

    #[test]
    fn display() {
        let mut index: SetIndex<u32, ()> = SetIndex::new();
        index.add_with([1, 2], ()).unwrap();
        let shown = index.stats().to_string();
        assert!(shown.starts_with(
            "1 sets, 2 symbols, 1 payloads, 2 postings (u32 set ids, u16 symbol ids)"
        ));
    }
}
