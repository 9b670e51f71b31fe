//! Index types and constants.

use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

use rustc_hash::FxHashMap;
use setdex_types::{Capacity, CapacityPlan, IdWidth, IndexConfig, Result, SetId};
use smallvec::SmallVec;
use tracing::debug;

use crate::growable::{GrowableArray, IdArray};
use crate::index::signature::SignatureCodec;
use crate::index::symbols::SymbolTable;

/// Initial number of payload slots.
pub const INITIAL_SET_SLOTS: usize = 64;

/// Initial auxiliary-statistic slots per configured bucket slot.
pub const STAT_SLOTS_PER_BUCKET: usize = 8;

/// Payloads attached to one set; most sets carry exactly one.
pub type Payloads<P> = SmallVec<[P; 1]>;

/// Inverted set-intersection index.
///
/// Indexes sets of hashable symbols `S`, deduplicating structurally identical
/// sets to one [`SetId`] that accumulates every payload `P` added with it.
///
/// The structure is append-only. Queries take `&self` and the results they
/// return borrow the index, so no `add` can run while a result is alive.
#[derive(Debug)]
pub struct SetIndex<S, P> {
    pub(crate) symbols: SymbolTable<S>,
    pub(crate) sets: GrowableArray<Payloads<P>>,
    pub(crate) set_count: u64,
    pub(crate) by_signature: FxHashMap<Box<[u8]>, SetId>,
    pub(crate) codec: SignatureCodec,
    /// Distinct symbols per set, present with `find_similar` support.
    pub(crate) set_sizes: Option<IdArray>,
    /// Distinct sets per symbol, present with `most_frequent` support.
    pub(crate) symbol_counts: Option<IdArray>,
    pub(crate) plan: CapacityPlan,
    pub(crate) config: IndexConfig,
    /// Reusable signature buffer (avoids allocation per add)
    pub(crate) sig_buf: Vec<u8>,
    pub(crate) adds_executed: u64,
    pub(crate) queries_executed: AtomicU64,
}

impl<S: Hash + Eq, P> Default for SetIndex<S, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Hash + Eq, P> SetIndex<S, P> {
    /// Creates an empty index with the default configuration
    /// (2^32 sets, 2^16 symbols, both statistics enabled).
    pub fn new() -> Self {
        let plan = CapacityPlan {
            sets: Capacity {
                width: IdWidth::U32,
                ceiling: IdWidth::U32.ceiling(),
            },
            symbols: Capacity {
                width: IdWidth::U16,
                ceiling: IdWidth::U16.ceiling(),
            },
        };
        Self::from_plan(IndexConfig::default(), plan)
    }

    /// Creates an empty index with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvalidCapacity` if a capacity request is zero or
    /// `init_bucket_size` is below 4.
    pub fn with_config(config: IndexConfig) -> Result<Self> {
        let plan = config.plan()?;
        Ok(Self::from_plan(config, plan))
    }

    fn from_plan(config: IndexConfig, plan: CapacityPlan) -> Self {
        debug!(
            set_width = %plan.sets.width,
            max_sets = %plan.sets.ceiling,
            symbol_width = %plan.symbols.width,
            max_symbols = %plan.symbols.ceiling,
            "created set index"
        );
        let stat_slots = STAT_SLOTS_PER_BUCKET * config.init_bucket_size;
        Self {
            symbols: SymbolTable::new(plan.symbols, plan.sets.width, config.init_bucket_size),
            sets: GrowableArray::zeroed(INITIAL_SET_SLOTS),
            set_count: 0,
            by_signature: FxHashMap::default(),
            codec: SignatureCodec::new(plan.symbols.width),
            set_sizes: config
                .support_find_similar
                .then(|| IdArray::zeroed(plan.symbols.width.widened(), stat_slots)),
            symbol_counts: config
                .support_most_frequent
                .then(|| IdArray::zeroed(plan.sets.width.widened(), stat_slots)),
            plan,
            config,
            sig_buf: Vec::with_capacity(64),
            adds_executed: 0,
            queries_executed: AtomicU64::new(0),
        }
    }
}

impl<S, P> SetIndex<S, P> {
    /// Number of distinct symbols.
    #[inline(always)]
    #[must_use]
    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    /// Number of distinct sets (not `add` calls).
    #[inline(always)]
    #[must_use]
    pub fn set_count(&self) -> u64 {
        self.set_count
    }

    /// Returns `true` if nothing has been added.
    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.set_count == 0
    }

    /// Committed set ceiling; at least the requested `max_sets`.
    #[inline(always)]
    #[must_use]
    pub fn max_sets(&self) -> u128 {
        self.plan.sets.ceiling
    }

    /// Committed symbol ceiling; at least the requested `max_symbols`.
    #[inline(always)]
    #[must_use]
    pub fn max_symbols(&self) -> u128 {
        self.plan.symbols.ceiling
    }

    /// Whether `most_frequent` is available.
    #[inline(always)]
    #[must_use]
    pub fn supports_most_frequent(&self) -> bool {
        self.symbol_counts.is_some()
    }

    /// Whether `find_similar` is available.
    #[inline(always)]
    #[must_use]
    pub fn supports_find_similar(&self) -> bool {
        self.set_sizes.is_some()
    }

    /// The configuration the index was built from.
    #[inline(always)]
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// The committed capacity classes.
    #[inline(always)]
    pub fn capacity(&self) -> CapacityPlan {
        self.plan
    }

    /// Distinct symbols in first-seen order.
    pub fn symbols(&self) -> impl Iterator<Item = &S> + '_ {
        self.symbols.symbols()
    }

    /// Payloads stored under one set, in `add` order.
    pub fn set_payloads(&self, set_id: SetId) -> Option<&[P]> {
        if set_id >= self.set_count {
            return None;
        }
        self.sets.get(set_id as usize).map(|p| p.as_slice())
    }

    /// All payloads, set-major: every payload of set 0, then set 1, and so on.
    pub fn payloads(&self) -> impl Iterator<Item = &P> + '_ {
        self.sets.as_slice()[..self.set_count as usize]
            .iter()
            .flat_map(|p| p.iter())
    }

    /// Returns basic metrics about the index's operation.
    #[inline(always)]
    #[must_use]
    pub fn metrics(&self) -> EngineMetrics {
        EngineMetrics {
            adds_executed: self.adds_executed,
            queries_executed: self.queries_executed.load(Ordering::Relaxed),
            set_count: self.set_count,
            symbol_count: self.symbols.len() as u64,
        }
    }

    #[inline(always)]
    pub(crate) fn record_query(&self) {
        self.queries_executed.fetch_add(1, Ordering::Relaxed);
    }
}

/// Basic operational metrics for the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineMetrics {
    /// Total number of `add` calls, including ones that hit an existing set.
    pub adds_executed: u64,
    /// Total number of `find`/`find_similar`/`most_frequent` calls.
    pub queries_executed: u64,
    /// Current number of distinct sets.
    pub set_count: u64,
    /// Current number of distinct symbols.
    pub symbol_count: u64,
}
