//! Core types for the setdex set-intersection index.
//!
//! This crate provides the value types shared between the engine and its
//! callers. Keeping them separate ensures:
//!
//! - **No engine coupling**: capacity planning and configuration can be
//!   validated without building an index
//! - **Cross-crate compatibility**: the core crate, benches and downstream
//!   façades agree on one error taxonomy
//! - **Clean boundaries**: no circular dependencies between crates

#![warn(missing_docs)]

use core::fmt;
use std::collections::HashSet;
use std::hash::{BuildHasher, Hash};

use thiserror::Error;

/// Dense identifier of an indexed set.
///
/// Ids are assigned sequentially from 0 in creation order. The id space is
/// bounded by the committed [`Capacity`] for sets, not by the width of this
/// alias: storage uses the narrowest [`IdWidth`] that covers the ceiling.
pub type SetId = u64;

/// Dense identifier of a symbol, assigned in first-seen order.
pub type SymbolId = u64;

/// Result type alias for index operations.
pub type Result<T> = core::result::Result<T, IndexError>;

/// Which id space a capacity error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdSpace {
    /// Distinct indexed sets.
    Sets,
    /// Distinct symbols.
    Symbols,
}

impl fmt::Display for IdSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdSpace::Sets => f.write_str("sets"),
            IdSpace::Symbols => f.write_str("symbols"),
        }
    }
}

/// Errors raised by index construction, mutation and queries.
///
/// Empty query results are never errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndexError {
    /// A constructor bound is out of range.
    #[error("invalid capacity for {parameter}: {value} ({reason})")]
    InvalidCapacity {
        /// Name of the offending parameter.
        parameter: &'static str,
        /// The rejected value.
        value: u64,
        /// Which constraint was violated.
        reason: &'static str,
    },
    /// A query threshold is outside the range documented for the call.
    #[error("invalid threshold {value}: {reason}")]
    InvalidThreshold {
        /// The rejected (or resolved) threshold.
        value: f64,
        /// Which constraint was violated.
        reason: &'static str,
    },
    /// The symbol-id or set-id ceiling was reached during `add`.
    ///
    /// Treat as fatal for the index instance; results already obtained stay valid.
    #[error("index full: maximum number of {space} reached ({ceiling})")]
    CapacityExceeded {
        /// The exhausted id space.
        space: IdSpace,
        /// The committed ceiling.
        ceiling: u128,
    },
    /// A query needs support that was disabled at construction.
    #[error("{0} support disabled")]
    UnsupportedOperation(&'static str),
    /// An unknown backend name was requested.
    #[error("unsupported backend: {0:?}")]
    UnsupportedBackend(String),
}

/// Storage width class for id and counter arrays.
///
/// `#[repr(u8)]` keeps the discriminant equal to the bit width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum IdWidth {
    /// 8-bit ids, ceiling 2^8.
    U8 = 8,
    /// 16-bit ids, ceiling 2^16.
    U16 = 16,
    /// 32-bit ids, ceiling 2^32.
    U32 = 32,
    /// 64-bit ids, ceiling 2^64.
    U64 = 64,
}

impl IdWidth {
    /// All classes, narrowest first.
    pub const ALL: [IdWidth; 4] = [IdWidth::U8, IdWidth::U16, IdWidth::U32, IdWidth::U64];

    /// Number of bits per stored value.
    #[inline(always)]
    pub const fn bits(self) -> u32 {
        self as u32
    }

    /// Number of bytes per stored value.
    #[inline(always)]
    pub const fn bytes(self) -> usize {
        (self as usize) / 8
    }

    /// Number of distinct ids addressable by this class (ids run `0..ceiling`).
    #[inline(always)]
    pub const fn ceiling(self) -> u128 {
        1u128 << self.bits()
    }

    /// Largest value a slot of this class can hold.
    #[inline(always)]
    pub const fn max_value(self) -> u64 {
        match self {
            IdWidth::U8 => u8::MAX as u64,
            IdWidth::U16 => u16::MAX as u64,
            IdWidth::U32 => u32::MAX as u64,
            IdWidth::U64 => u64::MAX,
        }
    }

    /// The next wider class, saturating at [`IdWidth::U64`].
    ///
    /// A counter bounded by a ceiling can equal the ceiling itself, which does
    /// not fit in the class that addresses `0..ceiling`.
    #[inline(always)]
    pub const fn widened(self) -> Self {
        match self {
            IdWidth::U8 => IdWidth::U16,
            IdWidth::U16 => IdWidth::U32,
            IdWidth::U32 | IdWidth::U64 => IdWidth::U64,
        }
    }
}

impl fmt::Display for IdWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u{}", self.bits())
    }
}

/// A committed capacity class: the storage width and the true id ceiling.
///
/// The ceiling may exceed what was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capacity {
    /// Width of the id arrays.
    pub width: IdWidth,
    /// Number of ids available, `2^width`.
    pub ceiling: u128,
}

impl Capacity {
    /// Picks the narrowest class whose id range covers `requested` ids.
    ///
    /// Returns `None` for a request of zero. Every non-zero `u64` fits the
    /// widest class.
    ///
    /// # Example
    ///
    /// ```
    /// use setdex_types::{Capacity, IdWidth};
    ///
    /// let cap = Capacity::for_request(300).unwrap();
    /// assert_eq!(cap.width, IdWidth::U16);
    /// assert_eq!(cap.ceiling, 65_536);
    /// ```
    pub fn for_request(requested: u64) -> Option<Self> {
        if requested == 0 {
            return None;
        }
        IdWidth::ALL
            .into_iter()
            .find(|w| w.ceiling() >= requested as u128)
            .map(|width| Self {
                width,
                ceiling: width.ceiling(),
            })
    }

    /// Returns `true` if `id` is below the ceiling.
    #[inline(always)]
    pub fn admits(self, id: u64) -> bool {
        (id as u128) < self.ceiling
    }
}

/// The pair of capacities an index commits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityPlan {
    /// Set-id space.
    pub sets: Capacity,
    /// Symbol-id space.
    pub symbols: Capacity,
}

/// Smallest accepted initial postings bucket size.
pub const MIN_BUCKET_SIZE: usize = 4;

/// Conventional `find` threshold: at least one shared symbol.
pub const DEFAULT_FIND_THRESHOLD: i64 = 1;

/// Conventional `find_similar` threshold.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.3;

/// Conventional `most_frequent` ratio to the highest occurrence count.
pub const DEFAULT_FREQUENCY_THRESHOLD: f64 = 2.0 / 3.0;

/// Index construction options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexConfig {
    /// Minimum number of distinct sets the index must hold.
    /// Default: 2^32
    pub max_sets: u64,
    /// Minimum number of distinct symbols the index must hold.
    /// Default: 2^16
    pub max_symbols: u64,
    /// Initial slot count of each postings bucket (min 4).
    /// Default: 16
    pub init_bucket_size: usize,
    /// Keep per-symbol occurrence counts for `most_frequent`.
    pub support_most_frequent: bool,
    /// Keep per-set sizes for `find_similar`.
    pub support_find_similar: bool,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_sets: 1 << 32,
            max_symbols: 1 << 16,
            init_bucket_size: 16,
            support_most_frequent: true,
            support_find_similar: true,
        }
    }
}

impl IndexConfig {
    /// Creates a configuration with the given capacity requests and defaults otherwise.
    pub const fn new(max_sets: u64, max_symbols: u64) -> Self {
        Self {
            max_sets,
            max_symbols,
            init_bucket_size: 16,
            support_most_frequent: true,
            support_find_similar: true,
        }
    }

    /// Creates a configuration without auxiliary statistics.
    ///
    /// Only `find` is available on an index built from it.
    pub const fn minimal() -> Self {
        Self {
            max_sets: 1 << 32,
            max_symbols: 1 << 16,
            init_bucket_size: 16,
            support_most_frequent: false,
            support_find_similar: false,
        }
    }

    /// Sets the initial postings bucket size.
    pub const fn with_init_bucket_size(mut self, size: usize) -> Self {
        self.init_bucket_size = size;
        self
    }

    /// Enables or disables `most_frequent` support.
    pub const fn with_most_frequent(mut self, enabled: bool) -> Self {
        self.support_most_frequent = enabled;
        self
    }

    /// Enables or disables `find_similar` support.
    pub const fn with_find_similar(mut self, enabled: bool) -> Self {
        self.support_find_similar = enabled;
        self
    }

    /// Validates the configuration and commits the capacity classes.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvalidCapacity` if `max_sets` or `max_symbols`
    /// is zero, or `init_bucket_size` is below [`MIN_BUCKET_SIZE`].
    pub fn plan(&self) -> Result<CapacityPlan> {
        let sets = Capacity::for_request(self.max_sets).ok_or(IndexError::InvalidCapacity {
            parameter: "max_sets",
            value: self.max_sets,
            reason: "must be at least 1",
        })?;
        let symbols =
            Capacity::for_request(self.max_symbols).ok_or(IndexError::InvalidCapacity {
                parameter: "max_symbols",
                value: self.max_symbols,
                reason: "must be at least 1",
            })?;
        if self.init_bucket_size < MIN_BUCKET_SIZE {
            return Err(IndexError::InvalidCapacity {
                parameter: "init_bucket_size",
                value: self.init_bucket_size as u64,
                reason: "must be at least 4",
            });
        }
        Ok(CapacityPlan { sets, symbols })
    }
}

/// A trigram (3-character sequence) packed into a 63-bit integer.
///
/// Characters are packed as `(c0 << 42) | (c1 << 21) | c2`; every Unicode
/// scalar value fits in 21 bits. This representation:
/// - Enables fast equality comparison and hashing
/// - Works as a hash map key without allocation
/// - Preserves full Unicode (unlike byte trigrams)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Trigram(pub u64);

impl Trigram {
    const CHAR_BITS: u32 = 21;
    const CHAR_MASK: u64 = (1 << Self::CHAR_BITS) - 1;

    /// Creates a trigram from three characters.
    #[inline(always)]
    pub const fn from_chars(c0: char, c1: char, c2: char) -> Self {
        Self(((c0 as u64) << (2 * Self::CHAR_BITS)) | ((c1 as u64) << Self::CHAR_BITS) | (c2 as u64))
    }

    /// Parses a string of exactly three characters.
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let (c0, c1, c2) = (chars.next()?, chars.next()?, chars.next()?);
        if chars.next().is_some() {
            return None;
        }
        Some(Self::from_chars(c0, c1, c2))
    }

    /// Returns the three characters of this trigram.
    #[inline(always)]
    pub fn to_chars(self) -> [char; 3] {
        let unpack = |shift: u32| {
            char::from_u32(((self.0 >> shift) & Self::CHAR_MASK) as u32)
                .unwrap_or(char::REPLACEMENT_CHARACTER)
        };
        [unpack(2 * Self::CHAR_BITS), unpack(Self::CHAR_BITS), unpack(0)]
    }

    /// Returns the underlying packed value.
    #[inline(always)]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<[char; 3]> for Trigram {
    #[inline(always)]
    fn from(c: [char; 3]) -> Self {
        Self::from_chars(c[0], c[1], c[2])
    }
}

impl fmt::Display for Trigram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.to_chars() {
            fmt::Write::write_char(f, c)?;
        }
        Ok(())
    }
}

/// Similarity of two whole sets: `|a ∩ b| / (|a| + |b| - |a ∩ b|)`.
///
/// This is the score `find_similar` reports for a query against an indexed
/// set. Two empty sets have similarity 0.0.
///
/// # Example
///
/// ```
/// use std::collections::HashSet;
/// use setdex_types::similarity;
///
/// let a: HashSet<u32> = [1, 2, 3].into_iter().collect();
/// let b: HashSet<u32> = [1, 2, 3, 4].into_iter().collect();
/// assert_eq!(similarity(&a, &b), 0.75);
/// ```
pub fn similarity<T, Sa, Sb>(a: &HashSet<T, Sa>, b: &HashSet<T, Sb>) -> f64
where
    T: Hash + Eq,
    Sa: BuildHasher,
    Sb: BuildHasher,
{
    let common = if a.len() <= b.len() {
        a.iter().filter(|x| b.contains(*x)).count()
    } else {
        b.iter().filter(|x| a.contains(*x)).count()
    };
    let union = a.len() + b.len() - common;
    if union == 0 {
        return 0.0;
    }
    common as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    #[test]
    fn capacity_classes() {
        let cap = Capacity::for_request(1).unwrap();
        assert_eq!(cap.width, IdWidth::U8);
        assert_eq!(cap.ceiling, 256);

        assert_eq!(Capacity::for_request(256).unwrap().width, IdWidth::U8);
        assert_eq!(Capacity::for_request(257).unwrap().width, IdWidth::U16);
        assert_eq!(Capacity::for_request(65_536).unwrap().width, IdWidth::U16);
        assert_eq!(Capacity::for_request(65_537).unwrap().width, IdWidth::U32);

        let cap = Capacity::for_request(1 << 32).unwrap();
        assert_eq!(cap.width, IdWidth::U32);
        assert_eq!(cap.ceiling, 1u128 << 32);
        assert!(cap.ceiling.is_power_of_two());

        let cap = Capacity::for_request((1 << 32) + 1).unwrap();
        assert_eq!(cap.width, IdWidth::U64);

        let cap = Capacity::for_request(u64::MAX).unwrap();
        assert_eq!(cap.width, IdWidth::U64);
        assert_eq!(cap.ceiling, 1u128 << 64);
    }

    #[test]
    fn capacity_rejects_zero() {
        assert!(Capacity::for_request(0).is_none());
    }

    #[test]
    fn capacity_admits_below_ceiling() {
        let cap = Capacity::for_request(10).unwrap();
        assert!(cap.admits(0));
        assert!(cap.admits(255));
        assert!(!cap.admits(256));
    }

    #[test]
    fn widths() {
        assert_eq!(IdWidth::U16.bytes(), 2);
        assert_eq!(IdWidth::U64.bits(), 64);
        assert_eq!(IdWidth::U8.widened(), IdWidth::U16);
        assert_eq!(IdWidth::U64.widened(), IdWidth::U64);
        assert_eq!(IdWidth::U32.max_value(), u32::MAX as u64);
        assert_eq!(IdWidth::U32.to_string(), "u32");
    }

    #[test]
    fn config_plan_defaults() {
        let plan = IndexConfig::default().plan().unwrap();
        assert_eq!(plan.sets.width, IdWidth::U32);
        assert_eq!(plan.symbols.width, IdWidth::U16);
    }

    #[test]
    fn config_plan_rejects_bad_bounds() {
        let err = IndexConfig::new(0, 10).plan().unwrap_err();
        assert!(matches!(
            err,
            IndexError::InvalidCapacity {
                parameter: "max_sets",
                ..
            }
        ));

        let err = IndexConfig::new(10, 0).plan().unwrap_err();
        assert!(matches!(
            err,
            IndexError::InvalidCapacity {
                parameter: "max_symbols",
                ..
            }
        ));

        let err = IndexConfig::default()
            .with_init_bucket_size(3)
            .plan()
            .unwrap_err();
        assert!(matches!(
            err,
            IndexError::InvalidCapacity {
                parameter: "init_bucket_size",
                value: 3,
                ..
            }
        ));
        assert!(IndexConfig::default()
            .with_init_bucket_size(4)
            .plan()
            .is_ok());
    }

    #[test]
    fn config_presets() {
        let minimal = IndexConfig::minimal();
        assert!(!minimal.support_find_similar);
        assert!(!minimal.support_most_frequent);

        let cfg = IndexConfig::new(100, 100)
            .with_find_similar(false)
            .with_most_frequent(true);
        assert!(!cfg.support_find_similar);
        assert!(cfg.support_most_frequent);
    }

    #[test]
    fn error_messages() {
        let err = IndexError::CapacityExceeded {
            space: IdSpace::Symbols,
            ceiling: 256,
        };
        assert_eq!(
            err.to_string(),
            "index full: maximum number of symbols reached (256)"
        );
        assert_eq!(
            IndexError::UnsupportedOperation("find_similar").to_string(),
            "find_similar support disabled"
        );
    }

    #[test]
    fn trigram_packing() {
        let t = Trigram::from_chars(' ', 'i', 't');
        assert_eq!(t.to_chars(), [' ', 'i', 't']);
        assert_eq!(t.to_string(), " it");
        assert_eq!(Trigram::parse(" it"), Some(t));
    }

    #[test]
    fn trigram_unicode() {
        let t = Trigram::parse("żół").unwrap();
        assert_eq!(t.to_chars(), ['ż', 'ó', 'ł']);
        assert_ne!(t, Trigram::parse("zol").unwrap());
    }

    #[test]
    fn trigram_parse_requires_three_chars() {
        assert!(Trigram::parse("ab").is_none());
        assert!(Trigram::parse("abcd").is_none());
        assert!(Trigram::parse("").is_none());
    }

    #[test]
    fn similarity_formula() {
        let a: FxHashSet<u32> = [1, 2, 3].into_iter().collect();
        let b: FxHashSet<u32> = [1, 3, 5, 6].into_iter().collect();
        // i = 2, A = 3, B = 4
        assert!((similarity(&a, &b) - 0.4).abs() < 1e-12);
        assert_eq!(similarity(&a, &a), 1.0);

        let empty: FxHashSet<u32> = FxHashSet::default();
        assert_eq!(similarity(&empty, &empty), 0.0);
        assert_eq!(similarity(&a, &empty), 0.0);
    }
}
