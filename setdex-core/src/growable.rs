//! Growable Dense Arrays
//!
//! Every table indexed by a dense id (postings buckets, per-set sizes,
//! per-symbol occurrence counts, the payload slot table) grows through
//! [`GrowableArray`], so the growth policy lives in exactly one place.
//!
//! ## Growth Policy
//!
//! ```text
//! ensure(i) with i >= capacity:
//!
//!   capacity' = max(ceil(i * 1.25), i + 1)
//!
//!   [s0][s1][s2][s3]                    capacity 4, ensure(4)
//!   [s0][s1][s2][s3][ 0]                capacity 5
//!   [s0][s1][s2][s3][s4][ 0][ 0]        capacity 7 after ensure(5)
//! ```
//!
//! - Previously written slots are preserved across growth
//! - New slots are zero-filled (`T::default()`)
//! - Total reallocation work stays O(n) amortized over n appends
//!
//! Growth reallocates, so slices taken before an `ensure`/`set` must be
//! re-fetched afterward.
//!
//! ## Width Classes
//!
//! [`IdArray`] wraps a [`GrowableArray`] of the narrowest unsigned integer
//! that a committed [`IdWidth`] allows, and exposes it through `u64`.

use core::ops::Range;

use setdex_types::IdWidth;

/// Returns the capacity a table must grow to so that `index` is addressable.
#[inline(always)]
pub const fn grown_capacity(index: usize) -> usize {
    // ceil(index * 1.25), at least index + 1
    let scaled = index + (index + 3) / 4;
    if scaled > index {
        scaled
    } else {
        index + 1
    }
}

/// A dense, zero-filled array that grows by 1.25x on out-of-range writes.
#[derive(Debug, Clone, Default)]
pub struct GrowableArray<T> {
    buf: Vec<T>,
}

impl<T: Default> GrowableArray<T> {
    /// Creates an empty array with no slots.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Creates an array with `len` zero-filled slots.
    pub fn zeroed(len: usize) -> Self {
        let mut buf = Vec::with_capacity(len);
        buf.resize_with(len, T::default);
        Self { buf }
    }

    /// Number of addressable slots.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Makes `index` addressable, growing by the 1.25x policy if needed.
    #[inline]
    pub fn ensure(&mut self, index: usize) {
        if index < self.buf.len() {
            return;
        }
        let new_len = grown_capacity(index);
        self.buf.reserve_exact(new_len - self.buf.len());
        self.buf.resize_with(new_len, T::default);
    }

    /// Writes `value` at `index`, growing first if needed.
    #[inline]
    pub fn set(&mut self, index: usize, value: T) {
        self.ensure(index);
        self.buf[index] = value;
    }

    /// Returns the slot at `index`, or `None` beyond the capacity.
    #[inline(always)]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.buf.get(index)
    }

    /// Returns the slot at `index` mutably, or `None` beyond the capacity.
    #[inline(always)]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.buf.get_mut(index)
    }

    /// All addressable slots, including zero-filled ones.
    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        &self.buf
    }

    /// Bytes held by the slots themselves.
    pub fn heap_bytes(&self) -> usize {
        self.buf.capacity() * core::mem::size_of::<T>()
    }
}

/// An id or counter array stored at a committed width.
#[derive(Debug, Clone)]
pub enum IdArray {
    /// 8-bit slots.
    U8(GrowableArray<u8>),
    /// 16-bit slots.
    U16(GrowableArray<u16>),
    /// 32-bit slots.
    U32(GrowableArray<u32>),
    /// 64-bit slots.
    U64(GrowableArray<u64>),
}

macro_rules! with_array {
    ($self:expr, $arr:ident => $body:expr) => {
        match $self {
            IdArray::U8($arr) => $body,
            IdArray::U16($arr) => $body,
            IdArray::U32($arr) => $body,
            IdArray::U64($arr) => $body,
        }
    };
}

impl IdArray {
    /// Creates a zero-filled array of `len` slots at `width`.
    pub fn zeroed(width: IdWidth, len: usize) -> Self {
        match width {
            IdWidth::U8 => IdArray::U8(GrowableArray::zeroed(len)),
            IdWidth::U16 => IdArray::U16(GrowableArray::zeroed(len)),
            IdWidth::U32 => IdArray::U32(GrowableArray::zeroed(len)),
            IdWidth::U64 => IdArray::U64(GrowableArray::zeroed(len)),
        }
    }

    /// The storage width of this array.
    #[inline(always)]
    pub fn width(&self) -> IdWidth {
        match self {
            IdArray::U8(_) => IdWidth::U8,
            IdArray::U16(_) => IdWidth::U16,
            IdArray::U32(_) => IdWidth::U32,
            IdArray::U64(_) => IdWidth::U64,
        }
    }

    /// Number of addressable slots.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        with_array!(self, a => a.capacity())
    }

    /// Reads slot `index`; slots beyond the capacity read as zero.
    #[inline(always)]
    pub fn get(&self, index: usize) -> u64 {
        with_array!(self, a => a.get(index).map_or(0, |&v| u64::from(v)))
    }

    /// Writes `value` at `index`, growing first if needed.
    ///
    /// `value` must fit the array's width; callers bound it by the committed
    /// capacity.
    #[inline(always)]
    pub fn set(&mut self, index: usize, value: u64) {
        debug_assert!(
            value <= self.width().max_value(),
            "value {value} does not fit {}",
            self.width()
        );
        with_array!(self, a => a.set(index, value as _))
    }

    /// Adds one to slot `index`, saturating at the width's maximum.
    #[inline(always)]
    pub fn increment(&mut self, index: usize) {
        let next = self.get(index).saturating_add(1).min(self.width().max_value());
        self.set(index, next);
    }

    /// Appends the slots in `range` (clamped to the capacity) to `out`.
    #[inline]
    pub fn extend_into(&self, range: Range<usize>, out: &mut Vec<u64>) {
        with_array!(self, a => {
            let slots = a.as_slice();
            let end = range.end.min(slots.len());
            let start = range.start.min(end);
            out.extend(slots[start..end].iter().map(|&v| u64::from(v)));
        })
    }

    /// Bytes held by the slots.
    pub fn heap_bytes(&self) -> usize {
        with_array!(self, a => a.heap_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn growth_factor() {
        assert_eq!(grown_capacity(0), 1);
        assert_eq!(grown_capacity(1), 2);
        assert_eq!(grown_capacity(4), 5);
        assert_eq!(grown_capacity(5), 7);
        assert_eq!(grown_capacity(16), 20);
        assert_eq!(grown_capacity(100), 125);
    }

    #[test]
    fn ensure_grows_and_zero_fills() {
        let mut arr: GrowableArray<u32> = GrowableArray::zeroed(4);
        for i in 0..4 {
            arr.set(i, i as u32 + 10);
        }
        assert_eq!(arr.capacity(), 4);

        arr.set(4, 99);
        assert_eq!(arr.capacity(), 5);
        assert_eq!(arr.as_slice(), &[10, 11, 12, 13, 99]);

        arr.ensure(40);
        assert_eq!(arr.capacity(), 50);
        assert!(arr.as_slice()[5..].iter().all(|&v| v == 0));
    }

    #[test]
    fn ensure_within_capacity_is_noop() {
        let mut arr: GrowableArray<u8> = GrowableArray::zeroed(8);
        arr.ensure(7);
        assert_eq!(arr.capacity(), 8);
    }

    #[test]
    fn get_beyond_capacity() {
        let arr: GrowableArray<u16> = GrowableArray::new();
        assert_eq!(arr.get(0), None);
        assert_eq!(arr.capacity(), 0);
    }

    #[test]
    fn non_integer_slots() {
        let mut arr: GrowableArray<Vec<&str>> = GrowableArray::new();
        arr.ensure(2);
        if let Some(slot) = arr.get_mut(2) {
            slot.push("x");
        }
        assert_eq!(arr.get(2).map(Vec::len), Some(1));
        assert_eq!(arr.get(0).map(Vec::len), Some(0));
    }

    #[test]
    fn id_array_widths() {
        for width in IdWidth::ALL {
            let mut arr = IdArray::zeroed(width, 4);
            assert_eq!(arr.width(), width);
            arr.set(10, width.max_value());
            assert_eq!(arr.get(10), width.max_value());
            assert_eq!(arr.get(3), 0);
            assert_eq!(arr.get(1_000), 0);
            assert!(arr.heap_bytes() >= arr.capacity() * width.bytes());
        }
    }

    #[test]
    fn id_array_increment_saturates() {
        let mut arr = IdArray::zeroed(IdWidth::U8, 1);
        arr.set(0, 254);
        arr.increment(0);
        assert_eq!(arr.get(0), 255);
        arr.increment(0);
        assert_eq!(arr.get(0), 255);

        arr.increment(5);
        assert_eq!(arr.get(5), 1);
    }

    #[test]
    fn id_array_extend_into_clamps() {
        let mut arr = IdArray::zeroed(IdWidth::U16, 4);
        for i in 0..4 {
            arr.set(i, 100 + i as u64);
        }
        let mut out = Vec::new();
        arr.extend_into(1..3, &mut out);
        assert_eq!(out, vec![101, 102]);

        out.clear();
        arr.extend_into(2..100, &mut out);
        assert_eq!(out, vec![102, 103]);
    }

    proptest! {
        #[test]
        fn growth_preserves_contents(values in proptest::collection::vec(any::<u32>(), 1..300)) {
            let mut arr: GrowableArray<u32> = GrowableArray::zeroed(4);
            for (i, &v) in values.iter().enumerate() {
                arr.set(i, v);
            }
            prop_assert!(arr.capacity() >= values.len());
            prop_assert_eq!(&arr.as_slice()[..values.len()], values.as_slice());
        }
    }
}
