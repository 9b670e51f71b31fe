//! Canonical byte keys for symbol-id sets.
//!
//! Two `add` calls with the same distinct symbols must land on the same set
//! id no matter the iteration order or repetition of their input. The codec
//! turns the sorted, deduplicated id list into a fixed-width little-endian
//! byte string:
//!
//! ```text
//! width u16, ids [3, 7, 260]  ->  03 00 | 07 00 | 04 01
//! ```
//!
//! The width is the committed symbol-id width, so key length is
//! `ids.len() * width.bytes()` and equal id sets always encode identically.

use setdex_types::IdWidth;

#[derive(Debug, Clone, Copy)]
pub(crate) struct SignatureCodec {
    width: IdWidth,
}

impl SignatureCodec {
    pub(crate) const fn new(width: IdWidth) -> Self {
        Self { width }
    }

    /// Encodes `ids` into `out`, replacing its contents.
    ///
    /// `ids` must be sorted ascending without duplicates.
    #[inline]
    pub(crate) fn encode(&self, ids: &[usize], out: &mut Vec<u8>) {
        debug_assert!(
            ids.windows(2).all(|w| w[0] < w[1]),
            "signature ids must be strictly ascending"
        );
        out.clear();
        out.reserve(ids.len() * self.width.bytes());
        for &id in ids {
            let id = id as u64;
            match self.width {
                IdWidth::U8 => out.push(id as u8),
                IdWidth::U16 => out.extend_from_slice(&(id as u16).to_le_bytes()),
                IdWidth::U32 => out.extend_from_slice(&(id as u32).to_le_bytes()),
                IdWidth::U64 => out.extend_from_slice(&id.to_le_bytes()),
            }
        }
    }
}
