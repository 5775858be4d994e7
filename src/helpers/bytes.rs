//! Bounds-checked little-endian reads over byte slices.
//! Every accessor returns `None` instead of panicking when the slice is too short,
//! so truncated or corrupted files surface as decoding errors.

/// Little-endian integer and float accessors at a byte offset.
pub(crate) trait LeBytes {
    fn u16_at(&self, offset: usize) -> Option<u16>;
    fn u32_at(&self, offset: usize) -> Option<u32>;
    fn u64_at(&self, offset: usize) -> Option<u64>;
    fn f64_at(&self, offset: usize) -> Option<f64>;

    /// Reads a 32-bit value and widens it to `usize`.
    fn usize_at(&self, offset: usize) -> Option<usize> {
        self.u32_at(offset).and_then(|value| usize::try_from(value).ok())
    }
}

impl LeBytes for [u8] {
    fn u16_at(&self, offset: usize) -> Option<u16> {
        array_at::<2>(self, offset).map(u16::from_le_bytes)
    }

    fn u32_at(&self, offset: usize) -> Option<u32> {
        array_at::<4>(self, offset).map(u32::from_le_bytes)
    }

    fn u64_at(&self, offset: usize) -> Option<u64> {
        array_at::<8>(self, offset).map(u64::from_le_bytes)
    }

    fn f64_at(&self, offset: usize) -> Option<f64> {
        array_at::<8>(self, offset).map(f64::from_le_bytes)
    }
}

fn array_at<const N: usize>(bytes: &[u8], offset: usize) -> Option<[u8; N]> {
    let end = offset.checked_add(N)?;
    bytes.get(offset..end)?.try_into().ok()
}

/// Splits a slice into consecutive little-endian 32-bit values, ignoring a trailing partial chunk.
pub(crate) fn usize_values(bytes: &[u8]) -> impl Iterator<Item = usize> + '_ {
    bytes
        .chunks_exact(4)
        .filter_map(|chunk| chunk.usize_at(0))
}
