//! Fixed-width integer array packed into `u64` words.
//!
//! Widths are powers of two (0, 1, 2, 4, 8, 16) so an element never straddles
//! a word boundary.

use serde::{Deserialize, Serialize};

/// Compact array where each element uses exactly `bits` bits.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BitPackedArray {
    words: Vec<u64>,
    bits: u8,
    len: usize,
}

impl BitPackedArray {
    /// Zero-filled array of `len` elements.
    pub fn new(bits: u8, len: usize) -> Self {
        debug_assert!(
            matches!(bits, 0 | 1 | 2 | 4 | 8 | 16),
            "bits must be a power of two up to 16"
        );
        let word_count = if bits == 0 {
            0
        } else {
            (len as u64 * u64::from(bits)).div_ceil(64) as usize
        };
        Self {
            words: vec![0; word_count],
            bits,
            len,
        }
    }

    /// Smallest supported width able to index `distinct` values.
    pub fn bits_for(distinct: usize) -> u8 {
        match distinct {
            0 | 1 => 0,
            2 => 1,
            3..=4 => 2,
            5..=16 => 4,
            17..=256 => 8,
            _ => 16,
        }
    }

    #[inline]
    fn locate(&self, index: usize) -> (usize, u32, u64) {
        let bit_index = index * self.bits as usize;
        (bit_index / 64, (bit_index % 64) as u32, (1u64 << self.bits) - 1)
    }

    #[inline]
    pub fn get(&self, index: usize) -> u16 {
        debug_assert!(index < self.len, "index {index} out of bounds");
        if self.bits == 0 {
            return 0;
        }
        let (word, offset, mask) = self.locate(index);
        ((self.words[word] >> offset) & mask) as u16
    }

    #[inline]
    pub fn set(&mut self, index: usize, value: u16) {
        debug_assert!(index < self.len, "index {index} out of bounds");
        if self.bits == 0 {
            return;
        }
        let (word, offset, mask) = self.locate(index);
        debug_assert!(u64::from(value) <= mask, "value {value} exceeds {} bits", self.bits);
        self.words[word] = (self.words[word] & !(mask << offset)) | (u64::from(value) << offset);
    }

    /// Copy of this array at a different width. Values must fit `bits`.
    pub fn repacked(&self, bits: u8) -> Self {
        let mut out = Self::new(bits, self.len);
        if self.bits > 0 && bits > 0 {
            for i in 0..self.len {
                out.set(i, self.get(i));
            }
        }
        out
    }

    /// Iterates every element in index order.
    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        (0..self.len).map(move |i| self.get(i))
    }

    pub fn bits(&self) -> u8 {
        self.bits
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes of backing storage.
    pub fn storage_bytes(&self) -> usize {
        self.words.len() * 8
    }
}
