//! Bitboard implementation for fast occupancy tests

use super::{Pos, TOTAL_CELLS};

/// Number of 32-bit words in a bitboard.
pub const BITBOARD_WORDS: usize = 8;

const WORD_BITS: usize = 32;

/// One player's stones.
/// Uses 8 x u32 to represent 225 cells (8 * 32 = 256 >= 225).
/// Bits at index 225 and above are always clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bitboard {
    bits: [u32; BITBOARD_WORDS],
}

impl Bitboard {
    /// Create empty bitboard
    pub const fn new() -> Self {
        Self {
            bits: [0; BITBOARD_WORDS],
        }
    }

    /// Build from raw words, clearing any bit beyond the last cell.
    pub fn from_words(mut bits: [u32; BITBOARD_WORDS]) -> Self {
        let tail = TOTAL_CELLS % WORD_BITS;
        bits[TOTAL_CELLS / WORD_BITS] &= (1u32 << tail) - 1;
        Self { bits }
    }

    /// Raw words, in wire order.
    #[inline]
    pub fn words(&self) -> [u32; BITBOARD_WORDS] {
        self.bits
    }

    /// Set a bit at position
    #[inline]
    pub fn set(&mut self, pos: Pos) {
        let idx = pos.to_index();
        self.bits[idx / WORD_BITS] |= 1u32 << (idx % WORD_BITS);
    }

    /// Check if bit is set at position
    #[inline]
    pub fn get(&self, pos: Pos) -> bool {
        let idx = pos.to_index();
        (self.bits[idx / WORD_BITS] >> (idx % WORD_BITS)) & 1 == 1
    }

    /// Copy of this bitboard with one more bit set.
    #[inline]
    #[must_use]
    pub fn with(mut self, pos: Pos) -> Self {
        self.set(pos);
        self
    }

    /// Count total set bits (popcount)
    #[inline]
    pub fn count(&self) -> u32 {
        self.bits.iter().map(|b| b.count_ones()).sum()
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&b| b == 0)
    }

    /// Bitwise union
    #[inline]
    pub fn union(&self, other: &Bitboard) -> Bitboard {
        let mut bits = self.bits;
        for (b, o) in bits.iter_mut().zip(other.bits.iter()) {
            *b |= o;
        }
        Bitboard { bits }
    }

    /// Bitwise intersection
    #[inline]
    pub fn intersection(&self, other: &Bitboard) -> Bitboard {
        let mut bits = self.bits;
        for (b, o) in bits.iter_mut().zip(other.bits.iter()) {
            *b &= o;
        }
        Bitboard { bits }
    }

    /// Iterate over set bit positions
    pub fn iter_ones(&self) -> BitboardIter {
        BitboardIter {
            bits: self.bits,
            word_idx: 0,
            current_word: self.bits[0],
        }
    }
}

/// Iterator over set bits in a Bitboard, in ascending cell order
pub struct BitboardIter {
    bits: [u32; BITBOARD_WORDS],
    word_idx: usize,
    current_word: u32,
}

impl Iterator for BitboardIter {
    type Item = Pos;

    fn next(&mut self) -> Option<Self::Item> {
        while self.current_word == 0 {
            self.word_idx += 1;
            if self.word_idx >= BITBOARD_WORDS {
                return None;
            }
            self.current_word = self.bits[self.word_idx];
        }

        let bit_pos = self.current_word.trailing_zeros() as usize;
        let idx = self.word_idx * WORD_BITS + bit_pos;

        // Clear the bit we just found
        self.current_word &= self.current_word - 1;

        if idx < TOTAL_CELLS {
            Some(Pos::from_index(idx))
        } else {
            None
        }
    }
}
