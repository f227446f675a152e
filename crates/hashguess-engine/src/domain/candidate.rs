//! Candidate buffer
//!
//! A fixed-length sequence of slots, each pairing a byte with the alphabet index
//! that produced it. Both halves of a slot are written together, so a slot set
//! from an alphabet always satisfies `byte == alphabet[index]`.

use crate::domain::alphabet::Alphabet;
use std::fmt;

/// One position of a candidate
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    byte: u8,
    /// Alphabet digit value, `None` for literal bytes (dictionary text, substitutes)
    index: Option<usize>,
}

impl Slot {
    /// Slot holding `alphabet[index]`
    #[inline]
    pub fn indexed(alphabet: Alphabet, index: usize) -> Self {
        Self {
            byte: alphabet.char_at(index),
            index: Some(index),
        }
    }

    /// Slot holding a byte that does not come from an alphabet
    #[inline]
    pub fn literal(byte: u8) -> Self {
        Self { byte, index: None }
    }

    #[inline]
    pub fn byte(&self) -> u8 {
        self.byte
    }

    #[inline]
    pub fn index(&self) -> Option<usize> {
        self.index
    }
}

/// Fixed-length mutable candidate
#[derive(Clone, PartialEq, Eq)]
pub struct CandidateBuffer {
    slots: Vec<Slot>,
}

impl CandidateBuffer {
    /// Create a buffer of `len` slots, all set to the first lowercase letter
    pub fn new(len: usize) -> Self {
        Self {
            slots: vec![Slot::indexed(Alphabet::Lowercase, 0); len],
        }
    }

    /// Fixed length `L`
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    #[inline]
    pub fn slot(&self, pos: usize) -> Slot {
        self.slots[pos]
    }

    #[inline]
    pub fn byte(&self, pos: usize) -> u8 {
        self.slots[pos].byte
    }

    #[inline]
    pub fn index(&self, pos: usize) -> Option<usize> {
        self.slots[pos].index
    }

    /// Set slot `pos` to `alphabet[index]`
    #[inline]
    pub fn set_indexed(&mut self, pos: usize, alphabet: Alphabet, index: usize) {
        self.slots[pos] = Slot::indexed(alphabet, index);
    }

    /// Set slot `pos` to a literal byte
    #[inline]
    pub fn set_literal(&mut self, pos: usize, byte: u8) {
        self.slots[pos] = Slot::literal(byte);
    }

    /// Put back a slot previously read with `slot`
    #[inline]
    pub fn set_slot(&mut self, pos: usize, slot: Slot) {
        self.slots[pos] = slot;
    }

    /// Copy the leading bytes of `word` into the buffer
    ///
    /// Returns the number of slots written (`min(word.len(), L)`); the remaining
    /// slots are left untouched.
    pub fn load_prefix(&mut self, word: &[u8]) -> usize {
        let n = word.len().min(self.len());
        for (slot, &b) in self.slots.iter_mut().zip(&word[..n]) {
            *slot = Slot::literal(b);
        }
        n
    }

    /// Write the candidate bytes into `out`, which must be exactly `L` long
    #[inline]
    pub fn write_bytes(&self, out: &mut [u8]) {
        for (dst, slot) in out.iter_mut().zip(&self.slots) {
            *dst = slot.byte;
        }
    }

    /// Candidate bytes as a new vector
    pub fn to_bytes(&self) -> Vec<u8> {
        self.slots.iter().map(|s| s.byte).collect()
    }

    /// Check that every slot from `from` on is governed by `alphabet`
    pub fn is_consistent_with(&self, from: usize, alphabet: Alphabet) -> bool {
        self.slots[from..].iter().all(|s| match s.index {
            Some(i) => i < alphabet.radix() && alphabet.char_at(i) == s.byte,
            None => false,
        })
    }
}

impl fmt::Debug for CandidateBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CandidateBuffer({:?})", String::from_utf8_lossy(&self.to_bytes()))
    }
}

impl fmt::Display for CandidateBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.to_bytes()))
    }
}
