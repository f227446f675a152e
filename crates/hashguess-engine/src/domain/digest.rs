//! Digest bank
//!
//! The ordered set of target digests and their matched flags. Entries are
//! addressed by their 0-based position in the bank file. A flag only ever goes
//! from unmatched to matched, and `match_digest` is the one place that does it
//! for candidates.

use crate::constants::DIGEST_SIZE;
use crate::error::{GuessError, Result};

#[cfg(feature = "hashmap-search")]
use rustc_hash::FxHashMap;

/// Raw digest value
pub type Digest = [u8; DIGEST_SIZE];

/// One target digest
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DigestEntry {
    digest: Digest,
    matched: bool,
}

impl DigestEntry {
    pub fn new(digest: Digest) -> Self {
        Self {
            digest,
            matched: false,
        }
    }

    #[inline]
    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    #[inline]
    pub fn is_matched(&self) -> bool {
        self.matched
    }
}

/// A candidate that reproduced a bank digest
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match {
    /// Plaintext candidate bytes
    pub candidate: Vec<u8>,
    /// 0-based bank index
    pub index: usize,
}

impl Match {
    /// 1-based record number, as printed in reports
    pub fn record(&self) -> usize {
        self.index + 1
    }
}

/// Ordered collection of target digests
#[derive(Clone, Debug, Default)]
pub struct DigestBank {
    entries: Vec<DigestEntry>,
    matched: usize,
    /// digest -> bank indices holding it, ascending
    #[cfg(feature = "hashmap-search")]
    index: FxHashMap<Digest, Vec<usize>>,
}

impl DigestBank {
    /// Build a bank from digests in file order
    pub fn new(digests: Vec<Digest>) -> Self {
        let entries: Vec<DigestEntry> = digests.into_iter().map(DigestEntry::new).collect();

        #[cfg(feature = "hashmap-search")]
        let index = {
            let mut map: FxHashMap<Digest, Vec<usize>> = FxHashMap::default();
            for (i, entry) in entries.iter().enumerate() {
                map.entry(entry.digest).or_default().push(i);
            }
            map
        };

        Self {
            entries,
            matched: 0,
            #[cfg(feature = "hashmap-search")]
            index,
        }
    }

    /// Split raw bytes into digests
    ///
    /// A trailing partial record (`raw.len() % DIGEST_SIZE` bytes) is dropped.
    pub fn from_bytes(raw: &[u8]) -> Self {
        let digests = raw
            .chunks_exact(DIGEST_SIZE)
            .map(|chunk| {
                let mut d = [0u8; DIGEST_SIZE];
                d.copy_from_slice(chunk);
                d
            })
            .collect();
        Self::new(digests)
    }

    /// Number of digests
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at a 0-based index
    pub fn get(&self, index: usize) -> Option<&DigestEntry> {
        self.entries.get(index)
    }

    /// Iterate entries in bank order
    pub fn iter(&self) -> impl Iterator<Item = &DigestEntry> + '_ {
        self.entries.iter()
    }

    /// Number of entries already matched
    #[inline]
    pub fn matched_count(&self) -> usize {
        self.matched
    }

    /// True when no entry is left to match
    #[inline]
    pub fn all_matched(&self) -> bool {
        self.matched == self.entries.len()
    }

    /// Indices of matched entries, ascending
    pub fn matched_indices(&self) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.matched)
            .map(|(i, _)| i)
            .collect()
    }

    /// Mark the first unmatched entry equal to `digest` as matched
    ///
    /// Returns its index, or `None` when no unmatched entry holds this digest.
    /// Repeated digests in the bank are matched one per call, in bank order.
    pub fn match_digest(&mut self, digest: &Digest) -> Option<usize> {
        let found = self.find_unmatched(digest)?;
        self.entries[found].matched = true;
        self.matched += 1;
        Some(found)
    }

    /// Mark an entry as matched without a candidate (resume state)
    ///
    /// Returns whether the flag changed.
    pub fn mark_matched(&mut self, index: usize) -> Result<bool> {
        let len = self.entries.len();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(GuessError::IndexOutOfRange { index, len })?;

        if entry.matched {
            return Ok(false);
        }
        entry.matched = true;
        self.matched += 1;
        Ok(true)
    }

    #[cfg(feature = "hashmap-search")]
    fn find_unmatched(&self, digest: &Digest) -> Option<usize> {
        self.index
            .get(digest)?
            .iter()
            .copied()
            .find(|&i| !self.entries[i].matched)
    }

    #[cfg(not(feature = "hashmap-search"))]
    fn find_unmatched(&self, digest: &Digest) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| !e.matched && e.digest == *digest)
    }
}
