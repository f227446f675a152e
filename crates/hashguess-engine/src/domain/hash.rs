//! Candidate hashing
//!
//! Candidates are hashed with SHA-256 over their raw bytes, with no salt or
//! terminator.

use crate::domain::digest::Digest;
use sha2::{Digest as _, Sha256};

/// SHA-256 of `data`
#[inline]
pub fn sha256(data: &[u8]) -> Digest {
    Sha256::digest(data).into()
}

/// Lowercase hex rendering of a digest
pub fn digest_hex(digest: &Digest) -> String {
    hex::encode(digest)
}
