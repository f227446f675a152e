//! Resume state file format definitions
//!
//! A resume file records which digests of a bank were already matched by an
//! earlier run. It is bound to its bank by a checksum over the digest bytes.

use crate::constants::{RESUME_FORMAT_VERSION, RESUME_HEADER_SIZE, RESUME_INDEX_SIZE, RESUME_MAGIC};
use crate::domain::digest::DigestBank;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// Resume file header metadata
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResumeHeader {
    /// File format version
    pub version: u16,
    /// Number of digests in the bank this state belongs to
    pub digest_count: u64,
    /// Number of matched indices stored after the header
    pub matched_count: u64,
    /// Checksum of the bank's digest bytes
    pub bank_checksum: u64,
    /// Creation timestamp (Unix epoch seconds)
    pub created_at: u64,
}

impl ResumeHeader {
    /// Create a header describing `matched_count` matched entries of `bank`
    pub fn new(bank: &DigestBank, matched_count: u64) -> Self {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        Self {
            version: RESUME_FORMAT_VERSION,
            digest_count: bank.len() as u64,
            matched_count,
            bank_checksum: calculate_bank_checksum(bank),
            created_at,
        }
    }

    /// Serialize header to bytes (64 bytes)
    pub fn to_bytes(&self) -> [u8; RESUME_HEADER_SIZE] {
        let mut buf = [0u8; RESUME_HEADER_SIZE];

        buf[0..8].copy_from_slice(&RESUME_MAGIC);
        buf[8..10].copy_from_slice(&self.version.to_le_bytes());
        // 10..16 reserved
        buf[16..24].copy_from_slice(&self.digest_count.to_le_bytes());
        buf[24..32].copy_from_slice(&self.matched_count.to_le_bytes());
        buf[32..40].copy_from_slice(&self.bank_checksum.to_le_bytes());
        buf[40..48].copy_from_slice(&self.created_at.to_le_bytes());
        // 48..64 reserved

        buf
    }

    /// Deserialize header from bytes
    pub fn from_bytes(buf: &[u8; RESUME_HEADER_SIZE]) -> Result<Self, ResumeFormatError> {
        if buf[0..8] != RESUME_MAGIC {
            return Err(ResumeFormatError::InvalidMagic);
        }

        let version = u16::from_le_bytes([buf[8], buf[9]]);
        if version != RESUME_FORMAT_VERSION {
            return Err(ResumeFormatError::UnsupportedVersion(version));
        }

        let read_u64 = |at: usize| {
            let mut b = [0u8; 8];
            b.copy_from_slice(&buf[at..at + 8]);
            u64::from_le_bytes(b)
        };

        Ok(Self {
            version,
            digest_count: read_u64(16),
            matched_count: read_u64(24),
            bank_checksum: read_u64(32),
            created_at: read_u64(40),
        })
    }

    /// Verify this resume state belongs to `bank`
    pub fn verify_bank(&self, bank: &DigestBank) -> Result<(), ResumeFormatError> {
        if self.digest_count != bank.len() as u64 {
            return Err(ResumeFormatError::DigestCountMismatch {
                expected: bank.len() as u64,
                found: self.digest_count,
            });
        }

        let expected = calculate_bank_checksum(bank);
        if self.bank_checksum != expected {
            return Err(ResumeFormatError::BankMismatch {
                expected,
                found: self.bank_checksum,
            });
        }
        Ok(())
    }
}

/// Checksum of a bank's digests (FNV-1a over the bytes, in bank order)
pub fn calculate_bank_checksum(bank: &DigestBank) -> u64 {
    let mut h: u64 = FNV_OFFSET_BASIS;
    for entry in bank.iter() {
        for &b in entry.digest() {
            h ^= b as u64;
            h = h.wrapping_mul(FNV_PRIME);
        }
    }
    h
}

/// Calculate expected file size from header
pub fn expected_resume_file_size(header: &ResumeHeader) -> u64 {
    RESUME_HEADER_SIZE as u64 + header.matched_count * RESUME_INDEX_SIZE as u64
}

/// Resume file format errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResumeFormatError {
    #[error("invalid file format: not a resume state file")]
    InvalidMagic,

    #[error("unsupported format version: {0}")]
    UnsupportedVersion(u16),

    #[error("digest count mismatch: bank holds {expected}, resume state was written for {found}")]
    DigestCountMismatch { expected: u64, found: u64 },

    #[error("digest bank mismatch: checksum expected {expected:016x}, found {found:016x}")]
    BankMismatch { expected: u64, found: u64 },

    #[error("invalid file size: expected {expected} bytes, found {found} bytes")]
    InvalidFileSize { expected: u64, found: u64 },

    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for ResumeFormatError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
