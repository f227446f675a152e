//! Digest bank file I/O
//!
//! A bank file is a flat sequence of raw 32-byte digests with no header.
//! Records are addressed by their 0-based position in the file.

use crate::constants::DIGEST_SIZE;
use crate::domain::digest::{Digest, DigestBank};
use crate::error::{GuessError, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{debug, warn};

#[cfg(feature = "mmap")]
use memmap2::Mmap;

fn warn_partial_record(path: &Path, len: usize) {
    let extra = len % DIGEST_SIZE;
    if extra != 0 {
        warn!(
            path = %path.display(),
            extra,
            "digest bank length is not a multiple of {} bytes; trailing bytes ignored",
            DIGEST_SIZE
        );
    }
}

/// Load a digest bank file
///
/// A trailing partial record is dropped.
pub fn load_digest_bank(path: impl AsRef<Path>) -> Result<DigestBank> {
    let path = path.as_ref();
    let raw = fs::read(path).map_err(|e| GuessError::open(path, e))?;

    warn_partial_record(path, raw.len());
    let bank = DigestBank::from_bytes(&raw);
    debug!(path = %path.display(), digests = bank.len(), "loaded digest bank");

    Ok(bank)
}

/// Load a digest bank file through a memory map
///
/// Same result as `load_digest_bank`, without an intermediate copy of the file.
#[cfg(feature = "mmap")]
pub fn load_digest_bank_mapped(path: impl AsRef<Path>) -> Result<DigestBank> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| GuessError::open(path, e))?;

    if file.metadata()?.len() == 0 {
        return Ok(DigestBank::default());
    }

    // SAFETY: the bank file is only read, and not expected to change while mapped
    let mmap = unsafe { Mmap::map(&file)? };

    warn_partial_record(path, mmap.len());
    Ok(DigestBank::from_bytes(&mmap))
}

/// Write digests to a bank file, in order
pub fn save_digests(path: impl AsRef<Path>, digests: &[Digest]) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| GuessError::open(path, e))?;
    let mut writer = BufWriter::new(file);

    for digest in digests {
        writer.write_all(digest)?;
    }

    writer.flush()?;
    Ok(())
}
