//! Resume state I/O operations
//!
//! This module provides functions for reading and writing resume state files.

use crate::constants::{RESUME_FILE_EXTENSION, RESUME_HEADER_SIZE};
use crate::domain::digest::DigestBank;
use crate::domain::resume_format::{ResumeFormatError, ResumeHeader, expected_resume_file_size};
use crate::error::Result;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;

fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    Ok(())
}

/// Default resume file path for a bank file
///
/// Format: `{bank}.hgrs`
pub fn get_resume_path(bank_path: impl AsRef<Path>) -> PathBuf {
    let mut name = bank_path.as_ref().as_os_str().to_owned();
    name.push(".");
    name.push(RESUME_FILE_EXTENSION);
    PathBuf::from(name)
}

/// Save the matched indices of `bank`
pub fn save_resume_state(path: impl AsRef<Path>, bank: &DigestBank) -> Result<(), ResumeFormatError> {
    ensure_parent_dir(path.as_ref())?;
    let matched = bank.matched_indices();
    let header = ResumeHeader::new(bank, matched.len() as u64);

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    writer.write_all(&header.to_bytes())?;

    for index in matched {
        writer.write_u32::<LittleEndian>(index as u32)?;
    }

    writer.flush()?;
    Ok(())
}

/// Load a resume state file
///
/// Validates the header and the file size; binding to a bank is checked by
/// `apply_resume_state`.
pub fn load_resume_state(
    path: impl AsRef<Path>,
) -> Result<(ResumeHeader, Vec<usize>), ResumeFormatError> {
    let file = File::open(path.as_ref())?;
    let metadata = file.metadata()?;

    let mut reader = BufReader::new(file);
    let mut header_buf = [0u8; RESUME_HEADER_SIZE];
    reader.read_exact(&mut header_buf)?;

    let header = ResumeHeader::from_bytes(&header_buf)?;

    let expected_size = expected_resume_file_size(&header);
    if metadata.len() != expected_size {
        return Err(ResumeFormatError::InvalidFileSize {
            expected: expected_size,
            found: metadata.len(),
        });
    }

    let mut indices = Vec::with_capacity(header.matched_count as usize);
    for _ in 0..header.matched_count {
        indices.push(reader.read_u32::<LittleEndian>()? as usize);
    }

    Ok((header, indices))
}

/// Mark the indices of a resume file as matched in `bank`
///
/// Returns the number of entries newly marked.
pub fn apply_resume_state(path: impl AsRef<Path>, bank: &mut DigestBank) -> Result<usize> {
    let path = path.as_ref();
    let (header, indices) = load_resume_state(path)?;
    header.verify_bank(bank)?;

    let mut marked = 0;
    for index in indices {
        if bank.mark_matched(index)? {
            marked += 1;
        }
    }

    info!(
        path = %path.display(),
        marked,
        remaining = bank.len() - bank.matched_count(),
        "resume state applied"
    );
    Ok(marked)
}
