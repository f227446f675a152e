//! Candidate list verification
//!
//! Checks a file of plaintext candidates, one per line, against a digest bank.
//! Lines are hashed in parallel in fixed-size batches and matched in file order,
//! so results are identical to a sequential scan.

use crate::constants::VERIFY_BATCH_SIZE;
use crate::domain::digest::{Digest, DigestBank, Match};
use crate::domain::hash::sha256;
use crate::error::Result;
use crate::infra::dictionary_io::WordReader;
use crate::infra::results_log::ResultsLog;
use rayon::prelude::*;
use std::io::{BufRead, Write};
use tracing::{debug, info};

/// A match found while verifying, tagged with its 1-based line number
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedLine {
    pub line: usize,
    pub found: Match,
}

/// Verify every line of `reader` against `bank`
///
/// Each full line (without its terminator) is one candidate; empty lines are
/// hashed as the empty string. A match is written to `out` as
/// `<line> <candidate> <record>` and appended to `log` when given.
pub fn verify_candidates<R, W>(
    reader: R,
    bank: &mut DigestBank,
    mut out: W,
    mut log: Option<&mut ResultsLog>,
) -> Result<Vec<VerifiedLine>>
where
    R: BufRead,
    W: Write,
{
    let mut lines = WordReader::new(reader);
    let mut found = Vec::new();
    let mut line_no = 0usize;
    let mut batch: Vec<Vec<u8>> = Vec::with_capacity(VERIFY_BATCH_SIZE);

    loop {
        batch.clear();
        for line in lines.by_ref().take(VERIFY_BATCH_SIZE) {
            batch.push(line?);
        }
        if batch.is_empty() {
            break;
        }

        let digests: Vec<Digest> = batch.par_iter().map(|c| sha256(c)).collect();

        for (candidate, digest) in batch.iter().zip(&digests) {
            line_no += 1;
            let Some(index) = bank.match_digest(digest) else {
                continue;
            };

            let m = Match {
                candidate: candidate.clone(),
                index,
            };
            write!(out, "{} ", line_no)?;
            out.write_all(candidate)?;
            writeln!(out, " {}", m.record())?;
            if let Some(log) = log.as_deref_mut() {
                log.record(&m)?;
            }
            found.push(VerifiedLine { line: line_no, found: m });
        }

        debug!(lines = line_no, matches = found.len(), "verified batch");
    }

    out.flush()?;
    info!(
        lines = line_no,
        matches = found.len(),
        matched = bank.matched_count(),
        total = bank.len(),
        "verification finished"
    );
    Ok(found)
}
