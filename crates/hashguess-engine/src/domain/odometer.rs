//! Odometer enumeration
//!
//! Mixed-radix counting over the suffix `[offset, L)` of a candidate buffer.
//! The suffix is a number with `L - offset` digits in base `K` (the alphabet
//! radix); the rightmost slot varies fastest.

use crate::domain::alphabet::Alphabet;
use crate::domain::candidate::CandidateBuffer;
use std::ops::ControlFlow;

/// Set every slot at or after `from` to the first character of `alphabet`
///
/// Slots before `from` are left untouched.
pub fn reset(buf: &mut CandidateBuffer, from: usize, alphabet: Alphabet) {
    for pos in from..buf.len() {
        buf.set_indexed(pos, alphabet, 0);
    }
}

/// Advance the suffix `[offset, L)` to its next value
///
/// Returns the position of the highest-order slot that changed without carrying,
/// or `None` when every slot carried back to zero (the suffix is exhausted).
/// A slot that is not governed by `alphabet` counts as its last digit, so it
/// carries to `alphabet[0]` and the slot invariant holds again afterwards.
pub fn advance_suffix(buf: &mut CandidateBuffer, offset: usize, alphabet: Alphabet) -> Option<usize> {
    let radix = alphabet.radix();

    for pos in (offset..buf.len()).rev() {
        let next = match buf.index(pos) {
            Some(i) if i < radix => (i + 1) % radix,
            _ => 0,
        };
        buf.set_indexed(pos, alphabet, next);

        // next != 0 => no carry into the slot on the left
        if next != 0 {
            return Some(pos);
        }
    }

    None
}

/// Visit every value of the suffix `[offset, L)` over `alphabet`
///
/// Resets the suffix, then hands the full buffer to `visit` for the reset state
/// and for every state reached by `advance_suffix`, `K^(L - offset)` states in
/// total. An empty suffix yields nothing. Stops early when `visit` breaks.
pub fn enumerate_suffix<F>(
    buf: &mut CandidateBuffer,
    offset: usize,
    alphabet: Alphabet,
    mut visit: F,
) -> ControlFlow<()>
where
    F: FnMut(&CandidateBuffer) -> ControlFlow<()>,
{
    if offset >= buf.len() {
        return ControlFlow::Continue(());
    }

    reset(buf, offset, alphabet);
    loop {
        visit(buf)?;
        if advance_suffix(buf, offset, alphabet).is_none() {
            return ControlFlow::Continue(());
        }
    }
}

/// Number of states `enumerate_suffix` visits, saturating at `u64::MAX`
pub fn suffix_space(len: usize, offset: usize, alphabet: Alphabet) -> u64 {
    if offset >= len {
        return 0;
    }
    (alphabet.radix() as u64)
        .checked_pow((len - offset) as u32)
        .unwrap_or(u64::MAX)
}
