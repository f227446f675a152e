//! Substitution expansion
//!
//! Produces leetspeak-style variants of a word: up to `max_subs` letters are
//! replaced at once, each by one of the substitutes listed for it.

use crate::constants::MAX_SUBS;
use crate::domain::candidate::{CandidateBuffer, Slot};
use std::ops::ControlFlow;

/// Substitutes for `a`..`z`; the uppercase form always comes first
const LEET: [&[u8]; 26] = [
    b"A@&", b"B68", b"C[(<", b"D])>?", b"E3", b"F#", b"G9", b"H#", b"I1|!", b"J", b"K<", b"L7",
    b"M", b"N^", b"O0*", b"P?", b"Q9", b"R", b"S5$2", b"T+", b"U", b"V", b"W", b"X%", b"Y",
    b"Z2",
];

/// Ordered substitutes for each lowercase letter
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubstitutionTable {
    entries: [Vec<u8>; 26],
}

impl SubstitutionTable {
    /// Table with no substitutes at all
    pub fn empty() -> Self {
        Self {
            entries: std::array::from_fn(|_| Vec::new()),
        }
    }

    /// Capitalization plus common homoglyphs (`a` -> `A@&`, `s` -> `S5$2`, ...)
    pub fn leet() -> Self {
        Self {
            entries: std::array::from_fn(|i| LEET[i].to_vec()),
        }
    }

    /// Replace the substitutes listed for `letter`
    ///
    /// Bytes outside `a`..`z` are ignored.
    pub fn with_entry(mut self, letter: u8, substitutes: &[u8]) -> Self {
        if letter.is_ascii_lowercase() {
            self.entries[(letter - b'a') as usize] = substitutes.to_vec();
        }
        self
    }

    /// Substitutes for `c`, empty when `c` is not a lowercase letter
    #[inline]
    pub fn substitutes(&self, c: u8) -> &[u8] {
        if c.is_ascii_lowercase() {
            &self.entries[(c - b'a') as usize]
        } else {
            &[]
        }
    }
}

impl Default for SubstitutionTable {
    fn default() -> Self {
        Self::leet()
    }
}

/// Depth-first generator of substitution variants
#[derive(Clone, Debug)]
pub struct SubstitutionExpander<'a> {
    table: &'a SubstitutionTable,
    max_subs: usize,
}

impl<'a> SubstitutionExpander<'a> {
    pub fn new(table: &'a SubstitutionTable) -> Self {
        Self::with_max_subs(table, MAX_SUBS)
    }

    pub fn with_max_subs(table: &'a SubstitutionTable, max_subs: usize) -> Self {
        Self { table, max_subs }
    }

    /// Visit every variant of the word held in `buf`
    ///
    /// Positions are walked left to right. At each position the unchanged branch
    /// comes first, then each substitute in table order; a branch ends at the end
    /// of the buffer or once `max_subs` positions are substituted. Every branch
    /// end except the unchanged word is visited exactly once.
    ///
    /// `buf` holds the original word again when this returns.
    pub fn expand<F>(&self, buf: &mut CandidateBuffer, mut visit: F) -> ControlFlow<()>
    where
        F: FnMut(&CandidateBuffer) -> ControlFlow<()>,
    {
        let len = buf.len();
        let originals: Vec<Slot> = (0..len).map(|p| buf.slot(p)).collect();
        let options: Vec<&[u8]> = originals
            .iter()
            .map(|s| self.table.substitutes(s.byte()))
            .collect();

        if self.max_subs == 0 || options.iter().all(|o| o.is_empty()) {
            return ControlFlow::Continue(());
        }

        // stack[p] = choice at position p: 0 = unchanged, k = k-th substitute
        let mut stack: Vec<usize> = Vec::with_capacity(len);
        let mut used = 0;
        let mut flow = ControlFlow::Continue(());

        'walk: loop {
            if stack.len() < len && used < self.max_subs {
                stack.push(0);
                continue;
            }

            if used > 0 && visit(buf).is_break() {
                flow = ControlFlow::Break(());
                break;
            }

            // backtrack to the deepest position with an untried substitute
            loop {
                let Some(p) = stack.len().checked_sub(1) else {
                    break 'walk;
                };
                let choice = stack[p];
                if choice < options[p].len() {
                    if choice == 0 {
                        used += 1;
                    }
                    stack[p] = choice + 1;
                    buf.set_literal(p, options[p][choice]);
                    break;
                }
                if choice > 0 {
                    used -= 1;
                    buf.set_slot(p, originals[p]);
                }
                stack.pop();
            }
        }

        for (p, &slot) in originals.iter().enumerate() {
            buf.set_slot(p, slot);
        }
        flow
    }

    /// Number of variants `expand` visits for `word`
    ///
    /// Sum over every non-empty set of at most `max_subs` positions of the
    /// product of the substitute counts at those positions.
    pub fn variant_count(&self, word: &[u8]) -> u64 {
        // no word has more substituted positions than bytes
        let max_subs = self.max_subs.min(word.len());

        // by_size[k] = total over position sets of size k
        let mut by_size = vec![0u64; max_subs + 1];
        by_size[0] = 1;
        for &c in word {
            let v = self.table.substitutes(c).len() as u64;
            if v == 0 {
                continue;
            }
            for k in (1..=max_subs).rev() {
                by_size[k] = by_size[k].saturating_add(by_size[k - 1].saturating_mul(v));
            }
        }
        by_size[1..]
            .iter()
            .fold(0u64, |acc, &n| acc.saturating_add(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn buffer_for(word: &[u8]) -> CandidateBuffer {
        let mut buf = CandidateBuffer::new(word.len());
        buf.load_prefix(word);
        buf
    }

    fn collect(expander: &SubstitutionExpander<'_>, word: &[u8]) -> Vec<Vec<u8>> {
        let mut buf = buffer_for(word);
        let mut out = Vec::new();
        let _ = expander.expand(&mut buf, |b| {
            out.push(b.to_bytes());
            ControlFlow::Continue(())
        });
        assert_eq!(buf.to_bytes(), word, "buffer not restored");
        out
    }

    /// Count by enumerating position sets directly
    fn brute_force_count(table: &SubstitutionTable, word: &[u8], max_subs: usize) -> u64 {
        let n = word.len();
        let mut total = 0;
        for mask in 1u32..(1 << n) {
            if mask.count_ones() as usize > max_subs {
                continue;
            }
            let product: u64 = (0..n)
                .filter(|i| mask & (1 << i) != 0)
                .map(|i| table.substitutes(word[i]).len() as u64)
                .product();
            total += product;
        }
        total
    }

    #[test]
    fn test_leet_table_entries() {
        let table = SubstitutionTable::leet();
        assert_eq!(table.substitutes(b'a'), b"A@&");
        assert_eq!(table.substitutes(b's'), b"S5$2");
        assert_eq!(table.substitutes(b'm'), b"M");
        assert!(table.substitutes(b'1').is_empty());
        assert!(table.substitutes(b'A').is_empty());
    }

    #[test]
    fn test_single_letter_order() {
        let table = SubstitutionTable::leet();
        let expander = SubstitutionExpander::new(&table);
        assert_eq!(collect(&expander, b"e"), vec![b"E".to_vec(), b"3".to_vec()]);
    }

    #[test]
    fn test_two_letters_depth_first_order() {
        let table = SubstitutionTable::empty()
            .with_entry(b'a', b"1")
            .with_entry(b'b', b"2");
        let expander = SubstitutionExpander::new(&table);
        let variants = collect(&expander, b"ab");
        assert_eq!(
            variants,
            vec![b"a2".to_vec(), b"1b".to_vec(), b"12".to_vec()]
        );
    }

    #[test]
    fn test_skips_unchanged_word() {
        let table = SubstitutionTable::leet();
        let expander = SubstitutionExpander::new(&table);
        let variants = collect(&expander, b"secret");
        assert!(!variants.contains(&b"secret".to_vec()));
    }

    #[test]
    fn test_no_substitutable_positions() {
        let table = SubstitutionTable::leet();
        let expander = SubstitutionExpander::new(&table);
        assert!(collect(&expander, b"123456").is_empty());
    }

    #[test]
    fn test_respects_max_subs() {
        let table = SubstitutionTable::leet();
        let expander = SubstitutionExpander::new(&table);
        for variant in collect(&expander, b"secret") {
            let changed = variant.iter().zip(b"secret").filter(|(a, b)| a != b).count();
            assert!((1..=MAX_SUBS).contains(&changed), "{:?}", variant);
        }
    }

    #[test]
    fn test_substitution_completeness() {
        let table = SubstitutionTable::leet();
        for max_subs in [1, 2, 3] {
            let expander = SubstitutionExpander::with_max_subs(&table, max_subs);
            for word in [&b"secret"[..], b"pa55wd", b"hello!", b"qwerty", b"ab"] {
                let variants = collect(&expander, word);
                let unique: HashSet<_> = variants.iter().cloned().collect();
                let expected = brute_force_count(&table, word, max_subs);

                assert_eq!(unique.len(), variants.len(), "duplicates for {:?}", word);
                assert_eq!(variants.len() as u64, expected, "count for {:?}", word);
                assert_eq!(expander.variant_count(word), expected);
            }
        }
    }

    #[test]
    fn test_expand_stops_on_break_and_restores() {
        let table = SubstitutionTable::leet();
        let expander = SubstitutionExpander::new(&table);
        let mut buf = buffer_for(b"secret");
        let mut seen = 0;
        let flow = expander.expand(&mut buf, |_| {
            seen += 1;
            if seen == 10 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert!(flow.is_break());
        assert_eq!(seen, 10);
        assert_eq!(buf.to_bytes(), b"secret");
    }

    #[test]
    fn test_zero_max_subs() {
        let table = SubstitutionTable::leet();
        let expander = SubstitutionExpander::with_max_subs(&table, 0);
        assert!(collect(&expander, b"secret").is_empty());
        assert_eq!(expander.variant_count(b"secret"), 0);
    }

    #[test]
    fn test_unbounded_max_subs() {
        let table = SubstitutionTable::leet();
        let unbounded = SubstitutionExpander::with_max_subs(&table, usize::MAX);
        let exact = SubstitutionExpander::with_max_subs(&table, 6);

        assert_eq!(unbounded.variant_count(b"secret"), exact.variant_count(b"secret"));
        assert_eq!(unbounded.variant_count(b""), 0);
        assert_eq!(
            collect(&unbounded, b"ab").len() as u64,
            unbounded.variant_count(b"ab")
        );
    }
}
