//! Candidate alphabets
//!
//! An alphabet is the radix of odometer enumeration: an ordered byte sequence
//! whose position gives each character its digit value.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const DIGITS: &[u8] = b"0123456789";

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";

/// Printable ASCII (0x20..=0x7E) in code point order
const FULL: &[u8] = b" !\"#$%&'()*+,-./0123456789:;<=>?\
@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_\
`abcdefghijklmnopqrstuvwxyz{|}~";

/// Same characters as `FULL`, English letter frequency first, then digits, then punctuation
const FREQUENCY: &[u8] = b"etaoinsrhdlucmfywgpbvkxqjz\
ETAOINSRHDLUCMFYWGPBVKXQJZ\
0123456789 !\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Named character set used as the radix for enumeration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Alphabet {
    /// `0`-`9` (K = 10)
    Digits,
    /// `a`-`z` (K = 26)
    Lowercase,
    /// Printable ASCII in code point order (K = 95)
    Full,
    /// Printable ASCII with common letters first (K = 95)
    Frequency,
}

impl Alphabet {
    /// All alphabets, in declaration order
    pub const ALL: [Alphabet; 4] = [
        Alphabet::Digits,
        Alphabet::Lowercase,
        Alphabet::Full,
        Alphabet::Frequency,
    ];

    /// Ordered characters of the alphabet
    #[inline]
    pub fn chars(self) -> &'static [u8] {
        match self {
            Alphabet::Digits => DIGITS,
            Alphabet::Lowercase => LOWERCASE,
            Alphabet::Full => FULL,
            Alphabet::Frequency => FREQUENCY,
        }
    }

    /// Radix `K`
    #[inline]
    pub fn radix(self) -> usize {
        self.chars().len()
    }

    /// Character at digit value `index`
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.radix()`.
    #[inline]
    pub fn char_at(self, index: usize) -> u8 {
        self.chars()[index]
    }

    /// Short name accepted by `FromStr`
    pub fn name(self) -> &'static str {
        match self {
            Alphabet::Digits => "digits",
            Alphabet::Lowercase => "lower",
            Alphabet::Full => "full",
            Alphabet::Frequency => "frequency",
        }
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown alphabet '{0}' (expected digits, lower, full or frequency)")]
pub struct UnknownAlphabet(pub String);

impl FromStr for Alphabet {
    type Err = UnknownAlphabet;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "digits" => Ok(Alphabet::Digits),
            "lower" | "lowercase" => Ok(Alphabet::Lowercase),
            "full" => Ok(Alphabet::Full),
            "frequency" => Ok(Alphabet::Frequency),
            other => Err(UnknownAlphabet(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radix() {
        assert_eq!(Alphabet::Digits.radix(), 10);
        assert_eq!(Alphabet::Lowercase.radix(), 26);
        assert_eq!(Alphabet::Full.radix(), 95);
        assert_eq!(Alphabet::Frequency.radix(), 95);
    }

    #[test]
    fn test_full_is_printable_ascii_in_order() {
        let expected: Vec<u8> = (0x20u8..=0x7e).collect();
        assert_eq!(Alphabet::Full.chars(), expected.as_slice());
    }

    #[test]
    fn test_frequency_is_permutation_of_full() {
        let mut freq = Alphabet::Frequency.chars().to_vec();
        freq.sort_unstable();
        assert_eq!(freq, Alphabet::Full.chars());
        assert_eq!(Alphabet::Frequency.char_at(0), b'e');
    }

    #[test]
    fn test_no_duplicate_characters() {
        for alphabet in Alphabet::ALL {
            let mut chars = alphabet.chars().to_vec();
            chars.sort_unstable();
            chars.dedup();
            assert_eq!(chars.len(), alphabet.radix(), "{} has duplicates", alphabet);
        }
    }

    #[test]
    fn test_from_str() {
        for alphabet in Alphabet::ALL {
            assert_eq!(alphabet.name().parse::<Alphabet>(), Ok(alphabet));
        }
        assert!("hex".parse::<Alphabet>().is_err());
    }
}
