//! hashguess-engine - Candidate generation and digest matching for offline password recovery
//!
//! This crate provides functionality to:
//! - Enumerate fixed-length candidates over an alphabet (odometer enumeration)
//! - Expand dictionary words into leetspeak-style substitution variants
//! - Run layered guessing strategies against a bank of SHA-256 digests
//! - Verify a list of plaintext candidates against a digest bank

pub mod app;
pub mod constants;
pub mod domain;
pub mod error;
pub mod infra;

// Re-export commonly used types
pub use app::guesser::{GuessConfig, GuessSink, Guesser, MatchSink, PrintSink, RunSummary, Strategy};
pub use app::verifier::{VerifiedLine, verify_candidates};
pub use constants::*;
pub use domain::alphabet::Alphabet;
pub use domain::candidate::CandidateBuffer;
pub use domain::digest::{Digest, DigestBank, DigestEntry, Match};
pub use domain::hash::{digest_hex, sha256};
pub use domain::substitution::{SubstitutionExpander, SubstitutionTable};
pub use error::{GuessError, Result};
pub use infra::results_log::ResultsLog;
