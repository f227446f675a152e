//! Guessing engine constants
//!
//! Defaults for the guessing run. Anything a user may want to change at run time
//! is also carried by `GuessConfig`.

// =============================================================================
// Candidate parameters
// =============================================================================

/// Shortest password length considered by the target policy
pub const MIN_PWD_LEN: usize = 4;

/// Fixed candidate length (every generated candidate has exactly this many bytes)
pub const MAX_PWD_LEN: usize = 6;

/// Upper bound accepted for a configured candidate length
pub const MAX_CONFIG_LEN: usize = 16;

/// Maximum number of positions substituted at once during substitution expansion
pub const MAX_SUBS: usize = 3;

// =============================================================================
// Digest parameters
// =============================================================================

/// Byte size of one digest record (SHA-256)
pub const DIGEST_SIZE: usize = 32;

// =============================================================================
// Run parameters
// =============================================================================

/// Default dictionary file name
pub const DEFAULT_DICT_FILE: &str = "dict.txt";

/// Default results log file name
pub const DEFAULT_RESULTS_LOG: &str = "found.txt";

/// Number of candidates between two progress log lines in matching mode
pub const PROGRESS_INTERVAL: u64 = 50_000_000;

/// Number of candidate lines hashed together in verify mode
pub const VERIFY_BATCH_SIZE: usize = 4096;

// =============================================================================
// Resume file format
// =============================================================================

/// Magic bytes at the start of a resume state file
pub const RESUME_MAGIC: [u8; 8] = *b"HGRESUME";

/// Resume file format version
pub const RESUME_FORMAT_VERSION: u16 = 1;

/// Byte size of the resume file header
pub const RESUME_HEADER_SIZE: usize = 64;

/// Byte size of one matched index record in a resume file
pub const RESUME_INDEX_SIZE: usize = 4;

/// Resume file extension
pub const RESUME_FILE_EXTENSION: &str = "hgrs";
