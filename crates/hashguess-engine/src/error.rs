//! Library error type

use crate::domain::resume_format::ResumeFormatError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GuessError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("resume state error: {0}")]
    Resume(#[from] ResumeFormatError),

    #[error("digest index {index} out of range (bank holds {len} digests)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("candidate length must be between 1 and {max}, got {found}")]
    InvalidLength { max: usize, found: usize },

    #[error("substitution limit must be at most {max}, got {found}")]
    InvalidSubstitutions { max: usize, found: usize },
}

impl GuessError {
    /// Wrap an `io::Error` raised while opening `path`
    pub fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = GuessError> = std::result::Result<T, E>;
