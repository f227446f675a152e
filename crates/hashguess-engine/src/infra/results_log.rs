//! Append-only results log
//!
//! One line per match: the candidate followed by its 1-based bank record number.

use crate::domain::digest::Match;
use crate::error::{GuessError, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct ResultsLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl ResultsLog {
    /// Open `path` for appending, creating it if needed
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| GuessError::open(path, e))?;

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one match and flush it to disk
    pub fn record(&mut self, m: &Match) -> Result<()> {
        self.writer.write_all(&m.candidate)?;
        writeln!(self.writer, " {}", m.record())?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn m(candidate: &[u8], index: usize) -> Match {
        Match {
            candidate: candidate.to_vec(),
            index,
        }
    }

    #[test]
    fn test_record_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("found.txt");

        let mut log = ResultsLog::open(&path).unwrap();
        log.record(&m(b"test00", 0)).unwrap();
        log.record(&m(b"p@ssw0", 4)).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "test00 1\np@ssw0 5\n");
    }

    #[test]
    fn test_appends_across_opens() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("found.txt");

        ResultsLog::open(&path).unwrap().record(&m(b"aaaaaa", 1)).unwrap();
        ResultsLog::open(&path).unwrap().record(&m(b"bbbbbb", 2)).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "aaaaaa 2\nbbbbbb 3\n");
    }

    #[test]
    fn test_open_in_missing_directory() {
        let result = ResultsLog::open("/nonexistent/dir/found.txt");
        assert!(matches!(result, Err(GuessError::Open { .. })));
    }
}
