//! Word list I/O
//!
//! Word lists are newline-terminated byte lines of any length. A trailing
//! `\r` is stripped so CRLF files read the same as LF files.

use crate::error::{GuessError, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Line-by-line reader over a word list
///
/// Yields every line, empty ones included, without its terminator.
pub struct WordReader<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> WordReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl WordReader<BufReader<File>> {
    /// Open a word list file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| GuessError::open(path, e))?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> Iterator for WordReader<R> {
    type Item = io::Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                }
                if self.buf.last() == Some(&b'\r') {
                    self.buf.pop();
                }
                Some(Ok(self.buf.clone()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

/// Collect the non-empty words of a word list, in order
pub fn read_words<R: BufRead>(lines: WordReader<R>) -> io::Result<Vec<Vec<u8>>> {
    let mut words = Vec::new();
    for line in lines {
        let line = line?;
        if !line.is_empty() {
            words.push(line);
        }
    }
    Ok(words)
}

/// Load a dictionary file
pub fn load_dictionary(path: impl AsRef<Path>) -> Result<Vec<Vec<u8>>> {
    Ok(read_words(WordReader::open(path)?)?)
}
