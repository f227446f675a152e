//! Infrastructure layer - I/O and external dependencies
//!
//! This module handles dictionary, digest bank, resume state and results log files.

pub mod dictionary_io;
pub mod digest_io;
pub mod results_log;
pub mod resume_io;
