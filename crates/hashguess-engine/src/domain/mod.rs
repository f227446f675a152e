//! Domain layer - Pure computational logic
//!
//! This module contains the candidate generators and the digest bank, without I/O dependencies.

pub mod alphabet;
pub mod candidate;
pub mod digest;
pub mod hash;
pub mod odometer;
pub mod resume_format;
pub mod substitution;
