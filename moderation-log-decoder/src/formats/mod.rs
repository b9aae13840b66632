//! Moderation log file format parsers
//!
//! This module contains parsers for moderation log files.
//! Each parser exposes an iterator over parsed records.

pub mod jsonl;

// Re-export parser types
pub use jsonl::{JsonlParser, JsonlRecordIterator};
