//! Moderation Log Decoder Library
//!
//! A stateless, reusable library for reading moderation-API output logs
//! (newline-delimited JSON, one post per line) produced by two independent
//! content-moderation services, and flattening them into one table.
//!
//! # Architecture
//!
//! This library is intentionally minimal and focused on loading:
//! - Parses JSONL logs into typed moderation records
//! - Flattens the nested, partially-optional record into one flat row
//! - Collects rows into an in-memory table with a stable column set
//!
//! The library does NOT:
//! - Compute correlations, agreement or significance tests
//! - Render charts
//! - Print reports
//!
//! All higher-level functionality is in the application layer (moderation-log-cli).
//!
//! # Example Usage
//!
//! ```no_run
//! use moderation_log_decoder::{Loader, LoaderConfig};
//! use std::path::Path;
//!
//! let config = LoaderConfig::new().with_skip_invalid_lines(true);
//! let table = Loader::new(config)
//!     .load_file(Path::new("data/results.jsonl"))
//!     .unwrap();
//!
//! for column in table.columns_with_prefix("oa_") {
//!     println!("{}", column);
//! }
//! ```

// Public modules
pub mod config;
pub mod flatten;
pub mod loader;
pub mod table;
pub mod types;

// Re-export main types for convenience
pub use config::LoaderConfig;
pub use flatten::RecordFlattener;
pub use loader::Loader;
pub use table::ModerationTable;
pub use types::{
    DecoderError, FlatRow, ModerationRecord, OpenAiModeration, ParsedRecord,
    PerspectiveAnalysis, Result, FLAGGED_COLUMN, OPENAI_PREFIX, PERSPECTIVE_PREFIX,
    POST_ID_COLUMN, TEXT_COLUMN, TOXICITY_COLUMN,
};

pub mod formats;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: ensure we can create a loader
        let loader = Loader::default();
        assert_eq!(loader.config(), &LoaderConfig::new());
        assert!(!VERSION.is_empty());
    }
}
