//! Loader configuration types
//!
//! This module defines the minimal configuration needed by the loader.
//! The loader is intentionally simple - thresholds, designated columns and chart
//! output are handled by the application layer.

use serde::{Deserialize, Serialize};

/// Configuration for the moderation log loader
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Skip malformed lines with a warning instead of failing the load
    #[serde(default)]
    pub skip_invalid_lines: bool,

    /// Optional: stop after this many rows
    #[serde(default)]
    pub max_records: Option<usize>,
}

impl LoaderConfig {
    /// Create a new loader configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: skip malformed lines instead of failing
    pub fn with_skip_invalid_lines(mut self, enabled: bool) -> Self {
        self.skip_invalid_lines = enabled;
        self
    }

    /// Builder method: cap the number of rows loaded
    pub fn with_max_records(mut self, max: usize) -> Self {
        self.max_records = Some(max);
        self
    }

    /// Check if another row may be loaded after `loaded` rows
    pub fn allows_more(&self, loaded: usize) -> bool {
        match self.max_records {
            Some(max) => loaded < max,
            None => true,
        }
    }
}
