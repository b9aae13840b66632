//! Main loader API
//!
//! This module provides the primary interface for the decoder library.
//! The Loader struct is the entry point for reading moderation logs into a
//! flattened table.

use crate::config::LoaderConfig;
use crate::flatten::RecordFlattener;
use crate::formats::JsonlParser;
use crate::table::ModerationTable;
use crate::types::{FlatRow, ParsedRecord, Result};
use std::io::BufRead;
use std::path::Path;

/// The main loader struct - entry point for all loading operations
#[derive(Debug, Clone, Default)]
pub struct Loader {
    config: LoaderConfig,
}

impl Loader {
    /// Create a new loader with the given configuration
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load a JSONL moderation log into a table
    ///
    /// # Arguments
    /// * `path` - Path to the JSONL file
    ///
    /// # Returns
    /// * `Result<ModerationTable>` - the flattened table, or the first fatal error
    ///
    /// # Example
    /// ```no_run
    /// use moderation_log_decoder::{Loader, LoaderConfig};
    /// use std::path::Path;
    ///
    /// let loader = Loader::new(LoaderConfig::new());
    /// let table = loader.load_file(Path::new("data/results.jsonl")).unwrap();
    /// println!("{:?}", table.shape());
    /// ```
    pub fn load_file(&self, path: &Path) -> Result<ModerationTable> {
        log::info!("Loading moderation log: {:?}", path);

        let table = self
            .rows(JsonlParser::parse(path)?)
            .collect::<Result<ModerationTable>>()?;

        let (rows, columns) = table.shape();
        log::info!("Loaded {} rows, {} columns from {:?}", rows, columns, path);
        Ok(table)
    }

    /// Load records from any buffered reader
    pub fn load_reader<R: BufRead>(&self, reader: R) -> Result<ModerationTable> {
        self.rows(JsonlParser::from_reader(reader)).collect()
    }

    /// Flatten a stream of parsed records into rows, applying the configuration
    pub fn rows<I>(&self, records: I) -> FlatteningIterator<I>
    where
        I: Iterator<Item = Result<ParsedRecord>>,
    {
        FlatteningIterator {
            records,
            config: self.config.clone(),
            emitted: 0,
            skipped: 0,
        }
    }
}

/// Iterator that flattens parsed records into rows
///
/// In lenient mode parse errors are logged and skipped; otherwise the first
/// error is yielded and iteration continues with the next line.
pub struct FlatteningIterator<I> {
    records: I,
    config: LoaderConfig,
    emitted: usize,
    skipped: usize,
}

impl<I> FlatteningIterator<I> {
    /// Number of lines skipped because they could not be parsed
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<I> Iterator for FlatteningIterator<I>
where
    I: Iterator<Item = Result<ParsedRecord>>,
{
    type Item = Result<FlatRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.config.allows_more(self.emitted) {
            return None;
        }

        loop {
            match self.records.next()? {
                Ok(parsed) => {
                    log::debug!("Flattening record from line {}", parsed.line);
                    self.emitted += 1;
                    return Some(Ok(RecordFlattener::flatten(&parsed.record)));
                }
                Err(e) if self.config.skip_invalid_lines && e.line().is_some() => {
                    self.skipped += 1;
                    log::warn!("Skipping line: {}", e);
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
