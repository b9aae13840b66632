//! Core types for the moderation log decoder library
//!
//! This module defines the raw record shape read from a moderation log file and the
//! flat row the decoder turns it into. The decoder is stateless and only produces
//! rows - it does not compute statistics or render charts.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::fmt;

/// Result type for decoder operations
pub type Result<T> = std::result::Result<T, DecoderError>;

/// Column holding the post identifier
pub const POST_ID_COLUMN: &str = "post_id";
/// Column holding the raw post text
pub const TEXT_COLUMN: &str = "text";
/// Column holding the source-A flagged boolean
pub const FLAGGED_COLUMN: &str = "openai_flagged";
/// Column holding the distinguished source-B toxicity score
pub const TOXICITY_COLUMN: &str = "persp_toxicity";

/// Prefix for source-A (OpenAI moderation) category columns
pub const OPENAI_PREFIX: &str = "oa_";
/// Prefix for source-B (Perspective) attribute columns
pub const PERSPECTIVE_PREFIX: &str = "persp_";

/// Columns every row carries, in table order
pub const FIXED_COLUMNS: [&str; 4] = [POST_ID_COLUMN, TEXT_COLUMN, FLAGGED_COLUMN, TOXICITY_COLUMN];

/// Errors that can occur while reading a moderation log
#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
    #[error("Malformed JSON on line {line}: {message}")]
    JsonParse { line: usize, message: String },

    #[error("Unexpected record shape on line {line}: {message}")]
    InvalidRecord { line: usize, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl DecoderError {
    /// Line number the error refers to (if it came from a specific line)
    pub fn line(&self) -> Option<usize> {
        match self {
            DecoderError::JsonParse { line, .. } => Some(*line),
            DecoderError::InvalidRecord { line, .. } => Some(*line),
            DecoderError::IoError(_) => None,
        }
    }
}

/// One moderation record exactly as it appears on a line of the input file
///
/// Every section is optional. `null` and absent are treated the same way.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ModerationRecord {
    /// Post identifier (string or number in practice)
    #[serde(default)]
    pub post_id: Option<Value>,
    /// Raw post text
    #[serde(default)]
    pub text: Option<Value>,
    /// Source A: OpenAI moderation output
    #[serde(default)]
    pub openai: Option<OpenAiModeration>,
    /// Source B: Perspective API output
    #[serde(default)]
    pub perspective: Option<PerspectiveAnalysis>,
}

/// Source-A section: a flag plus flat per-category scores
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OpenAiModeration {
    #[serde(default)]
    pub flagged: Option<Value>,
    /// Category name -> score (key order preserved)
    #[serde(default)]
    pub category_scores: Option<Map<String, Value>>,
}

/// Source-B section: per-attribute nested scores
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PerspectiveAnalysis {
    /// ATTRIBUTE -> { summaryScore: { value } } (key order preserved)
    #[serde(default, rename = "attributeScores")]
    pub attribute_scores: Option<Map<String, Value>>,
}

/// A record read from the input, tagged with its 1-based line number
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    pub line: usize,
    pub record: ModerationRecord,
}

/// A flattened moderation row - the primary output of the decoder
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatRow {
    /// Post identifier (rendered as text)
    pub post_id: Option<String>,
    /// Raw post text
    pub text: Option<String>,
    /// Source-A flag (false if absent)
    pub openai_flagged: bool,
    /// Source-B toxicity score (missing if absent)
    pub persp_toxicity: Option<f64>,
    /// Prefixed category/attribute columns in first-seen order
    pub scores: Vec<(String, Option<f64>)>,
}

impl FlatRow {
    /// Look up a numeric value by column name
    ///
    /// Returns `None` both for missing values and for columns the row does not have.
    /// The flag column reads as 0.0/1.0.
    pub fn value(&self, column: &str) -> Option<f64> {
        match column {
            FLAGGED_COLUMN => Some(if self.openai_flagged { 1.0 } else { 0.0 }),
            TOXICITY_COLUMN => self.persp_toxicity,
            _ => self
                .scores
                .iter()
                .find(|(name, _)| name == column)
                .and_then(|(_, value)| *value),
        }
    }

    /// Check whether the row carries the given column (even if its value is missing)
    pub fn has_column(&self, column: &str) -> bool {
        FIXED_COLUMNS.contains(&column) || self.scores.iter().any(|(name, _)| name == column)
    }

    /// All column names of this row, fixed columns first
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        FIXED_COLUMNS
            .iter()
            .copied()
            .chain(self.scores.iter().map(|(name, _)| name.as_str()))
    }

    /// Set a prefixed score column, replacing an earlier value with the same name
    pub(crate) fn set_score(&mut self, column: String, value: Option<f64>) {
        match self.scores.iter_mut().find(|(name, _)| *name == column) {
            Some(slot) => slot.1 = value,
            None => self.scores.push((column, value)),
        }
    }
}

impl fmt::Display for FlatRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "post {} (flagged={}, toxicity={}, {} scores)",
            self.post_id.as_deref().unwrap_or("?"),
            self.openai_flagged,
            self.persp_toxicity
                .map(|v| format!("{:.3}", v))
                .unwrap_or_else(|| "NaN".to_string()),
            self.scores.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_deserialization_with_missing_sections() {
        let record: ModerationRecord = serde_json::from_str(r#"{"post_id": "7"}"#).unwrap();
        assert_eq!(record.post_id, Some(Value::String("7".to_string())));
        assert!(record.openai.is_none());
        assert!(record.perspective.is_none());
    }

    #[test]
    fn test_record_deserialization_with_null_sections() {
        let record: ModerationRecord =
            serde_json::from_str(r#"{"openai": null, "perspective": {"attributeScores": null}}"#)
                .unwrap();
        assert!(record.openai.is_none());
        assert_eq!(record.perspective.unwrap().attribute_scores, None);
    }

    #[test]
    fn test_flat_row_lookup() {
        let mut row = FlatRow {
            openai_flagged: true,
            persp_toxicity: Some(0.4),
            ..Default::default()
        };
        row.set_score("oa_violence".to_string(), Some(0.1));
        row.set_score("oa_violence".to_string(), Some(0.2));

        assert_eq!(row.scores.len(), 1);
        assert_eq!(row.value("oa_violence"), Some(0.2));
        assert_eq!(row.value(FLAGGED_COLUMN), Some(1.0));
        assert_eq!(row.value(TOXICITY_COLUMN), Some(0.4));
        assert_eq!(row.value("oa_hate"), None);
        assert!(row.has_column(POST_ID_COLUMN));
        assert!(!row.has_column("oa_hate"));
    }

    #[test]
    fn test_error_line_numbers() {
        let err = DecoderError::JsonParse {
            line: 3,
            message: "EOF".to_string(),
        };
        assert_eq!(err.line(), Some(3));
        assert_eq!(err.to_string(), "Malformed JSON on line 3: EOF");
    }
}
