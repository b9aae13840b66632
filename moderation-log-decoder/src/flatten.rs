//! Record Flattening Engine
//!
//! Merges the two heterogeneous moderation sections of a record into one flat
//! row. Absent sections degrade to empty mappings and unreadable scores become
//! missing values; flattening itself never fails.

use crate::types::{
    FlatRow, ModerationRecord, OPENAI_PREFIX, PERSPECTIVE_PREFIX, TOXICITY_COLUMN,
};
use serde_json::{Map, Value};

/// Source-B attribute that feeds the distinguished toxicity column
pub const TOXICITY_ATTRIBUTE: &str = "TOXICITY";

/// Record flattener - turns nested moderation records into flat rows
pub struct RecordFlattener;

impl RecordFlattener {
    /// Flatten a moderation record into a FlatRow
    ///
    /// Column order inside the row follows key order in the record: source-A
    /// categories first, then source-B attributes.
    pub fn flatten(record: &ModerationRecord) -> FlatRow {
        let empty = Map::new();

        let openai = record.openai.as_ref();
        let category_scores = openai
            .and_then(|oa| oa.category_scores.as_ref())
            .unwrap_or(&empty);
        let attribute_scores = record
            .perspective
            .as_ref()
            .and_then(|p| p.attribute_scores.as_ref())
            .unwrap_or(&empty);

        let openai_flagged = match openai.and_then(|oa| oa.flagged.as_ref()) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(flag)) => *flag,
            Some(other) => {
                log::warn!("Non-boolean 'flagged' value {}, treating as false", other);
                false
            }
        };

        let mut row = FlatRow {
            post_id: record.post_id.as_ref().and_then(Self::render_text),
            text: record.text.as_ref().and_then(Self::render_text),
            openai_flagged,
            persp_toxicity: attribute_scores
                .get(TOXICITY_ATTRIBUTE)
                .and_then(|attr| Self::summary_score(TOXICITY_ATTRIBUTE, attr)),
            scores: Vec::with_capacity(category_scores.len() + attribute_scores.len()),
        };

        for (category, value) in category_scores {
            let score = Self::score(category, value);
            row.set_score(format!("{}{}", OPENAI_PREFIX, category), score);
        }

        for (attribute, value) in attribute_scores {
            let column = format!("{}{}", PERSPECTIVE_PREFIX, attribute.to_lowercase());
            let score = Self::summary_score(attribute, value);

            // Lowercased attribute collides with the fixed toxicity column
            if column == TOXICITY_COLUMN {
                row.persp_toxicity = score;
            } else {
                row.set_score(column, score);
            }
        }

        log::trace!("Flattened {}", row);
        row
    }

    /// Extract `summaryScore.value` from a source-B attribute entry
    fn summary_score(attribute: &str, entry: &Value) -> Option<f64> {
        match entry.get("summaryScore").and_then(|s| s.get("value")) {
            Some(value) => Self::score(attribute, value),
            None => {
                log::warn!("Attribute {} has no summaryScore.value", attribute);
                None
            }
        }
    }

    /// Interpret a JSON value as a score; anything non-numeric is missing
    fn score(name: &str, value: &Value) -> Option<f64> {
        match value {
            Value::Number(n) => n.as_f64(),
            Value::Null => None,
            other => {
                log::warn!("Non-numeric score for {}: {}", name, other);
                None
            }
        }
    }

    /// Render an identifier/text field; numbers keep their JSON spelling
    fn render_text(value: &Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}
