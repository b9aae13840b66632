//! In-memory moderation table
//!
//! Collects flattened rows into a single queryable table. The column set is the
//! union of every row's columns in first-appearance order; a row lacking a
//! column reads as a missing value there.

use crate::types::{FlatRow, POST_ID_COLUMN, TEXT_COLUMN};
use std::collections::HashSet;

/// The flattened moderation table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModerationTable {
    /// All rows in input order
    rows: Vec<FlatRow>,

    /// Column names in first-appearance order
    columns: Vec<String>,
}

impl ModerationTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from flattened rows
    pub fn from_rows(rows: Vec<FlatRow>) -> Self {
        let mut table = Self::new();
        for row in rows {
            table.push(row);
        }
        table
    }

    /// Append a row, extending the column set with any new columns
    pub fn push(&mut self, row: FlatRow) {
        let mut known: HashSet<&str> = self.columns.iter().map(String::as_str).collect();
        let new_columns: Vec<String> = row
            .column_names()
            .filter(|name| known.insert(*name))
            .map(str::to_string)
            .collect();

        self.columns.extend(new_columns);
        self.rows.push(row);
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the table holds no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    /// Column names in first-appearance order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// All rows in input order
    pub fn rows(&self) -> &[FlatRow] {
        &self.rows
    }

    /// Check if a column exists in the table
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Check if every one of `names` exists in the table
    pub fn has_columns(&self, names: &[&str]) -> bool {
        names.iter().all(|name| self.has_column(name))
    }

    /// Return the subset of `names` that the table does not have
    pub fn missing_columns<'a>(&self, names: &[&'a str]) -> Vec<&'a str> {
        names
            .iter()
            .copied()
            .filter(|name| !self.has_column(name))
            .collect()
    }

    /// All columns starting with the given prefix, in table order
    pub fn columns_with_prefix(&self, prefix: &str) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.starts_with(prefix))
            .map(String::as_str)
            .collect()
    }

    /// Numeric view of a column (one entry per row, `None` = missing)
    ///
    /// Returns `None` if the column does not exist or is a text column.
    pub fn numeric_column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        if name == POST_ID_COLUMN || name == TEXT_COLUMN || !self.has_column(name) {
            return None;
        }
        Some(self.rows.iter().map(|row| row.value(name)).collect())
    }

    /// Keep only rows matching the predicate; the column set is kept as-is
    pub fn filter<F>(&self, mut predicate: F) -> ModerationTable
    where
        F: FnMut(&FlatRow) -> bool,
    {
        ModerationTable {
            rows: self.rows.iter().filter(|row| predicate(*row)).cloned().collect(),
            columns: self.columns.clone(),
        }
    }
}

impl FromIterator<FlatRow> for ModerationTable {
    fn from_iter<T: IntoIterator<Item = FlatRow>>(iter: T) -> Self {
        let mut table = Self::new();
        for row in iter {
            table.push(row);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FLAGGED_COLUMN, TOXICITY_COLUMN};

    fn row(id: &str, scores: &[(&str, Option<f64>)]) -> FlatRow {
        FlatRow {
            post_id: Some(id.to_string()),
            scores: scores.iter().map(|(n, v)| (n.to_string(), *v)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_table() {
        let table = ModerationTable::new();
        assert!(table.is_empty());
        assert_eq!(table.shape(), (0, 0));
        assert!(!table.has_column(TOXICITY_COLUMN));
    }

    #[test]
    fn test_column_union_in_first_appearance_order() {
        let table = ModerationTable::from_rows(vec![
            row("1", &[("oa_violence", Some(0.1))]),
            row("2", &[("oa_hate", Some(0.2)), ("oa_violence", Some(0.3))]),
            row("3", &[("persp_insult", None)]),
        ]);

        assert_eq!(
            table.columns(),
            &[
                "post_id",
                "text",
                "openai_flagged",
                "persp_toxicity",
                "oa_violence",
                "oa_hate",
                "persp_insult"
            ]
        );
        assert_eq!(table.shape(), (3, 7));
        assert_eq!(table.columns_with_prefix("oa_"), vec!["oa_violence", "oa_hate"]);
    }

    #[test]
    fn test_numeric_column_fills_missing() {
        let table = ModerationTable::from_rows(vec![
            row("1", &[("oa_violence", Some(0.1))]),
            row("2", &[("oa_hate", Some(0.2))]),
        ]);

        assert_eq!(
            table.numeric_column("oa_violence"),
            Some(vec![Some(0.1), None])
        );
        assert_eq!(table.numeric_column(FLAGGED_COLUMN), Some(vec![Some(0.0), Some(0.0)]));
        assert_eq!(table.numeric_column("text"), None);
        assert_eq!(table.numeric_column("oa_sexual"), None);
    }

    #[test]
    fn test_missing_columns() {
        let table = ModerationTable::from_rows(vec![row("1", &[])]);
        assert_eq!(
            table.missing_columns(&["oa_violence", TOXICITY_COLUMN]),
            vec!["oa_violence"]
        );
        assert!(!table.has_columns(&["oa_violence", TOXICITY_COLUMN]));
        assert!(table.has_columns(&["post_id", TOXICITY_COLUMN]));
        assert!(table.has_columns(&[]));
    }

    #[test]
    fn test_filter_keeps_columns() {
        let table = ModerationTable::from_rows(vec![
            row("1", &[("oa_violence", Some(0.9))]),
            row("2", &[("oa_violence", Some(0.1))]),
        ]);

        let high = table.filter(|r| r.value("oa_violence").map_or(false, |v| v > 0.5));
        assert_eq!(high.len(), 1);
        assert_eq!(high.columns(), table.columns());

        let none = table.filter(|_| false);
        assert!(none.is_empty());
        assert!(none.has_column("oa_violence"));
    }
}
