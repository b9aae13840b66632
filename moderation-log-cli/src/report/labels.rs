//! Thresholded labels
//!
//! Turns the two designated score columns into per-row boolean labels. A post
//! is labeled harmful when its score is strictly above the threshold; a missing
//! score labels it not harmful.

use super::{AnalysisSettings, ReportError};
use moderation_log_decoder::ModerationTable;

/// Per-row labels from both moderation sources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub openai: Vec<bool>,
    pub perspective: Vec<bool>,
}

impl Labels {
    /// Label every row of the table on both designated columns
    pub fn derive(
        table: &ModerationTable,
        settings: &AnalysisSettings,
        analysis: &'static str,
    ) -> Result<Self, ReportError> {
        let designated = settings.designated_columns();
        if !table.has_columns(&designated) {
            return Err(ReportError::missing(analysis, table.missing_columns(&designated)));
        }

        // A text column has no numeric view; it cannot be thresholded
        let label = |column: &str| -> Result<Vec<bool>, ReportError> {
            let values = table
                .numeric_column(column)
                .ok_or_else(|| ReportError::missing(analysis, vec![column]))?;
            Ok(values
                .into_iter()
                .map(|value| exceeds(value, settings.threshold))
                .collect())
        };

        Ok(Self {
            openai: label(settings.openai_column.as_str())?,
            perspective: label(settings.perspective_column.as_str())?,
        })
    }

    /// Number of labeled rows
    pub fn len(&self) -> usize {
        self.openai.len()
    }

    /// Per-row flag: true where the two sources disagree
    pub fn disagreements(&self) -> Vec<bool> {
        self.openai
            .iter()
            .zip(&self.perspective)
            .map(|(a, b)| a != b)
            .collect()
    }

    /// Number of rows where both labels match
    pub fn agreement_count(&self) -> usize {
        self.disagreements().iter().filter(|d| !**d).count()
    }

    /// Labels encoded as 0/1 for numeric tests
    pub fn as_indicators(&self) -> (Vec<f64>, Vec<f64>) {
        let encode = |labels: &[bool]| -> Vec<f64> {
            labels.iter().map(|&l| if l { 1.0 } else { 0.0 }).collect()
        };
        (encode(self.openai.as_slice()), encode(self.perspective.as_slice()))
    }
}

/// Strictly-greater threshold test; missing never exceeds
pub fn exceeds(value: Option<f64>, threshold: f64) -> bool {
    value.map_or(false, |v| v > threshold)
}
