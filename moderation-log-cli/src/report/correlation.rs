//! Correlation between the two designated score columns

use super::stats::{complete_pairs, pearson};
use super::{column_label, fmt_stat, AnalysisSettings, ReportError};
use moderation_log_decoder::ModerationTable;
use std::fmt;

pub const ANALYSIS: &str = "correlation analysis";

#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationReport {
    pub openai_column: String,
    pub perspective_column: String,
    /// Pearson r (None = undefined, including any missing score)
    pub coefficient: Option<f64>,
    /// Rows where both scores were present
    pub pairs: usize,
}

impl fmt::Display for CorrelationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "🔗 Correlation ({} vs {}): {}",
            column_label(&self.openai_column),
            column_label(&self.perspective_column),
            fmt_stat(self.coefficient, 3)
        )
    }
}

/// Pearson correlation between the designated source-A and source-B columns
///
/// A missing score in either column makes the coefficient undefined.
pub fn correlation_analysis(
    table: &ModerationTable,
    settings: &AnalysisSettings,
) -> Result<CorrelationReport, ReportError> {
    let (xs, ys) = match (
        table.numeric_column(&settings.openai_column),
        table.numeric_column(&settings.perspective_column),
    ) {
        (Some(xs), Some(ys)) => (xs, ys),
        _ => {
            return Err(ReportError::missing(
                ANALYSIS,
                table.missing_columns(&settings.designated_columns()),
            ))
        }
    };

    let pairs = complete_pairs(&xs, &ys);
    let coefficient = if pairs.len() < table.len() {
        log::warn!(
            "{} of {} rows lack a score for {}; correlation is undefined",
            table.len() - pairs.len(),
            table.len(),
            ANALYSIS
        );
        None
    } else {
        pearson(&pairs)
    };
    log::debug!("Correlation over {} rows: {:?}", pairs.len(), coefficient);

    Ok(CorrelationReport {
        openai_column: settings.openai_column.clone(),
        perspective_column: settings.perspective_column.clone(),
        coefficient,
        pairs: pairs.len(),
    })
}
