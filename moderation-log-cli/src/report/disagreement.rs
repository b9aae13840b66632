//! Disagreement characterization
//!
//! Counts the rows where the two sources' labels differ and shows which
//! source-A categories score high on exactly those rows.

use super::charts::{BarPalette, ChartRenderer};
use super::distribution::CategoryMeans;
use super::labels::Labels;
use super::{fmt_chart, fmt_stat, AnalysisSettings, ReportError};
use moderation_log_decoder::ModerationTable;
use std::fmt;
use std::path::PathBuf;

pub const ANALYSIS: &str = "disagreement analysis";
pub const CHART_FILE: &str = "disagreement_categories.svg";
pub const CHART_TITLE: &str = "Average OpenAI Category Scores (Disagreement Cases)";

#[derive(Debug, Clone, PartialEq)]
pub struct DisagreementReport {
    pub disagreements: usize,
    pub total: usize,
    /// Source-A category means over the disagreement rows only
    pub category_means: CategoryMeans,
    pub chart: Option<PathBuf>,
}

impl DisagreementReport {
    /// Disagreement share in percent (None for an empty table)
    pub fn percentage(&self) -> Option<f64> {
        (self.total > 0).then(|| 100.0 * self.disagreements as f64 / self.total as f64)
    }
}

impl fmt::Display for DisagreementReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "⚠️ Disagreements found: {} out of {} ({}%)",
            self.disagreements,
            self.total,
            fmt_stat(self.percentage(), 2)
        )?;
        if !self.category_means.is_empty() {
            write!(f, "\n{}", self.category_means)?;
        }
        fmt_chart(f, &self.chart)
    }
}

/// Count label disagreements and average source-A scores over them
pub fn disagreement_analysis(
    table: &ModerationTable,
    settings: &AnalysisSettings,
    charts: Option<&ChartRenderer>,
) -> Result<DisagreementReport, ReportError> {
    let labels = Labels::derive(table, settings, ANALYSIS)?;
    let mut mask = labels.disagreements().into_iter();

    // Rows are visited in order, so the mask lines up with the table
    let disagreeing = table.filter(|_| mask.next().unwrap_or(false));
    let category_means = CategoryMeans::compute(&disagreeing);

    log::debug!(
        "{} of {} rows disagree at threshold {}",
        disagreeing.len(),
        table.len(),
        settings.threshold
    );

    let chart = match charts {
        Some(renderer) if !category_means.is_empty() => Some(renderer.bar_chart(
            CHART_FILE,
            CHART_TITLE,
            "Mean Score",
            &category_means.entries,
            BarPalette::Magma,
        )?),
        _ => None,
    };

    Ok(DisagreementReport {
        disagreements: disagreeing.len(),
        total: table.len(),
        category_means,
        chart,
    })
}
