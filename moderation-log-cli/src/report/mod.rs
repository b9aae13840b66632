//! Report generation
//!
//! Six independent, stateless reports over the flattened moderation table.
//! Each takes the whole table plus the analysis settings and returns a typed
//! outcome whose `Display` is the summary printed on stdout.

use moderation_log_decoder::ModerationTable;
use std::fmt;
use std::path::PathBuf;

pub mod agreement;
pub mod charts;
pub mod correlation;
pub mod disagreement;
pub mod distribution;
pub mod labels;
pub mod scatter;
pub mod significance;
pub mod stats;

pub use charts::ChartRenderer;

/// Errors a report can end with
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Required columns are absent; the report is skipped, the run continues
    #[error("Missing columns for {analysis}: {}", .columns.join(", "))]
    MissingColumns {
        analysis: &'static str,
        columns: Vec<String>,
    },

    #[error("Chart rendering failed: {0}")]
    Chart(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReportError {
    pub(crate) fn missing(analysis: &'static str, columns: Vec<&str>) -> Self {
        ReportError::MissingColumns {
            analysis,
            columns: columns.into_iter().map(str::to_string).collect(),
        }
    }
}

/// Threshold and designated columns shared by the reports
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    /// Scores strictly above this value label a post as harmful
    pub threshold: f64,
    /// Source-A column compared against source B
    pub openai_column: String,
    /// Source-B column compared against source A
    pub perspective_column: String,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            openai_column: "oa_violence".to_string(),
            perspective_column: moderation_log_decoder::TOXICITY_COLUMN.to_string(),
        }
    }
}

impl AnalysisSettings {
    /// Both designated columns, source A first
    pub fn designated_columns(&self) -> [&str; 2] {
        [self.openai_column.as_str(), self.perspective_column.as_str()]
    }
}

/// Human-readable name for a column: `oa_violence` -> `OpenAI violence`
pub fn column_label(column: &str) -> String {
    if let Some(rest) = column.strip_prefix(moderation_log_decoder::OPENAI_PREFIX) {
        format!("OpenAI {}", rest)
    } else if let Some(rest) = column.strip_prefix(moderation_log_decoder::PERSPECTIVE_PREFIX) {
        format!("Perspective {}", rest)
    } else {
        column.to_string()
    }
}

/// Format an optional statistic; undefined values print as `nan`
pub(crate) fn fmt_stat(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) if !v.is_nan() => format!("{:.*}", precision, v),
        _ => "nan".to_string(),
    }
}

/// Write the "chart saved" line if a chart was produced
pub(crate) fn fmt_chart(f: &mut fmt::Formatter<'_>, chart: &Option<PathBuf>) -> fmt::Result {
    match chart {
        Some(path) => write!(f, "\n   chart saved to {}", path.display()),
        None => Ok(()),
    }
}

/// Run all six reports in order, printing each summary
///
/// A report with missing columns prints a warning and the run continues;
/// any other error stops the run.
pub fn run_all(
    table: &ModerationTable,
    settings: &AnalysisSettings,
    charts: Option<&ChartRenderer>,
) -> Result<(), ReportError> {
    emit(correlation::correlation_analysis(table, settings))?;
    emit(agreement::agreement_analysis(table, settings))?;
    emit(distribution::category_distribution(table, charts))?;
    emit(significance::statistical_test(table, settings))?;
    emit(scatter::visualize(table, settings, charts))?;
    emit(disagreement::disagreement_analysis(table, settings, charts))?;
    Ok(())
}

fn emit<T: fmt::Display>(outcome: Result<T, ReportError>) -> Result<(), ReportError> {
    println!("{}", summary(outcome)?);
    Ok(())
}

/// Text printed for one report outcome; a missing-columns skip becomes a warning
fn summary<T: fmt::Display>(outcome: Result<T, ReportError>) -> Result<String, ReportError> {
    match outcome {
        Ok(report) => Ok(report.to_string()),
        Err(ReportError::MissingColumns { analysis, columns }) => {
            log::warn!("Skipping {}: missing {:?}", analysis, columns);
            Ok(format!("⚠️ Missing columns for {}", analysis))
        }
        Err(e) => Err(e),
    }
}
