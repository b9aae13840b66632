//! Two-sample significance test between the thresholded labels

use super::labels::Labels;
use super::stats::{student_t_test, TTest};
use super::{fmt_stat, AnalysisSettings, ReportError};
use moderation_log_decoder::ModerationTable;
use std::fmt;

pub const ANALYSIS: &str = "statistical test";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignificanceReport {
    /// None when there are too few rows for any degrees of freedom
    pub test: Option<TTest>,
}

impl fmt::Display for SignificanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "📊 T-test between APIs: t={}, p={}",
            fmt_stat(self.test.map(|t| t.statistic), 3),
            fmt_stat(self.test.map(|t| t.p_value), 3)
        )
    }
}

/// Student t-test between the 0/1-encoded labels of both sources
pub fn statistical_test(
    table: &ModerationTable,
    settings: &AnalysisSettings,
) -> Result<SignificanceReport, ReportError> {
    let labels = Labels::derive(table, settings, ANALYSIS)?;
    let (openai, perspective) = labels.as_indicators();

    let test = student_t_test(&openai, &perspective);
    log::debug!("T-test over {} rows: {:?}", labels.len(), test);

    Ok(SignificanceReport { test })
}
