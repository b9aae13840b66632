//! Raw agreement rate between the two sources' thresholded labels

use super::labels::Labels;
use super::{AnalysisSettings, ReportError};
use moderation_log_decoder::ModerationTable;
use std::fmt;

pub const ANALYSIS: &str = "agreement analysis";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgreementReport {
    pub agreeing: usize,
    pub total: usize,
    pub threshold: f64,
}

impl AgreementReport {
    /// Fraction of rows whose labels match (None for an empty table)
    pub fn rate(&self) -> Option<f64> {
        (self.total > 0).then(|| self.agreeing as f64 / self.total as f64)
    }
}

impl fmt::Display for AgreementReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "✅ Agreement between APIs: {}%",
            super::fmt_stat(self.rate().map(|r| r * 100.0), 2)
        )
    }
}

/// Label both designated columns at the threshold and measure how often they match
pub fn agreement_analysis(
    table: &ModerationTable,
    settings: &AnalysisSettings,
) -> Result<AgreementReport, ReportError> {
    let labels = Labels::derive(table, settings, ANALYSIS)?;

    Ok(AgreementReport {
        agreeing: labels.agreement_count(),
        total: labels.len(),
        threshold: settings.threshold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use moderation_log_decoder::FlatRow;

    fn table(pairs: &[(f64, f64)]) -> ModerationTable {
        pairs
            .iter()
            .map(|&(violence, toxicity)| FlatRow {
                persp_toxicity: Some(toxicity),
                scores: vec![("oa_violence".to_string(), Some(violence))],
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_nothing_over_threshold_is_full_agreement() {
        let t = table(&[(0.1, 0.2), (0.0, 0.4), (0.3, 0.5)]);
        let report = agreement_analysis(&t, &AnalysisSettings::default()).unwrap();

        assert_eq!(report.rate(), Some(1.0));
        assert_eq!(report.to_string(), "✅ Agreement between APIs: 100.00%");
    }

    #[test]
    fn test_partial_agreement() {
        let t = table(&[(0.9, 0.9), (0.9, 0.1), (0.1, 0.1), (0.2, 0.7)]);
        let report = agreement_analysis(&t, &AnalysisSettings::default()).unwrap();

        assert_eq!(report.agreeing, 2);
        assert_eq!(report.to_string(), "✅ Agreement between APIs: 50.00%");
    }

    #[test]
    fn test_threshold_changes_labels() {
        let t = table(&[(0.3, 0.6)]);
        let settings = AnalysisSettings {
            threshold: 0.2,
            ..Default::default()
        };
        assert_eq!(agreement_analysis(&t, &settings).unwrap().rate(), Some(1.0));
        assert_eq!(
            agreement_analysis(&t, &AnalysisSettings::default()).unwrap().rate(),
            Some(0.0)
        );
    }

    #[test]
    fn test_empty_table_is_skipped() {
        let err = agreement_analysis(&ModerationTable::new(), &AnalysisSettings::default())
            .unwrap_err();
        assert!(matches!(err, ReportError::MissingColumns { .. }));
    }
}
