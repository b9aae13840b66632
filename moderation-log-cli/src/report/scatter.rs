//! Scatter plot of the two designated columns

use super::charts::ChartRenderer;
use super::stats::complete_pairs;
use super::{column_label, fmt_chart, AnalysisSettings, ReportError};
use moderation_log_decoder::ModerationTable;
use std::fmt;
use std::path::PathBuf;

pub const ANALYSIS: &str = "visualization";
pub const CHART_FILE: &str = "violence_vs_toxicity.svg";

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterReport {
    pub title: String,
    /// Rows with both scores present (the plotted points)
    pub points: usize,
    pub chart: Option<PathBuf>,
}

impl fmt::Display for ScatterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "🔍 {}: {} posts with both scores", self.title, self.points)?;
        fmt_chart(f, &self.chart)
    }
}

/// Title-case the first letter of every word
fn title_case(label: &str) -> String {
    label
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Scatter the designated source-A column against the source-B column
pub fn visualize(
    table: &ModerationTable,
    settings: &AnalysisSettings,
    charts: Option<&ChartRenderer>,
) -> Result<ScatterReport, ReportError> {
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

    let x_label = title_case(&column_label(&settings.openai_column));
    let y_label = title_case(&column_label(&settings.perspective_column));
    let title = format!("{} vs {}", x_label, y_label);
    let points = complete_pairs(&xs, &ys);
    let x_axis = format!("{} Score", x_label);
    let y_axis = format!("{} Score", y_label);

    let chart = charts
        .map(|renderer| {
            renderer.scatter_plot(CHART_FILE, &title, (x_axis.as_str(), y_axis.as_str()), &points)
        })
        .transpose()?;

    Ok(ScatterReport {
        title,
        points: points.len(),
        chart,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use moderation_log_decoder::FlatRow;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("OpenAI violence"), "OpenAI Violence");
        assert_eq!(title_case("Perspective toxicity"), "Perspective Toxicity");
    }

    #[test]
    fn test_scatter_counts_complete_rows() {
        let table: ModerationTable = vec![
            FlatRow {
                persp_toxicity: Some(0.3),
                scores: vec![("oa_violence".to_string(), Some(0.2))],
                ..Default::default()
            },
            FlatRow {
                persp_toxicity: None,
                scores: vec![("oa_violence".to_string(), Some(0.5))],
                ..Default::default()
            },
        ]
        .into_iter()
        .collect();

        let dir = tempfile::tempdir().unwrap();
        let renderer = ChartRenderer::new(dir.path()).unwrap();
        let report = visualize(&table, &AnalysisSettings::default(), Some(&renderer)).unwrap();

        assert_eq!(report.title, "OpenAI Violence vs Perspective Toxicity");
        assert_eq!(report.points, 1);
        assert!(dir.path().join(CHART_FILE).exists());
    }

    #[test]
    fn test_missing_violence_column_is_skipped() {
        let table: ModerationTable = vec![FlatRow::default()].into_iter().collect();
        let err = visualize(&table, &AnalysisSettings::default(), None).unwrap_err();
        assert!(matches!(
            err,
            ReportError::MissingColumns { analysis: ANALYSIS, .. }
        ));
    }
}
