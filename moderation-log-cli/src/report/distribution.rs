//! Mean source-A category scores

use super::charts::{BarPalette, ChartRenderer};
use super::stats::{mean_present, sort_descending};
use super::{fmt_chart, fmt_stat, ReportError};
use moderation_log_decoder::{ModerationTable, OPENAI_PREFIX};
use std::fmt;
use std::path::PathBuf;

pub const ANALYSIS: &str = "category distribution";
pub const CHART_FILE: &str = "category_distribution.svg";
pub const CHART_TITLE: &str = "Average OpenAI Category Scores";

/// Mean score per source-A category, largest first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryMeans {
    pub entries: Vec<(String, Option<f64>)>,
}

impl CategoryMeans {
    /// Mean of every `oa_*` column (missing values skipped)
    ///
    /// An empty table still lists its columns, each with an undefined mean.
    pub fn compute(table: &ModerationTable) -> Self {
        let mut entries: Vec<(String, Option<f64>)> = table
            .columns_with_prefix(OPENAI_PREFIX)
            .into_iter()
            .map(|column| {
                let mean = table
                    .numeric_column(column)
                    .and_then(|values| mean_present(&values));
                (column.to_string(), mean)
            })
            .collect();

        sort_descending(&mut entries);
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, column: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, mean)| *mean)
    }
}

impl fmt::Display for CategoryMeans {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.entries.iter().map(|(n, _)| n.len()).max().unwrap_or(0);
        for (i, (name, mean)) in self.entries.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "   {:<width$}  {}", name, fmt_stat(*mean, 4), width = width)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DistributionReport {
    pub means: CategoryMeans,
    pub chart: Option<PathBuf>,
}

impl fmt::Display for DistributionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "📈 {}:", CHART_TITLE)?;
        write!(f, "{}", self.means)?;
        fmt_chart(f, &self.chart)
    }
}

/// Mean of each source-A category column, plotted as a bar chart
pub fn category_distribution(
    table: &ModerationTable,
    charts: Option<&ChartRenderer>,
) -> Result<DistributionReport, ReportError> {
    let means = CategoryMeans::compute(table);
    if means.is_empty() {
        return Err(ReportError::missing(ANALYSIS, vec!["oa_*"]));
    }

    let chart = charts
        .map(|renderer| {
            renderer.bar_chart(CHART_FILE, CHART_TITLE, "Mean Score", &means.entries, BarPalette::Viridis)
        })
        .transpose()?;

    Ok(DistributionReport { means, chart })
}

#[cfg(test)]
mod tests {
    use super::*;
    use moderation_log_decoder::FlatRow;

    fn row(scores: &[(&str, Option<f64>)]) -> FlatRow {
        FlatRow {
            scores: scores.iter().map(|(n, v)| (n.to_string(), *v)).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_means_sorted_descending() {
        let table: ModerationTable = vec![
            row(&[("oa_violence", Some(0.2)), ("oa_hate", Some(0.8)), ("persp_insult", Some(0.9))]),
            row(&[("oa_violence", Some(0.4)), ("oa_hate", None)]),
            row(&[("oa_sexual", None)]),
        ]
        .into_iter()
        .collect();

        let report = category_distribution(&table, None).unwrap();
        let names: Vec<&str> = report.means.entries.iter().map(|(n, _)| n.as_str()).collect();

        assert_eq!(names, vec!["oa_hate", "oa_violence", "oa_sexual"]);
        assert!((report.means.get("oa_violence").unwrap() - 0.3).abs() < 1e-12);
        assert_eq!(report.means.get("oa_sexual"), None);
        assert!(report.chart.is_none());
    }

    #[test]
    fn test_no_category_columns_is_skipped() {
        let table: ModerationTable = vec![row(&[("persp_insult", Some(0.3))])].into_iter().collect();
        assert!(matches!(
            category_distribution(&table, None),
            Err(ReportError::MissingColumns { .. })
        ));
    }

    #[test]
    fn test_chart_is_rendered() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = ChartRenderer::new(dir.path()).unwrap();
        let table: ModerationTable = vec![row(&[("oa_violence", Some(0.2))])].into_iter().collect();

        let report = category_distribution(&table, Some(&renderer)).unwrap();
        assert_eq!(report.chart, Some(dir.path().join(CHART_FILE)));
        assert!(report.to_string().contains("oa_violence"));
    }
}
