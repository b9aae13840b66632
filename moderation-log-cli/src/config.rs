//! Configuration loading and parsing

use crate::report::AnalysisSettings;
use anyhow::{bail, Context, Result};
use moderation_log_decoder::{LoaderConfig, POST_ID_COLUMN, TEXT_COLUMN};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct InputConfig {
    #[serde(default = "default_input_file")]
    pub file: PathBuf,
    #[serde(default)]
    pub skip_invalid_lines: bool,
    #[serde(default)]
    pub max_records: Option<usize>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            file: default_input_file(),
            skip_invalid_lines: false,
            max_records: None,
        }
    }
}

fn default_input_file() -> PathBuf {
    PathBuf::from("data/results.jsonl")
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_openai_column")]
    pub openai_column: String,
    #[serde(default = "default_perspective_column")]
    pub perspective_column: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            openai_column: default_openai_column(),
            perspective_column: default_perspective_column(),
        }
    }
}

fn default_threshold() -> f64 {
    0.5
}

fn default_openai_column() -> String {
    "oa_violence".to_string()
}

fn default_perspective_column() -> String {
    moderation_log_decoder::TOXICITY_COLUMN.to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_chart_dir")]
    pub chart_dir: PathBuf,
    #[serde(default = "default_true")]
    pub charts: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            chart_dir: default_chart_dir(),
            charts: true,
        }
    }
}

fn default_chart_dir() -> PathBuf {
    PathBuf::from("charts")
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Check values that parse fine but make no sense
    pub fn validate(&self) -> Result<()> {
        if !self.analysis.threshold.is_finite() {
            bail!("analysis.threshold must be a finite number, got {}", self.analysis.threshold);
        }
        if self.analysis.openai_column.is_empty() || self.analysis.perspective_column.is_empty() {
            bail!("analysis column names must not be empty");
        }
        for column in [&self.analysis.openai_column, &self.analysis.perspective_column] {
            if column == POST_ID_COLUMN || column == TEXT_COLUMN {
                bail!("analysis column {:?} is not a score column", column);
            }
        }
        Ok(())
    }

    /// Loader settings for the decoder library
    pub fn loader_config(&self) -> LoaderConfig {
        let config = LoaderConfig::new().with_skip_invalid_lines(self.input.skip_invalid_lines);
        match self.input.max_records {
            Some(max) => config.with_max_records(max),
            None => config,
        }
    }

    /// Threshold and designated columns for the reports
    pub fn analysis_settings(&self) -> AnalysisSettings {
        AnalysisSettings {
            threshold: self.analysis.threshold,
            openai_column: self.analysis.openai_column.clone(),
            perspective_column: self.analysis.perspective_column.clone(),
        }
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    config
        .validate()
        .with_context(|| format!("Invalid config file: {:?}", path))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [input]
            file = "exports/moderation.jsonl"
            skip_invalid_lines = true

            [analysis]
            threshold = 0.7
            openai_column = "oa_hate"

            [output]
            charts = false
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.input.file, PathBuf::from("exports/moderation.jsonl"));
        assert!(config.input.skip_invalid_lines);
        assert_eq!(config.analysis.threshold, 0.7);
        assert_eq!(config.analysis.openai_column, "oa_hate");
        assert_eq!(config.analysis.perspective_column, "persp_toxicity");
        assert!(!config.output.charts);
        assert_eq!(config.output.chart_dir, PathBuf::from("charts"));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.input.file, PathBuf::from("data/results.jsonl"));
        assert_eq!(config.analysis_settings(), AnalysisSettings::default());
    }

    #[test]
    fn test_loader_config_mapping() {
        let mut config = AppConfig::default();
        config.input.skip_invalid_lines = true;
        config.input.max_records = Some(3);

        let loader = config.loader_config();
        assert!(loader.skip_invalid_lines);
        assert_eq!(loader.max_records, Some(3));
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let mut config = AppConfig::default();
        config.analysis.threshold = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_text_column_rejected() {
        let mut config = AppConfig::default();
        config.analysis.perspective_column = "text".to_string();
        assert!(config.validate().is_err());

        config.analysis.perspective_column = "post_id".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[analysis]\nthreshold = 0.25").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.analysis.threshold, 0.25);

        assert!(load_config(Path::new("missing/config.toml")).is_err());
    }
}
