//! Configuration types for aerial log clustering.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::loaders::DEFAULT_INPUT_PATH;

/// Configuration for radius clustering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringConfig {
    /// Cluster radius in meters; 0 disables clustering
    #[serde(default = "default_max_distance")]
    pub max_distance: f64,
}

fn default_max_distance() -> f64 {
    100.0
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            max_distance: default_max_distance(),
        }
    }
}

/// Where aerial log documents are read from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Path to the aerial log JSON document
    #[serde(default = "default_input_path")]
    pub path: PathBuf,
}

fn default_input_path() -> PathBuf {
    PathBuf::from(DEFAULT_INPUT_PATH)
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: default_input_path(),
        }
    }
}

/// Serialization format for cluster summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

/// How cluster summaries are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_pretty() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            pretty: default_pretty(),
        }
    }
}

/// Main pipeline configuration combining all sub-configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub clustering: ClusteringConfig,

    #[serde(default)]
    pub input: InputConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl PipelineConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_pipeline_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.clustering.max_distance, 100.0);
        assert_eq!(config.input.path, PathBuf::from("data/data.json"));
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: PipelineConfig = serde_yaml::from_str("clustering:\n  max_distance: 250\n").unwrap();
        assert_eq!(config.clustering.max_distance, 250.0);
        assert_eq!(config.input.path, PathBuf::from("data/data.json"));
    }

    #[test]
    fn test_output_format_lowercase() {
        let config: PipelineConfig = serde_yaml::from_str("output:\n  format: csv\n").unwrap();
        assert_eq!(config.output.format, OutputFormat::Csv);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_yaml_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");

        let mut config = PipelineConfig::default();
        config.clustering.max_distance = 0.0;
        config.to_yaml(&path).unwrap();

        let loaded = PipelineConfig::from_yaml(&path).unwrap();
        assert_eq!(loaded.clustering.max_distance, 0.0);
    }
}
