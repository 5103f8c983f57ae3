//! Configuration types for the party preprocessing pipeline.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic pipeline setup. Configurations are serde
//! types, so they can also be read from a JSON file.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Repository-relative location of the party dataset.
pub const DEFAULT_DATA_PATH: &str = "data/CHES2019V3.csv";

/// Columns that identify a party row by default.
pub const DEFAULT_INDEX_COLUMNS: [&str; 3] = ["party_id", "party", "country"];

/// Number of rows the CSV reader samples for type inference.
pub const DEFAULT_INFER_SCHEMA_LENGTH: usize = 1000;

/// What the scaler does with a column whose standard deviation is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ZeroVariancePolicy {
    /// Center the column and leave it at zero (scale taken as 1.0)
    #[default]
    Center,
    /// Fail with a scaling error
    Error,
}

/// Configuration for the preprocessing pipeline.
///
/// Use [`PreprocessingConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use party_processing::config::{PreprocessingConfig, ZeroVariancePolicy};
///
/// let config = PreprocessingConfig::builder()
///     .non_feature_columns(["eu_position_sd"])
///     .zero_variance_policy(ZeroVariancePolicy::Error)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessingConfig {
    /// Path of the dataset file (CSV or Parquet).
    /// Default: "data/CHES2019V3.csv"
    pub data_path: PathBuf,

    /// Columns promoted to row keys, in key order.
    /// Default: ["party_id", "party", "country"]
    pub index_columns: Vec<String>,

    /// Columns removed before the index is assigned.
    /// Default: empty (no-op)
    pub non_feature_columns: Vec<String>,

    /// Handling of constant feature columns during scaling.
    /// Default: Center
    pub zero_variance_policy: ZeroVariancePolicy,

    /// Rows sampled by the CSV reader for schema inference.
    /// `None` scans the whole file.
    /// Default: Some(1000)
    pub infer_schema_length: Option<usize>,

    /// Output directory for the scaled table and report.
    /// Default: "output"
    pub output_dir: PathBuf,

    /// Custom output file name (without extension).
    /// If None, uses the input file stem.
    /// Default: None
    pub output_name: Option<String>,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            index_columns: DEFAULT_INDEX_COLUMNS.iter().map(|s| s.to_string()).collect(),
            non_feature_columns: Vec::new(),
            zero_variance_policy: ZeroVariancePolicy::default(),
            infer_schema_length: Some(DEFAULT_INFER_SCHEMA_LENGTH),
            output_dir: PathBuf::from("output"),
            output_name: None,
        }
    }
}

impl PreprocessingConfig {
    /// Create a new configuration builder.
    pub fn builder() -> PreprocessingConfigBuilder {
        PreprocessingConfigBuilder::default()
    }

    /// Read a configuration from a JSON file and validate it.
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: PreprocessingConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.index_columns.is_empty() {
            return Err(ConfigValidationError::EmptyIndex);
        }

        let mut seen = HashSet::new();
        for name in &self.index_columns {
            if !seen.insert(name.as_str()) {
                return Err(ConfigValidationError::DuplicateColumn {
                    field: "index_columns".to_string(),
                    column: name.clone(),
                });
            }
        }

        let mut seen_non_features = HashSet::new();
        for name in &self.non_feature_columns {
            if !seen_non_features.insert(name.as_str()) {
                return Err(ConfigValidationError::DuplicateColumn {
                    field: "non_feature_columns".to_string(),
                    column: name.clone(),
                });
            }
        }

        if self.infer_schema_length == Some(0) {
            return Err(ConfigValidationError::InvalidInferSchemaLength);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("At least one index column is required")]
    EmptyIndex,

    #[error("Column '{column}' is listed more than once in '{field}'")]
    DuplicateColumn { field: String, column: String },

    #[error("infer_schema_length must be at least 1 (use None to scan the whole file)")]
    InvalidInferSchemaLength,
}

/// Builder for [`PreprocessingConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct PreprocessingConfigBuilder {
    data_path: Option<PathBuf>,
    index_columns: Option<Vec<String>>,
    non_feature_columns: Option<Vec<String>>,
    zero_variance_policy: Option<ZeroVariancePolicy>,
    infer_schema_length: Option<Option<usize>>,
    output_dir: Option<PathBuf>,
    output_name: Option<String>,
}

impl PreprocessingConfigBuilder {
    /// Set the dataset path.
    pub fn data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = Some(path.into());
        self
    }

    /// Set the columns that become row keys.
    pub fn index_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the columns removed before indexing.
    pub fn non_feature_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.non_feature_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the zero-variance policy used by the scaler.
    pub fn zero_variance_policy(mut self, policy: ZeroVariancePolicy) -> Self {
        self.zero_variance_policy = Some(policy);
        self
    }

    /// Set how many rows the CSV reader samples for schema inference.
    pub fn infer_schema_length(mut self, rows: Option<usize>) -> Self {
        self.infer_schema_length = Some(rows);
        self
    }

    /// Set the output directory for the scaled table and report.
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }

    /// Set a custom output file name (without extension).
    pub fn output_name(mut self, name: impl Into<String>) -> Self {
        self.output_name = Some(name.into());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `PreprocessingConfig` or an error if validation fails.
    pub fn build(self) -> Result<PreprocessingConfig, ConfigValidationError> {
        let defaults = PreprocessingConfig::default();
        let config = PreprocessingConfig {
            data_path: self.data_path.unwrap_or(defaults.data_path),
            index_columns: self.index_columns.unwrap_or(defaults.index_columns),
            non_feature_columns: self.non_feature_columns.unwrap_or_default(),
            zero_variance_policy: self.zero_variance_policy.unwrap_or_default(),
            infer_schema_length: self
                .infer_schema_length
                .unwrap_or(defaults.infer_schema_length),
            output_dir: self.output_dir.unwrap_or(defaults.output_dir),
            output_name: self.output_name,
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PreprocessingConfig::default();
        assert_eq!(config.data_path, PathBuf::from("data/CHES2019V3.csv"));
        assert_eq!(config.index_columns, vec!["party_id", "party", "country"]);
        assert!(config.non_feature_columns.is_empty());
        assert_eq!(config.zero_variance_policy, ZeroVariancePolicy::Center);
        assert_eq!(config.infer_schema_length, Some(1000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = PreprocessingConfig::builder()
            .data_path("parties.parquet")
            .index_columns(["party_id"])
            .non_feature_columns(["notes", "source"])
            .zero_variance_policy(ZeroVariancePolicy::Error)
            .infer_schema_length(None)
            .output_name("scaled")
            .build()
            .unwrap();

        assert_eq!(config.data_path, PathBuf::from("parties.parquet"));
        assert_eq!(config.index_columns, vec!["party_id"]);
        assert_eq!(config.non_feature_columns, vec!["notes", "source"]);
        assert_eq!(config.zero_variance_policy, ZeroVariancePolicy::Error);
        assert_eq!(config.infer_schema_length, None);
        assert_eq!(config.output_name, Some("scaled".to_string()));
    }

    #[test]
    fn test_validation_empty_index() {
        let result = PreprocessingConfig::builder()
            .index_columns(Vec::<String>::new())
            .build();
        assert!(matches!(result, Err(ConfigValidationError::EmptyIndex)));
    }

    #[test]
    fn test_validation_duplicate_index_column() {
        let result = PreprocessingConfig::builder()
            .index_columns(["party", "party"])
            .build();
        assert!(matches!(
            result,
            Err(ConfigValidationError::DuplicateColumn { .. })
        ));
    }

    #[test]
    fn test_validation_leaves_overlap_to_selection() {
        // a dropped index column surfaces as a missing column at selection time
        let config = PreprocessingConfig::builder()
            .non_feature_columns(["country"])
            .build()
            .unwrap();
        assert_eq!(config.non_feature_columns, vec!["country"]);
    }

    #[test]
    fn test_validation_zero_infer_schema_length() {
        let result = PreprocessingConfig::builder()
            .infer_schema_length(Some(0))
            .build();
        assert!(matches!(
            result,
            Err(ConfigValidationError::InvalidInferSchemaLength)
        ));
    }

    #[test]
    fn test_config_serialization() {
        let config = PreprocessingConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: PreprocessingConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config.index_columns, deserialized.index_columns);
        assert_eq!(config.zero_variance_policy, deserialized.zero_variance_policy);
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "data_path": "data/parties.csv",
            "index_columns": ["party_id", "party"],
            "non_feature_columns": ["year"],
            "zero_variance_policy": "Error",
            "infer_schema_length": null,
            "output_dir": "custom_output",
            "output_name": "ches_scaled"
        }"#;

        let config: PreprocessingConfig =
            serde_json::from_str(json).expect("Should deserialize config JSON");

        assert_eq!(config.data_path, PathBuf::from("data/parties.csv"));
        assert_eq!(config.index_columns, vec!["party_id", "party"]);
        assert_eq!(config.non_feature_columns, vec!["year"]);
        assert_eq!(config.zero_variance_policy, ZeroVariancePolicy::Error);
        assert_eq!(config.infer_schema_length, None);
        assert_eq!(config.output_dir.to_str().unwrap(), "custom_output");
        assert_eq!(config.output_name, Some("ches_scaled".to_string()));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PreprocessingConfig =
            serde_json::from_str(r#"{ "non_feature_columns": ["year"] }"#).unwrap();

        assert_eq!(config.index_columns, vec!["party_id", "party", "country"]);
        assert_eq!(config.non_feature_columns, vec!["year"]);
        assert_eq!(config.infer_schema_length, Some(1000));
    }
}
