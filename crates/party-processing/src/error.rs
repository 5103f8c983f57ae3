//! Custom error types for the party preprocessing pipeline.
//!
//! Every failure surfaces to the caller unchanged. Errors are grouped into
//! coarse [`ErrorKind`]s (load, schema, scaling, config, internal) so callers
//! can react to the category without matching every variant.
//!
//! Errors are serializable so a calling tool can emit them as JSON.

use crate::config::ConfigValidationError;
use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// Coarse category of a [`PreprocessingError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// The source file is missing, unreadable or malformed.
    Load,
    /// A requested column is absent or has an unusable type.
    Schema,
    /// The scaler could not standardize a column.
    Scaling,
    /// The configuration is invalid.
    Config,
    /// Anything else (I/O while writing output, Polars internals, JSON).
    Internal,
}

/// The main error type for the preprocessing pipeline.
#[derive(Error, Debug)]
pub enum PreprocessingError {
    /// The dataset could not be loaded.
    #[error("Failed to load dataset from '{path}': {reason}")]
    Load { path: String, reason: String },

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// A feature column holds values that have no numeric mean.
    #[error("Feature column '{column}' has non-numeric type {dtype}")]
    NonNumericFeature { column: String, dtype: String },

    /// A constant column cannot be divided by its standard deviation.
    #[error("Column '{0}' has zero variance and cannot be scaled")]
    ZeroVariance(String),

    /// The scaler was handed a column that still contains missing values.
    #[error("Column '{column}' still contains {missing} missing values; impute before scaling")]
    MissingValuesInScalingInput { column: String, missing: usize },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<PreprocessingError>,
    },
}

impl PreprocessingError {
    /// Build a load error for `path`.
    pub fn load(path: impl AsRef<std::path::Path>, reason: impl Into<String>) -> Self {
        PreprocessingError::Load {
            path: path.as_ref().display().to_string(),
            reason: reason.into(),
        }
    }

    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        PreprocessingError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get the coarse category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Load { .. } => ErrorKind::Load,
            Self::ColumnNotFound(_) | Self::NonNumericFeature { .. } => ErrorKind::Schema,
            Self::ZeroVariance(_) | Self::MissingValuesInScalingInput { .. } => {
                ErrorKind::Scaling
            }
            Self::InvalidConfig(_) => ErrorKind::Config,
            Self::Io(_) | Self::Polars(_) | Self::Json(_) => ErrorKind::Internal,
            Self::WithContext { source, .. } => source.kind(),
        }
    }

    /// Get a stable error code for machine consumption.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Load { .. } => "LOAD_ERROR",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::NonNumericFeature { .. } => "NON_NUMERIC_FEATURE",
            Self::ZeroVariance(_) => "ZERO_VARIANCE",
            Self::MissingValuesInScalingInput { .. } => "MISSING_VALUES_IN_SCALING_INPUT",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error is a load failure.
    pub fn is_load_error(&self) -> bool {
        self.kind() == ErrorKind::Load
    }

    /// Check if this error is a schema failure (missing or unusable column).
    pub fn is_schema_error(&self) -> bool {
        self.kind() == ErrorKind::Schema
    }

    /// Check if this error is a scaling failure.
    pub fn is_scaling_error(&self) -> bool {
        self.kind() == ErrorKind::Scaling
    }
}

impl From<ConfigValidationError> for PreprocessingError {
    fn from(err: ConfigValidationError) -> Self {
        PreprocessingError::InvalidConfig(err.to_string())
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for PreprocessingError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("PreprocessingError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for preprocessing operations.
pub type Result<T> = std::result::Result<T, PreprocessingError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| PreprocessingError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            PreprocessingError::ColumnNotFound("party".to_string()).error_code(),
            "COLUMN_NOT_FOUND"
        );
        assert_eq!(
            PreprocessingError::ZeroVariance("lrgen".to_string()).error_code(),
            "ZERO_VARIANCE"
        );
        assert_eq!(
            PreprocessingError::load("data/missing.csv", "file not found").error_code(),
            "LOAD_ERROR"
        );
    }

    #[test]
    fn test_error_kinds() {
        assert!(PreprocessingError::load("x.csv", "nope").is_load_error());
        assert!(PreprocessingError::ColumnNotFound("a".to_string()).is_schema_error());
        assert!(
            PreprocessingError::NonNumericFeature {
                column: "a".to_string(),
                dtype: "str".to_string(),
            }
            .is_schema_error()
        );
        assert!(PreprocessingError::ZeroVariance("a".to_string()).is_scaling_error());
        assert!(
            PreprocessingError::MissingValuesInScalingInput {
                column: "a".to_string(),
                missing: 2,
            }
            .is_scaling_error()
        );
        assert_eq!(
            PreprocessingError::InvalidConfig("bad".to_string()).kind(),
            ErrorKind::Config
        );
    }

    #[test]
    fn test_error_serialization() {
        let error = PreprocessingError::ColumnNotFound("country".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("country"));
    }

    #[test]
    fn test_with_context_preserves_kind() {
        let error = PreprocessingError::ColumnNotFound("party_id".to_string())
            .with_context("During column selection");
        assert!(error.to_string().contains("During column selection"));
        assert_eq!(error.error_code(), "COLUMN_NOT_FOUND");
        assert!(error.is_schema_error());
    }

    #[test]
    fn test_config_validation_error_conversion() {
        let error: PreprocessingError = ConfigValidationError::EmptyIndex.into();
        assert_eq!(error.kind(), ErrorKind::Config);
        assert_eq!(error.error_code(), "INVALID_CONFIG");
    }
}
