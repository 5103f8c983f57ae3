use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::utils::column_names;

// ============================================================================
// Table Types
// ============================================================================

/// The dataset exactly as it was read from disk.
#[derive(Debug, Clone)]
pub struct RawDataset {
    frame: DataFrame,
    source: Option<PathBuf>,
}

impl RawDataset {
    /// Wrap an in-memory frame that did not come from a file.
    pub fn from_frame(frame: DataFrame) -> Self {
        Self {
            frame,
            source: None,
        }
    }

    pub(crate) fn from_file(frame: DataFrame, source: impl Into<PathBuf>) -> Self {
        Self {
            frame,
            source: Some(source.into()),
        }
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Path the dataset was loaded from, if any.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn width(&self) -> usize {
        self.frame.width()
    }
}

/// A table split into row keys and feature columns.
///
/// `index` and `features` are row-aligned: row `i` of `index` identifies
/// row `i` of `features`. No column name appears in both.
#[derive(Debug, Clone)]
pub struct KeyedFrame {
    index: DataFrame,
    features: DataFrame,
}

impl KeyedFrame {
    /// Pair an index frame with a feature frame of the same height.
    ///
    /// A feature frame without columns is accepted for any index height.
    pub fn new(index: DataFrame, features: DataFrame) -> PolarsResult<Self> {
        if features.width() > 0 && features.height() != index.height() {
            return Err(PolarsError::ShapeMismatch(
                format!(
                    "index has {} rows but features have {}",
                    index.height(),
                    features.height()
                )
                .into(),
            ));
        }
        let index_names = column_names(&index);
        if let Some(name) = features
            .get_column_names()
            .iter()
            .find(|name| index_names.iter().any(|idx| idx == name.as_str()))
        {
            return Err(PolarsError::Duplicate(
                format!("column '{}' is both an index and a feature column", name).into(),
            ));
        }
        Ok(Self { index, features })
    }

    /// Row keys (index columns only).
    pub fn index(&self) -> &DataFrame {
        &self.index
    }

    /// Feature columns only.
    pub fn features(&self) -> &DataFrame {
        &self.features
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.index.height()
    }

    pub fn index_columns(&self) -> Vec<String> {
        column_names(&self.index)
    }

    pub fn feature_columns(&self) -> Vec<String> {
        column_names(&self.features)
    }

    /// Replace the feature columns, keeping the index.
    pub fn with_features(&self, features: DataFrame) -> PolarsResult<Self> {
        Self::new(self.index.clone(), features)
    }

    /// Key values of row `row`, in index-column order.
    pub fn row_key(&self, row: usize) -> PolarsResult<Vec<AnyValue<'_>>> {
        self.index
            .get_columns()
            .iter()
            .map(|col| col.get(row))
            .collect()
    }

    /// A single frame with the index columns first, then the features.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        self.index.hstack(self.features.get_columns())
    }
}

/// Statistics the scaler computed for one feature column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnScaling {
    pub column: String,
    pub mean: f64,
    /// Population standard deviation used as divisor (1.0 for constant columns).
    pub std: f64,
    pub zero_variance: bool,
}

/// Standardized feature table, keyed by the index columns of its input.
#[derive(Debug, Clone)]
pub struct ScaledFeatureTable {
    table: KeyedFrame,
    scaling: Vec<ColumnScaling>,
}

impl ScaledFeatureTable {
    pub(crate) fn new(table: KeyedFrame, scaling: Vec<ColumnScaling>) -> Self {
        Self { table, scaling }
    }

    pub fn table(&self) -> &KeyedFrame {
        &self.table
    }

    pub fn index(&self) -> &DataFrame {
        self.table.index()
    }

    pub fn features(&self) -> &DataFrame {
        self.table.features()
    }

    pub fn height(&self) -> usize {
        self.table.height()
    }

    /// Per-column scaling statistics, in feature-column order.
    pub fn scaling(&self) -> &[ColumnScaling] {
        &self.scaling
    }

    /// Scaling statistics for a single column.
    pub fn scaling_for(&self, column: &str) -> Option<&ColumnScaling> {
        self.scaling.iter().find(|s| s.column == column)
    }

    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        self.table.to_frame()
    }
}

// ============================================================================
// Imputation Types
// ============================================================================

/// Fill value used for one feature column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMean {
    pub column: String,
    pub mean: f64,
    /// Number of cells replaced with `mean`.
    pub filled: usize,
}

/// What the missing-value handler did.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImputationReport {
    pub column_means: Vec<ColumnMean>,
    /// Columns dropped because every value was missing.
    pub dropped_columns: Vec<String>,
    pub values_filled: usize,
}

impl ImputationReport {
    pub fn mean_for(&self, column: &str) -> Option<f64> {
        self.column_means
            .iter()
            .find(|m| m.column == column)
            .map(|m| m.mean)
    }
}

// ============================================================================
// Preprocessing Summary Types
// ============================================================================

/// Human-readable summary of what the pipeline did.
///
/// # Example
///
/// ```rust,ignore
/// let result = pipeline.run(&raw)?;
/// println!(
///     "{} -> {} rows in {}ms",
///     result.summary.rows_before, result.summary.rows_after, result.summary.duration_ms
/// );
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreprocessingSummary {
    /// Total execution time in milliseconds.
    pub duration_ms: u64,

    /// Number of rows before preprocessing.
    pub rows_before: usize,
    /// Number of rows after preprocessing.
    pub rows_after: usize,
    /// Exact-duplicate rows removed.
    pub duplicates_removed: usize,

    /// Number of columns in the raw dataset.
    pub columns_before: usize,
    /// Number of feature columns in the scaled output.
    pub feature_columns_after: usize,

    /// Non-feature columns removed before indexing.
    pub non_feature_columns_removed: Vec<String>,
    /// Columns promoted to row keys.
    pub index_columns: Vec<String>,
    /// Feature columns dropped because they were entirely missing.
    pub all_missing_columns_dropped: Vec<String>,
    /// Number of missing cells filled with a column mean.
    pub values_imputed: usize,
    /// Columns that had zero variance at scaling time.
    pub zero_variance_columns: Vec<String>,

    /// List of actions taken during preprocessing.
    pub actions: Vec<PreprocessingAction>,
}

impl PreprocessingSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_action(&mut self, action: PreprocessingAction) {
        self.actions.push(action);
    }
}

/// A single action taken during preprocessing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessingAction {
    pub action_type: ActionType,
    /// Column name or "dataset" for dataset-wide actions.
    pub target: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl PreprocessingAction {
    pub fn new(
        action_type: ActionType,
        target: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            action_type,
            target: target.into(),
            description: description.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Types of preprocessing actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    DuplicatesRemoved,
    ColumnRemoved,
    IndexAssigned,
    ValuesImputed,
    ColumnScaled,
    ZeroVarianceCentered,
}

/// Everything a pipeline run produced.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub scaled: ScaledFeatureTable,
    pub imputation: ImputationReport,
    pub summary: PreprocessingSummary,
}
