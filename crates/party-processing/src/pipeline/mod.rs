//! Pipeline orchestration.
//!
//! [`Pipeline`] runs deduplication, column selection, imputation and scaling
//! in that order. [`preprocess`] is a shortcut for a one-off run with the
//! default configuration.

mod builder;
pub mod progress;

pub use builder::{Pipeline, PipelineBuilder};
pub use progress::{ClosureProgressReporter, PreprocessingStage, ProgressReporter, ProgressUpdate};

use crate::config::PreprocessingConfig;
use crate::error::Result;
use crate::types::{RawDataset, ScaledFeatureTable};

/// Preprocess `raw` with the given column roles and default settings.
///
/// Every step's error is returned unchanged; no partial result is produced.
pub fn preprocess<S: AsRef<str>>(
    raw: &RawDataset,
    non_feature_columns: &[S],
    index_columns: &[S],
) -> Result<ScaledFeatureTable> {
    let config = PreprocessingConfig::builder()
        .non_feature_columns(non_feature_columns.iter().map(|s| s.as_ref()))
        .index_columns(index_columns.iter().map(|s| s.as_ref()))
        .build()?;

    Pipeline::builder().config(config).build()?.preprocess(raw)
}
