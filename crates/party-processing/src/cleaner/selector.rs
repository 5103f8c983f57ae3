//! Non-feature column removal and index assignment.

use crate::error::{PreprocessingError, Result};
use crate::types::KeyedFrame;
use crate::utils::column_names;
use polars::prelude::*;
use tracing::debug;

/// Splits a dataset into row keys and feature columns.
pub struct ColumnSelector;

impl ColumnSelector {
    /// Drop `non_features`, then promote `index` columns to row keys.
    ///
    /// Every named column must exist: non-feature names are checked against
    /// the input, index names against what remains after the drop. Index
    /// columns keep the order given in `index`; features keep table order.
    pub fn select<S: AsRef<str>>(
        df: &DataFrame,
        non_features: &[S],
        index: &[S],
    ) -> Result<KeyedFrame> {
        if index.is_empty() {
            return Err(PreprocessingError::InvalidConfig(
                "at least one index column is required".to_string(),
            ));
        }

        let remaining = Self::remove_non_feature_columns(df, non_features)?;
        let available = column_names(&remaining);

        for name in index {
            if !available.iter().any(|col| col == name.as_ref()) {
                return Err(PreprocessingError::ColumnNotFound(name.as_ref().to_string()));
            }
        }

        let index_names: Vec<PlSmallStr> = index.iter().map(|s| s.as_ref().into()).collect();
        let feature_names: Vec<PlSmallStr> = available
            .iter()
            .filter(|col| !index.iter().any(|idx| idx.as_ref() == col.as_str()))
            .map(|col| col.as_str().into())
            .collect();

        let index_frame = remaining.select(index_names)?;
        let features = remaining.select(feature_names)?;

        debug!(
            "Assigned index {:?}; {} feature columns remain",
            index_frame.get_column_names(),
            features.width()
        );

        Ok(KeyedFrame::new(index_frame, features)?)
    }

    /// Drop the named columns, failing if any of them is absent.
    ///
    /// An empty list is a no-op.
    pub fn remove_non_feature_columns<S: AsRef<str>>(
        df: &DataFrame,
        non_features: &[S],
    ) -> Result<DataFrame> {
        if non_features.is_empty() {
            return Ok(df.clone());
        }

        let available = column_names(df);
        for name in non_features {
            if !available.iter().any(|col| col == name.as_ref()) {
                return Err(PreprocessingError::ColumnNotFound(name.as_ref().to_string()));
            }
        }

        let cols: Vec<PlSmallStr> = non_features.iter().map(|s| s.as_ref().into()).collect();
        debug!("Dropping non-feature columns: {:?}", cols);
        Ok(df.drop_many(cols))
    }
}
