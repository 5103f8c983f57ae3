//! Shared utilities for the preprocessing pipeline.
//!
//! Helpers used by more than one step: dtype checks, missing-value checks
//! with `NaN` treated as missing, and small column-name conveniences.

use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a column of this type has a meaningful arithmetic mean.
///
/// Booleans average to the share of `true` values.
#[inline]
pub fn is_averageable_dtype(dtype: &DataType) -> bool {
    is_numeric_dtype(dtype) || matches!(dtype, DataType::Boolean)
}

// =============================================================================
// Value Extraction
// =============================================================================

/// Cast a Series to Float64 with `NaN` entries turned into nulls.
pub fn float_with_nulls(series: &Series) -> PolarsResult<Float64Chunked> {
    let float_series = series.cast(&DataType::Float64)?;
    let ca = float_series.f64()?;
    let nan_mask = ca.is_nan().fill_null_with_values(false)?;
    ca.set(&nan_mask, None)
}

/// Count the missing entries (null or `NaN`) of a Series.
pub fn missing_count(series: &Series) -> PolarsResult<usize> {
    if !is_averageable_dtype(series.dtype()) {
        return Ok(series.null_count());
    }
    Ok(float_with_nulls(series)?.null_count())
}

/// Check if every entry of a Series is missing (null or `NaN`).
///
/// An empty Series counts as all missing.
pub fn is_all_missing(series: &Series) -> PolarsResult<bool> {
    Ok(missing_count(series)? == series.len())
}

// =============================================================================
// Frame Utilities
// =============================================================================

/// Owned column names of a DataFrame, in column order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Total number of null entries across all columns.
pub fn total_null_count(df: &DataFrame) -> usize {
    df.get_columns().iter().map(|col| col.null_count()).sum()
}

// =============================================================================
// Tests
// =============================================================================
