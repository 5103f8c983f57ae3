//! Mean imputation for feature columns.

use crate::error::{PreprocessingError, Result};
use crate::types::{ColumnMean, ImputationReport, KeyedFrame};
use crate::utils::{float_with_nulls, is_all_missing, is_averageable_dtype};
use polars::prelude::*;
use tracing::{debug, info, warn};

/// Fills missing feature values with their column mean.
pub struct MeanImputer;

impl MeanImputer {
    /// Handle missing values in the feature columns of `table`.
    ///
    /// 1. The mean of each column is taken over its present values.
    /// 2. Columns where every value is missing are dropped.
    /// 3. Every other missing value is replaced with its column mean.
    ///
    /// The index is untouched and the row set is unchanged. Retained
    /// columns come back as Float64. A partially populated column that is
    /// not numeric or boolean is a schema error.
    pub fn handle_missing_values(table: &KeyedFrame) -> Result<(KeyedFrame, ImputationReport)> {
        let mut report = ImputationReport::default();
        let mut imputed: Vec<Column> = Vec::with_capacity(table.features().width());

        for column in table.features().get_columns() {
            let series = column.as_materialized_series();
            let col_name = series.name().to_string();

            if !is_averageable_dtype(series.dtype()) {
                if is_all_missing(series)? {
                    warn!("Dropping '{}': every value is missing", col_name);
                    report.dropped_columns.push(col_name);
                    continue;
                }
                return Err(PreprocessingError::NonNumericFeature {
                    column: col_name,
                    dtype: series.dtype().to_string(),
                });
            }

            let values = float_with_nulls(series)?;
            let Some(mean) = values.mean() else {
                warn!("Dropping '{}': every value is missing", col_name);
                report.dropped_columns.push(col_name);
                continue;
            };

            let missing = values.null_count();
            if missing > 0 {
                debug!("Filled {} values in '{}' with mean: {:.4}", missing, col_name, mean);
            }

            let filled = values
                .fill_null_with_values(mean)?
                .with_name(series.name().clone())
                .into_series();
            imputed.push(Column::from(filled));
            report.values_filled += missing;
            report.column_means.push(ColumnMean {
                column: col_name,
                mean,
                filled: missing,
            });
        }

        info!(
            "Imputed {} values; dropped {} all-missing columns",
            report.values_filled,
            report.dropped_columns.len()
        );

        let features = DataFrame::new(imputed)?;
        Ok((table.with_features(features)?, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::total_null_count;

    fn keyed(features: DataFrame) -> KeyedFrame {
        let index = df!["party_id" => (0..features.height() as i64).collect::<Vec<_>>()].unwrap();
        KeyedFrame::new(index, features).unwrap()
    }

    fn values(table: &KeyedFrame, column: &str) -> Vec<f64> {
        table
            .features()
            .column(column)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap())
            .collect()
    }

    #[test]
    fn test_fill_with_mean() {
        let table = keyed(df!["lrgen" => [Some(1.0), None, Some(3.0)]].unwrap());

        let (result, report) = MeanImputer::handle_missing_values(&table).unwrap();

        assert_eq!(values(&result, "lrgen"), vec![1.0, 2.0, 3.0]);
        assert_eq!(report.mean_for("lrgen"), Some(2.0));
        assert_eq!(report.values_filled, 1);
    }

    #[test]
    fn test_all_missing_column_dropped() {
        let table = keyed(
            df![
                "lrgen" => [Some(1.0), Some(2.0), None],
                "empty" => [Option::<f64>::None, None, None],
            ]
            .unwrap(),
        );

        let (result, report) = MeanImputer::handle_missing_values(&table).unwrap();

        assert_eq!(result.feature_columns(), vec!["lrgen"]);
        assert_eq!(report.dropped_columns, vec!["empty"]);
        assert_eq!(result.height(), 3);
        assert_eq!(total_null_count(result.features()), 0);
    }

    #[test]
    fn test_all_nan_column_dropped() {
        let table = keyed(
            df![
                "lrgen" => [Some(1.0), None, Some(3.0)],
                "nan_only" => [Some(f64::NAN), None, Some(f64::NAN)],
            ]
            .unwrap(),
        );

        let (result, report) = MeanImputer::handle_missing_values(&table).unwrap();

        assert_eq!(result.feature_columns(), vec!["lrgen"]);
        assert_eq!(report.dropped_columns, vec!["nan_only"]);
        assert_eq!(report.values_filled, 1);
    }

    #[test]
    fn test_all_missing_string_column_dropped() {
        // CSV readers infer empty columns as strings
        let table = keyed(
            df![
                "lrgen" => [1.0, 2.0],
                "blank" => [Option::<&str>::None, None],
            ]
            .unwrap(),
        );

        let (result, report) = MeanImputer::handle_missing_values(&table).unwrap();

        assert_eq!(result.feature_columns(), vec!["lrgen"]);
        assert_eq!(report.dropped_columns, vec!["blank"]);
    }

    #[test]
    fn test_single_present_value_fills_column() {
        let table = keyed(df!["galtan" => [None, Some(42.0), None]].unwrap());

        let (result, _) = MeanImputer::handle_missing_values(&table).unwrap();

        assert_eq!(values(&result, "galtan"), vec![42.0, 42.0, 42.0]);
    }

    #[test]
    fn test_nan_treated_as_missing() {
        let table = keyed(df!["lrgen" => [2.0, f64::NAN, 4.0]].unwrap());

        let (result, report) = MeanImputer::handle_missing_values(&table).unwrap();

        assert_eq!(values(&result, "lrgen"), vec![2.0, 3.0, 4.0]);
        assert_eq!(report.values_filled, 1);
    }

    #[test]
    fn test_integer_columns_become_float() {
        let table = keyed(df!["seats" => [Some(10i64), None, Some(20)]].unwrap());

        let (result, _) = MeanImputer::handle_missing_values(&table).unwrap();

        let seats = result.features().column("seats").unwrap();
        assert_eq!(seats.dtype(), &DataType::Float64);
        assert_eq!(values(&result, "seats"), vec![10.0, 15.0, 20.0]);
    }

    #[test]
    fn test_non_numeric_feature_is_schema_error() {
        let table = keyed(df!["family" => [Some("soc"), None]].unwrap());

        let err = MeanImputer::handle_missing_values(&table).unwrap_err();

        assert!(err.is_schema_error());
        assert!(matches!(err, PreprocessingError::NonNumericFeature { ref column, .. } if column == "family"));
    }

    #[test]
    fn test_index_and_rows_unchanged() {
        let table = keyed(df!["lrgen" => [Some(1.0), None]].unwrap());

        let (result, _) = MeanImputer::handle_missing_values(&table).unwrap();

        assert_eq!(result.index_columns(), vec!["party_id"]);
        assert_eq!(result.height(), 2);
        // Input snapshot still has its null
        assert_eq!(total_null_count(table.features()), 1);
    }

    #[test]
    fn test_column_without_missing_values_untouched() {
        let table = keyed(df!["lrgen" => [1.5, 2.5]].unwrap());

        let (result, report) = MeanImputer::handle_missing_values(&table).unwrap();

        assert_eq!(values(&result, "lrgen"), vec![1.5, 2.5]);
        assert_eq!(report.column_means[0].filled, 0);
    }
}
