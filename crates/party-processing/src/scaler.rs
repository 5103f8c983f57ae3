//! Standard scaling of feature columns.
//!
//! Each column is transformed to `(x - mean) / std` where `std` is the
//! population standard deviation (`ddof = 0`). Statistics are returned as
//! plain values next to the scaled table; the scaler itself holds no
//! fitted state.

use crate::config::ZeroVariancePolicy;
use crate::error::{PreprocessingError, Result};
use crate::types::{ColumnScaling, KeyedFrame, ScaledFeatureTable};
use crate::utils::{is_averageable_dtype, missing_count};
use polars::prelude::*;
use tracing::{debug, warn};

/// Delta degrees of freedom: population standard deviation.
const DDOF: u8 = 0;

/// Standardizes every feature column of a [`KeyedFrame`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardScaler {
    zero_variance_policy: ZeroVariancePolicy,
}

impl StandardScaler {
    pub fn new(zero_variance_policy: ZeroVariancePolicy) -> Self {
        Self {
            zero_variance_policy,
        }
    }

    /// Compute mean and standard deviation for every feature column.
    ///
    /// The input must be fully numeric and free of missing values.
    pub fn fit(&self, table: &KeyedFrame) -> Result<Vec<ColumnScaling>> {
        table
            .features()
            .get_columns()
            .iter()
            .map(|column| self.fit_column(column.as_materialized_series()))
            .collect()
    }

    /// Apply previously computed statistics to `table`.
    ///
    /// Every column named in `scaling` must be present. Output columns keep
    /// the order of `scaling`.
    pub fn transform(
        &self,
        table: &KeyedFrame,
        scaling: &[ColumnScaling],
    ) -> Result<ScaledFeatureTable> {
        let mut scaled_columns = Vec::with_capacity(scaling.len());

        for params in scaling {
            let column = table
                .features()
                .column(&params.column)
                .map_err(|_| PreprocessingError::ColumnNotFound(params.column.clone()))?;
            let series = column.as_materialized_series();
            Self::check_scalable(series)?;
            scaled_columns.push(Column::from(Self::scale_series(series, params)?));
        }

        let features = DataFrame::new(scaled_columns)?;
        Ok(ScaledFeatureTable::new(
            table.with_features(features)?,
            scaling.to_vec(),
        ))
    }

    /// Fit and transform in one step.
    pub fn fit_transform(&self, table: &KeyedFrame) -> Result<ScaledFeatureTable> {
        let scaling = self.fit(table)?;
        self.transform(table, &scaling)
    }

    fn fit_column(&self, series: &Series) -> Result<ColumnScaling> {
        let col_name = series.name().to_string();
        Self::check_scalable(series)?;

        let float_series = series.cast(&DataType::Float64)?;
        let ca = float_series.f64()?;

        let Some(mean) = ca.mean() else {
            // no rows: nothing to center
            return Ok(ColumnScaling {
                column: col_name,
                mean: 0.0,
                std: 1.0,
                zero_variance: false,
            });
        };
        let var = ca.var(DDOF).unwrap_or(0.0);

        if is_constant(var, mean, ca.len()) {
            match self.zero_variance_policy {
                ZeroVariancePolicy::Error => {
                    return Err(PreprocessingError::ZeroVariance(col_name));
                }
                ZeroVariancePolicy::Center => {
                    warn!("Column '{}' has zero variance; centering only", col_name);
                    return Ok(ColumnScaling {
                        column: col_name,
                        mean,
                        std: 1.0,
                        zero_variance: true,
                    });
                }
            }
        }

        let std = var.sqrt();
        debug!("Scaling '{}': mean={:.4}, std={:.4}", col_name, mean, std);
        Ok(ColumnScaling {
            column: col_name,
            mean,
            std,
            zero_variance: false,
        })
    }

    fn check_scalable(series: &Series) -> Result<()> {
        if !is_averageable_dtype(series.dtype()) {
            return Err(PreprocessingError::NonNumericFeature {
                column: series.name().to_string(),
                dtype: series.dtype().to_string(),
            });
        }
        let missing = missing_count(series)?;
        if missing > 0 {
            return Err(PreprocessingError::MissingValuesInScalingInput {
                column: series.name().to_string(),
                missing,
            });
        }
        Ok(())
    }

    fn scale_series(series: &Series, params: &ColumnScaling) -> Result<Series> {
        let float_series = series.cast(&DataType::Float64)?;
        let ca = float_series.f64()?;

        let scaled = if params.zero_variance {
            Float64Chunked::full(series.name().clone(), 0.0, ca.len())
        } else {
            ((ca - params.mean) / params.std).with_name(series.name().clone())
        };

        Ok(scaled.into_series())
    }
}

/// Whether a variance is indistinguishable from rounding error.
///
/// The bound is relative to the data's own magnitude, so tiny but genuinely
/// varying columns are still scaled.
fn is_constant(var: f64, mean: f64, n: usize) -> bool {
    let n = n as f64;
    let eps = f64::EPSILON;
    var <= n * eps * var + (n * mean * eps).powi(2)
}
