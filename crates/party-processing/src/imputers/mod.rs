//! Imputation module for handling missing values.
//!
//! Missing feature values are replaced with the column mean; columns
//! without a single present value are dropped.

mod statistical;

pub use statistical::MeanImputer;
