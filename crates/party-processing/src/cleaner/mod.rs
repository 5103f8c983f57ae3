//! Data cleaning module.
//!
//! This module provides functionality for:
//! - Removing exact-duplicate rows
//! - Dropping non-feature columns and promoting index columns to row keys

mod selector;

pub use selector::ColumnSelector;

use crate::error::Result;
use polars::prelude::*;
use tracing::debug;

/// Removes exact-duplicate rows from a dataset.
pub struct DataCleaner;

impl DataCleaner {
    /// Remove rows that are identical across every column.
    ///
    /// The first occurrence of each row is kept and retained rows stay in
    /// their original relative order. Nulls compare equal to nulls.
    pub fn remove_duplicates(df: &DataFrame) -> Result<DataFrame> {
        if df.height() == 0 || df.width() == 0 {
            return Ok(df.clone());
        }

        let deduplicated = df
            .clone()
            .lazy()
            .unique_stable(None, UniqueKeepStrategy::First)
            .collect()?;

        let removed = df.height() - deduplicated.height();
        if removed > 0 {
            debug!("Removed {} duplicate rows", removed);
        } else {
            debug!("No duplicate rows found");
        }

        Ok(deduplicated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_duplicates_keeps_first_occurrence() {
        let df = df![
            "party" => ["A", "B", "A", "C", "A"],
            "lrgen" => [1.0, 2.0, 1.0, 3.0, 1.0],
        ]
        .unwrap();

        let result = DataCleaner::remove_duplicates(&df).unwrap();

        assert_eq!(result.height(), 3);
        let parties: Vec<Option<&str>> = result.column("party").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(parties, vec![Some("A"), Some("B"), Some("C")]);
    }

    #[test]
    fn test_remove_duplicates_preserves_order() {
        let df = df![
            "id" => [5i64, 3, 5, 1, 3, 2],
        ]
        .unwrap();

        let result = DataCleaner::remove_duplicates(&df).unwrap();

        let ids: Vec<Option<i64>> = result.column("id").unwrap().i64().unwrap().into_iter().collect();
        assert_eq!(ids, vec![Some(5), Some(3), Some(1), Some(2)]);
    }

    #[test]
    fn test_rows_differing_in_one_column_are_kept() {
        let df = df![
            "party" => ["A", "A"],
            "lrgen" => [1.0, 1.5],
        ]
        .unwrap();

        let result = DataCleaner::remove_duplicates(&df).unwrap();
        assert_eq!(result.height(), 2);
    }

    #[test]
    fn test_nulls_compare_equal() {
        let df = df![
            "party" => ["A", "A"],
            "lrgen" => [None, Option::<f64>::None],
        ]
        .unwrap();

        let result = DataCleaner::remove_duplicates(&df).unwrap();
        assert_eq!(result.height(), 1);
    }

    #[test]
    fn test_remove_duplicates_empty() {
        let df = DataFrame::empty();
        let result = DataCleaner::remove_duplicates(&df).unwrap();
        assert_eq!(result.height(), 0);

        let no_rows = df!["lrgen" => Vec::<f64>::new()].unwrap();
        let result = DataCleaner::remove_duplicates(&no_rows).unwrap();
        assert_eq!(result.height(), 0);
        assert_eq!(result.width(), 1);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let df = df!["id" => [1i64, 1]].unwrap();
        let _ = DataCleaner::remove_duplicates(&df).unwrap();
        assert_eq!(df.height(), 2);
    }
}
