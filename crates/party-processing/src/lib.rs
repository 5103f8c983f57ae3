//! Party Dataset Preprocessing Library
//!
//! Turns a raw political-party survey table (one row per party, expert
//! placement scores as columns) into a clean, standardized feature table
//! keyed by party identity.
//!
//! # Overview
//!
//! The pipeline runs four steps in order:
//!
//! - **Deduplication**: Exact-duplicate rows are removed, first occurrence kept
//! - **Column Selection**: Non-feature columns are dropped and identifying columns become the row key
//! - **Imputation**: All-missing columns are dropped, remaining gaps filled with the column mean
//! - **Scaling**: Every feature is standardized to zero mean and unit (population) std
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use party_processing::{load, preprocess};
//!
//! let raw = load()?;
//! let scaled = preprocess(&raw, &["eu_position_sd"], &["party_id", "party", "country"])?;
//! println!("{} parties x {} features", scaled.height(), scaled.features().width());
//! ```
//!
//! With a custom configuration and progress reporting:
//!
//! ```rust,ignore
//! use party_processing::{Pipeline, PreprocessingConfig, ZeroVariancePolicy};
//!
//! let config = PreprocessingConfig::builder()
//!     .data_path("data/CHES2019V3.parquet")
//!     .zero_variance_policy(ZeroVariancePolicy::Error)
//!     .build()?;
//!
//! let pipeline = Pipeline::builder()
//!     .config(config)
//!     .on_progress(|update| {
//!         println!("[{:.0}%] {}", update.progress * 100.0, update.message);
//!     })
//!     .build()?;
//!
//! let result = pipeline.run(&pipeline.load()?)?;
//! println!("Imputed {} values", result.summary.values_imputed);
//! ```

pub mod cleaner;
pub mod config;
pub mod error;
pub mod imputers;
pub mod loader;
pub mod pipeline;
pub mod reporting;
pub mod scaler;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use cleaner::{ColumnSelector, DataCleaner};
pub use config::{
    ConfigValidationError, PreprocessingConfig, PreprocessingConfigBuilder, ZeroVariancePolicy,
};
pub use error::{ErrorKind, PreprocessingError, Result as PreprocessingResult, ResultExt};
pub use imputers::MeanImputer;
pub use loader::{DataFormat, DatasetLoader, load};
pub use pipeline::{
    ClosureProgressReporter, Pipeline, PipelineBuilder, PreprocessingStage, ProgressReporter,
    ProgressUpdate, preprocess,
};
pub use reporting::{ReportGenerator, RunReport};
pub use scaler::StandardScaler;
pub use types::{
    ActionType, ColumnMean, ColumnScaling, ImputationReport, KeyedFrame, PipelineResult,
    PreprocessingAction, PreprocessingSummary, RawDataset, ScaledFeatureTable,
};
