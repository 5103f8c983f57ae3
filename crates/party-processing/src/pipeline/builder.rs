//! Main preprocessing pipeline module.
//!
//! This module provides the core `Pipeline` struct and builder for
//! running the four preprocessing steps in order.

use crate::cleaner::{ColumnSelector, DataCleaner};
use crate::config::{ConfigValidationError, PreprocessingConfig};
use crate::error::Result;
use crate::imputers::MeanImputer;
use crate::loader::DatasetLoader;
use crate::pipeline::progress::{
    ClosureProgressReporter, PreprocessingStage, ProgressReporter, ProgressUpdate,
};
use crate::scaler::StandardScaler;
use crate::types::{
    ActionType, PipelineResult, PreprocessingAction, PreprocessingSummary, RawDataset,
    ScaledFeatureTable,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// The preprocessing pipeline: dedup → select → impute → scale.
///
/// Use [`Pipeline::builder()`] to create a new pipeline with custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use party_processing::{Pipeline, PreprocessingConfig};
///
/// let pipeline = Pipeline::builder()
///     .config(PreprocessingConfig::builder().non_feature_columns(["year"]).build()?)
///     .on_progress(|update| println!("[{:.0}%] {}", update.progress * 100.0, update.message))
///     .build()?;
///
/// let raw = pipeline.load()?;
/// let scaled = pipeline.preprocess(&raw)?;
/// ```
pub struct Pipeline {
    config: PreprocessingConfig,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
    scaler: StandardScaler,
}

// Pipeline may be handed to a worker thread
static_assertions::assert_impl_all!(Pipeline: Send);

impl Pipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &PreprocessingConfig {
        &self.config
    }

    /// Load the dataset named by the configuration.
    pub fn load(&self) -> Result<RawDataset> {
        DatasetLoader::from_config(&self.config).load(&self.config.data_path)
    }

    /// Run every step and return only the scaled feature table.
    pub fn preprocess(&self, raw: &RawDataset) -> Result<ScaledFeatureTable> {
        self.run(raw).map(|result| result.scaled)
    }

    /// Run every step and return the scaled table with the run summary.
    ///
    /// The first failing step ends the run; its error is returned as is.
    pub fn run(&self, raw: &RawDataset) -> Result<PipelineResult> {
        match self.run_internal(raw) {
            Ok(result) => {
                self.report_progress(ProgressUpdate::complete("Pipeline completed successfully"));
                Ok(result)
            }
            Err(e) => {
                self.report_progress(ProgressUpdate::failed(e.to_string()));
                error!("Pipeline error: {}", e);
                Err(e)
            }
        }
    }

    /// Report progress if a reporter is configured.
    fn report_progress(&self, update: ProgressUpdate) {
        if let Some(reporter) = &self.progress_reporter {
            reporter.report(update);
        }
    }

    fn run_internal(&self, raw: &RawDataset) -> Result<PipelineResult> {
        let start_time = Instant::now();

        info!("Starting preprocessing pipeline...");
        self.report_progress(ProgressUpdate::new(
            PreprocessingStage::Initializing,
            0.0,
            "Starting preprocessing pipeline...",
        ));

        let mut summary = PreprocessingSummary::new();
        summary.rows_before = raw.height();
        summary.columns_before = raw.width();

        // Step 1: Deduplication
        self.report_progress(ProgressUpdate::new(
            PreprocessingStage::Deduplication,
            0.0,
            "Removing duplicate rows...",
        ));
        info!("Step 1: Removing duplicate rows...");

        let deduplicated = DataCleaner::remove_duplicates(raw.frame())?;
        let duplicates_removed = raw.height() - deduplicated.height();
        summary.duplicates_removed = duplicates_removed;
        if duplicates_removed > 0 {
            summary.add_action(PreprocessingAction::new(
                ActionType::DuplicatesRemoved,
                "dataset",
                format!("Removed {} duplicate rows", duplicates_removed),
            ));
        }

        self.report_progress(ProgressUpdate::new(
            PreprocessingStage::Deduplication,
            1.0,
            format!("Removed {} duplicate rows", duplicates_removed),
        ));

        // Step 2: Column selection and index assignment
        self.report_progress(ProgressUpdate::new(
            PreprocessingStage::ColumnSelection,
            0.0,
            "Selecting feature and index columns...",
        ));
        info!("Step 2: Selecting feature and index columns...");

        let table = ColumnSelector::select(
            &deduplicated,
            self.config.non_feature_columns.as_slice(),
            self.config.index_columns.as_slice(),
        )?;

        for column in &self.config.non_feature_columns {
            summary.add_action(PreprocessingAction::new(
                ActionType::ColumnRemoved,
                column.as_str(),
                "Removed non-feature column",
            ));
        }
        let index_columns = table.index_columns();
        summary.add_action(
            PreprocessingAction::new(
                ActionType::IndexAssigned,
                "dataset",
                format!("Assigned {} index columns", index_columns.len()),
            )
            .with_details(index_columns.join(", ")),
        );
        summary.non_feature_columns_removed = self.config.non_feature_columns.clone();
        summary.index_columns = index_columns;

        self.report_progress(ProgressUpdate::new(
            PreprocessingStage::ColumnSelection,
            1.0,
            format!("{} feature columns selected", table.features().width()),
        ));

        // Step 3: Missing values
        self.report_progress(ProgressUpdate::new(
            PreprocessingStage::Imputation,
            0.0,
            "Handling missing values...",
        ));
        info!("Step 3: Handling missing values...");

        let (imputed, imputation) = MeanImputer::handle_missing_values(&table)?;

        for column in &imputation.dropped_columns {
            summary.add_action(
                PreprocessingAction::new(
                    ActionType::ColumnRemoved,
                    column.as_str(),
                    "Removed column with no values",
                )
                .with_details("every value was missing"),
            );
        }
        for column_mean in imputation.column_means.iter().filter(|m| m.filled > 0) {
            summary.add_action(PreprocessingAction::new(
                ActionType::ValuesImputed,
                column_mean.column.as_str(),
                format!(
                    "Filled {} values with mean {:.4}",
                    column_mean.filled, column_mean.mean
                ),
            ));
        }
        summary.all_missing_columns_dropped = imputation.dropped_columns.clone();
        summary.values_imputed = imputation.values_filled;

        self.report_progress(ProgressUpdate::new(
            PreprocessingStage::Imputation,
            1.0,
            format!("Filled {} missing values", imputation.values_filled),
        ));

        // Step 4: Scaling
        self.report_progress(ProgressUpdate::new(
            PreprocessingStage::Scaling,
            0.0,
            "Scaling features...",
        ));
        info!("Step 4: Scaling features...");

        let scaled = self.scaler.fit_transform(&imputed)?;

        for params in scaled.scaling().iter().filter(|s| s.zero_variance) {
            summary.add_action(PreprocessingAction::new(
                ActionType::ZeroVarianceCentered,
                params.column.as_str(),
                "Constant column centered to zero",
            ));
            summary.zero_variance_columns.push(params.column.clone());
        }
        summary.add_action(PreprocessingAction::new(
            ActionType::ColumnScaled,
            "dataset",
            format!("Standardized {} feature columns", scaled.scaling().len()),
        ));

        self.report_progress(ProgressUpdate::new(
            PreprocessingStage::Scaling,
            1.0,
            "Scaling complete",
        ));

        summary.rows_after = scaled.height();
        summary.feature_columns_after = scaled.features().width();
        summary.duration_ms = start_time.elapsed().as_millis() as u64;

        info!(
            "Preprocessing completed: {} rows x {} features in {}ms",
            summary.rows_after, summary.feature_columns_after, summary.duration_ms
        );

        Ok(PipelineResult {
            scaled,
            imputation,
            summary,
        })
    }
}

/// Builder for creating a [`Pipeline`] instance.
#[derive(Default)]
pub struct PipelineBuilder {
    config: Option<PreprocessingConfig>,
    progress_reporter: Option<Arc<dyn ProgressReporter>>,
}

static_assertions::assert_impl_all!(PipelineBuilder: Send);

impl PipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: PreprocessingConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set a progress reporter for receiving updates during processing.
    pub fn progress_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.progress_reporter = Some(reporter);
        self
    }

    /// Set a progress callback closure.
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(ProgressUpdate) + Send + Sync + 'static,
    {
        self.progress_reporter = Some(Arc::new(ClosureProgressReporter::new(callback)));
        self
    }

    /// Build the pipeline.
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> std::result::Result<Pipeline, ConfigValidationError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(Pipeline {
            scaler: StandardScaler::new(config.zero_variance_policy),
            config,
            progress_reporter: self.progress_reporter,
        })
    }
}
