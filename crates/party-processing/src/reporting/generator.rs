use crate::error::{Result, ResultExt};
use crate::types::{ColumnScaling, ImputationReport, PipelineResult, PreprocessingSummary, ScaledFeatureTable};
use chrono::Utc;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Machine-readable record of one pipeline run.
///
/// Used for both JSON output (`--json`) and the `<name>_report.json` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// RFC 3339 timestamp of report creation
    pub generated_at: String,
    /// Path of the dataset that was processed, if it came from a file
    pub input_file: Option<String>,
    /// Path of the scaled table, if it was written
    pub output_file: Option<String>,

    pub summary: PreprocessingSummary,
    pub imputation: ImputationReport,
    /// Mean and standard deviation used for each feature column
    pub scaling: Vec<ColumnScaling>,
}

/// Writes scaled tables and run reports into an output directory.
pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Build a report for `result` without writing anything.
    pub fn build_report(
        input_file: Option<&Path>,
        output_file: Option<&Path>,
        result: &PipelineResult,
    ) -> RunReport {
        RunReport {
            generated_at: Utc::now().to_rfc3339(),
            input_file: input_file.map(|p| p.display().to_string()),
            output_file: output_file.map(|p| p.display().to_string()),
            summary: result.summary.clone(),
            imputation: result.imputation.clone(),
            scaling: result.scaled.scaling().to_vec(),
        }
    }

    /// Save the scaled table as `<output_dir>/<name>.csv`.
    ///
    /// Index columns come first, followed by the features.
    pub fn save_table(&self, table: &ScaledFeatureTable, name: &str) -> Result<PathBuf> {
        let mut df = ResultExt::context(table.to_frame(), "Joining index and feature columns")?;

        fs::create_dir_all(&self.output_dir)?;
        let output_path = self.output_dir.join(format!("{}.csv", name));
        let mut file = File::create(&output_path)?;

        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .finish(&mut df)?;

        info!("Dataset saved: {}", output_path.display());
        Ok(output_path)
    }

    /// Save a report for `result` as `<output_dir>/<name>_report.json`.
    pub fn save_report(&self, result: &PipelineResult, name: &str) -> Result<PathBuf> {
        let report = Self::build_report(None, None, result);
        self.write_report_to_file(&report, name)
    }

    /// Write an already built report as `<output_dir>/<name>_report.json`.
    pub fn write_report_to_file(&self, report: &RunReport, name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self.output_dir.join(format!("{}_report.json", name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());
        Ok(report_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Pipeline;
    use crate::types::RawDataset;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("party-report-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn run() -> PipelineResult {
        let raw = RawDataset::from_frame(
            df![
                "party_id" => [1i64, 2, 3],
                "party" => ["SPD", "CDU", "FDP"],
                "country" => ["de", "de", "de"],
                "lrgen" => [Some(3.0), None, Some(7.0)],
            ]
            .unwrap(),
        );
        Pipeline::builder().build().unwrap().run(&raw).unwrap()
    }

    #[test]
    fn test_save_table_writes_index_first() {
        let dir = scratch_dir("table");
        let generator = ReportGenerator::new(&dir);

        let path = generator.save_table(&run().scaled, "scaled").unwrap();

        assert_eq!(path, dir.join("scaled.csv"));
        let contents = fs::read_to_string(&path).unwrap();
        let header = contents.lines().next().unwrap();
        assert_eq!(header, "party_id,party,country,lrgen");
        assert_eq!(contents.lines().count(), 4);
    }

    #[test]
    fn test_save_report_json() {
        let dir = scratch_dir("json");
        let generator = ReportGenerator::new(&dir);

        let path = generator.save_report(&run(), "ches").unwrap();

        assert_eq!(path, dir.join("ches_report.json"));
        let report: RunReport = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(report.summary.values_imputed, 1);
        assert_eq!(report.imputation.mean_for("lrgen"), Some(5.0));
        assert_eq!(report.scaling.len(), 1);
        assert!(chrono::DateTime::parse_from_rfc3339(&report.generated_at).is_ok());
    }

    #[test]
    fn test_build_report_records_paths() {
        let report = ReportGenerator::build_report(
            Some(Path::new("data/CHES2019V3.csv")),
            Some(Path::new("output/CHES2019V3.csv")),
            &run(),
        );

        assert_eq!(report.input_file.as_deref(), Some("data/CHES2019V3.csv"));
        assert_eq!(report.output_file.as_deref(), Some("output/CHES2019V3.csv"));
    }
}
