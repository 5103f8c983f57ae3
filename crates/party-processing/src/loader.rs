//! Dataset loading.
//!
//! Reads the party dataset into a [`RawDataset`]. The file format is picked
//! from the extension; no transformation happens here beyond parsing.

use crate::config::{DEFAULT_DATA_PATH, DEFAULT_INFER_SCHEMA_LENGTH, PreprocessingConfig};
use crate::error::{PreprocessingError, Result};
use crate::types::RawDataset;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::{debug, info};

/// File formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Csv,
    Parquet,
}

impl DataFormat {
    /// Detect the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("csv") => Ok(DataFormat::Csv),
            Some("parquet") | Some("pq") => Ok(DataFormat::Parquet),
            Some("dta") => Err(PreprocessingError::load(
                path,
                "Stata files are not supported; export the dataset to CSV or Parquet",
            )),
            Some(other) => Err(PreprocessingError::load(
                path,
                format!("unsupported file extension '.{}'", other),
            )),
            None => Err(PreprocessingError::load(path, "file has no extension")),
        }
    }
}

/// Reads datasets from disk.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    infer_schema_length: Option<usize>,
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self {
            infer_schema_length: Some(DEFAULT_INFER_SCHEMA_LENGTH),
        }
    }
}

impl DatasetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader using the CSV settings of `config`.
    pub fn from_config(config: &PreprocessingConfig) -> Self {
        Self {
            infer_schema_length: config.infer_schema_length,
        }
    }

    /// Read the dataset at `path`.
    ///
    /// Fails with a load error if the file is missing, has an unsupported
    /// extension, or cannot be parsed as a table.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<RawDataset> {
        let path = path.as_ref();

        // Checked up front for a clearer message than the reader's I/O error
        if !path.exists() {
            return Err(PreprocessingError::load(path, "file not found"));
        }
        let format = DataFormat::from_path(path)?;

        info!("Loading dataset from: {}", path.display());
        let frame = match format {
            DataFormat::Csv => self.read_csv(path)?,
            DataFormat::Parquet => Self::read_parquet(path)?,
        };
        debug!("Loaded {:?} ({:?})", frame.shape(), format);

        Ok(RawDataset::from_file(frame, path))
    }

    fn read_csv(&self, path: &Path) -> Result<DataFrame> {
        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(self.infer_schema_length)
            .try_into_reader_with_file_path(Some(path.into()))
            .map_err(|e| PreprocessingError::load(path, e.to_string()))?
            .finish()
            .map_err(|e| PreprocessingError::load(path, e.to_string()))
    }

    fn read_parquet(path: &Path) -> Result<DataFrame> {
        let file = File::open(path).map_err(|e| PreprocessingError::load(path, e.to_string()))?;
        ParquetReader::new(file)
            .finish()
            .map_err(|e| PreprocessingError::load(path, e.to_string()))
    }
}

/// Load the party dataset from its default location.
pub fn load() -> Result<RawDataset> {
    DatasetLoader::default().load(DEFAULT_DATA_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn scratch_file(name: &str, contents: &[u8]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("party-loader-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents).unwrap();
        path
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(DataFormat::from_path(Path::new("a.csv")).unwrap(), DataFormat::Csv);
        assert_eq!(DataFormat::from_path(Path::new("a.CSV")).unwrap(), DataFormat::Csv);
        assert_eq!(
            DataFormat::from_path(Path::new("a.parquet")).unwrap(),
            DataFormat::Parquet
        );
        assert!(DataFormat::from_path(Path::new("a.xlsx")).unwrap_err().is_load_error());
        assert!(DataFormat::from_path(Path::new("noext")).unwrap_err().is_load_error());
    }

    #[test]
    fn test_stata_is_a_load_error() {
        let err = DataFormat::from_path(Path::new("data/CHES2019V3.dta")).unwrap_err();
        assert!(err.is_load_error());
        assert!(err.to_string().contains("Stata"));
    }

    #[test]
    fn test_missing_file() {
        let err = DatasetLoader::new()
            .load("definitely/not/here.csv")
            .unwrap_err();
        assert!(err.is_load_error());
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_load_csv() {
        let path = scratch_file(
            "small.csv",
            b"party_id,party,country,lrgen\n1,SPD,de,3.5\n2,CDU,de,6.1\n",
        );

        let raw = DatasetLoader::new().load(&path).unwrap();
        assert_eq!(raw.height(), 2);
        assert_eq!(raw.width(), 4);
        assert_eq!(raw.source(), Some(path.as_path()));
    }

    #[test]
    fn test_malformed_parquet() {
        let path = scratch_file("broken.parquet", b"this is not parquet");
        let err = DatasetLoader::new().load(&path).unwrap_err();
        assert!(err.is_load_error());
    }
}
