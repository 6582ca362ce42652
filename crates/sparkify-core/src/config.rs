use std::path::{Path, PathBuf};

use crate::transform::Dataset;

/// Pipeline settings.
///
/// Every value is a fixed literal: the pipeline takes no flags and reads no
/// environment variables (only `RUST_LOG` for log filtering). Tests build a
/// `Config` by hand to point at temporary directories.
#[derive(Debug, Clone)]
pub struct Config {
    /// DuckDB database file, created on first open.
    pub database_path: PathBuf,
    /// DuckDB size string such as `"1GB"` or `"512MB"`.
    pub duckdb_memory_limit: String,
    pub song_data_dir: PathBuf,
    pub log_data_dir: PathBuf,
    /// Extension (without the dot) of the data files to pick up.
    pub file_extension: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("sparkifydb.duckdb"),
            duckdb_memory_limit: "1GB".to_string(),
            song_data_dir: PathBuf::from("data/song_data"),
            log_data_dir: PathBuf::from("data/log_data"),
            file_extension: "json".to_string(),
        }
    }
}

impl Config {
    /// Root directory walked for the given dataset.
    pub fn data_dir(&self, dataset: Dataset) -> &Path {
        match dataset {
            Dataset::Songs => &self.song_data_dir,
            Dataset::Logs => &self.log_data_dir,
        }
    }
}
