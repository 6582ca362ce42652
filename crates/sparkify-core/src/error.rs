use std::path::PathBuf;

use thiserror::Error;

/// Failures raised while turning a data file into rows.
///
/// Every variant carries the file path; log-file variants also carry the
/// 1-based line number of the offending event.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed JSON in {} at line {line}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("{} line {line}: missing field `{field}`", path.display())]
    MissingField {
        path: PathBuf,
        line: usize,
        field: &'static str,
    },

    #[error("{} line {line}: invalid value for `{field}`: {value}", path.display())]
    InvalidField {
        path: PathBuf,
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("{} line {line}: timestamp {ts} is out of range", path.display())]
    InvalidTimestamp { path: PathBuf, line: usize, ts: i64 },

    #[error("{} contains no record", path.display())]
    EmptyFile { path: PathBuf },
}
