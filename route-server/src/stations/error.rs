//! Station index error types.

use std::path::PathBuf;

/// Errors that can occur while loading the station coordinate index.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The reference file could not be opened
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file is not valid CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Required columns are absent from the header row
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
}
