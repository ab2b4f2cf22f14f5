use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a dataset or querying the store.
#[derive(Debug, Error)]
pub enum SeaLevelError {
    /// The dataset file could not be opened.
    #[error("dataset not found: {}", path.display())]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A data row failed to parse. The whole load is aborted.
    #[error("malformed row {row_index}: {reason} (line: {raw_line:?})")]
    MalformedRow {
        row_index: usize,
        raw_line: String,
        reason: String,
    },

    /// The file opened but is not a readable dataset of its declared format.
    #[error("invalid dataset {}: {reason}", path.display())]
    InvalidSource { path: PathBuf, reason: String },

    #[error("unsupported dataset extension: .{0}")]
    UnsupportedFormat(String),

    #[error("unknown city: {0}")]
    UnknownCity(String),

    /// No sample for the city at the (clamped) floor decade.
    #[error("no data for {city} in {year}")]
    NoDataForYear { city: String, year: i32 },

    #[error("year is not a finite number: {0}")]
    NonFiniteYear(f64),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SeaLevelError {
    pub(crate) fn malformed(row_index: usize, raw_line: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedRow {
            row_index,
            raw_line: raw_line.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SeaLevelError>;
