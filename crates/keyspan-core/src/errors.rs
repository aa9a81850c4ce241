//! Error types for the keyspan core library.

use std::path::PathBuf;

/// Top-level error enum for the keyspan core library.
#[derive(Debug, thiserror::Error)]
pub enum KeyspanError {
    #[error("Malformed hex value: {0:?}")]
    MalformedHex(String),

    #[error("Invalid percentage: {0} (expected a value in [0, 100])")]
    InvalidPercentage(f64),

    #[error("Invalid range: end {end} is below start {start}")]
    InvalidRange { start: String, end: String },

    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("No valid puzzle data found in input")]
    NoRecords,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(feature = "python")]
impl From<KeyspanError> for pyo3::PyErr {
    fn from(err: KeyspanError) -> pyo3::PyErr {
        use pyo3::exceptions::{PyFileNotFoundError, PyIOError, PyValueError};

        match &err {
            KeyspanError::MalformedHex(_)
            | KeyspanError::InvalidPercentage(_)
            | KeyspanError::InvalidRange { .. }
            | KeyspanError::NoRecords => PyValueError::new_err(err.to_string()),
            KeyspanError::InputNotFound(_) => PyFileNotFoundError::new_err(err.to_string()),
            KeyspanError::Io(_) => PyIOError::new_err(err.to_string()),
            KeyspanError::Json(_) => PyValueError::new_err(err.to_string()),
        }
    }
}

pub type KeyspanResult<T> = Result<T, KeyspanError>;
