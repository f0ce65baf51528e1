//! Errors for loading inputs, reading configuration and writing reports.
//!
//! Every variant names the file involved. Problems inside a file that the
//! model layer detects (out-of-order days, empty tables) are wrapped so
//! their `kind()` survives.
use std::path::PathBuf;

use crate::{cfr::errors::CfrError, errors::ErrorKind};

pub type IoResult<T> = Result<T, IoError>;

#[derive(Debug, Clone, PartialEq)]
pub enum IoError {
    /// Filesystem failure (open, read, create, list).
    File { path: PathBuf, text: String },

    /// CSV parse or write failure, including counts that are not
    /// nonnegative integers.
    Csv { path: PathBuf, text: String },

    /// File name carries no `YYYYMMDD` report date.
    MissingReportDate { path: PathBuf },

    /// Snapshot directory holds no CSV files.
    NoSnapshots { dir: PathBuf },

    /// Invalid or unknown key in the run configuration.
    Config { path: PathBuf, text: String },

    /// Snapshot content rejected by the model layer.
    Snapshot { path: PathBuf, source: CfrError },
}

impl IoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IoError::File { .. } | IoError::Csv { .. } | IoError::MissingReportDate { .. } => {
                ErrorKind::Domain
            }
            IoError::NoSnapshots { .. } => ErrorKind::InsufficientData,
            IoError::Config { .. } => ErrorKind::Configuration,
            IoError::Snapshot { source, .. } => source.kind(),
        }
    }

    pub(crate) fn file(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        IoError::File { path: path.into(), text: err.to_string() }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, err: csv::Error) -> Self {
        IoError::Csv { path: path.into(), text: err.to_string() }
    }
}

impl std::error::Error for IoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IoError::Snapshot { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl std::fmt::Display for IoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IoError::File { path, text } => write!(f, "{}: {text}", path.display()),
            IoError::Csv { path, text } => write!(f, "{}: CSV error: {text}", path.display()),
            IoError::MissingReportDate { path } => {
                write!(f, "{}: file name has no YYYYMMDD report date", path.display())
            }
            IoError::NoSnapshots { dir } => {
                write!(f, "{}: no snapshot CSV files found", dir.display())
            }
            IoError::Config { path, text } => {
                write!(f, "{}: invalid configuration: {text}", path.display())
            }
            IoError::Snapshot { path, source } => write!(f, "{}: {source}", path.display()),
        }
    }
}
