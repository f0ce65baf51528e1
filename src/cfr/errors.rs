//! Errors for CFR estimation: series validation, the expected-deaths model,
//! the estimator and snapshot processing.
//!
//! ## Conventions
//! - **Indices are 0-based** day positions in the dense series.
//! - Counts must be **finite and ≥ 0**; the CFR must lie in **[0, 1]**.
//! - Wrapped optimizer/inference failures keep their own `kind()`, so an
//!   invalid search bound still reads as a configuration error.
//! - Snapshot failures carry the report date of the offending snapshot.
use chrono::NaiveDate;
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

use crate::{errors::ErrorKind, inference::errors::InferenceError, optimization::errors::OptError};

pub type CfrResult<T> = Result<T, CfrError>;

#[derive(Debug, Clone, PartialEq)]
pub enum CfrError {
    // ---- Input/data validation ----
    /// Onset and death series are empty.
    EmptySeries,

    /// Onset and death series differ in length.
    LengthMismatch { onsets: usize, deaths: usize },

    /// A count is NaN/±inf.
    NonFiniteCount { series: &'static str, index: usize, value: f64 },

    /// A count is < 0.
    NegativeCount { series: &'static str, index: usize, value: f64 },

    /// Snapshot day indices must be strictly increasing.
    NonIncreasingDayIndex { position: usize, previous: u32, found: u32 },

    /// CFR outside [0, 1] or non-finite.
    CfrOutOfRange { value: f64 },

    // ---- Identifiability ----
    /// No onsets in the series; the CFR is unidentifiable.
    NoOnsets,

    /// Deaths recorded on a day no onset could have reached.
    ImpossibleDeaths { day: usize, deaths: f64 },

    // ---- Settings ----
    /// Confidence level must be finite and strictly inside (0, 1).
    InvalidConfidenceLevel { level: f64 },

    // ---- Estimation ----
    /// Brent search stopped without meeting its tolerance.
    FitNotConverged { status: String, iterations: usize },

    /// Optimizer or backend failure.
    OptimizationFailed { source: OptError },

    /// Confidence interval construction failed.
    IntervalFailed { source: InferenceError },

    // ---- Batch ----
    /// Failure while processing the snapshot reported on `report_date`.
    Snapshot { report_date: NaiveDate, source: Box<CfrError> },
}

impl CfrError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CfrError::EmptySeries
            | CfrError::LengthMismatch { .. }
            | CfrError::NonFiniteCount { .. }
            | CfrError::NegativeCount { .. }
            | CfrError::NonIncreasingDayIndex { .. }
            | CfrError::CfrOutOfRange { .. } => ErrorKind::Domain,
            CfrError::NoOnsets
            | CfrError::ImpossibleDeaths { .. }
            | CfrError::FitNotConverged { .. } => ErrorKind::FitConvergence,
            CfrError::InvalidConfidenceLevel { .. } => ErrorKind::Configuration,
            CfrError::OptimizationFailed { source } => source.kind(),
            CfrError::IntervalFailed { source } => source.kind(),
            CfrError::Snapshot { source, .. } => source.kind(),
        }
    }

    /// Report date of a snapshot failure, if any.
    pub fn report_date(&self) -> Option<NaiveDate> {
        match self {
            CfrError::Snapshot { report_date, .. } => Some(*report_date),
            _ => None,
        }
    }
}

impl std::error::Error for CfrError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CfrError::OptimizationFailed { source } => Some(source),
            CfrError::IntervalFailed { source } => Some(source),
            CfrError::Snapshot { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl std::fmt::Display for CfrError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input/data validation ----
            CfrError::EmptySeries => write!(f, "Onset and death series are empty."),
            CfrError::LengthMismatch { onsets, deaths } => {
                write!(f, "Series length mismatch: {onsets} onset days vs {deaths} death days")
            }
            CfrError::NonFiniteCount { series, index, value } => {
                write!(f, "{series} count at day {index} is non-finite: {value}")
            }
            CfrError::NegativeCount { series, index, value } => {
                write!(f, "{series} count at day {index} is negative: {value}")
            }
            CfrError::NonIncreasingDayIndex { position, previous, found } => write!(
                f,
                "Day index at record {position} must exceed {previous}; got: {found}"
            ),
            CfrError::CfrOutOfRange { value } => {
                write!(f, "CFR must be finite and lie in [0, 1]; got: {value}")
            }

            // ---- Identifiability ----
            CfrError::NoOnsets => {
                write!(f, "No case onsets in the series; the CFR is not identifiable.")
            }
            CfrError::ImpossibleDeaths { day, deaths } => write!(
                f,
                "{deaths} deaths observed on day {day} before any case onset; the likelihood is degenerate."
            ),

            // ---- Settings ----
            CfrError::InvalidConfidenceLevel { level } => {
                write!(f, "Confidence level must be finite and in (0, 1); got: {level}")
            }

            // ---- Estimation ----
            CfrError::FitNotConverged { status, iterations } => {
                write!(f, "CFR search did not converge after {iterations} iterations: {status}")
            }
            CfrError::OptimizationFailed { source } => {
                write!(f, "CFR optimization failed: {source}")
            }
            CfrError::IntervalFailed { source } => {
                write!(f, "CFR confidence interval failed: {source}")
            }

            // ---- Batch ----
            CfrError::Snapshot { report_date, source } => {
                write!(f, "Snapshot {report_date}: {source}")
            }
        }
    }
}

impl From<OptError> for CfrError {
    fn from(source: OptError) -> Self {
        CfrError::OptimizationFailed { source }
    }
}

impl From<InferenceError> for CfrError {
    fn from(source: InferenceError) -> Self {
        CfrError::IntervalFailed { source }
    }
}

#[cfg(feature = "python-bindings")]
impl From<CfrError> for PyErr {
    fn from(err: CfrError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
