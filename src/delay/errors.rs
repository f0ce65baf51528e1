//! Errors for onset-to-death delay samples, distributions and fits.
//!
//! ## Conventions
//! - **Indices are 0-based** positions in the delay sample.
//! - Delays are measured in days and must be **finite and ≥ 0**.
//! - Gamma parameters (shape `k`, rate `θ`) must be **finite and > 0**.
//! - Optimizer failures are wrapped, not flattened, so the original
//!   [`OptError`] stays inspectable.
#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};
use statrs::distribution::GammaError;

use crate::{errors::ErrorKind, optimization::errors::OptError};

pub type DelayResult<T> = Result<T, DelayError>;

#[derive(Debug, Clone, PartialEq)]
pub enum DelayError {
    // ---- Input/data validation ----
    /// Fewer observations than the fit needs.
    InsufficientSamples { needed: usize, found: usize },

    /// A delay is NaN/±inf.
    NonFiniteDelay { index: usize, value: f64 },

    /// A delay is < 0 (death recorded before onset).
    NegativeDelay { index: usize, value: f64 },

    /// The sample has no spread the gamma MLE can use.
    DegenerateSample { reason: &'static str },

    // ---- Distribution parameters ----
    /// Shape must be finite and > 0.
    InvalidShape { value: f64 },

    /// Rate must be finite and > 0.
    InvalidRate { value: f64 },

    /// Quantile level must lie in [0, 1].
    InvalidProbability { value: f64 },

    /// Wrapper for statrs::distribution::GammaError
    Distribution { text: String },

    // ---- Estimation ----
    /// Optimizer stopped without meeting its convergence criterion.
    FitNotConverged { status: String, iterations: usize },

    /// Optimizer or backend failure.
    OptimizationFailed { source: OptError },
}

impl DelayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DelayError::InsufficientSamples { .. } | DelayError::DegenerateSample { .. } => {
                ErrorKind::InsufficientData
            }
            DelayError::NonFiniteDelay { .. }
            | DelayError::NegativeDelay { .. }
            | DelayError::InvalidShape { .. }
            | DelayError::InvalidRate { .. }
            | DelayError::InvalidProbability { .. }
            | DelayError::Distribution { .. } => ErrorKind::Domain,
            DelayError::FitNotConverged { .. } | DelayError::OptimizationFailed { .. } => {
                ErrorKind::FitConvergence
            }
        }
    }
}

impl std::error::Error for DelayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DelayError::OptimizationFailed { source } => Some(source),
            _ => None,
        }
    }
}

impl std::fmt::Display for DelayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input/data validation ----
            DelayError::InsufficientSamples { needed, found } => {
                write!(f, "Delay sample has {found} observations; at least {needed} are required.")
            }
            DelayError::NonFiniteDelay { index, value } => {
                write!(f, "Delay at index {index} is non-finite: {value}")
            }
            DelayError::NegativeDelay { index, value } => {
                write!(f, "Delay at index {index} is negative: {value} (death before onset)")
            }
            DelayError::DegenerateSample { reason } => {
                write!(f, "Delay sample is degenerate: {reason}")
            }

            // ---- Distribution parameters ----
            DelayError::InvalidShape { value } => {
                write!(f, "Gamma shape must be finite and > 0; got: {value}")
            }
            DelayError::InvalidRate { value } => {
                write!(f, "Gamma rate must be finite and > 0; got: {value}")
            }
            DelayError::InvalidProbability { value } => {
                write!(f, "Quantile level must lie in [0, 1]; got: {value}")
            }
            DelayError::Distribution { text } => {
                write!(f, "Gamma distribution error: {text}")
            }

            // ---- Estimation ----
            DelayError::FitNotConverged { status, iterations } => {
                write!(f, "Delay fit did not converge after {iterations} iterations: {status}")
            }
            DelayError::OptimizationFailed { source } => {
                write!(f, "Delay fit failed: {source}")
            }
        }
    }
}

impl From<OptError> for DelayError {
    fn from(source: OptError) -> Self {
        DelayError::OptimizationFailed { source }
    }
}

impl From<GammaError> for DelayError {
    fn from(err: GammaError) -> Self {
        DelayError::Distribution { text: err.to_string() }
    }
}

#[cfg(feature = "python-bindings")]
impl From<DelayError> for PyErr {
    fn from(err: DelayError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
