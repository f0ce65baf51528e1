//! Error type for interval and standard-error routines.
//!
//! `InferenceError` covers invalid interval settings, degenerate curvature
//! at an estimate, and failures of the underlying optimizer layer. The
//! alias `InferenceResult<T>` is used across `inference`.
use crate::{errors::ErrorKind, optimization::errors::OptError};

#[derive(Debug, Clone, PartialEq)]
pub enum InferenceError {
    // ---- Settings ----
    /// Confidence level must be finite and strictly inside (0, 1).
    InvalidConfidenceLevel {
        level: f64,
    },

    /// Reference distribution could not be constructed.
    Distribution {
        text: String,
    },

    // ---- Curvature ----
    /// Observed information at the estimate is not positive (flat or
    /// boundary optimum), so a Wald interval is undefined.
    NonPositiveInformation {
        value: f64,
    },

    // ---- Optimizer ----
    /// Failure raised by a likelihood evaluation, Hessian or root search.
    Optimization {
        source: OptError,
    },
}

pub type InferenceResult<T> = Result<T, InferenceError>;

impl InferenceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            InferenceError::InvalidConfidenceLevel { .. } => ErrorKind::Configuration,
            InferenceError::Distribution { .. } => ErrorKind::Configuration,
            InferenceError::NonPositiveInformation { .. } => ErrorKind::FitConvergence,
            InferenceError::Optimization { source } => source.kind(),
        }
    }
}

impl From<OptError> for InferenceError {
    fn from(source: OptError) -> Self {
        InferenceError::Optimization { source }
    }
}

impl std::error::Error for InferenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InferenceError::Optimization { source } => Some(source),
            _ => None,
        }
    }
}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Settings ----
            InferenceError::InvalidConfidenceLevel { level } => {
                write!(f, "Inference Error: confidence level {level} must lie strictly in (0, 1)")
            }
            InferenceError::Distribution { text } => {
                write!(f, "Inference Error: reference distribution: {text}")
            }

            // ---- Curvature ----
            InferenceError::NonPositiveInformation { value } => write!(
                f,
                "Inference Error: observed information {value} is not positive at the estimate"
            ),

            // ---- Optimizer ----
            InferenceError::Optimization { source } => write!(f, "Inference Error: {source}"),
        }
    }
}
