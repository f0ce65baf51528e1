//! Error type shared by the likelihood optimizers.
//!
//! Groups: option validation (configuration), gradient and Hessian checks,
//! solver outcome checks, argmin backend failures, and model-side errors
//! raised from inside a log-likelihood.
use argmin::core::{ArgminError, Error};

use crate::{cfr::errors::CfrError, delay::errors::DelayError, errors::ErrorKind};

/// Crate-wide result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Gradient ----
    /// The model has no analytic gradient; finite differences are used.
    GradientNotImplemented,
    GradientDimMismatch {
        expected: usize,
        found: usize,
    },
    InvalidGradient {
        index: usize,
        value: f64,
        reason: &'static str,
    },

    // ---- MLEOptions ----
    InvalidTolGrad {
        tol: f64,
        reason: &'static str,
    },
    InvalidTolCost {
        tol: f64,
        reason: &'static str,
    },
    InvalidMaxIter {
        max_iter: usize,
        reason: &'static str,
    },
    NoTolerancesProvided,
    InvalidLineSearch {
        name: String,
        reason: &'static str,
    },
    InvalidLBFGSMem {
        mem: usize,
        reason: &'static str,
    },

    // ---- ScalarOptions ----
    /// Search bounds must be finite with lower < upper.
    InvalidBounds {
        lower: f64,
        upper: f64,
        reason: &'static str,
    },
    InvalidTolX {
        tol: f64,
        reason: &'static str,
    },

    // ---- Evaluation ----
    NonFiniteCost {
        value: f64,
    },
    /// Root search endpoints have the same nonzero sign.
    NoSignChange {
        lower: f64,
        upper: f64,
    },

    // ---- Optimizer outcome ----
    InvalidThetaHat {
        index: usize,
        value: f64,
        reason: &'static str,
    },
    MissingThetaHat,

    // ---- Argmin ----
    /// Failure reported by the argmin solver or executor. `category` is the
    /// argmin error class (e.g. "condition violated").
    Backend {
        category: &'static str,
        text: String,
    },

    // ---- Hessian ----
    HessianDimMismatch {
        expected: usize,
        found: (usize, usize),
    },
    InvalidHessian {
        row: usize,
        col: usize,
        value: f64,
    },

    // ---- Model errors ----
    /// Probability-scale input to a log-likelihood is out of range.
    InvalidLogLikInput {
        value: f64,
    },
    /// Gamma shape is not finite and positive.
    ShapeInvalid,
    /// Gamma rate is not finite and positive.
    RateInvalid,
    /// Any other model-side failure raised inside a log-likelihood.
    ModelError {
        text: String,
    },
}

impl OptError {
    /// Coarse category of this error.
    ///
    /// Option validation failures are configuration errors, model-side
    /// domain violations stay domain errors, and everything the solver
    /// itself reports is a convergence failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            OptError::InvalidTolGrad { .. }
            | OptError::InvalidTolCost { .. }
            | OptError::InvalidMaxIter { .. }
            | OptError::NoTolerancesProvided
            | OptError::InvalidLineSearch { .. }
            | OptError::InvalidLBFGSMem { .. }
            | OptError::InvalidBounds { .. }
            | OptError::InvalidTolX { .. } => ErrorKind::Configuration,
            OptError::InvalidLogLikInput { .. }
            | OptError::ShapeInvalid
            | OptError::RateInvalid
            | OptError::ModelError { .. } => ErrorKind::Domain,
            _ => ErrorKind::FitConvergence,
        }
    }
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Gradient ----
            OptError::GradientNotImplemented => write!(f, "No analytic gradient available"),
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient has length {found}; expected {expected}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Gradient entry {index} is {value}: {reason}")
            }

            // ---- MLEOptions ----
            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Gradient tolerance {tol} rejected: {reason}")
            }
            OptError::InvalidTolCost { tol, reason } => {
                write!(f, "Cost-change tolerance {tol} rejected: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Iteration cap {max_iter} rejected: {reason}")
            }
            OptError::NoTolerancesProvided => {
                write!(f, "At least one stopping tolerance is required")
            }
            OptError::InvalidLineSearch { name, reason } => {
                write!(f, "Unknown line search '{name}': {reason}")
            }
            OptError::InvalidLBFGSMem { mem, reason } => {
                write!(f, "L-BFGS memory {mem} rejected: {reason}")
            }

            // ---- ScalarOptions ----
            OptError::InvalidBounds { lower, upper, reason } => {
                write!(f, "Search interval [{lower}, {upper}] rejected: {reason}")
            }
            OptError::InvalidTolX { tol, reason } => {
                write!(f, "Brent tolerance {tol} rejected: {reason}")
            }

            // ---- Evaluation ----
            OptError::NonFiniteCost { value } => write!(f, "Objective evaluated to {value}"),
            OptError::NoSignChange { lower, upper } => {
                write!(f, "No sign change between {lower} and {upper}; root is not bracketed")
            }

            // ---- Optimizer outcome ----
            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Estimated parameter {index} is {value}: {reason}")
            }
            OptError::MissingThetaHat => write!(f, "Solver returned no parameter estimate"),

            // ---- Argmin ----
            OptError::Backend { category, text } => write!(f, "Solver failed ({category}): {text}"),

            // ---- Hessian ----
            OptError::HessianDimMismatch { expected, found } => {
                write!(f, "Hessian has shape {found:?}; expected ({expected}, {expected})")
            }
            OptError::InvalidHessian { row, col, value } => {
                write!(f, "Hessian entry ({row}, {col}) is {value}; must be finite")
            }

            // ---- Model errors ----
            OptError::InvalidLogLikInput { value } => {
                write!(f, "Log-likelihood input out of range: {value}")
            }
            OptError::ShapeInvalid => write!(f, "Gamma shape must be finite and > 0"),
            OptError::RateInvalid => write!(f, "Gamma rate must be finite and > 0"),
            OptError::ModelError { text } => write!(f, "Model error: {text}"),
        }
    }
}

impl From<Error> for OptError {
    fn from(err: Error) -> Self {
        let err = match err.downcast::<OptError>() {
            Ok(inner) => return inner,
            Err(err) => err,
        };
        match err.downcast::<ArgminError>() {
            Ok(argmin_err) => {
                let (category, text) = match argmin_err {
                    ArgminError::InvalidParameter { text } => ("invalid parameter", text),
                    ArgminError::NotImplemented { text } => ("not implemented", text),
                    ArgminError::NotInitialized { text } => ("not initialized", text),
                    ArgminError::ConditionViolated { text } => ("condition violated", text),
                    ArgminError::CheckpointNotFound { text } => ("checkpoint not found", text),
                    ArgminError::PotentialBug { text } => ("potential bug", text),
                    ArgminError::ImpossibleError { text } => ("impossible error", text),
                    other => ("unclassified", other.to_string()),
                };
                OptError::Backend { category, text }
            }
            Err(err) => OptError::Backend { category: "external", text: err.to_string() },
        }
    }
}

impl From<DelayError> for OptError {
    fn from(err: DelayError) -> Self {
        match err {
            DelayError::InvalidShape { .. } => OptError::ShapeInvalid,
            DelayError::InvalidRate { .. } => OptError::RateInvalid,
            other => OptError::ModelError { text: other.to_string() },
        }
    }
}

impl From<CfrError> for OptError {
    fn from(err: CfrError) -> Self {
        match err {
            CfrError::CfrOutOfRange { value } => OptError::InvalidLogLikInput { value },
            other => OptError::ModelError { text: other.to_string() },
        }
    }
}
