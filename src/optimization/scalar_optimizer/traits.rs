//! Public surface of the bounded scalar optimizer.
//!
//! - [`ScalarLogLikelihood`]: one-parameter log-likelihood `ℓ(x)`.
//! - [`ScalarOptions`]: search interval, absolute tolerance, iteration cap.
//! - [`ScalarOutcome`]: normalized result of
//!   [`maximize_bounded`](super::maximize_bounded).
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{FnEvalMap, describe_termination},
};
use argmin::core::TerminationStatus;

/// Log-likelihood in a single unconstrained parameter.
///
/// `check` validates the data payload once before the search. The optional
/// `derivative` returns `dℓ/dx`; it is not used by Brent's method but
/// feeds observed-information calculations downstream.
pub trait ScalarLogLikelihood {
    type Data;

    fn value(&self, x: f64, data: &Self::Data) -> OptResult<f64>;
    fn check(&self, data: &Self::Data) -> OptResult<()>;

    fn derivative(&self, _x: f64, _data: &Self::Data) -> OptResult<f64> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Configuration of a bounded Brent search.
///
/// Default: `[-100, 100]`, `tol_x = 1e-8`, `max_iter = 500`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarOptions {
    pub lower: f64,
    pub upper: f64,
    /// Absolute tolerance on the location of the optimum or root.
    pub tol_x: f64,
    pub max_iter: usize,
}

impl ScalarOptions {
    /// Construct validated options.
    ///
    /// # Errors
    /// - [`OptError::InvalidBounds`] unless both bounds are finite and
    ///   `lower < upper`.
    /// - [`OptError::InvalidTolX`] unless `tol_x` is finite and `> 0`.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(lower: f64, upper: f64, tol_x: f64, max_iter: usize) -> OptResult<Self> {
        verify_bounds(lower, upper)?;
        if !tol_x.is_finite() {
            return Err(OptError::InvalidTolX { tol: tol_x, reason: "Tolerance must be finite." });
        }
        if tol_x <= 0.0 {
            return Err(OptError::InvalidTolX { tol: tol_x, reason: "Tolerance must be positive." });
        }
        if max_iter == 0 {
            return Err(OptError::InvalidMaxIter {
                max_iter,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
        Ok(Self { lower, upper, tol_x, max_iter })
    }
}

impl Default for ScalarOptions {
    fn default() -> Self {
        Self { lower: -100.0, upper: 100.0, tol_x: 1e-8, max_iter: 500 }
    }
}

/// Check that `[lower, upper]` is a finite, non-empty interval.
///
/// # Errors
/// [`OptError::InvalidBounds`].
pub fn verify_bounds(lower: f64, upper: f64) -> OptResult<()> {
    if !lower.is_finite() || !upper.is_finite() {
        return Err(OptError::InvalidBounds { lower, upper, reason: "Bounds must be finite." });
    }
    if lower >= upper {
        return Err(OptError::InvalidBounds {
            lower,
            upper,
            reason: "Lower bound must be strictly below the upper bound.",
        });
    }
    Ok(())
}

/// Result of a bounded scalar maximization.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarOutcome {
    pub x_hat: f64,
    /// `ℓ(x̂)`.
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
}

impl ScalarOutcome {
    /// # Errors
    /// - [`OptError::MissingThetaHat`] / [`OptError::InvalidThetaHat`] for a
    ///   missing or non-finite `x̂`.
    /// - [`OptError::NonFiniteCost`] for a non-finite `value`.
    pub fn new(
        x_hat: Option<f64>, value: f64, termination: &TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap,
    ) -> OptResult<Self> {
        let x_hat = x_hat.ok_or(OptError::MissingThetaHat)?;
        if !x_hat.is_finite() {
            return Err(OptError::InvalidThetaHat {
                index: 0,
                value: x_hat,
                reason: "Parameter estimates must be finite.",
            });
        }
        if !value.is_finite() {
            return Err(OptError::NonFiniteCost { value });
        }
        let (converged, status) = describe_termination(termination);
        Ok(Self { x_hat, value, converged, status, iterations: iterations as usize, fn_evals })
    }
}
