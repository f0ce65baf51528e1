//! Validation helpers for log-likelihood optimization.
//!
//! - Tolerances: [`verify_tol_grad`], [`verify_tol_cost`].
//! - Derivatives: [`validate_grad`], [`validate_hessian`].
//! - Solver output: [`validate_theta_hat`], [`validate_value`].
//!
//! Each helper reports the first offending element through a dedicated
//! [`OptError`] variant.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{Grad, Theta, types::Hessian},
};

/// Validate an optional gradient-norm tolerance (finite, `> 0`).
///
/// # Errors
/// [`OptError::InvalidTolGrad`].
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate an optional cost-change tolerance (finite, `> 0`).
///
/// # Errors
/// [`OptError::InvalidTolCost`].
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Check that `grad` has length `dim` and only finite entries.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] on a length mismatch.
/// - [`OptError::InvalidGradient`] for the first non-finite entry.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    match grad.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(OptError::InvalidGradient {
            index,
            value: grad[index],
            reason: "Gradient elements must be finite.",
        }),
        None => Ok(()),
    }
}

/// Unwrap the solver's best parameter vector, rejecting missing or
/// non-finite estimates.
///
/// # Errors
/// - [`OptError::MissingThetaHat`] when the solver produced no parameter.
/// - [`OptError::InvalidThetaHat`] for the first non-finite entry.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    let theta = theta_hat.ok_or(OptError::MissingThetaHat)?;
    if let Some(index) = theta.iter().position(|v| !v.is_finite()) {
        return Err(OptError::InvalidThetaHat {
            index,
            value: theta[index],
            reason: "Parameter estimates must be finite.",
        });
    }
    Ok(theta)
}

/// Reject `NaN`/`±∞` log-likelihood values.
///
/// # Errors
/// [`OptError::NonFiniteCost`].
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

/// Check that `hessian` is `dim × dim` with only finite entries.
///
/// # Errors
/// - [`OptError::HessianDimMismatch`] on a shape mismatch.
/// - [`OptError::InvalidHessian`] for the first non-finite entry.
pub fn validate_hessian(hessian: &Hessian, dim: usize) -> OptResult<()> {
    if hessian.nrows() != dim || hessian.ncols() != dim {
        return Err(OptError::HessianDimMismatch {
            expected: dim,
            found: (hessian.nrows(), hessian.ncols()),
        });
    }
    for ((row, col), &value) in hessian.indexed_iter() {
        if !value.is_finite() {
            return Err(OptError::InvalidHessian { row, col, value });
        }
    }
    Ok(())
}
