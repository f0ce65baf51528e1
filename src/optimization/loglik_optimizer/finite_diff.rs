//! loglik_optimizer::finite_diff — finite-difference gradients and Hessians.
//!
//! Wraps the `finitediff` crate with the error capture and validation the
//! optimizer needs:
//!
//! - [`run_fd_diff`]: forward-difference gradient of a scalar objective. The
//!   objective closure cannot return `Result`, so callers route the first
//!   evaluation error through a `RefCell` slot and return `NaN`.
//! - [`compute_hessian`]: central-difference Hessian of a gradient map,
//!   retried with forward differences when the central one has non-finite
//!   entries, then symmetrized.
//!
//! Used by the L-BFGS adapter when a model has no analytic gradient, and by
//! `inference` to build observed information at an estimate.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, Theta,
        types::Hessian,
        validation::{validate_grad, validate_hessian},
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Forward-difference gradient of `func` at `theta`.
///
/// Clears `closure_err` before differencing; if `func` stored an error
/// there during the run, that error is returned instead of the gradient.
///
/// # Errors
/// - The captured evaluation error, converted to `OptError`.
/// - [`validate_grad`] failures on the resulting gradient.
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, theta.len())?;
    Ok(fd_grad)
}

/// Finite-difference Hessian of the gradient map `f` at `theta`.
///
/// The central scheme is tried first; its validation error is discarded
/// and only the forward-difference fallback's error is surfaced.
///
/// # Errors
/// [`validate_hessian`] failures of the forward-difference fallback.
pub fn compute_hessian<F: Fn(&Theta) -> Grad>(f: &F, theta: &Theta) -> OptResult<Hessian> {
    let dim = theta.len();
    let mut hess = theta.central_hessian(f);
    if validate_hessian(&hess, dim).is_err() {
        hess = theta.forward_hessian(f);
        validate_hessian(&hess, dim)?;
    }
    symmetrize_hess(&mut hess);
    Ok(hess)
}

// ---- Helper methods ----

/// Average each off-diagonal pair in place. Assumes a square matrix.
fn symmetrize_hess(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}
