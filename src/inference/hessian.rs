//! inference::hessian — observed information and standard errors.
//!
//! Purpose
//! -------
//! Turn a gradient map at an estimate into the observed information matrix
//! and classical standard errors. Used by the delay fit (shape/rate SEs via
//! the delta method) and by the Wald interval of the CFR estimator.
//!
//! Key behaviors
//! -------------
//! - [`observed_information`] differentiates the gradient of the *negative*
//!   log-likelihood with [`compute_hessian`].
//! - [`calc_standard_errors`] returns `sqrt(diag(J⁺))`, with the
//!   Moore–Penrose pseudoinverse built from a symmetric eigendecomposition
//!   in `nalgebra`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The Hessian is finite, square and already symmetrized upstream.
//! - Eigenvalues `λ ≤ EIGEN_EPS` are dropped from the pseudoinverse, so a
//!   flat direction yields a standard error of `0` rather than `∞`.
//!   Callers that need positive curvature check the information directly.
//!
//! Conventions
//! -----------
//! - The scale (sum vs average log-likelihood) is whatever the gradient
//!   map uses; callers rescale.
//! - No explicit matrix inverse is formed.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{finite_diff::compute_hessian, types::Hessian},
    numerical_stability::transformations::EIGEN_EPS,
};
use nalgebra::DMatrix;
use ndarray::Array1;

/// Observed information `J(θ̂)` from the gradient of `-ℓ`.
///
/// # Errors
/// Propagates [`compute_hessian`] validation failures.
pub fn observed_information<F: Fn(&Array1<f64>) -> Array1<f64>>(
    neg_score: &F, theta_hat: &Array1<f64>,
) -> OptResult<Hessian> {
    compute_hessian(neg_score, theta_hat)
}

/// Classical standard errors at `theta_hat`.
///
/// `neg_score` is the gradient of the negative log-likelihood. Returns a
/// vector of the same length as `theta_hat`.
///
/// # Errors
/// Propagates [`compute_hessian`] validation failures.
///
/// # Example
/// ```
/// use ndarray::array;
/// use cfr_timeseries::inference::hessian::calc_standard_errors;
///
/// // -ℓ(θ) = 2θ₀² + θ₁²/2, so J = diag(4, 1).
/// let neg_score = |t: &ndarray::Array1<f64>| array![4.0 * t[0], t[1]];
/// let se = calc_standard_errors(&neg_score, &array![0.3, -0.2]).unwrap();
/// assert!((se[0] - 0.5).abs() < 1e-6);
/// assert!((se[1] - 1.0).abs() < 1e-6);
/// ```
pub fn calc_standard_errors<F: Fn(&Array1<f64>) -> Array1<f64>>(
    neg_score: &F, theta_hat: &Array1<f64>,
) -> OptResult<Array1<f64>> {
    let obs_info = observed_information(neg_score, theta_hat)?;
    let n = obs_info.nrows();
    let mut obs_info_nalg = DMatrix::<f64>::zeros(n, n);
    fill_dmatrix(&obs_info, &mut obs_info_nalg);
    Ok(solve_for_se(obs_info_nalg, n))
}

// ---- Helper methods ----

/// Copy a square `ndarray` matrix into a preallocated `DMatrix`, column
/// by column.
fn fill_dmatrix(obs_info: &Hessian, obs_info_nalg: &mut DMatrix<f64>) {
    for ((i, j), &value) in obs_info.indexed_iter() {
        obs_info_nalg[(i, j)] = value;
    }
}

/// `sqrt(Σ_{k: λ_k > EIGEN_EPS} Q[i,k]² / λ_k)` for each parameter `i`,
/// with `J = Q Λ Qᵀ`.
fn solve_for_se(obs_info_nalg: DMatrix<f64>, n: usize) -> Array1<f64> {
    let eigen = obs_info_nalg.symmetric_eigen();
    let q = eigen.eigenvectors;
    Array1::from_iter((0..n).map(|i| {
        eigen
            .eigenvalues
            .iter()
            .enumerate()
            .filter(|(_, lambda)| **lambda > EIGEN_EPS)
            .map(|(k, &lambda)| q[(i, k)] * q[(i, k)] / lambda)
            .sum::<f64>()
            .sqrt()
    }))
}
