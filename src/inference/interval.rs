//! inference::interval — confidence intervals for a scalar parameter.
//!
//! Purpose
//! -------
//! Build confidence intervals around the optimum of a one-parameter
//! log-likelihood on its unconstrained scale. The CFR estimator maps the
//! endpoints through the logistic afterwards.
//!
//! Key behaviors
//! -------------
//! - [`profile_interval`]: `{x : 2[ℓ(x̂) − ℓ(x)] ≤ χ²₁(level)}`. Each side is
//!   solved with Brent root finding between `x̂` and the search bound; when
//!   the deviance never reaches the threshold before the bound, the bound
//!   is the endpoint.
//! - [`wald_interval`]: `x̂ ± z·SE(x̂)` with `SE = J(x̂)^{-1/2}` from the
//!   finite-difference observed information.
//!
//! Invariants & assumptions
//! ------------------------
//! - Both methods return `lower ≤ x̂ ≤ upper`.
//! - The profile interval never leaves the search bounds.
//! - The Wald interval requires `J(x̂) > EIGEN_EPS`; a flat or boundary
//!   optimum is an error, never an infinite interval.
use std::cell::RefCell;
use std::fmt;
use std::str::FromStr;

use crate::{
    inference::{
        errors::{InferenceError, InferenceResult},
        hessian::observed_information,
    },
    optimization::{
        errors::{OptError, OptResult},
        numerical_stability::transformations::EIGEN_EPS,
        scalar_optimizer::{ScalarLogLikelihood, ScalarOptions, ScalarOutcome, find_root},
    },
};
use finitediff::FiniteDiff;
use ndarray::{Array1, array};
use serde::Deserialize;
use statrs::distribution::{ChiSquared, ContinuousCDF, Normal};

/// How the confidence interval of the CFR is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalMethod {
    /// Likelihood-ratio (profile) interval.
    #[default]
    Profile,
    /// Symmetric interval on the logit scale from the observed information.
    Wald,
}

impl fmt::Display for IntervalMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntervalMethod::Profile => write!(f, "profile"),
            IntervalMethod::Wald => write!(f, "wald"),
        }
    }
}

impl FromStr for IntervalMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "profile" => Ok(IntervalMethod::Profile),
            "wald" => Ok(IntervalMethod::Wald),
            other => Err(format!("unknown interval method '{other}' (expected profile or wald)")),
        }
    }
}

/// Interval endpoints on the unconstrained scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarInterval {
    pub lower: f64,
    pub upper: f64,
}

/// # Errors
/// [`InferenceError::InvalidConfidenceLevel`] unless `0 < level < 1`.
pub fn validate_level(level: f64) -> InferenceResult<()> {
    if level.is_finite() && level > 0.0 && level < 1.0 {
        Ok(())
    } else {
        Err(InferenceError::InvalidConfidenceLevel { level })
    }
}

/// Half the `level` quantile of χ²₁: the log-likelihood drop that bounds
/// the profile interval (≈ 1.92 at 95%).
pub fn profile_threshold(level: f64) -> InferenceResult<f64> {
    validate_level(level)?;
    let chi2 = ChiSquared::new(1.0)
        .map_err(|e| InferenceError::Distribution { text: e.to_string() })?;
    Ok(0.5 * chi2.inverse_cdf(level))
}

/// Two-sided standard normal quantile `z_{(1+level)/2}` (≈ 1.96 at 95%).
pub fn normal_quantile(level: f64) -> InferenceResult<f64> {
    validate_level(level)?;
    let normal =
        Normal::new(0.0, 1.0).map_err(|e| InferenceError::Distribution { text: e.to_string() })?;
    Ok(normal.inverse_cdf(0.5 + 0.5 * level))
}

/// Profile-likelihood interval around `fit.x_hat` within the search bounds
/// of `opts`.
///
/// # Errors
/// - [`InferenceError::InvalidConfidenceLevel`].
/// - Likelihood or root-finding failures wrapped in
///   [`InferenceError::Optimization`].
pub fn profile_interval<F: ScalarLogLikelihood>(
    f: &F, data: &F::Data, fit: &ScalarOutcome, opts: &ScalarOptions, level: f64,
) -> InferenceResult<ScalarInterval> {
    let threshold = profile_threshold(level)?;
    let gap = |x: f64| -> OptResult<f64> { Ok(fit.value - f.value(x, data)? - threshold) };
    let lower = profile_endpoint(&gap, opts.lower, fit.x_hat, opts)?;
    let upper = profile_endpoint(&gap, opts.upper, fit.x_hat, opts)?;
    Ok(ScalarInterval { lower, upper })
}

/// Wald interval `x̂ ± z / sqrt(J(x̂))`.
///
/// # Errors
/// - [`InferenceError::InvalidConfidenceLevel`].
/// - [`InferenceError::NonPositiveInformation`] when `J(x̂) ≤ EIGEN_EPS`.
/// - Derivative or Hessian failures wrapped in
///   [`InferenceError::Optimization`].
pub fn wald_interval<F: ScalarLogLikelihood>(
    f: &F, data: &F::Data, x_hat: f64, level: f64,
) -> InferenceResult<ScalarInterval> {
    let z = normal_quantile(level)?;
    let info = scalar_information(f, data, x_hat)?;
    if !(info > EIGEN_EPS) {
        return Err(InferenceError::NonPositiveInformation { value: info });
    }
    let half_width = z / info.sqrt();
    Ok(ScalarInterval { lower: x_hat - half_width, upper: x_hat + half_width })
}

/// Observed information `-ℓ''(x̂)`, differentiating the score numerically.
///
/// # Errors
/// The first error raised by a score evaluation, or Hessian validation
/// failures.
pub fn scalar_information<F: ScalarLogLikelihood>(
    f: &F, data: &F::Data, x_hat: f64,
) -> InferenceResult<f64> {
    let captured: RefCell<Option<OptError>> = RefCell::new(None);
    let neg_score = |t: &Array1<f64>| -> Array1<f64> {
        match scalar_score(f, data, t[0]) {
            Ok(s) => array![-s],
            Err(e) => {
                captured.borrow_mut().get_or_insert(e);
                array![f64::NAN]
            }
        }
    };
    let info = observed_information(&neg_score, &array![x_hat]);
    if let Some(err) = captured.take() {
        return Err(err.into());
    }
    Ok(info?[[0, 0]])
}

// ---- Helper methods ----

/// Analytic `dℓ/dx` when the model provides it, central differences of `ℓ`
/// otherwise.
fn scalar_score<F: ScalarLogLikelihood>(f: &F, data: &F::Data, x: f64) -> OptResult<f64> {
    match f.derivative(x, data) {
        Err(OptError::GradientNotImplemented) => {
            let captured: RefCell<Option<OptError>> = RefCell::new(None);
            let value = |t: &Array1<f64>| match f.value(t[0], data) {
                Ok(v) => v,
                Err(e) => {
                    captured.borrow_mut().get_or_insert(e);
                    f64::NAN
                }
            };
            let grad = array![x].central_diff(&value);
            match captured.take() {
                Some(err) => Err(err),
                None => Ok(grad[0]),
            }
        }
        other => other,
    }
}

/// Endpoint on the side of `x_hat` facing `bound`.
fn profile_endpoint<G: Fn(f64) -> OptResult<f64>>(
    gap: &G, bound: f64, x_hat: f64, opts: &ScalarOptions,
) -> OptResult<f64> {
    if bound == x_hat || gap(bound)? <= 0.0 {
        return Ok(bound);
    }
    let (lo, hi) = if bound < x_hat { (bound, x_hat) } else { (x_hat, bound) };
    find_root(gap, lo, hi, opts.tol_x, opts.max_iter)
}
