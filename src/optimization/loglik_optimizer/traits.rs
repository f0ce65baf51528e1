//! Public API surface for log-likelihood maximization.
//!
//! - [`LogLikelihood`]: implemented by each model (the gamma delay fit).
//! - [`MLEOptions`] / [`Tolerances`]: validated optimizer configuration.
//! - [`LineSearcher`]: line search used by L-BFGS.
//! - [`OptimOutcome`]: normalized result of [`maximize`](super::maximize).
//!
//! Convention: we *maximize* `ℓ(θ)` by minimizing `c(θ) = -ℓ(θ)`. Analytic
//! gradients are gradients of `ℓ`; the adapter flips the sign.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        Cost, FnEvalMap, Grad, Theta,
        validation::{validate_theta_hat, validate_value, verify_tol_cost, verify_tol_grad},
    },
};
use argmin::core::{TerminationReason, TerminationStatus};
use argmin_math::ArgminL2Norm;
use std::str::FromStr;

/// Model log-likelihood in unconstrained parameter space.
///
/// - `value(θ, data)`: evaluate `ℓ(θ)`. Invalid inputs are reported as
///   `OptError`, never by panicking.
/// - `check(θ, data)`: called once before optimization to reject an
///   unusable starting point or payload.
/// - `grad(θ, data)`: optional analytic `∇ℓ(θ)`. The default returns
///   [`OptError::GradientNotImplemented`], which switches the adapter to
///   finite differences.
pub trait LogLikelihood {
    type Data: 'static;

    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Line search used inside L-BFGS. Parses case-insensitively from
/// `"MoreThuente"` / `"HagerZhang"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'MoreThuente' or 'HagerZhang'.",
            }),
        }
    }
}

/// Optimizer-level configuration.
///
/// Default: `tol_grad = 1e-7`, `tol_cost = 1e-12`, `max_iter = 500`,
/// More–Thuente line search, no observer, L-BFGS memory 7.
#[derive(Debug, Clone, PartialEq)]
pub struct MLEOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    /// Attach a terminal observer (requires the `obs_slog` feature).
    pub verbose: bool,
    pub lbfgs_mem: Option<usize>,
}

impl MLEOptions {
    /// Build options; numeric tolerances were already validated by
    /// [`Tolerances::new`].
    ///
    /// # Errors
    /// [`OptError::InvalidLBFGSMem`] if `lbfgs_mem == Some(0)`.
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, verbose: bool, lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        if let Some(0) = lbfgs_mem {
            return Err(OptError::InvalidLBFGSMem {
                mem: 0,
                reason: "L-BFGS memory must be greater than zero.",
            });
        }
        Ok(Self { tols, line_searcher, verbose, lbfgs_mem })
    }
}

impl Default for MLEOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances::default(),
            line_searcher: LineSearcher::MoreThuente,
            verbose: false,
            lbfgs_mem: None,
        }
    }
}

/// Stopping rules. At least one field must be `Some`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for
    ///   non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == Some(0)`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_grad(tol_grad)?;
        verify_tol_cost(tol_cost)?;
        if let Some(0) = max_iter {
            return Err(OptError::InvalidMaxIter {
                max_iter: 0,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self { tol_grad: Some(1e-7), tol_cost: Some(1e-12), max_iter: Some(500) }
    }
}

/// Result returned by [`maximize`](super::maximize).
///
/// `value` is the maximized log-likelihood `ℓ(θ̂)`, not the cost.
/// `converged` is `true` only when the solver reports its own convergence
/// criterion (or a target cost); hitting `max_iter` is not convergence.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Build a validated outcome from raw solver state.
    ///
    /// # Errors
    /// Propagates [`validate_theta_hat`] and [`validate_value`] failures.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: FnEvalMap, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let (converged, status) = describe_termination(&termination);
        Ok(Self {
            theta_hat,
            value,
            converged,
            status,
            iterations: iterations as usize,
            fn_evals,
            grad_norm: grad.map(|g| g.l2_norm()),
        })
    }
}

/// Map an Argmin termination status into `(converged, status string)`.
///
/// Shared by the L-BFGS and Brent runners.
pub fn describe_termination(termination: &TerminationStatus) -> (bool, String) {
    match termination {
        TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
        TerminationStatus::Terminated(
            reason @ (TerminationReason::SolverConverged | TerminationReason::TargetCostReached),
        ) => (true, format!("{reason:?}")),
        TerminationStatus::Terminated(reason) => (false, format!("{reason:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Validation rules of `Tolerances::new` and `MLEOptions::new`.
    // - Line-search parsing.
    // - Convergence classification in `OptimOutcome::new`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // `Tolerances::new` needs at least one stopping rule and rejects
    // `max_iter = 0`.
    //
    // Given
    // -----
    // - All-`None` tolerances and `max_iter = Some(0)`.
    //
    // Expect
    // ------
    // - `NoTolerancesProvided` and `InvalidMaxIter`.
    fn tolerances_require_a_rule_and_positive_max_iter() {
        // Act
        let none = Tolerances::new(None, None, None);
        let zero_iter = Tolerances::new(Some(1e-6), None, Some(0));

        // Assert
        assert_eq!(none, Err(OptError::NoTolerancesProvided));
        assert!(matches!(zero_iter, Err(OptError::InvalidMaxIter { max_iter: 0, .. })));
    }

    #[test]
    // Purpose
    // -------
    // `MLEOptions::new` rejects a zero L-BFGS memory.
    //
    // Given
    // -----
    // - Default tolerances and `lbfgs_mem = Some(0)`.
    //
    // Expect
    // ------
    // - `InvalidLBFGSMem { mem: 0, .. }`.
    fn mle_options_reject_zero_memory() {
        // Act
        let opts = MLEOptions::new(Tolerances::default(), LineSearcher::HagerZhang, false, Some(0));

        // Assert
        assert!(matches!(opts, Err(OptError::InvalidLBFGSMem { mem: 0, .. })));
    }

    #[test]
    // Purpose
    // -------
    // Line-search names parse case-insensitively; unknown names fail.
    //
    // Given
    // -----
    // - "hagerZHANG", "MoreThuente" and "backtracking".
    //
    // Expect
    // ------
    // - Two successes and one `InvalidLineSearch`.
    fn line_searcher_parses_case_insensitively() {
        // Act + Assert
        assert_eq!("hagerZHANG".parse::<LineSearcher>(), Ok(LineSearcher::HagerZhang));
        assert_eq!("MoreThuente".parse::<LineSearcher>(), Ok(LineSearcher::MoreThuente));
        assert!(matches!(
            "backtracking".parse::<LineSearcher>(),
            Err(OptError::InvalidLineSearch { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Reaching the iteration cap is reported as not converged, while the
    // solver's own criterion is.
    //
    // Given
    // -----
    // - The same state terminated by `MaxItersReached` and `SolverConverged`.
    //
    // Expect
    // ------
    // - `converged == false` and `true` respectively, with the reason in
    //   `status`.
    fn outcome_distinguishes_max_iters_from_convergence() {
        // Arrange
        let theta = Some(array![0.1, 0.2]);

        // Act
        let capped = OptimOutcome::new(
            theta.clone(),
            -1.0,
            TerminationStatus::Terminated(TerminationReason::MaxItersReached),
            500,
            FnEvalMap::new(),
            None,
        )
        .expect("valid outcome");
        let done = OptimOutcome::new(
            theta,
            -1.0,
            TerminationStatus::Terminated(TerminationReason::SolverConverged),
            12,
            FnEvalMap::new(),
            Some(array![3.0, 4.0]),
        )
        .expect("valid outcome");

        // Assert
        assert!(!capped.converged);
        assert_eq!(capped.status, "MaxItersReached");
        assert!(done.converged);
        assert_eq!(done.grad_norm, Some(5.0));
    }
}
