//! Brent-based bounded maximization and root finding.
use crate::optimization::{
    errors::{OptError, OptResult},
    scalar_optimizer::{
        adapter::{RootAdapter, ScalarAdapter},
        traits::{ScalarLogLikelihood, ScalarOptions, ScalarOutcome, verify_bounds},
    },
};
use argmin::{
    core::{Executor, State},
    solver::brent::{BrentOpt, BrentRoot},
};

/// Maximize `ℓ(x)` over `[opts.lower, opts.upper]` with Brent's method.
///
/// Calls `f.check(data)` first. The search never evaluates outside the
/// interval; a maximum at a bound is approached from inside.
///
/// # Errors
/// - Errors from `f.check` and from `ℓ` evaluations.
/// - [`ScalarOutcome::new`] validation failures.
///
/// # Example
/// ```
/// use cfr_timeseries::optimization::errors::OptResult;
/// use cfr_timeseries::optimization::scalar_optimizer::{
///     ScalarLogLikelihood, ScalarOptions, maximize_bounded,
/// };
///
/// struct Peak;
/// impl ScalarLogLikelihood for Peak {
///     type Data = f64;
///     fn value(&self, x: f64, center: &f64) -> OptResult<f64> {
///         Ok(-(x - center).powi(2))
///     }
///     fn check(&self, _: &f64) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = maximize_bounded(&Peak, &1.5, &ScalarOptions::default())?;
/// assert!((out.x_hat - 1.5).abs() < 1e-6);
/// # Ok::<(), cfr_timeseries::optimization::errors::OptError>(())
/// ```
pub fn maximize_bounded<F: ScalarLogLikelihood>(
    f: &F, data: &F::Data, opts: &ScalarOptions,
) -> OptResult<ScalarOutcome> {
    f.check(data)?;
    let solver =
        BrentOpt::new(opts.lower, opts.upper).set_tolerance(f64::EPSILON.sqrt(), opts.tol_x);
    let mut state = Executor::new(ScalarAdapter::new(f, data), solver)
        .configure(|state| state.max_iters(opts.max_iter as u64))
        .run()?
        .state()
        .clone();
    let iterations = state.get_iter();
    let fn_evals = state.get_func_counts().clone();
    let termination = state.get_termination_status().clone();
    ScalarOutcome::new(
        state.take_best_param(),
        -state.get_best_cost(),
        &termination,
        iterations,
        fn_evals,
    )
}

/// Find a root of `g` in `[lower, upper]` with Brent's method.
///
/// `g(lower)` and `g(upper)` must have opposite signs (or one of them be
/// zero).
///
/// # Errors
/// - [`OptError::InvalidBounds`] for an invalid interval.
/// - [`OptError::NoSignChange`] when the endpoints do not bracket a root.
/// - Errors raised by `g`.
/// - [`OptError::MissingThetaHat`] if the solver reports no iterate.
pub fn find_root<G>(g: G, lower: f64, upper: f64, tol_x: f64, max_iter: usize) -> OptResult<f64>
where
    G: Fn(f64) -> OptResult<f64>,
{
    verify_bounds(lower, upper)?;
    let (g_lower, g_upper) = (g(lower)?, g(upper)?);
    if g_lower == 0.0 {
        return Ok(lower);
    }
    if g_upper == 0.0 {
        return Ok(upper);
    }
    if g_lower.signum() == g_upper.signum() {
        return Err(OptError::NoSignChange { lower, upper });
    }
    let solver = BrentRoot::new(lower, upper, tol_x);
    let mut state = Executor::new(RootAdapter { g }, solver)
        .configure(|state| state.max_iters(max_iter as u64))
        .run()?
        .state()
        .clone();
    match state.take_best_param() {
        Some(x) if x.is_finite() => Ok(x),
        Some(x) => Err(OptError::InvalidThetaHat {
            index: 0,
            value: x,
            reason: "Root estimate must be finite.",
        }),
        None => Err(OptError::MissingThetaHat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Interior and boundary maxima of simple concave/monotone functions.
    // - Root finding with and without a bracketed sign change.
    // - Propagation of model errors through the Argmin boundary.
    // -------------------------------------------------------------------------

    struct Shifted;

    impl ScalarLogLikelihood for Shifted {
        type Data = f64;

        fn value(&self, x: f64, shift: &f64) -> OptResult<f64> {
            Ok(-(x - shift).powi(2) + 7.0)
        }

        fn check(&self, shift: &f64) -> OptResult<()> {
            if shift.is_finite() {
                Ok(())
            } else {
                Err(OptError::ModelError { text: "shift must be finite".to_string() })
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // An interior maximum is located to within the tolerance and the
    // reported value is the log-likelihood, not the cost.
    //
    // Given
    // -----
    // - `ℓ(x) = -(x - 3.25)² + 7` on `[-100, 100]`.
    //
    // Expect
    // ------
    // - `x̂ ≈ 3.25`, `ℓ(x̂) ≈ 7`, `converged == true`.
    fn maximize_bounded_finds_interior_optimum() {
        // Act
        let out = maximize_bounded(&Shifted, &3.25, &ScalarOptions::default())
            .expect("optimization should succeed");

        // Assert
        assert_abs_diff_eq!(out.x_hat, 3.25, epsilon = 1e-6);
        assert_abs_diff_eq!(out.value, 7.0, epsilon = 1e-10);
        assert!(out.converged, "status: {}", out.status);
    }

    #[test]
    // Purpose
    // -------
    // A maximum outside the interval is approached at the nearest bound.
    //
    // Given
    // -----
    // - `ℓ(x) = -(x - 50)² + 7` on `[-5, 5]`.
    //
    // Expect
    // ------
    // - `x̂` within 1e-6 of 5 and never above it.
    fn maximize_bounded_stops_at_upper_bound() {
        // Arrange
        let opts = ScalarOptions::new(-5.0, 5.0, 1e-9, 500).expect("valid options");

        // Act
        let out = maximize_bounded(&Shifted, &50.0, &opts).expect("optimization should succeed");

        // Assert
        assert!(out.x_hat <= 5.0);
        assert_abs_diff_eq!(out.x_hat, 5.0, epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // `check` runs before the search and its error is returned unchanged.
    //
    // Given
    // -----
    // - A NaN shift.
    //
    // Expect
    // ------
    // - `Err(OptError::ModelError { .. })`.
    fn maximize_bounded_runs_check_first() {
        // Act
        let err = maximize_bounded(&Shifted, &f64::NAN, &ScalarOptions::default())
            .expect_err("check must fail");

        // Assert
        assert!(matches!(err, OptError::ModelError { .. }));
    }

    #[test]
    // Purpose
    // -------
    // `find_root` solves a bracketed equation and rejects an unbracketed one.
    //
    // Given
    // -----
    // - `g(x) = x² - 2` on `[0, 5]` and on `[2, 5]`.
    //
    // Expect
    // ------
    // - Root ≈ √2 on the first interval.
    // - An error on the second interval (no sign change).
    fn find_root_bracketed_and_unbracketed() {
        // Arrange
        let g = |x: f64| -> OptResult<f64> { Ok(x * x - 2.0) };

        // Act
        let root = find_root(g, 0.0, 5.0, 1e-12, 200).expect("bracketed root");
        let missing = find_root(g, 2.0, 5.0, 1e-12, 200);

        // Assert
        assert_abs_diff_eq!(root, 2.0_f64.sqrt(), epsilon = 1e-9);
        assert_eq!(missing, Err(OptError::NoSignChange { lower: 2.0, upper: 5.0 }));
    }

    #[test]
    // Purpose
    // -------
    // Errors raised by the root function surface as the original `OptError`.
    //
    // Given
    // -----
    // - `g` that always fails with `ModelError`.
    //
    // Expect
    // ------
    // - `Err(OptError::ModelError { .. })`.
    fn find_root_propagates_closure_error() {
        // Arrange
        let g = |_: f64| -> OptResult<f64> {
            Err(OptError::ModelError { text: "boom".to_string() })
        };

        // Act
        let err = find_root(g, -1.0, 1.0, 1e-10, 50).expect_err("closure error");

        // Assert
        assert!(matches!(err, OptError::ModelError { .. }));
    }
}
