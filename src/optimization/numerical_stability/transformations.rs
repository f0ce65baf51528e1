//! Numerical stability utilities.
//!
//! Guarded versions of the scalar transforms used to move between
//! constrained model parameters and the unconstrained optimizer space:
//!
//! - [`safe_softplus`] / [`safe_softplus_inv`]: ℝ ↔ (0, ∞), used for the
//!   gamma shape and rate of the delay distribution.
//! - [`safe_logistic`] / [`logit`]: ℝ ↔ (0, 1), used for the case fatality
//!   ratio.
//!
//! Cutoffs (`|x| > 20`, `|x| > 36`) keep every branch in a well-conditioned
//! regime for `f64`.

/// Eigenvalues at or below this magnitude are treated as zero when forming
/// pseudoinverses of observed information matrices.
pub const EIGEN_EPS: f64 = 1e-12;

/// Numerically stable softplus: `softplus(x) = ln(1 + exp(x))`.
///
/// For `x > 20` the correction `ln1p(exp(-x))` is below `f64` resolution
/// relative to `x`, so `x` is returned directly.
pub fn safe_softplus(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp().ln_1p() }
}

/// Stable inverse of softplus on `(0, ∞)`: returns `t = ln(exp(x) - 1)`.
///
/// `x` must be finite and `> 0`; callers validate positivity beforehand.
pub fn safe_softplus_inv(x: f64) -> f64 {
    if x > 20.0 { x } else { x.exp_m1().ln() }
}

/// Numerically stable logistic function `σ(x) = 1 / (1 + exp(-x))`.
///
/// Also the derivative of [`safe_softplus`]. The two branches avoid
/// overflow of `exp` for large `|x|`; the result is always in `[0, 1]`.
pub fn safe_logistic(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Logit `ln(p / (1 - p))`, the inverse of [`safe_logistic`].
///
/// Returns `-∞` at `p = 0` and `+∞` at `p = 1`. Inputs outside `[0, 1]`
/// give `NaN`.
pub fn logit(p: f64) -> f64 {
    p.ln() - (-p).ln_1p()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Agreement of the guarded transforms with naive formulas on safe grids.
    // - Inverse relationships (softplus/softplus_inv, logistic/logit).
    // - Tail behavior of the logistic function.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Check that softplus and its inverse round-trip on a grid spanning
    // both branches of the cutoff.
    //
    // Given
    // -----
    // - Positive values from 1e-3 to 50.
    //
    // Expect
    // ------
    // - `safe_softplus(safe_softplus_inv(x)) ≈ x`.
    fn softplus_inverse_recovers_input() {
        // Arrange
        let grid = [1e-3, 0.1, 0.8, 4.0, 19.9, 20.5, 50.0];

        for &x in &grid {
            // Act
            let back = safe_softplus(safe_softplus_inv(x));

            // Assert
            assert_relative_eq!(back, x, max_relative = 1e-10);
        }
    }

    #[test]
    // Purpose
    // -------
    // Verify that `safe_logistic` matches the naive formula in the safe
    // range and saturates without NaN in the tails.
    //
    // Given
    // -----
    // - Moderate inputs in [-10, 10] and extreme inputs ±800.
    //
    // Expect
    // ------
    // - Agreement with `1 / (1 + exp(-x))` for moderate inputs.
    // - `σ(800) == 1`, `σ(-800) == 0`, both finite.
    fn logistic_matches_naive_and_saturates() {
        // Arrange
        let moderate = [-10.0, -2.5, 0.0, 1.0, 10.0];

        // Act + Assert
        for &x in &moderate {
            let naive = 1.0 / (1.0 + (-x as f64).exp());
            assert_relative_eq!(safe_logistic(x), naive, max_relative = 1e-14);
        }
        assert_eq!(safe_logistic(800.0), 1.0);
        assert_eq!(safe_logistic(-800.0), 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Confirm that `logit` inverts `safe_logistic` and handles the closed
    // endpoints of the unit interval.
    //
    // Given
    // -----
    // - Probabilities strictly inside (0, 1), plus 0 and 1.
    //
    // Expect
    // ------
    // - `safe_logistic(logit(p)) ≈ p`.
    // - `logit(0) = -∞`, `logit(1) = +∞`.
    fn logit_inverts_logistic() {
        // Arrange
        let probs = [1e-9, 0.05, 0.5, 0.9, 1.0 - 1e-9];

        // Act + Assert
        for &p in &probs {
            assert_relative_eq!(safe_logistic(logit(p)), p, max_relative = 1e-8);
        }
        assert_eq!(logit(0.0), f64::NEG_INFINITY);
        assert_eq!(logit(1.0), f64::INFINITY);
    }
}
