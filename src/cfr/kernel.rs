//! Expected-deaths model: day-binned delay kernel and its convolution with
//! daily onsets.
//!
//! Expected deaths on day `i` are
//! `μᵢ = cfr · Σ_{j ≤ i} onsetⱼ · p(i − j)`, where `p(d)` is the delay mass
//! of day bin `d` ([`DelayDistribution::day_mass`]). The model is linear in
//! the CFR, so the estimator works with the unit-CFR series `e₁` and scales
//! it.
use ndarray::Array1;

use crate::{
    cfr::{
        data::validate_counts,
        errors::{CfrError, CfrResult},
    },
    delay::DelayDistribution,
};

/// Day-binned delay pmf `p(0), …, p(horizon − 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DelayKernel {
    pmf: Array1<f64>,
}

impl DelayKernel {
    pub fn new(delay: &DelayDistribution, horizon: usize) -> Self {
        Self { pmf: (0..horizon).map(|d| delay.day_mass(d)).collect() }
    }

    pub fn pmf(&self) -> &Array1<f64> {
        &self.pmf
    }

    pub fn horizon(&self) -> usize {
        self.pmf.len()
    }

    /// Delay mass captured within the horizon, `P(D ≤ horizon − 0.5)`.
    pub fn coverage(&self) -> f64 {
        self.pmf.sum()
    }

    /// Expected deaths at `cfr = 1`. Delays at or beyond the horizon carry
    /// no mass.
    pub fn convolve(&self, onsets: &Array1<f64>) -> Array1<f64> {
        let n = onsets.len();
        let mut out = Array1::<f64>::zeros(n);
        for (j, &onset) in onsets.iter().enumerate() {
            if onset == 0.0 {
                continue;
            }
            for (i, slot) in out.iter_mut().enumerate().skip(j) {
                let d = i - j;
                if d >= self.pmf.len() {
                    break;
                }
                *slot += onset * self.pmf[d];
            }
        }
        out
    }

    /// `cfr · convolve(onsets)`.
    ///
    /// # Errors
    /// [`CfrError::CfrOutOfRange`] unless `0 ≤ cfr ≤ 1`.
    pub fn expected(&self, cfr: f64, onsets: &Array1<f64>) -> CfrResult<Array1<f64>> {
        validate_cfr(cfr)?;
        Ok(self.convolve(onsets) * cfr)
    }
}

/// Expected daily deaths for `onsets` under a fixed delay distribution.
///
/// # Errors
/// - [`CfrError::CfrOutOfRange`] unless `cfr` is finite and in `[0, 1]`.
/// - [`CfrError::NonFiniteCount`] / [`CfrError::NegativeCount`] for invalid
///   onsets.
///
/// # Example
/// ```
/// use ndarray::array;
/// use cfr_timeseries::cfr::expected_deaths;
/// use cfr_timeseries::delay::DelayDistribution;
///
/// let delay = DelayDistribution::from_shape_rate(4.0, 0.8)?;
/// let mu = expected_deaths(0.1, &delay, &array![10.0, 0.0, 0.0])?;
/// assert_eq!(mu.len(), 3);
/// assert!((mu[2] - 10.0 * 0.1 * delay.day_mass(2)).abs() < 1e-12);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn expected_deaths(
    cfr: f64, delay: &DelayDistribution, onsets: &Array1<f64>,
) -> CfrResult<Array1<f64>> {
    validate_cfr(cfr)?;
    validate_counts("onset", onsets)?;
    DelayKernel::new(delay, onsets.len()).expected(cfr, onsets)
}

/// # Errors
/// [`CfrError::CfrOutOfRange`] unless `cfr` is finite and in `[0, 1]`.
pub fn validate_cfr(cfr: f64) -> CfrResult<()> {
    if cfr.is_finite() && (0.0..=1.0).contains(&cfr) {
        Ok(())
    } else {
        Err(CfrError::CfrOutOfRange { value: cfr })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Zero CFR, monotonicity in the CFR and mass conservation.
    // - The convolution against a hand-computed case.
    // - Domain errors.
    // -------------------------------------------------------------------------

    fn delay() -> DelayDistribution {
        DelayDistribution::from_shape_rate(4.0, 0.8).expect("valid delay")
    }

    #[test]
    // Purpose
    // -------
    // `cfr = 0` yields all zeros and the output grows with the CFR.
    //
    // Given
    // -----
    // - Onsets over 15 days, CFRs 0, 0.01, 0.2, 1.
    //
    // Expect
    // ------
    // - Zeros at CFR 0; every day nondecreasing across the CFR grid.
    fn zero_cfr_and_monotonicity() {
        // Arrange
        let onsets: Array1<f64> = (0..15).map(|i| (i % 4) as f64 * 3.0).collect();
        let grid = [0.0, 0.01, 0.2, 1.0];

        // Act
        let paths: Vec<Array1<f64>> = grid
            .iter()
            .map(|&c| expected_deaths(c, &delay(), &onsets).expect("valid input"))
            .collect();

        // Assert
        assert!(paths[0].iter().all(|&m| m == 0.0));
        for pair in paths.windows(2) {
            assert!(pair[0].iter().zip(pair[1].iter()).all(|(a, b)| a <= b));
        }
    }

    #[test]
    // Purpose
    // -------
    // Expected deaths conserve mass when the horizon covers the delay.
    //
    // Given
    // -----
    // - 5 days of 10 onsets followed by 60 empty days; CFR 0.05.
    //
    // Expect
    // ------
    // - `Σ μ ≈ 0.05 · 50` to the uncaptured tail mass.
    fn sum_matches_cfr_times_onsets() {
        // Arrange
        let mut onsets = Array1::<f64>::zeros(65);
        onsets.slice_mut(ndarray::s![..5]).fill(10.0);

        // Act
        let mu = expected_deaths(0.05, &delay(), &onsets).expect("valid input");

        // Assert
        let kernel = DelayKernel::new(&delay(), 60);
        assert!(kernel.coverage() > 0.999);
        assert_relative_eq!(mu.sum(), 0.05 * 50.0, max_relative = 1e-3);
    }

    #[test]
    // Purpose
    // -------
    // The convolution matches a hand-expanded sum.
    //
    // Given
    // -----
    // - Onsets `[2, 0, 3]`.
    //
    // Expect
    // ------
    // - `e₁ = [2p₀, 2p₁, 2p₂ + 3p₀]`.
    fn convolution_matches_manual_sum() {
        // Arrange
        let kernel = DelayKernel::new(&delay(), 3);
        let p = kernel.pmf().clone();

        // Act
        let e1 = kernel.convolve(&array![2.0, 0.0, 3.0]);

        // Assert
        assert_relative_eq!(e1[0], 2.0 * p[0]);
        assert_relative_eq!(e1[1], 2.0 * p[1]);
        assert_relative_eq!(e1[2], 2.0 * p[2] + 3.0 * p[0]);
    }

    #[test]
    // Purpose
    // -------
    // Out-of-range CFRs and invalid onsets are rejected, never clamped.
    //
    // Given
    // -----
    // - CFR 1.2, CFR NaN, a negative onset.
    //
    // Expect
    // ------
    // - `CfrOutOfRange` twice, then `NegativeCount`.
    fn domain_errors() {
        // Act + Assert
        assert_eq!(
            expected_deaths(1.2, &delay(), &array![1.0]),
            Err(CfrError::CfrOutOfRange { value: 1.2 })
        );
        assert!(matches!(
            expected_deaths(f64::NAN, &delay(), &array![1.0]),
            Err(CfrError::CfrOutOfRange { .. })
        ));
        assert!(matches!(
            expected_deaths(0.1, &delay(), &array![1.0, -2.0]),
            Err(CfrError::NegativeCount { index: 1, .. })
        ));
    }
}
