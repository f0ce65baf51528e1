//! Gamma onset-to-death delay distribution.
//!
//! `DelayDistribution` is the fixed delay model shared by every CFR
//! estimation: a gamma with shape `k > 0` and rate `θ > 0` (mean `k/θ`).
//! Besides the usual summaries it exposes the day-binned mass used by the
//! expected-deaths convolution, where day `d` collects
//! `P(d - 0.5 < D ≤ d + 0.5)` and day 0 collects `P(D ≤ 0.5)`.
use statrs::distribution::{Continuous, ContinuousCDF, Gamma};

use crate::delay::errors::{DelayError, DelayResult};

/// Half-width of a day bin. Same-day deaths are censored at this delay.
pub const DAY_HALF_WIDTH: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayDistribution {
    shape: f64,
    rate: f64,
    gamma: Gamma,
}

impl DelayDistribution {
    /// Build from known parameters.
    ///
    /// # Errors
    /// - [`DelayError::InvalidShape`] / [`DelayError::InvalidRate`] unless the
    ///   value is finite and `> 0`.
    pub fn from_shape_rate(shape: f64, rate: f64) -> DelayResult<Self> {
        if !shape.is_finite() || shape <= 0.0 {
            return Err(DelayError::InvalidShape { value: shape });
        }
        if !rate.is_finite() || rate <= 0.0 {
            return Err(DelayError::InvalidRate { value: rate });
        }
        let gamma = Gamma::new(shape, rate)?;
        Ok(Self { shape, rate, gamma })
    }

    pub fn shape(&self) -> f64 {
        self.shape
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// `k / θ` days.
    pub fn mean(&self) -> f64 {
        self.shape / self.rate
    }

    /// `k / θ²`.
    pub fn variance(&self) -> f64 {
        self.shape / (self.rate * self.rate)
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn median(&self) -> f64 {
        self.gamma.inverse_cdf(0.5)
    }

    /// Delay below which a fraction `p` of deaths occur.
    ///
    /// # Errors
    /// [`DelayError::InvalidProbability`] unless `0 ≤ p ≤ 1`.
    pub fn quantile(&self, p: f64) -> DelayResult<f64> {
        if !(0.0..=1.0).contains(&p) {
            return Err(DelayError::InvalidProbability { value: p });
        }
        Ok(self.gamma.inverse_cdf(p))
    }

    /// `P(D ≤ x)`; zero for `x ≤ 0`.
    pub fn cdf(&self, x: f64) -> f64 {
        if x <= 0.0 { 0.0 } else { self.gamma.cdf(x) }
    }

    /// Density at `x`; zero for `x < 0`.
    pub fn pdf(&self, x: f64) -> f64 {
        if x < 0.0 { 0.0 } else { self.gamma.pdf(x) }
    }

    /// Probability that death falls on day `d` after onset.
    pub fn day_mass(&self, d: usize) -> f64 {
        let upper = d as f64 + DAY_HALF_WIDTH;
        let lower = (d as f64 - DAY_HALF_WIDTH).max(0.0);
        (self.cdf(upper) - self.cdf(lower)).max(0.0)
    }
}
