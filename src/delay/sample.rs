//! Onset-to-death delay samples.
//!
//! Purpose
//! -------
//! Hold the individual-level delays (in days) that the gamma fit consumes,
//! and reduce them to the sufficient statistics the likelihood needs.
//!
//! Key behaviors
//! -------------
//! - [`DelaySample::from_date_pairs`] turns `(onset, death)` dates into
//!   day counts. Negative delays are kept; [`DelaySample::validate`]
//!   rejects them so the caller sees *which* record is inconsistent.
//! - [`DelaySample::summary`] computes [`DelaySummary`] in a single pass.
//!
//! Invariants & assumptions
//! ------------------------
//! - The sample is immutable after construction; order is the input order
//!   and only matters for error indices.
//! - Zero delays (same-day deaths) are legal.
use chrono::NaiveDate;
use ndarray::Array1;

use crate::delay::errors::{DelayError, DelayResult};

/// Minimum number of delays accepted by the gamma fit.
pub const MIN_DELAY_SAMPLES: usize = 2;

/// Onset-to-death delays in days.
#[derive(Debug, Clone, PartialEq)]
pub struct DelaySample {
    values: Array1<f64>,
}

impl DelaySample {
    /// Wrap raw delays without validation.
    pub fn new(values: Array1<f64>) -> Self {
        Self { values }
    }

    /// Delays `death - onset` in whole days, in input order.
    pub fn from_date_pairs(pairs: &[(NaiveDate, NaiveDate)]) -> Self {
        let values = pairs
            .iter()
            .map(|(onset, death)| death.signed_duration_since(*onset).num_days() as f64)
            .collect::<Array1<f64>>();
        Self { values }
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check the sample is usable by the gamma fit.
    ///
    /// # Errors
    /// - [`DelayError::InsufficientSamples`] below [`MIN_DELAY_SAMPLES`].
    /// - [`DelayError::NonFiniteDelay`] / [`DelayError::NegativeDelay`] for
    ///   the first offending entry.
    /// - [`DelayError::DegenerateSample`] if every delay is zero or all
    ///   delays are identical.
    pub fn validate(&self) -> DelayResult<()> {
        if self.len() < MIN_DELAY_SAMPLES {
            return Err(DelayError::InsufficientSamples {
                needed: MIN_DELAY_SAMPLES,
                found: self.len(),
            });
        }
        for (index, &value) in self.values.iter().enumerate() {
            if !value.is_finite() {
                return Err(DelayError::NonFiniteDelay { index, value });
            }
            if value < 0.0 {
                return Err(DelayError::NegativeDelay { index, value });
            }
        }
        if self.values.iter().all(|&v| v == 0.0) {
            return Err(DelayError::DegenerateSample { reason: "every delay is zero" });
        }
        let first = self.values[0];
        if self.values.iter().all(|&v| v == first) {
            return Err(DelayError::DegenerateSample {
                reason: "all delays are identical, so the spread is zero",
            });
        }
        Ok(())
    }

    /// Sufficient statistics of the sample. Assumes [`validate`](Self::validate)
    /// passed.
    pub fn summary(&self) -> DelaySummary {
        let mut s = DelaySummary {
            n: self.len(),
            n_positive: 0,
            n_zero: 0,
            sum: 0.0,
            sum_sq: 0.0,
            sum_ln_positive: 0.0,
        };
        for &x in self.values.iter() {
            if x > 0.0 {
                s.n_positive += 1;
                s.sum_ln_positive += x.ln();
            } else {
                s.n_zero += 1;
            }
            s.sum += x;
            s.sum_sq += x * x;
        }
        s
    }
}

/// Sufficient statistics of a delay sample for the censored gamma
/// likelihood.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelaySummary {
    pub n: usize,
    pub n_positive: usize,
    /// Same-day deaths; enter the likelihood as `P(D ≤ 0.5)`.
    pub n_zero: usize,
    pub sum: f64,
    pub sum_sq: f64,
    /// `Σ ln x` over strictly positive delays.
    pub sum_ln_positive: f64,
}

impl DelaySummary {
    pub fn mean(&self) -> f64 {
        self.sum / self.n as f64
    }

    /// Unbiased sample variance.
    pub fn variance(&self) -> f64 {
        let n = self.n as f64;
        let mean = self.mean();
        ((self.sum_sq - n * mean * mean) / (n - 1.0)).max(0.0)
    }

    /// Mean of `ln x` over the strictly positive delays.
    pub fn mean_ln_positive(&self) -> f64 {
        self.sum_ln_positive / self.n_positive as f64
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
    // - Date-pair conversion, including negative delays.
    // - Each validation failure and its reported index.
    // - Sufficient statistics with zero delays.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Dates convert to signed whole-day differences in input order.
    //
    // Given
    // -----
    // - Three pairs with delays 0, 12 and -1 days (one crossing a month).
    //
    // Expect
    // ------
    // - Values `[0, 12, -1]`.
    fn from_date_pairs_uses_signed_day_differences() {
        // Arrange
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).expect("valid date");
        let pairs = [
            (d(2020, 1, 5), d(2020, 1, 5)),
            (d(2020, 1, 25), d(2020, 2, 6)),
            (d(2020, 3, 2), d(2020, 3, 1)),
        ];

        // Act
        let sample = DelaySample::from_date_pairs(&pairs);

        // Assert
        assert_eq!(sample.values(), &array![0.0, 12.0, -1.0]);
    }

    #[test]
    // Purpose
    // -------
    // `validate` reports each failure class with the right variant.
    //
    // Given
    // -----
    // - A single delay, a negative delay at index 2, a NaN at index 1, an
    //   all-zero sample and a constant sample.
    //
    // Expect
    // ------
    // - `InsufficientSamples`, `NegativeDelay { index: 2 }`,
    //   `NonFiniteDelay { index: 1 }`, and two `DegenerateSample`s.
    fn validate_reports_each_failure() {
        // Act + Assert
        assert_eq!(
            DelaySample::new(array![3.0]).validate(),
            Err(DelayError::InsufficientSamples { needed: 2, found: 1 })
        );
        assert_eq!(
            DelaySample::new(array![3.0, 4.0, -2.0]).validate(),
            Err(DelayError::NegativeDelay { index: 2, value: -2.0 })
        );
        assert!(matches!(
            DelaySample::new(array![3.0, f64::NAN]).validate(),
            Err(DelayError::NonFiniteDelay { index: 1, .. })
        ));
        assert!(matches!(
            DelaySample::new(array![0.0, 0.0, 0.0]).validate(),
            Err(DelayError::DegenerateSample { .. })
        ));
        assert!(matches!(
            DelaySample::new(array![5.0, 5.0]).validate(),
            Err(DelayError::DegenerateSample { .. })
        ));
        assert!(DelaySample::new(array![0.0, 5.0]).validate().is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Zero delays count towards the mean but not towards `Σ ln x`.
    //
    // Given
    // -----
    // - Delays `[0, 2, 4]`.
    //
    // Expect
    // ------
    // - `n_zero = 1`, `n_positive = 2`, mean 2, variance 4,
    //   `sum_ln_positive = ln 8`.
    fn summary_separates_zero_delays() {
        // Act
        let s = DelaySample::new(array![0.0, 2.0, 4.0]).summary();

        // Assert
        assert_eq!((s.n, s.n_zero, s.n_positive), (3, 1, 2));
        assert_eq!(s.mean(), 2.0);
        assert!((s.variance() - 4.0).abs() < 1e-12);
        assert!((s.sum_ln_positive - 8.0_f64.ln()).abs() < 1e-12);
    }
}
