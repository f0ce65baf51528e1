//! CFR point estimate and confidence interval for one snapshot.
//!
//! Purpose
//! -------
//! Combine the fixed delay distribution, the Poisson likelihood and the
//! scalar optimizer into a single call that turns daily onsets and deaths
//! into `(mle, lower, upper)` on the probability scale.
//!
//! Key behaviors
//! -------------
//! - Validates the series, then rejects unidentifiable inputs before
//!   searching: no onsets at all, or deaths on a day whose expected deaths
//!   are zero for every CFR.
//! - Brent search over `x = logit(cfr)` within `CfrOptions::search`.
//! - Profile-likelihood (default) or Wald interval on the logit scale,
//!   mapped back with the logistic.
//!
//! Invariants & assumptions
//! ------------------------
//! - Successful fits satisfy `0 ≤ lower ≤ mle ≤ upper ≤ 1`.
//! - The estimator is immutable; estimating never refits the delay.
use chrono::NaiveDate;
use ndarray::Array1;
use serde::Serialize;

use crate::{
    cfr::{
        data::{CfrData, OutbreakSnapshot},
        errors::{CfrError, CfrResult},
        likelihood::CfrLikelihood,
        options::CfrOptions,
    },
    delay::DelayDistribution,
    inference::interval::{IntervalMethod, profile_interval, wald_interval},
    optimization::{
        numerical_stability::transformations::safe_logistic, scalar_optimizer::maximize_bounded,
    },
};

/// Dated CFR estimate, one row of the output time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CfrEstimate {
    pub date: NaiveDate,
    pub mle: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Estimator output before a report date is attached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CfrFit {
    pub mle: f64,
    pub lower: f64,
    pub upper: f64,
    /// `x̂ = logit(mle)` as found by the search.
    pub logit_mle: f64,
    pub log_likelihood: f64,
    pub method: IntervalMethod,
    pub level: f64,
    pub iterations: usize,
    /// Unadjusted `Σ deaths / Σ onsets`.
    pub naive: f64,
}

impl CfrFit {
    pub fn at(&self, date: NaiveDate) -> CfrEstimate {
        CfrEstimate { date, mle: self.mle, lower: self.lower, upper: self.upper }
    }
}

/// Delay-adjusted CFR estimator for a fixed delay distribution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CfrEstimator {
    delay: DelayDistribution,
    options: CfrOptions,
}

impl CfrEstimator {
    pub fn new(delay: DelayDistribution, options: CfrOptions) -> Self {
        Self { delay, options }
    }

    pub fn delay(&self) -> &DelayDistribution {
        &self.delay
    }

    pub fn options(&self) -> &CfrOptions {
        &self.options
    }

    /// Estimate the CFR from dense daily series.
    ///
    /// # Errors
    /// - `Domain`: empty or mismatched series, negative or non-finite counts.
    /// - `FitConvergence`: [`CfrError::NoOnsets`],
    ///   [`CfrError::ImpossibleDeaths`], [`CfrError::FitNotConverged`], or a
    ///   Wald interval at a boundary estimate.
    /// - Optimizer and interval failures keep the kind of their source.
    ///
    /// # Example
    /// ```
    /// use ndarray::array;
    /// use cfr_timeseries::cfr::{CfrEstimator, CfrOptions};
    /// use cfr_timeseries::delay::DelayDistribution;
    ///
    /// let delay = DelayDistribution::from_shape_rate(4.0, 0.8)?;
    /// let estimator = CfrEstimator::new(delay, CfrOptions::default());
    /// let onsets = array![20.0, 35.0, 50.0, 40.0, 30.0, 10.0, 5.0, 0.0, 0.0, 0.0];
    /// let deaths = array![0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 4.0, 3.0, 2.0, 2.0];
    /// let fit = estimator.estimate(&onsets, &deaths)?;
    /// assert!(fit.lower <= fit.mle && fit.mle <= fit.upper);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn estimate(&self, onsets: &Array1<f64>, deaths: &Array1<f64>) -> CfrResult<CfrFit> {
        let data = CfrData::new(onsets.to_owned(), deaths.to_owned())?;
        self.estimate_data(&data)
    }

    /// Estimate from an already validated payload.
    pub fn estimate_data(&self, data: &CfrData) -> CfrResult<CfrFit> {
        let total_onsets = data.total_onsets();
        if total_onsets <= 0.0 {
            return Err(CfrError::NoOnsets);
        }
        let likelihood = CfrLikelihood::from_delay(&self.delay, data.len());
        check_reachable_deaths(&likelihood.unit_expected(data), data.deaths())?;

        let search = &self.options.search;
        let fit = maximize_bounded(&likelihood, data, search)?;
        if !fit.converged {
            return Err(CfrError::FitNotConverged {
                status: fit.status,
                iterations: fit.iterations,
            });
        }
        let interval = match self.options.method {
            IntervalMethod::Profile => {
                profile_interval(&likelihood, data, &fit, search, self.options.level)?
            }
            IntervalMethod::Wald => {
                wald_interval(&likelihood, data, fit.x_hat, self.options.level)?
            }
        };
        Ok(CfrFit {
            mle: safe_logistic(fit.x_hat),
            lower: safe_logistic(interval.lower),
            upper: safe_logistic(interval.upper),
            logit_mle: fit.x_hat,
            log_likelihood: fit.value,
            method: self.options.method,
            level: self.options.level,
            iterations: fit.iterations,
            naive: data.total_deaths() / total_onsets,
        })
    }

    /// Estimate one snapshot and date it. Failures are wrapped in
    /// [`CfrError::Snapshot`] with the snapshot's report date.
    pub fn estimate_snapshot(&self, snapshot: &OutbreakSnapshot) -> CfrResult<CfrEstimate> {
        let report_date = snapshot.report_date();
        snapshot
            .to_data()
            .and_then(|data| self.estimate_data(&data))
            .map(|fit| fit.at(report_date))
            .map_err(|source| CfrError::Snapshot { report_date, source: Box::new(source) })
    }
}

// ---- Helper methods ----

/// Deaths need some onset mass on or before their day.
fn check_reachable_deaths(unit_expected: &Array1<f64>, deaths: &Array1<f64>) -> CfrResult<()> {
    match unit_expected.iter().zip(deaths.iter()).position(|(&e, &d)| d > 0.0 && e <= 0.0) {
        Some(day) => Err(CfrError::ImpossibleDeaths { day, deaths: deaths[day] }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cfr::kernel::expected_deaths, errors::ErrorKind,
        optimization::scalar_optimizer::ScalarOptions,
    };
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Recovery of a known CFR from noise-free deaths.
    // - Agreement of the Brent optimum with the closed form `D / E₁`.
    // - All-zero deaths: boundary estimate, profile vs Wald behavior.
    // - Identifiability and domain failures.
    // -------------------------------------------------------------------------

    fn delay() -> DelayDistribution {
        DelayDistribution::from_shape_rate(4.0, 0.8).expect("valid delay")
    }

    fn padded_onsets() -> Array1<f64> {
        let mut onsets = Array1::<f64>::zeros(20);
        onsets.slice_mut(ndarray::s![..7]).fill(10.0);
        onsets
    }

    #[test]
    // Purpose
    // -------
    // Noise-free deaths generated at CFR 0.05 are recovered.
    //
    // Given
    // -----
    // - Onsets `[10; 7]` padded to 20 days, delay gamma(4, 0.8).
    //
    // Expect
    // ------
    // - `mle` within 0.01 of 0.05, ordered interval, naive ratio below the
    //   adjusted estimate (deaths still pending).
    fn recovers_known_cfr() {
        // Arrange
        let onsets = padded_onsets();
        let deaths = expected_deaths(0.05, &delay(), &onsets).expect("valid input");
        let estimator = CfrEstimator::new(delay(), CfrOptions::default());

        // Act
        let fit = estimator.estimate(&onsets, &deaths).expect("fit");

        // Assert
        assert_abs_diff_eq!(fit.mle, 0.05, epsilon = 0.01);
        assert!(0.0 <= fit.lower && fit.lower <= fit.mle);
        assert!(fit.mle <= fit.upper && fit.upper <= 1.0);
        assert!(fit.naive < fit.mle);
        assert_eq!(fit.method, IntervalMethod::Profile);
    }

    #[test]
    // Purpose
    // -------
    // The Brent optimum equals the closed-form MLE `D / E₁`.
    //
    // Given
    // -----
    // - Integer deaths over ten days.
    //
    // Expect
    // ------
    // - `|mle − D/E₁| < 1e-6`, and the Wald interval brackets the estimate.
    fn brent_matches_closed_form() {
        // Arrange
        let onsets = array![20.0, 35.0, 50.0, 40.0, 30.0, 10.0, 5.0, 0.0, 0.0, 0.0];
        let deaths = array![0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 4.0, 3.0, 2.0, 2.0];
        let data = CfrData::new(onsets.clone(), deaths.clone()).expect("valid data");
        let e1 = CfrLikelihood::from_delay(&delay(), 10).unit_expected(&data).sum();
        let wald = CfrOptions { method: IntervalMethod::Wald, ..CfrOptions::default() };

        // Act
        let profile_fit = CfrEstimator::new(delay(), CfrOptions::default())
            .estimate(&onsets, &deaths)
            .expect("fit");
        let wald_fit = CfrEstimator::new(delay(), wald).estimate(&onsets, &deaths).expect("fit");

        // Assert
        assert_abs_diff_eq!(profile_fit.mle, 21.0 / e1, epsilon = 1e-6);
        assert_abs_diff_eq!(wald_fit.mle, profile_fit.mle, epsilon = 1e-9);
        assert!(wald_fit.lower < wald_fit.mle && wald_fit.mle < wald_fit.upper);
    }

    #[test]
    // Purpose
    // -------
    // All-zero deaths push the estimate to the lower bound: the profile
    // upper limit stays small but positive, and Wald fails.
    //
    // Given
    // -----
    // - Padded onsets and zero deaths.
    //
    // Expect
    // ------
    // - `mle ≈ 0`, `0 < upper < 0.1`, and Wald reports `FitConvergence`.
    fn zero_deaths_profile_and_wald() {
        // Arrange
        let onsets = padded_onsets();
        let deaths = Array1::<f64>::zeros(20);
        let wald = CfrOptions { method: IntervalMethod::Wald, ..CfrOptions::default() };

        // Act
        let fit = CfrEstimator::new(delay(), CfrOptions::default())
            .estimate(&onsets, &deaths)
            .expect("fit");
        let wald_err = CfrEstimator::new(delay(), wald)
            .estimate(&onsets, &deaths)
            .expect_err("boundary estimate");

        // Assert
        assert!(fit.mle < 1e-6);
        assert!(fit.lower <= fit.mle);
        assert!(fit.upper > 0.0 && fit.upper < 0.1);
        assert_eq!(wald_err.kind(), ErrorKind::FitConvergence);
    }

    #[test]
    // Purpose
    // -------
    // Unidentifiable and malformed inputs map to the documented kinds.
    //
    // Given
    // -----
    // - No onsets; a death before the first onset; mismatched lengths.
    //
    // Expect
    // ------
    // - `NoOnsets`, `ImpossibleDeaths { day: 0 }` (both `FitConvergence`),
    //   and a `Domain` length mismatch.
    fn identifiability_and_domain_errors() {
        // Arrange
        let estimator = CfrEstimator::new(delay(), CfrOptions::default());

        // Act
        let no_onsets = estimator.estimate(&array![0.0, 0.0], &array![0.0, 0.0]);
        let early = estimator.estimate(&array![0.0, 5.0, 5.0], &array![1.0, 0.0, 1.0]);
        let mismatch = estimator.estimate(&array![1.0, 2.0], &array![0.0]);

        // Assert
        assert_eq!(no_onsets, Err(CfrError::NoOnsets));
        assert_eq!(early, Err(CfrError::ImpossibleDeaths { day: 0, deaths: 1.0 }));
        assert_eq!(early.expect_err("early").kind(), ErrorKind::FitConvergence);
        assert_eq!(mismatch.expect_err("mismatch").kind(), ErrorKind::Domain);
    }

    #[test]
    // Purpose
    // -------
    // Snapshot failures carry the report date.
    //
    // Given
    // -----
    // - A snapshot with deaths but no onsets.
    //
    // Expect
    // ------
    // - `CfrError::Snapshot` with the report date and `NoOnsets` inside.
    fn snapshot_errors_carry_report_date() {
        // Arrange
        let report = NaiveDate::from_ymd_opt(2020, 3, 1).expect("valid date");
        let begin = NaiveDate::from_ymd_opt(2020, 2, 1).expect("valid date");
        let snapshot = OutbreakSnapshot::new(
            report,
            begin,
            vec![crate::cfr::data::DailyRecord::new(0, 0, 1)],
        )
        .expect("valid snapshot");
        let estimator = CfrEstimator::new(delay(), CfrOptions::default());

        // Act
        let err = estimator.estimate_snapshot(&snapshot).expect_err("no onsets");

        // Assert
        assert_eq!(err.report_date(), Some(report));
        assert!(matches!(
            err,
            CfrError::Snapshot { ref source, .. } if **source == CfrError::NoOnsets
        ));
    }

    #[test]
    // Purpose
    // -------
    // A Brent search stopped by its iteration cap fails instead of
    // returning an unconverged estimate.
    //
    // Given
    // -----
    // - The padded outbreak at CFR 0.05 and a search limited to one
    //   iteration with `tol_x = 1e-12`.
    //
    // Expect
    // ------
    // - `FitNotConverged` with status `MaxItersReached`, one iteration, and
    //   kind `FitConvergence`.
    fn iteration_cap_reports_non_convergence() {
        // Arrange
        let onsets = padded_onsets();
        let deaths = expected_deaths(0.05, &delay(), &onsets).expect("valid input");
        let search = ScalarOptions::new(-100.0, 100.0, 1e-12, 1).expect("valid search");
        let options = CfrOptions::new(0.95, IntervalMethod::Profile, search).expect("valid");
        let estimator = CfrEstimator::new(delay(), options);

        // Act
        let err = estimator.estimate(&onsets, &deaths).expect_err("one step cannot converge");

        // Assert
        assert_eq!(err.kind(), ErrorKind::FitConvergence);
        assert_eq!(
            err,
            CfrError::FitNotConverged { status: "MaxItersReached".to_string(), iterations: 1 }
        );
    }
}
