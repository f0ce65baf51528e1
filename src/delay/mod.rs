//! delay — onset-to-death delay samples, the gamma delay distribution and
//! its maximum-likelihood fit.
//!
//! Purpose
//! -------
//! Estimate the delay between symptom onset and death once, from
//! individual-level records, and hand the fixed distribution to the CFR
//! estimator.
//!
//! Key behaviors
//! -------------
//! - [`DelaySample`]: validated day counts built from date pairs.
//! - [`DelayDistribution`]: gamma(shape, rate) with summaries, quantiles and
//!   the day-binned mass used by the expected-deaths convolution.
//! - [`fit_delay`]: L-BFGS fit of the censored gamma likelihood returning a
//!   [`DelayFit`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Shape and rate are always finite and `> 0`.
//! - Same-day deaths are interval-censored at half a day, matching the
//!   day-0 bin of the expected-deaths model.
//!
//! Conventions
//! -----------
//! - Delays are in days.
//! - No logging; the caller reports fits.

pub mod distribution;
pub mod errors;
pub mod fit;
pub mod sample;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::distribution::{DAY_HALF_WIDTH, DelayDistribution};
pub use self::errors::{DelayError, DelayResult};
pub use self::fit::{DelayFit, DelayFitOptions, GammaLogLik, fit_delay};
pub use self::sample::{DelaySample, DelaySummary, MIN_DELAY_SAMPLES};

pub mod prelude {
    pub use super::distribution::DelayDistribution;
    pub use super::errors::{DelayError, DelayResult};
    pub use super::fit::{DelayFit, DelayFitOptions, fit_delay};
    pub use super::sample::DelaySample;
}
