//! cfr — delay-adjusted case fatality ratio estimation.
//!
//! Purpose
//! -------
//! Estimate the CFR of an outbreak from daily onset and death counts under
//! a fixed onset-to-death delay distribution, once per report-date
//! snapshot.
//!
//! Key behaviors
//! -------------
//! - [`kernel`]: expected deaths as the convolution of onsets with the
//!   day-binned delay pmf, scaled by the CFR.
//! - [`likelihood`]: Poisson log-likelihood in `x = logit(cfr)` with an
//!   analytic derivative.
//! - [`estimator`]: Brent search plus profile or Wald interval,
//!   producing a [`CfrFit`] and, once dated, a [`CfrEstimate`].
//! - [`snapshots`]: batch processing with an abort or record policy and
//!   optional rayon parallelism.
//!
//! Invariants & assumptions
//! ------------------------
//! - `0 ≤ lower ≤ mle ≤ upper ≤ 1` for every returned estimate.
//! - The delay distribution is an input and is never refit here.
//! - Zero total onsets is an error, never a CFR of zero.
//!
//! Conventions
//! -----------
//! - Day index 0 is the first day of a snapshot; series are dense.
//! - Only [`snapshots`] logs; the numerical parts are silent.

pub mod data;
pub mod errors;
pub mod estimator;
pub mod kernel;
pub mod likelihood;
pub mod options;
pub mod snapshots;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::data::{CfrData, DailyRecord, OutbreakSnapshot};
pub use self::errors::{CfrError, CfrResult};
pub use self::estimator::{CfrEstimate, CfrEstimator, CfrFit};
pub use self::kernel::{DelayKernel, expected_deaths};
pub use self::likelihood::CfrLikelihood;
pub use self::options::CfrOptions;
pub use self::snapshots::{FailurePolicy, SnapshotOutcome, SnapshotProcessor};

pub mod prelude {
    pub use super::data::{DailyRecord, OutbreakSnapshot};
    pub use super::errors::{CfrError, CfrResult};
    pub use super::estimator::{CfrEstimate, CfrEstimator, CfrFit};
    pub use super::kernel::expected_deaths;
    pub use super::options::CfrOptions;
    pub use super::snapshots::{FailurePolicy, SnapshotOutcome, SnapshotProcessor};
}
