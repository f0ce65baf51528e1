//! inference — standard errors and confidence intervals for fitted models.
//!
//! Purpose
//! -------
//! Post-estimation uncertainty on top of the optimization layer: classical
//! standard errors from the observed information (used for the delay fit)
//! and profile-likelihood / Wald intervals for a scalar parameter (used for
//! the CFR).
//!
//! Key behaviors
//! -------------
//! - [`hessian`]: observed information via finite-difference Hessians and
//!   eigen-based pseudoinverse standard errors.
//! - [`interval`]: [`IntervalMethod`], reference quantiles, and the two
//!   interval constructions on the unconstrained scale.
//! - [`errors`]: [`InferenceError`] / [`InferenceResult`].
//!
//! Conventions
//! -----------
//! - Everything is expressed in the unconstrained optimizer parameter;
//!   mapping back to model scale (logistic, softplus) is the caller's job.
//! - Pure functions: no logging, no global state.

pub mod errors;
pub mod hessian;
pub mod interval;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::errors::{InferenceError, InferenceResult};
pub use self::hessian::{calc_standard_errors, observed_information};
pub use self::interval::{
    IntervalMethod, ScalarInterval, profile_interval, profile_threshold, wald_interval,
};

pub mod prelude {
    pub use super::errors::{InferenceError, InferenceResult};
    pub use super::hessian::calc_standard_errors;
    pub use super::interval::{IntervalMethod, profile_interval, wald_interval};
}
