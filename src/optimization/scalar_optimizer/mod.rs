//! scalar_optimizer — bounded one-dimensional maximization and root finding.
//!
//! Purpose
//! -------
//! The CFR estimator has a single parameter `x = logit(cfr)` searched over
//! a bounded interval, and its profile-likelihood interval needs the roots
//! of a deviance equation on each side of the optimum. Both are solved
//! with Argmin's Brent solvers behind the same conventions as
//! [`loglik_optimizer`](super::loglik_optimizer).
//!
//! Key behaviors
//! -------------
//! - [`maximize_bounded`] maximizes a [`ScalarLogLikelihood`] with
//!   `BrentOpt` on `[lower, upper]` and returns a [`ScalarOutcome`].
//! - [`find_root`] solves `g(x) = 0` with `BrentRoot` given a bracketing
//!   interval.
//! - Convergence is classified by the same rule as L-BFGS outcomes.
//!
//! Conventions
//! -----------
//! - Values are log-likelihoods; the cost `-ℓ(x)` stays internal.
//! - Model errors raised inside Argmin come back as the original
//!   `OptError` variant.

pub mod adapter;
pub mod api;
pub mod traits;

pub use self::api::{find_root, maximize_bounded};
pub use self::traits::{ScalarLogLikelihood, ScalarOptions, ScalarOutcome, verify_bounds};
