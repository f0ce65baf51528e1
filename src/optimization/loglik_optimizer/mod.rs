//! loglik_optimizer — Argmin-backed L-BFGS maximization of log-likelihoods.
//!
//! Purpose
//! -------
//! Fit multi-parameter models by maximum likelihood. The gamma delay fit is
//! the in-crate user: it implements [`LogLikelihood`] on an unconstrained
//! `θ = (softplus⁻¹(shape), softplus⁻¹(rate))` and calls [`maximize`].
//!
//! Key behaviors
//! -------------
//! - [`adapter::ArgMinAdapter`] turns `ℓ(θ)` into the cost `c(θ) = -ℓ(θ)`.
//! - [`maximize`] validates the start via [`LogLikelihood::check`], builds
//!   L-BFGS with the chosen line search ([`builders`]) and runs it
//!   ([`run::run_lbfgs`]).
//! - [`finite_diff`] supplies gradient fallbacks and Hessians for the
//!   inference layer.
//! - [`Tolerances`] and [`MLEOptions`] are validated on construction.
//!
//! Invariants & assumptions
//! ------------------------
//! - `value` and `grad` report invalid inputs as [`OptError`](crate::optimization::errors::OptError),
//!   never by panicking.
//! - [`OptimOutcome::converged`] is `true` only for Argmin's
//!   `SolverConverged` / `TargetCostReached`; callers decide whether an
//!   unconverged outcome is fatal.
//!
//! Conventions
//! -----------
//! - User-facing values are log-likelihoods; costs stay internal.
//! - No logging. Progress output exists only behind the `obs_slog` feature.
//!
//! Testing notes
//! -------------
//! - Submodule tests cover sign conventions, builders, finite differences,
//!   validation and outcome classification. End-to-end convergence is
//!   exercised by the delay-fit tests.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::traits::{
    LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances, describe_termination,
};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

pub mod prelude {
    pub use super::api::maximize;
    pub use super::traits::{LineSearcher, LogLikelihood, MLEOptions, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
