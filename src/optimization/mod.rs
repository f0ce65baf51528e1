//! optimization — MLE stack, numerical helpers, and unified error surface.
//!
//! Purpose
//! -------
//! Provide the optimization layer behind both estimation steps: L-BFGS for
//! the two-parameter gamma delay fit and Brent's method for the bounded
//! one-parameter CFR search. Callers implement a log-likelihood and receive
//! fitted parameters and diagnostics without touching Argmin types.
//!
//! Key behaviors
//! -------------
//! - [`loglik_optimizer`]: maximize `ℓ(θ)` over a parameter vector.
//! - [`scalar_optimizer`]: maximize `ℓ(x)` on an interval and find roots.
//! - [`numerical_stability`]: softplus / logistic transforms between model
//!   space and the unconstrained optimizer space.
//! - [`errors`]: one enum, [`OptError`](errors::OptError), for option
//!   validation, numerical failures, Argmin backend errors and model errors
//!   raised inside a likelihood.
//!
//! Invariants & assumptions
//! ------------------------
//! - Optimizers work in unconstrained space; mapping to constrained model
//!   parameters happens in the model layers.
//! - Invalid states are reported as `OptError`, not panics.
//!
//! Conventions
//! -----------
//! - Maximization of `ℓ` is implemented as minimization of `c = -ℓ`; every
//!   user-facing value is a log-likelihood.
//! - No I/O or logging here. Orchestration layers log.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule. Convergence on real models is
//!   covered by the `delay` and `cfr` tests.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;
pub mod scalar_optimizer;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
    pub use super::scalar_optimizer::{
        ScalarLogLikelihood, ScalarOptions, ScalarOutcome, find_root, maximize_bounded,
    };
}
