//! numerical_stability — guarded parameter transforms and shared tolerances.
//!
//! Purpose
//! -------
//! Keep the mapping between constrained model parameters and the
//! unconstrained optimizer space in one place. The delay fit optimizes
//! gamma shape and rate through softplus, and the CFR estimator searches
//! over `x = logit(cfr)`.
//!
//! Key behaviors
//! -------------
//! - `safe_softplus` / `safe_softplus_inv` map ℝ ↔ (0, ∞) without overflow.
//! - `safe_logistic` / `logit` map ℝ ↔ (0, 1); the logistic is also the
//!   derivative of softplus and is used for gradient chain rules.
//! - `EIGEN_EPS` is the eigenvalue floor used by the inference layer.
//!
//! Conventions
//! -----------
//! - Pure functions on `f64`. No logging, no allocation, no global state.
//! - Domain validation (positivity, probability range) happens in the model
//!   layers; these helpers assume their documented domains.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    EIGEN_EPS, logit, safe_logistic, safe_softplus, safe_softplus_inv,
};

pub mod prelude {
    pub use super::transformations::{
        EIGEN_EPS, logit, safe_logistic, safe_softplus, safe_softplus_inv,
    };
}
