//! loglik_optimizer::types — numeric aliases and solver wiring.
//!
//! Parameter vectors, gradients and Hessians are `ndarray` containers over
//! `f64`. The L-BFGS aliases pin Argmin's `(Param, Gradient, Float)` generics
//! to those shapes so the rest of the optimizer never spells them out.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Unconstrained parameter vector `θ`.
pub type Theta = Array1<f64>;

/// Gradient `∇ℓ(θ)` or `∇c(θ)`, same length as [`Theta`].
pub type Grad = Array1<f64>;

/// Dense `n × n` Hessian, `n = θ.len()`.
pub type Hessian = Array2<f64>;

/// Scalar objective value. Internally the cost `c(θ) = -ℓ(θ)`.
pub type Cost = f64;

/// Function-evaluation counters reported by Argmin (e.g. `"cost_count"`).
pub type FnEvalMap = HashMap<String, u64>;

/// Default L-BFGS history size.
pub const DEFAULT_LBFGS_MEM: usize = 7;

pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
