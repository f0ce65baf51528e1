//! Argmin adapters for one-dimensional problems.
//!
//! - [`ScalarAdapter`]: exposes a [`ScalarLogLikelihood`] as the cost
//!   `c(x) = -ℓ(x)` for `BrentOpt`.
//! - [`RootAdapter`]: exposes a fallible closure `g(x)` unchanged for
//!   `BrentRoot`.
use crate::optimization::{
    errors::{OptError, OptResult},
    scalar_optimizer::traits::ScalarLogLikelihood,
};
use argmin::core::{CostFunction, Error};

pub struct ScalarAdapter<'a, F: ScalarLogLikelihood> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: ScalarLogLikelihood> ScalarAdapter<'a, F> {
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }
}

impl<'a, F: ScalarLogLikelihood> CostFunction for ScalarAdapter<'a, F> {
    type Param = f64;
    type Output = f64;

    fn cost(&self, x: &f64) -> Result<f64, Error> {
        let value = self.f.value(*x, self.data)?;
        if !value.is_finite() {
            return Err((OptError::NonFiniteCost { value }).into());
        }
        Ok(-value)
    }
}

pub struct RootAdapter<G: Fn(f64) -> OptResult<f64>> {
    pub g: G,
}

impl<G: Fn(f64) -> OptResult<f64>> CostFunction for RootAdapter<G> {
    type Param = f64;
    type Output = f64;

    fn cost(&self, x: &f64) -> Result<f64, Error> {
        let value = (self.g)(*x)?;
        if !value.is_finite() {
            return Err((OptError::NonFiniteCost { value }).into());
        }
        Ok(value)
    }
}
