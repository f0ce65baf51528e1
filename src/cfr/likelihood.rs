//! Poisson log-likelihood of observed deaths as a function of the CFR.
//!
//! `ℓ(c) = Σᵢ [dᵢ ln μᵢ − μᵢ − ln Γ(dᵢ + 1)]` with `μᵢ = c · e₁ᵢ`. The
//! optimizer works on `x = logit(c)`, so [`CfrLikelihood`] implements
//! [`ScalarLogLikelihood`] in `x` with the analytic derivative
//! `dℓ/dx = (D − c·E₁)(1 − c)`, where `D = Σ dᵢ` and `E₁ = Σ e₁ᵢ`.
//!
//! Days with `dᵢ = 0` contribute `−μᵢ` only, so `μᵢ = 0` is allowed there.
use ndarray::Array1;
use statrs::function::gamma::ln_gamma;

use crate::{
    cfr::{
        data::CfrData,
        errors::{CfrError, CfrResult},
        kernel::{DelayKernel, validate_cfr},
    },
    delay::DelayDistribution,
    optimization::{
        errors::{OptError, OptResult},
        numerical_stability::transformations::safe_logistic,
        scalar_optimizer::ScalarLogLikelihood,
    },
};

/// CFR likelihood closed over a fixed delay kernel. The per-snapshot
/// series are the data payload.
#[derive(Debug, Clone, PartialEq)]
pub struct CfrLikelihood {
    kernel: DelayKernel,
}

impl CfrLikelihood {
    pub fn new(kernel: DelayKernel) -> Self {
        Self { kernel }
    }

    /// Kernel spanning `horizon` days of `delay`.
    pub fn from_delay(delay: &DelayDistribution, horizon: usize) -> Self {
        Self::new(DelayKernel::new(delay, horizon))
    }

    pub fn kernel(&self) -> &DelayKernel {
        &self.kernel
    }

    /// Expected deaths at `cfr = 1`.
    pub fn unit_expected(&self, data: &CfrData) -> Array1<f64> {
        self.kernel.convolve(data.onsets())
    }

    /// Log-likelihood on the probability scale.
    ///
    /// # Errors
    /// [`CfrError::CfrOutOfRange`] unless `0 ≤ cfr ≤ 1`.
    pub fn log_likelihood(&self, cfr: f64, data: &CfrData) -> CfrResult<f64> {
        validate_cfr(cfr)?;
        let e1 = self.unit_expected(data);
        Ok(poisson_loglik(cfr, &e1, data.deaths()))
    }
}

impl ScalarLogLikelihood for CfrLikelihood {
    type Data = CfrData;

    fn value(&self, x: f64, data: &Self::Data) -> OptResult<f64> {
        Ok(self.log_likelihood(safe_logistic(x), data)?)
    }

    fn check(&self, data: &Self::Data) -> OptResult<()> {
        if data.len() > self.kernel.horizon() {
            return Err(OptError::ModelError {
                text: format!(
                    "series spans {} days but the delay kernel covers {}",
                    data.len(),
                    self.kernel.horizon()
                ),
            });
        }
        if data.total_onsets() <= 0.0 {
            return Err(CfrError::NoOnsets.into());
        }
        Ok(())
    }

    fn derivative(&self, x: f64, data: &Self::Data) -> OptResult<f64> {
        let cfr = safe_logistic(x);
        let e1_total = self.unit_expected(data).sum();
        Ok((data.total_deaths() - cfr * e1_total) * safe_logistic(-x))
    }
}

/// `Σ dᵢ ln(c e₁ᵢ) − c e₁ᵢ − ln Γ(dᵢ + 1)`. A positive death count on a
/// day with vanishing mean is floored at the smallest positive mean.
fn poisson_loglik(cfr: f64, e1: &Array1<f64>, deaths: &Array1<f64>) -> f64 {
    e1.iter()
        .zip(deaths.iter())
        .map(|(&e, &d)| {
            let mu = cfr * e;
            if d == 0.0 {
                -mu
            } else {
                d * mu.max(f64::MIN_POSITIVE).ln() - mu - ln_gamma(d + 1.0)
            }
        })
        .sum()
}
