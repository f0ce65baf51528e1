//! Estimator configuration.
use crate::{
    cfr::errors::{CfrError, CfrResult},
    inference::interval::IntervalMethod,
    optimization::scalar_optimizer::ScalarOptions,
};

/// Confidence level, interval method and search settings of the CFR
/// estimator.
///
/// Default: 95% profile-likelihood interval, `x = logit(cfr)` searched over
/// `[-100, 100]` with `tol_x = 1e-8`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CfrOptions {
    pub level: f64,
    pub method: IntervalMethod,
    /// Bounds and tolerance on the logit scale, shared by the point search
    /// and the profile root finding.
    pub search: ScalarOptions,
}

impl CfrOptions {
    /// # Errors
    /// [`CfrError::InvalidConfidenceLevel`] unless `0 < level < 1`. The
    /// search options were validated by [`ScalarOptions::new`].
    pub fn new(level: f64, method: IntervalMethod, search: ScalarOptions) -> CfrResult<Self> {
        if !(level.is_finite() && level > 0.0 && level < 1.0) {
            return Err(CfrError::InvalidConfidenceLevel { level });
        }
        Ok(Self { level, method, search })
    }
}

impl Default for CfrOptions {
    fn default() -> Self {
        Self { level: 0.95, method: IntervalMethod::Profile, search: ScalarOptions::default() }
    }
}
