//! cfr_timeseries — delay-adjusted case fatality ratio estimation from
//! outbreak time series, with optional Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and, behind the
//! `python-bindings` feature, as the PyO3 bridge exposing the delay fit and
//! the CFR estimator through the `_cfr_timeseries` extension module.
//!
//! Key behaviors
//! -------------
//! - [`delay`]: fit a gamma onset-to-death distribution to line-list delays.
//! - [`cfr`]: expected deaths, the Poisson likelihood in `logit(cfr)`, the
//!   per-snapshot estimator and batch processing.
//! - [`io`]: CSV loaders and writers plus the `cfr.toml` run configuration.
//! - [`optimization`] / [`inference`]: argmin-backed optimizers, standard
//!   errors and confidence intervals shared by both estimation steps.
//! - [`errors`]: the coarse [`ErrorKind`](errors::ErrorKind) every module
//!   error reports.
//!
//! Invariants & assumptions
//! ------------------------
//! - The delay distribution is fit once and held fixed for every CFR
//!   estimate.
//! - Every estimate satisfies `0 ≤ lower ≤ mle ≤ upper ≤ 1`.
//! - When `python-bindings` is enabled, the Python-visible types mirror the
//!   invariants of their Rust counterparts.
//!
//! Conventions
//! -----------
//! - Delays and day indices are in days; dates are `chrono::NaiveDate`.
//! - Errors from core Rust code are converted to `ValueError` at the PyO3
//!   boundary.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each module; `tests/` runs the pipeline end to
//!   end on synthetic outbreaks and temporary directories.

pub mod cfr;
pub mod delay;
pub mod errors;
pub mod inference;
pub mod io;
pub mod optimization;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    cfr::{CfrEstimator, expected_deaths},
    delay::{DelayDistribution, DelayFit, DelayFitOptions, DelaySample, fit_delay},
    utils::{build_cfr_options, extract_array1},
};

/// GammaDelay — Python-facing onset-to-death delay distribution.
///
/// Constructed either from known parameters, `GammaDelay(shape, rate)`, or
/// by maximum likelihood, `GammaDelay.fit(delays)`. Fit diagnostics are
/// `None` for directly constructed instances.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "cfr_timeseries.delay")]
pub struct GammaDelay {
    inner: DelayDistribution,
    fit: Option<DelayFit>,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl GammaDelay {
    #[new]
    #[pyo3(text_signature = "(shape, rate, /)")]
    pub fn new(shape: f64, rate: f64) -> PyResult<GammaDelay> {
        Ok(GammaDelay { inner: DelayDistribution::from_shape_rate(shape, rate)?, fit: None })
    }

    /// Fit by maximum likelihood to delays in days (same-day deaths allowed).
    #[staticmethod]
    #[pyo3(text_signature = "(delays, /)")]
    pub fn fit<'py>(py: Python<'py>, delays: &Bound<'py, PyAny>) -> PyResult<GammaDelay> {
        let sample = DelaySample::new(extract_array1(py, delays, "delays")?);
        let fit = fit_delay(&sample, &DelayFitOptions::default())?;
        Ok(GammaDelay { inner: fit.distribution, fit: Some(fit) })
    }

    #[getter]
    pub fn shape(&self) -> f64 {
        self.inner.shape()
    }

    #[getter]
    pub fn rate(&self) -> f64 {
        self.inner.rate()
    }

    #[getter]
    pub fn mean(&self) -> f64 {
        self.inner.mean()
    }

    #[getter]
    pub fn median(&self) -> f64 {
        self.inner.median()
    }

    #[getter]
    pub fn std_dev(&self) -> f64 {
        self.inner.std_dev()
    }

    pub fn quantile(&self, p: f64) -> PyResult<f64> {
        Ok(self.inner.quantile(p)?)
    }

    /// Probability of death on day `d` after onset.
    pub fn day_mass(&self, d: usize) -> f64 {
        self.inner.day_mass(d)
    }

    #[getter]
    pub fn log_likelihood(&self) -> Option<f64> {
        self.fit.as_ref().map(|f| f.log_likelihood)
    }

    #[getter]
    pub fn shape_se(&self) -> Option<f64> {
        self.fit.as_ref().and_then(|f| f.shape_se)
    }

    #[getter]
    pub fn rate_se(&self) -> Option<f64> {
        self.fit.as_ref().and_then(|f| f.rate_se)
    }
}

/// CfrModel — Python-facing delay-adjusted CFR estimator.
///
/// `CfrModel(delay, level=0.95, method="profile")` holds the fixed delay;
/// `estimate(onsets, deaths)` returns `(mle, lower, upper)`.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "cfr_timeseries.cfr")]
pub struct CfrModel {
    inner: CfrEstimator,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl CfrModel {
    #[new]
    #[pyo3(
        signature = (delay, level = None, method = None),
        text_signature = "(delay, /, level=0.95, method='profile')"
    )]
    pub fn new<'py>(
        delay: PyRef<'py, GammaDelay>, level: Option<f64>, method: Option<&str>,
    ) -> PyResult<CfrModel> {
        let options = build_cfr_options(level, method)?;
        Ok(CfrModel { inner: CfrEstimator::new(delay.inner, options) })
    }

    #[pyo3(text_signature = "(self, onsets, deaths, /)")]
    pub fn estimate<'py>(
        &self, py: Python<'py>, onsets: &Bound<'py, PyAny>, deaths: &Bound<'py, PyAny>,
    ) -> PyResult<(f64, f64, f64)> {
        let onsets = extract_array1(py, onsets, "onsets")?;
        let deaths = extract_array1(py, deaths, "deaths")?;
        let fit = self.inner.estimate(&onsets, &deaths)?;
        Ok((fit.mle, fit.lower, fit.upper))
    }

    #[pyo3(text_signature = "(self, cfr, onsets, /)")]
    pub fn expected_deaths<'py>(
        &self, py: Python<'py>, cfr: f64, onsets: &Bound<'py, PyAny>,
    ) -> PyResult<Vec<f64>> {
        let onsets = extract_array1(py, onsets, "onsets")?;
        Ok(expected_deaths(cfr, self.inner.delay(), &onsets)?.to_vec())
    }

    #[getter]
    pub fn level(&self) -> f64 {
        self.inner.options().level
    }

    #[getter]
    pub fn method(&self) -> String {
        self.inner.options().method.to_string()
    }
}

/// Python module initializer for `_cfr_timeseries`.
///
/// Registers the `delay` and `cfr` submodules and adds them to
/// `sys.modules` so that dot-notation imports work.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _cfr_timeseries<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let delay_mod = PyModule::new(_py, "delay")?;
    let cfr_mod = PyModule::new(_py, "cfr")?;
    delay_module(_py, m, &delay_mod)?;
    cfr_module(_py, m, &cfr_mod)?;

    _py.import("sys")?.getattr("modules")?.set_item("cfr_timeseries.delay", delay_mod)?;
    _py.import("sys")?.getattr("modules")?.set_item("cfr_timeseries.cfr", cfr_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn delay_module<'py>(
    _py: Python, root: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<GammaDelay>()?;
    root.add_submodule(m)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn cfr_module<'py>(
    _py: Python, root: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<CfrModel>()?;
    root.add_submodule(m)?;
    Ok(())
}
