//! High-level entry point for maximizing a [`LogLikelihood`] with L-BFGS.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, LogLikelihood, MLEOptions},
    },
};

/// Maximize `ℓ(θ)` from `theta0` using L-BFGS with `opts.line_searcher`.
///
/// Calls `f.check(theta0, data)` first, then minimizes `-ℓ(θ)` through an
/// [`ArgMinAdapter`].
///
/// # Errors
/// - Errors from `f.check`.
/// - Solver construction and runtime errors.
///
/// # Example
/// ```
/// use ndarray::array;
/// use cfr_timeseries::optimization::errors::OptResult;
/// use cfr_timeseries::optimization::loglik_optimizer::{
///     LogLikelihood, MLEOptions, Theta, maximize,
/// };
///
/// struct Quadratic;
/// impl LogLikelihood for Quadratic {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
///         Ok(-(theta[0] - 2.0).powi(2))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = maximize(&Quadratic, array![0.0], &(), &MLEOptions::default())?;
/// assert!((out.theta_hat[0] - 2.0).abs() < 1e-4);
/// # Ok::<(), cfr_timeseries::optimization::errors::OptError>(())
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            run_lbfgs(theta0, opts, problem, build_optimizer_more_thuente(opts)?)
        }
        LineSearcher::HagerZhang => {
            run_lbfgs(theta0, opts, problem, build_optimizer_hager_zhang(opts)?)
        }
    }
}
