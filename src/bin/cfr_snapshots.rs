//! cfr-snapshots — fit the delay once, then estimate the CFR for every
//! snapshot under an input root.
//!
//! Usage: `cfr-snapshots [ROOT]` (default `data`).
//!
//! Layout under `ROOT` (names configurable in `ROOT/cfr.toml`):
//! - `linelist.csv`: `onset_date,death_date`.
//! - `snapshots/*.csv`: `date,cases,deaths`, report date in the file name.
//! - `output/`: receives `delay_fit.csv` and `cfr_estimates.csv`.
//!
//! Log level comes from `RUST_LOG` and defaults to `info`.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use log::{LevelFilter, info};
use simple_logger::SimpleLogger;

use cfr_timeseries::{
    cfr::{CfrEstimator, FailurePolicy, SnapshotProcessor},
    delay::{DelayFitOptions, fit_delay},
    io::{
        DELAY_FIT_FILE, ESTIMATES_FILE, RunConfig, read_linelist, read_snapshot_dir,
        write_delay_fit, write_estimates, write_file, write_outcomes,
    },
};

fn main() -> Result<()> {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .env()
        .init()
        .context("failed to initialise logger")?;

    let root = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| "data".into());
    run(&root)
}

fn run(root: &Path) -> Result<()> {
    let config = RunConfig::load(root).context("failed to load run configuration")?;
    let output_dir = config.output_dir(root);

    // Step 1: onset-to-death delay.
    let linelist = read_linelist(&config.linelist_path(root))?;
    let sample = linelist.to_sample();
    let fit = fit_delay(&sample, &DelayFitOptions::default())
        .with_context(|| format!("delay fit failed on {} line-list delays", sample.len()))?;
    let delay = fit.distribution;
    info!(
        "Delay fit: shape = {:.4}, rate = {:.4}, mean = {:.2} d, median = {:.2} d ({} iterations)",
        delay.shape(),
        delay.rate(),
        delay.mean(),
        delay.median(),
        fit.iterations
    );
    write_file(&output_dir.join(DELAY_FIT_FILE), |file, path| write_delay_fit(file, &fit, path))?;

    // Step 2: one CFR estimate per snapshot, delay held fixed.
    let options = config.cfr_options().map_err(|text| anyhow!(text))?;
    let processor = SnapshotProcessor::new(CfrEstimator::new(delay, options));
    let snapshots = read_snapshot_dir(&config.snapshot_dir(root))?;
    let estimates_path = output_dir.join(ESTIMATES_FILE);

    match config.failure_policy {
        FailurePolicy::Abort => {
            let estimates = processor.process_all(&snapshots)?;
            write_file(&estimates_path, |file, path| write_estimates(file, &estimates, path))?;
        }
        FailurePolicy::Record => {
            let outcomes = processor.process_all_resilient(&snapshots);
            write_file(&estimates_path, |file, path| write_outcomes(file, &outcomes, path))?;
        }
    }
    info!("Wrote {}", estimates_path.display());
    Ok(())
}
