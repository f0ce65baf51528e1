//! Output tables.
//!
//! - `cfr_estimates.csv`: `date,mle,lower,upper`, one row per snapshot. In
//!   record mode two more columns, `status` (`ok` / `failed`) and `error`,
//!   are appended and failed rows leave the numeric columns empty.
//! - `delay_fit.csv`: one row with the fitted gamma parameters, their
//!   standard errors and summary statistics.
use std::{fs, io::Write, path::Path};

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    cfr::{estimator::CfrEstimate, snapshots::SnapshotOutcome},
    delay::DelayFit,
    io::errors::{IoError, IoResult},
};

pub const ESTIMATES_FILE: &str = "cfr_estimates.csv";
pub const DELAY_FIT_FILE: &str = "delay_fit.csv";

#[derive(Debug, Serialize)]
struct OutcomeRow {
    date: NaiveDate,
    mle: Option<f64>,
    lower: Option<f64>,
    upper: Option<f64>,
    status: &'static str,
    error: String,
}

impl From<&SnapshotOutcome> for OutcomeRow {
    fn from(outcome: &SnapshotOutcome) -> Self {
        match outcome {
            SnapshotOutcome::Estimated(e) => OutcomeRow {
                date: e.date,
                mle: Some(e.mle),
                lower: Some(e.lower),
                upper: Some(e.upper),
                status: "ok",
                error: String::new(),
            },
            SnapshotOutcome::Failed { report_date, error } => OutcomeRow {
                date: *report_date,
                mle: None,
                lower: None,
                upper: None,
                status: "failed",
                error: error.to_string(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct DelayFitRow {
    shape: f64,
    rate: f64,
    shape_se: Option<f64>,
    rate_se: Option<f64>,
    mean: f64,
    median: f64,
    sd: f64,
    log_likelihood: f64,
    n_samples: usize,
    n_zero: usize,
    iterations: usize,
    converged: bool,
}

impl From<&DelayFit> for DelayFitRow {
    fn from(fit: &DelayFit) -> Self {
        let d = &fit.distribution;
        DelayFitRow {
            shape: d.shape(),
            rate: d.rate(),
            shape_se: fit.shape_se,
            rate_se: fit.rate_se,
            mean: d.mean(),
            median: d.median(),
            sd: d.std_dev(),
            log_likelihood: fit.log_likelihood,
            n_samples: fit.n_samples,
            n_zero: fit.n_zero,
            iterations: fit.iterations,
            converged: fit.converged,
        }
    }
}

/// Write `date,mle,lower,upper` rows.
pub fn write_estimates<W: Write>(
    writer: W, estimates: &[CfrEstimate], path: &Path,
) -> IoResult<()> {
    write_rows(writer, estimates.iter(), path)
}

/// Write `date,mle,lower,upper,status,error` rows.
pub fn write_outcomes<W: Write>(
    writer: W, outcomes: &[SnapshotOutcome], path: &Path,
) -> IoResult<()> {
    write_rows(writer, outcomes.iter().map(OutcomeRow::from), path)
}

/// Write the single delay-fit row.
pub fn write_delay_fit<W: Write>(writer: W, fit: &DelayFit, path: &Path) -> IoResult<()> {
    write_rows(writer, std::iter::once(DelayFitRow::from(fit)), path)
}

/// Create `path` (and its parent directories) and hand a writer to `write`.
pub fn write_file<F>(path: &Path, write: F) -> IoResult<()>
where
    F: FnOnce(fs::File, &Path) -> IoResult<()>,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| IoError::file(parent, e))?;
    }
    let file = fs::File::create(path).map_err(|e| IoError::file(path, e))?;
    write(file, path)
}

fn write_rows<W: Write, S: Serialize>(
    writer: W, rows: impl Iterator<Item = S>, path: &Path,
) -> IoResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row).map_err(|e| IoError::csv(path, e))?;
    }
    wtr.flush().map_err(|e| IoError::file(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cfr::errors::CfrError, delay::DelayDistribution};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Column layout of the estimates table in both modes.
    // - The delay-fit row, including missing standard errors.
    // - File creation with parent directories.
    // -------------------------------------------------------------------------

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 2, d).expect("valid date")
    }

    fn estimate() -> CfrEstimate {
        CfrEstimate { date: date(10), mle: 0.05, lower: 0.03, upper: 0.08 }
    }

    #[test]
    // Purpose
    // -------
    // Estimates serialize as ISO date plus three numbers.
    //
    // Given
    // -----
    // - One estimate.
    //
    // Expect
    // ------
    // - Header `date,mle,lower,upper` and the matching row.
    fn estimates_layout() {
        // Arrange
        let mut buf = Vec::new();

        // Act
        write_estimates(&mut buf, &[estimate()], Path::new("out.csv")).expect("write");

        // Assert
        let text = String::from_utf8(buf).expect("utf8");
        assert_eq!(text, "date,mle,lower,upper\n2020-02-10,0.05,0.03,0.08\n");
    }

    #[test]
    // Purpose
    // -------
    // Record mode marks failures and leaves their numbers empty.
    //
    // Given
    // -----
    // - One estimated and one failed outcome.
    //
    // Expect
    // ------
    // - `status` column `ok` / `failed`; the failed row has empty numbers
    //   and the error text.
    fn outcomes_layout() {
        // Arrange
        let outcomes = vec![
            SnapshotOutcome::Estimated(estimate()),
            SnapshotOutcome::Failed { report_date: date(12), error: CfrError::NoOnsets },
        ];
        let mut buf = Vec::new();

        // Act
        write_outcomes(&mut buf, &outcomes, Path::new("out.csv")).expect("write");

        // Assert
        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "date,mle,lower,upper,status,error");
        assert_eq!(lines[1], "2020-02-10,0.05,0.03,0.08,ok,");
        assert!(lines[2].starts_with("2020-02-12,,,,failed,"));
        assert!(lines[2].contains("not identifiable"));
    }

    #[test]
    // Purpose
    // -------
    // The delay-fit row carries parameters and summaries; files are
    // created under missing parent directories.
    //
    // Given
    // -----
    // - A fit of gamma(4, 0.8) without standard errors, written to
    //   `<tmp>/output/delay_fit.csv`.
    //
    // Expect
    // ------
    // - Two lines; the data row starts with `4.0,0.8,,,` (no standard
    //   errors).
    fn delay_fit_file() {
        // Arrange
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("output").join(DELAY_FIT_FILE);
        let fit = DelayFit {
            distribution: DelayDistribution::from_shape_rate(4.0, 0.8).expect("valid"),
            log_likelihood: -120.5,
            iterations: 9,
            converged: true,
            status: "SolverConverged".to_string(),
            n_samples: 50,
            n_zero: 2,
            shape_se: None,
            rate_se: None,
        };

        // Act
        write_file(&path, |file, p| write_delay_fit(file, &fit, p)).expect("write");

        // Assert
        let text = fs::read_to_string(&path).expect("read back");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("shape,rate,shape_se,rate_se,mean,median,sd"));
        assert!(lines[1].starts_with("4.0,0.8,,,"));
    }
}
