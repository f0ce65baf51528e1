//! io — file adapters around the estimation core.
//!
//! Purpose
//! -------
//! Load the line list and the per-report-date snapshot tables, read the
//! optional run configuration, and write the result tables. Nothing here
//! does statistics.
//!
//! Key behaviors
//! -------------
//! - [`linelist`]: `onset_date,death_date` CSV → [`DelaySample`](crate::delay::DelaySample).
//! - [`snapshots`]: `date,cases,deaths` CSVs named by report date →
//!   [`OutbreakSnapshot`](crate::cfr::OutbreakSnapshot)s.
//! - [`report`]: `cfr_estimates.csv` and `delay_fit.csv`.
//! - [`config`]: [`RunConfig`] from `cfr.toml`.
//!
//! Conventions
//! -----------
//! - Dates are ISO `%Y-%m-%d` in tables and `YYYYMMDD` in file names.
//! - Parsers take any `Read` so tests can run without touching disk.
//! - Loading progress and dropped rows are logged at `info`/`warn`.

pub mod config;
pub mod errors;
pub mod linelist;
pub mod report;
pub mod snapshots;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::config::{CONFIG_FILE, RunConfig};
pub use self::errors::{IoError, IoResult};
pub use self::linelist::{LineList, read_linelist};
pub use self::report::{
    DELAY_FIT_FILE, ESTIMATES_FILE, write_delay_fit, write_estimates, write_file, write_outcomes,
};
pub use self::snapshots::{read_snapshot, read_snapshot_dir, report_date_from_name};
