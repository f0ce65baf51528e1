//! Snapshot loader: one CSV per report date.
//!
//! Each file has columns `date,cases,deaths` (daily onsets and deaths) and
//! a report date embedded in its name as the first 8-digit run that is a
//! valid `YYYYMMDD` date, e.g. `situation_20200215.csv`. The earliest row date becomes the
//! snapshot's `begin_date`; `day_index = date − begin_date`.
use std::{
    fs::{self, File},
    io::Read,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use chrono::NaiveDate;
use log::{debug, info};
use regex::Regex;
use serde::Deserialize;

use crate::{
    cfr::{
        data::{DailyRecord, OutbreakSnapshot},
        errors::CfrError,
    },
    io::errors::{IoError, IoResult},
};

static REPORT_DATE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"\d{8}"));

#[derive(Debug, Deserialize)]
struct SnapshotRow {
    date: NaiveDate,
    cases: u64,
    deaths: u64,
}

/// Report date encoded in a file name: the first 8-digit run that parses
/// as `YYYYMMDD`, if any.
pub fn report_date_from_name(name: &str) -> Option<NaiveDate> {
    let re = REPORT_DATE.as_ref().ok()?;
    re.find_iter(name).find_map(|m| NaiveDate::parse_from_str(m.as_str(), "%Y%m%d").ok())
}

/// Read one snapshot file.
///
/// # Errors
/// - [`IoError::MissingReportDate`] if the file name has no valid date.
/// - [`IoError::File`] / [`IoError::Csv`] for unreadable or malformed
///   files, including negative or fractional counts.
/// - [`IoError::Snapshot`] for an empty table or repeated dates.
pub fn read_snapshot(path: &Path) -> IoResult<OutbreakSnapshot> {
    let report_date = path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(report_date_from_name)
        .ok_or_else(|| IoError::MissingReportDate { path: path.to_path_buf() })?;
    let file = File::open(path).map_err(|e| IoError::file(path, e))?;
    let snapshot = parse_snapshot(file, report_date, path)?;
    debug!(
        "Loaded snapshot {report_date} from {}: {} days",
        path.display(),
        snapshot.n_days()
    );
    Ok(snapshot)
}

/// Parse snapshot CSV from any reader; `path` only labels errors.
pub fn parse_snapshot<R: Read>(
    reader: R, report_date: NaiveDate, path: &Path,
) -> IoResult<OutbreakSnapshot> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut rows = reader
        .deserialize()
        .collect::<Result<Vec<SnapshotRow>, _>>()
        .map_err(|e| IoError::csv(path, e))?;
    rows.sort_by_key(|r| r.date);
    let wrap = |source: CfrError| IoError::Snapshot { path: path.to_path_buf(), source };
    let begin_date = rows.first().map(|r| r.date).ok_or_else(|| wrap(CfrError::EmptySeries))?;
    let records = rows
        .iter()
        .map(|r| {
            let day_index = r.date.signed_duration_since(begin_date).num_days() as u32;
            DailyRecord::new(day_index, r.cases, r.deaths)
        })
        .collect();
    OutbreakSnapshot::new(report_date, begin_date, records).map_err(wrap)
}

/// Read every `*.csv` in `dir`, sorted by report date ascending.
///
/// # Errors
/// - [`IoError::NoSnapshots`] when the directory holds no CSV files.
/// - Any per-file error from [`read_snapshot`].
pub fn read_snapshot_dir(dir: &Path) -> IoResult<Vec<OutbreakSnapshot>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(|e| IoError::file(dir, e))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")))
        .collect();
    if paths.is_empty() {
        return Err(IoError::NoSnapshots { dir: dir.to_path_buf() });
    }
    paths.sort();
    let mut snapshots = paths.iter().map(|p| read_snapshot(p)).collect::<IoResult<Vec<_>>>()?;
    snapshots.sort_by_key(|s| s.report_date());
    info!("Loaded {} snapshots from {}", snapshots.len(), dir.display());
    Ok(snapshots)
}
