//! Line-list loader: individual onset and death dates → delay sample.
//!
//! Expected columns `onset_date,death_date` with ISO dates. Rows where
//! either date is missing or unparsable are dropped and counted. The
//! delay is `death − onset` in days; negative delays are kept so the fit
//! can report them.
use std::{fs::File, io::Read, path::Path};

use chrono::NaiveDate;
use log::{info, warn};
use serde::Deserialize;

use crate::{
    delay::DelaySample,
    io::errors::{IoError, IoResult},
};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

const REQUIRED_COLUMNS: [&str; 2] = ["onset_date", "death_date"];

#[derive(Debug, Deserialize)]
struct LineListRow {
    onset_date: Option<String>,
    death_date: Option<String>,
}

/// Parsed line list.
#[derive(Debug, Clone, PartialEq)]
pub struct LineList {
    /// `(onset, death)` for every usable row, in file order.
    pub pairs: Vec<(NaiveDate, NaiveDate)>,
    /// Rows dropped for a missing or unparsable date.
    pub dropped: usize,
}

impl LineList {
    pub fn to_sample(&self) -> DelaySample {
        DelaySample::from_date_pairs(&self.pairs)
    }
}

/// Read a line-list CSV file.
///
/// # Errors
/// [`IoError::File`] if the file cannot be opened, [`IoError::Csv`] for
/// malformed CSV (e.g., missing columns).
pub fn read_linelist(path: &Path) -> IoResult<LineList> {
    let file = File::open(path).map_err(|e| IoError::file(path, e))?;
    let list = parse_linelist(file, path)?;
    info!("Loaded {} delays from {}", list.pairs.len(), path.display());
    if list.dropped > 0 {
        warn!("Dropped {} line-list rows with missing or invalid dates", list.dropped);
    }
    Ok(list)
}

/// Parse line-list CSV from any reader; `path` only labels errors.
pub fn parse_linelist<R: Read>(reader: R, path: &Path) -> IoResult<LineList> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = reader.headers().map_err(|e| IoError::csv(path, e))?;
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(IoError::Csv {
                path: path.to_path_buf(),
                text: format!("missing column `{column}`"),
            });
        }
    }
    let mut pairs = Vec::new();
    let mut dropped = 0;
    for row in reader.deserialize() {
        let row: LineListRow = row.map_err(|e| IoError::csv(path, e))?;
        match (parse_date(row.onset_date.as_deref()), parse_date(row.death_date.as_deref())) {
            (Some(onset), Some(death)) => pairs.push((onset, death)),
            _ => dropped += 1,
        }
    }
    Ok(LineList { pairs, dropped })
}

fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw?.trim(), DATE_FORMAT).ok()
}
