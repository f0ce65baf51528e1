//! Outbreak snapshots and the per-snapshot likelihood payload.
//!
//! Purpose
//! -------
//! Represent one report date's view of an outbreak as sparse daily records
//! and turn it into the dense onset/death series the estimator consumes.
//!
//! Key behaviors
//! -------------
//! - [`OutbreakSnapshot::new`] validates that records exist and that day
//!   indices strictly increase.
//! - [`OutbreakSnapshot::dense_series`] zero-fills gaps between day indices.
//! - [`CfrData::new`] validates the dense `f64` series (equal length,
//!   non-empty, finite, nonnegative).
//!
//! Invariants & assumptions
//! ------------------------
//! - Day index 0 is `begin_date`. A snapshot spans
//!   `last_day_index + 1` days.
//! - Snapshots and payloads are immutable once built.
use chrono::{Days, NaiveDate};
use ndarray::Array1;

use crate::cfr::errors::{CfrError, CfrResult};

/// Counts reported for one day of a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyRecord {
    /// Days since the snapshot's `begin_date`.
    pub day_index: u32,
    pub cases_onset: u64,
    pub deaths_observed: u64,
}

impl DailyRecord {
    pub fn new(day_index: u32, cases_onset: u64, deaths_observed: u64) -> Self {
        Self { day_index, cases_onset, deaths_observed }
    }
}

/// Onset and death counts known on `report_date`.
#[derive(Debug, Clone, PartialEq)]
pub struct OutbreakSnapshot {
    report_date: NaiveDate,
    begin_date: NaiveDate,
    records: Vec<DailyRecord>,
}

impl OutbreakSnapshot {
    /// # Errors
    /// - [`CfrError::EmptySeries`] when `records` is empty.
    /// - [`CfrError::NonIncreasingDayIndex`] at the first out-of-order record.
    pub fn new(
        report_date: NaiveDate, begin_date: NaiveDate, records: Vec<DailyRecord>,
    ) -> CfrResult<Self> {
        if records.is_empty() {
            return Err(CfrError::EmptySeries);
        }
        for (position, pair) in records.windows(2).enumerate() {
            if pair[1].day_index <= pair[0].day_index {
                return Err(CfrError::NonIncreasingDayIndex {
                    position: position + 1,
                    previous: pair[0].day_index,
                    found: pair[1].day_index,
                });
            }
        }
        Ok(Self { report_date, begin_date, records })
    }

    pub fn report_date(&self) -> NaiveDate {
        self.report_date
    }

    pub fn begin_date(&self) -> NaiveDate {
        self.begin_date
    }

    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    /// Length of the dense series.
    pub fn n_days(&self) -> usize {
        self.records.last().map_or(0, |r| r.day_index as usize + 1)
    }

    /// Calendar date of a day index.
    pub fn date_of(&self, day_index: u32) -> Option<NaiveDate> {
        self.begin_date.checked_add_days(Days::new(u64::from(day_index)))
    }

    /// Totals are summed as `f64`, the scale the estimator works on, so
    /// they cannot overflow.
    pub fn total_onsets(&self) -> f64 {
        self.records.iter().map(|r| r.cases_onset as f64).sum()
    }

    pub fn total_deaths(&self) -> f64 {
        self.records.iter().map(|r| r.deaths_observed as f64).sum()
    }

    /// Dense `(onsets, deaths)` over `0..n_days`, zero on missing days.
    pub fn dense_series(&self) -> (Array1<f64>, Array1<f64>) {
        let n = self.n_days();
        let mut onsets = Array1::<f64>::zeros(n);
        let mut deaths = Array1::<f64>::zeros(n);
        for r in &self.records {
            onsets[r.day_index as usize] = r.cases_onset as f64;
            deaths[r.day_index as usize] = r.deaths_observed as f64;
        }
        (onsets, deaths)
    }

    /// Validated likelihood payload for this snapshot.
    pub fn to_data(&self) -> CfrResult<CfrData> {
        let (onsets, deaths) = self.dense_series();
        CfrData::new(onsets, deaths)
    }
}

/// Dense daily series passed to the CFR likelihood.
#[derive(Debug, Clone, PartialEq)]
pub struct CfrData {
    onsets: Array1<f64>,
    deaths: Array1<f64>,
}

impl CfrData {
    /// # Errors
    /// - [`CfrError::EmptySeries`] / [`CfrError::LengthMismatch`].
    /// - [`CfrError::NonFiniteCount`] / [`CfrError::NegativeCount`] for the
    ///   first offending day, onsets checked before deaths.
    pub fn new(onsets: Array1<f64>, deaths: Array1<f64>) -> CfrResult<Self> {
        if onsets.len() != deaths.len() {
            return Err(CfrError::LengthMismatch { onsets: onsets.len(), deaths: deaths.len() });
        }
        if onsets.is_empty() {
            return Err(CfrError::EmptySeries);
        }
        validate_counts("onset", &onsets)?;
        validate_counts("death", &deaths)?;
        Ok(Self { onsets, deaths })
    }

    pub fn onsets(&self) -> &Array1<f64> {
        &self.onsets
    }

    pub fn deaths(&self) -> &Array1<f64> {
        &self.deaths
    }

    pub fn len(&self) -> usize {
        self.onsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.onsets.is_empty()
    }

    pub fn total_onsets(&self) -> f64 {
        self.onsets.sum()
    }

    pub fn total_deaths(&self) -> f64 {
        self.deaths.sum()
    }
}

/// Every count finite and `≥ 0`.
pub fn validate_counts(series: &'static str, counts: &Array1<f64>) -> CfrResult<()> {
    for (index, &value) in counts.iter().enumerate() {
        if !value.is_finite() {
            return Err(CfrError::NonFiniteCount { series, index, value });
        }
        if value < 0.0 {
            return Err(CfrError::NegativeCount { series, index, value });
        }
    }
    Ok(())
}
