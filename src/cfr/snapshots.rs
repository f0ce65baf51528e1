//! Batch estimation over outbreak snapshots.
//!
//! Purpose
//! -------
//! Run the CFR estimator on each report date's snapshot and collect the
//! dated estimates as a time series.
//!
//! Key behaviors
//! -------------
//! - [`SnapshotProcessor::process_all`]: abort on the first failure and
//!   return it with the offending report date.
//! - [`SnapshotProcessor::process_all_resilient`]: one [`SnapshotOutcome`]
//!   per snapshot, failures included.
//! - With the `parallel` feature the snapshots are estimated with rayon.
//!   Output order and values match the sequential path.
//!
//! Conventions
//! -----------
//! - Output order is input order; callers sort snapshots by report date.
//! - Logs: `debug` per snapshot, `warn` per recorded failure, `info` for
//!   the batch summary.
use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use log::{debug, info, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Deserialize;

use crate::cfr::{
    data::OutbreakSnapshot,
    errors::{CfrError, CfrResult},
    estimator::{CfrEstimate, CfrEstimator},
};

/// What a batch does when one snapshot fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop and return the first failure.
    #[default]
    Abort,
    /// Record the failure and continue.
    Record,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Abort => write!(f, "abort"),
            FailurePolicy::Record => write!(f, "record"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "record" => Ok(FailurePolicy::Record),
            other => Err(format!("unknown failure policy '{other}' (expected abort or record)")),
        }
    }
}

/// Result for one snapshot under [`FailurePolicy::Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum SnapshotOutcome {
    Estimated(CfrEstimate),
    Failed { report_date: NaiveDate, error: CfrError },
}

impl SnapshotOutcome {
    pub fn report_date(&self) -> NaiveDate {
        match self {
            SnapshotOutcome::Estimated(estimate) => estimate.date,
            SnapshotOutcome::Failed { report_date, .. } => *report_date,
        }
    }

    pub fn estimate(&self) -> Option<&CfrEstimate> {
        match self {
            SnapshotOutcome::Estimated(estimate) => Some(estimate),
            SnapshotOutcome::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SnapshotOutcome::Failed { .. })
    }
}

/// Applies one immutable [`CfrEstimator`] to every snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotProcessor {
    estimator: CfrEstimator,
}

impl SnapshotProcessor {
    pub fn new(estimator: CfrEstimator) -> Self {
        Self { estimator }
    }

    pub fn estimator(&self) -> &CfrEstimator {
        &self.estimator
    }

    /// Estimates in input order, stopping at the first failure.
    ///
    /// # Errors
    /// The first failing snapshot's error, wrapped in
    /// [`CfrError::Snapshot`].
    pub fn process_all(&self, snapshots: &[OutbreakSnapshot]) -> CfrResult<Vec<CfrEstimate>> {
        let estimates = self
            .run(snapshots, FailurePolicy::Abort)
            .into_iter()
            .collect::<CfrResult<Vec<_>>>()?;
        info!("Estimated the CFR for {} snapshots", estimates.len());
        Ok(estimates)
    }

    /// One outcome per snapshot in input order.
    pub fn process_all_resilient(&self, snapshots: &[OutbreakSnapshot]) -> Vec<SnapshotOutcome> {
        let outcomes: Vec<SnapshotOutcome> = self
            .run(snapshots, FailurePolicy::Record)
            .into_iter()
            .zip(snapshots)
            .map(|(result, snapshot)| match result {
                Ok(estimate) => SnapshotOutcome::Estimated(estimate),
                Err(error) => {
                    warn!("Snapshot {} failed: {error}", snapshot.report_date());
                    SnapshotOutcome::Failed { report_date: snapshot.report_date(), error }
                }
            })
            .collect();
        let failed = outcomes.iter().filter(|o| o.is_failed()).count();
        info!(
            "Processed {} snapshots: {} estimated, {} failed",
            outcomes.len(),
            outcomes.len() - failed,
            failed
        );
        outcomes
    }

    /// Dispatch on `policy`.
    ///
    /// # Errors
    /// Only under [`FailurePolicy::Abort`], as in [`process_all`](Self::process_all).
    pub fn process(
        &self, snapshots: &[OutbreakSnapshot], policy: FailurePolicy,
    ) -> CfrResult<Vec<SnapshotOutcome>> {
        match policy {
            FailurePolicy::Abort => Ok(self
                .process_all(snapshots)?
                .into_iter()
                .map(SnapshotOutcome::Estimated)
                .collect()),
            FailurePolicy::Record => Ok(self.process_all_resilient(snapshots)),
        }
    }

    // ---- Helper methods ----

    fn estimate_one(&self, snapshot: &OutbreakSnapshot) -> CfrResult<CfrEstimate> {
        let result = self.estimator.estimate_snapshot(snapshot);
        if let Ok(estimate) = &result {
            debug!(
                "Snapshot {}: {} days, mle = {:.5} [{:.5}, {:.5}]",
                estimate.date,
                snapshot.n_days(),
                estimate.mle,
                estimate.lower,
                estimate.upper
            );
        }
        result
    }

    /// Per-snapshot results in input order. The sequential path stops after
    /// the first failure under `Abort`.
    #[cfg(not(feature = "parallel"))]
    fn run(
        &self, snapshots: &[OutbreakSnapshot], policy: FailurePolicy,
    ) -> Vec<CfrResult<CfrEstimate>> {
        let mut results = Vec::with_capacity(snapshots.len());
        for snapshot in snapshots {
            let result = self.estimate_one(snapshot);
            let failed = result.is_err();
            results.push(result);
            if failed && policy == FailurePolicy::Abort {
                break;
            }
        }
        results
    }

    /// Per-snapshot results in input order, estimated in parallel.
    #[cfg(feature = "parallel")]
    fn run(
        &self, snapshots: &[OutbreakSnapshot], _policy: FailurePolicy,
    ) -> Vec<CfrResult<CfrEstimate>> {
        snapshots.par_iter().map(|snapshot| self.estimate_one(snapshot)).collect()
    }
}
