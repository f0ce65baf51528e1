//! Crate-wide error taxonomy.
//!
//! Every module keeps its own error enum (`DelayError`, `CfrError`,
//! `OptError`, `InferenceError`, `IoError`). This module only defines the
//! coarse classification those enums report through their `kind()` methods,
//! so callers can branch on the *category* of a failure without matching on
//! individual variants.

/// Coarse failure category shared by all module error types.
///
/// - `Domain`: a numeric input is outside its admissible domain (negative
///   delay or count, CFR outside `[0, 1]`, non-finite values, length
///   mismatches).
/// - `InsufficientData`: too few (or degenerate) observations to fit.
/// - `FitConvergence`: the optimizer did not converge, or the objective is
///   degenerate (e.g., an unidentifiable CFR).
/// - `Configuration`: an option value (tolerance, confidence level, search
///   bounds) is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Domain,
    InsufficientData,
    FitConvergence,
    Configuration,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::Domain => write!(f, "domain error"),
            ErrorKind::InsufficientData => write!(f, "insufficient data"),
            ErrorKind::FitConvergence => write!(f, "fit did not converge"),
            ErrorKind::Configuration => write!(f, "invalid configuration"),
        }
    }
}
