//! Run configuration read from `cfr.toml` in the input root.
//!
//! Every key is optional. Unknown keys and invalid values are
//! configuration errors, so a typo never silently falls back to a default.
//!
//! ```toml
//! linelist_file = "linelist.csv"
//! snapshot_dir = "snapshots"
//! output_dir = "output"
//! level = 0.95
//! interval_method = "profile"   # or "wald"
//! search_lower = -100.0
//! search_upper = 100.0
//! failure_policy = "abort"      # or "record"
//! ```
use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    cfr::{options::CfrOptions, snapshots::FailurePolicy},
    inference::interval::IntervalMethod,
    io::errors::{IoError, IoResult},
    optimization::scalar_optimizer::ScalarOptions,
};

/// Name of the configuration file inside the input root.
pub const CONFIG_FILE: &str = "cfr.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub linelist_file: String,
    pub snapshot_dir: String,
    pub output_dir: String,
    pub level: f64,
    pub interval_method: IntervalMethod,
    /// Search bounds on `logit(cfr)`.
    pub search_lower: f64,
    pub search_upper: f64,
    pub failure_policy: FailurePolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        let search = ScalarOptions::default();
        Self {
            linelist_file: "linelist.csv".to_string(),
            snapshot_dir: "snapshots".to_string(),
            output_dir: "output".to_string(),
            level: 0.95,
            interval_method: IntervalMethod::Profile,
            search_lower: search.lower,
            search_upper: search.upper,
            failure_policy: FailurePolicy::Abort,
        }
    }
}

impl RunConfig {
    /// Read `<root>/cfr.toml`, or the defaults when the file is absent.
    ///
    /// # Errors
    /// [`IoError::File`] if the file exists but cannot be read,
    /// [`IoError::Config`] for unknown keys or invalid values.
    pub fn load(root: &Path) -> IoResult<Self> {
        let path = root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path).map_err(|e| IoError::file(&path, e))?;
        Self::from_toml_str(&content, &path)
    }

    /// Parse and validate a configuration; `path` only labels errors.
    pub fn from_toml_str(content: &str, path: &Path) -> IoResult<Self> {
        let config: RunConfig = toml::from_str(content)
            .map_err(|e| IoError::Config { path: path.to_path_buf(), text: e.to_string() })?;
        config.cfr_options().map_err(|text| IoError::Config { path: path.to_path_buf(), text })?;
        Ok(config)
    }

    /// Estimator options described by this configuration.
    pub fn cfr_options(&self) -> Result<CfrOptions, String> {
        let defaults = ScalarOptions::default();
        let search = ScalarOptions::new(
            self.search_lower,
            self.search_upper,
            defaults.tol_x,
            defaults.max_iter,
        )
        .map_err(|e| e.to_string())?;
        CfrOptions::new(self.level, self.interval_method, search).map_err(|e| e.to_string())
    }

    pub fn linelist_path(&self, root: &Path) -> PathBuf {
        root.join(&self.linelist_file)
    }

    pub fn snapshot_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.snapshot_dir)
    }

    pub fn output_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.output_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Defaults for an absent or empty file.
    // - Partial overrides.
    // - Rejection of unknown keys and invalid values.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Missing keys take their defaults and present keys override them.
    //
    // Given
    // -----
    // - An empty document and one setting the method, level and policy.
    //
    // Expect
    // ------
    // - Defaults for the empty one; overrides applied, other keys default.
    fn partial_files_fill_defaults() {
        // Arrange
        let path = Path::new("cfr.toml");
        let text = "interval_method = \"wald\"\nlevel = 0.9\nfailure_policy = \"record\"\n";

        // Act
        let empty = RunConfig::from_toml_str("", path).expect("empty config");
        let custom = RunConfig::from_toml_str(text, path).expect("valid config");

        // Assert
        assert_eq!(empty, RunConfig::default());
        assert_eq!(custom.interval_method, IntervalMethod::Wald);
        assert_eq!(custom.level, 0.9);
        assert_eq!(custom.failure_policy, FailurePolicy::Record);
        assert_eq!(custom.linelist_file, "linelist.csv");
        assert_eq!(custom.cfr_options().expect("valid").level, 0.9);
    }

    #[test]
    // Purpose
    // -------
    // Typos, unknown enum values and invalid numbers are configuration
    // errors.
    //
    // Given
    // -----
    // - An unknown key, an unknown method, level 1.5, reversed bounds.
    //
    // Expect
    // ------
    // - `IoError::Config` with kind `Configuration` for each.
    fn invalid_documents_are_rejected() {
        // Arrange
        let path = Path::new("cfr.toml");
        let docs = [
            "levle = 0.9",
            "interval_method = \"bootstrap\"",
            "level = 1.5",
            "search_lower = 5.0\nsearch_upper = -5.0",
        ];

        // Act + Assert
        for doc in docs {
            let err = RunConfig::from_toml_str(doc, path).expect_err(doc);
            assert!(matches!(err, IoError::Config { .. }), "{doc}");
            assert_eq!(err.kind(), ErrorKind::Configuration);
        }
    }

    #[test]
    // Purpose
    // -------
    // A root without `cfr.toml` runs on defaults.
    //
    // Given
    // -----
    // - An empty temporary directory.
    //
    // Expect
    // ------
    // - `RunConfig::default()` and paths joined onto the root.
    fn load_without_file_uses_defaults() {
        // Arrange
        let dir = tempfile::tempdir().expect("tempdir");

        // Act
        let config = RunConfig::load(dir.path()).expect("defaults");

        // Assert
        assert_eq!(config, RunConfig::default());
        assert_eq!(config.output_dir(dir.path()), dir.path().join("output"));
    }
}
