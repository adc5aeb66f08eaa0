//! Filtering options for solution assembly.

use std::path::Path;

use rf_core::ensure_non_negative;
use serde::{Deserialize, Serialize};

use crate::error::{WellError, WellResult};

/// Completions with `|rate|` below this are dropped, m³/s.
pub const DEFAULT_RATE_THRESHOLD: f64 = 1e-14;

/// Options applied when merging grid well tables.
///
/// Loadable from YAML; missing fields take their defaults:
///
/// ```
/// use rf_wells::SolutionOptions;
///
/// let opts = SolutionOptions::from_yaml_str("disallow_crossflow: false").unwrap();
/// assert_eq!(opts.rate_threshold, 1e-14);
/// assert!(!opts.disallow_crossflow);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolutionOptions {
    /// Completions with `|rate| < rate_threshold` are dropped.
    pub rate_threshold: f64,
    /// Drop completions whose flow direction disagrees with the well type.
    pub disallow_crossflow: bool,
}

impl Default for SolutionOptions {
    fn default() -> Self {
        Self {
            rate_threshold: DEFAULT_RATE_THRESHOLD,
            disallow_crossflow: true,
        }
    }
}

impl SolutionOptions {
    pub fn new(rate_threshold: f64, disallow_crossflow: bool) -> Self {
        Self {
            rate_threshold,
            disallow_crossflow,
        }
    }

    pub fn validate(&self) -> WellResult<()> {
        ensure_non_negative(self.rate_threshold, "rate_threshold")?;
        Ok(())
    }

    pub fn from_yaml_str(text: &str) -> WellResult<Self> {
        let opts: Self = serde_yaml::from_str(text).map_err(|e| WellError::Config {
            message: e.to_string(),
        })?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn load(path: &Path) -> WellResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| WellError::Config {
            message: format!("failed to read {}: {e}", path.display()),
        })?;
        Self::from_yaml_str(&text)
    }
}
