//! YAML configuration of an analysis run.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tp_core::{ErrorInfo, TpError};

/// YAML-configurable parameters of a tag/probe analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Record positions of the two outgoing hard-scattering legs.
    #[serde(default = "default_hard_legs")]
    pub hard_legs: [usize; 2],
    /// Minimum transverse momentum of each leg's leading outgoing daughter.
    #[serde(default)]
    pub min_leg_pt: f64,
    /// Resolve legs in the parton-level view when the record carries one.
    #[serde(default = "default_use_parton_view")]
    pub use_parton_view: bool,
    /// Event loop settings.
    #[serde(default)]
    pub runner: RunnerConfig,
}

fn default_hard_legs() -> [usize; 2] {
    [5, 6]
}

fn default_use_parton_view() -> bool {
    true
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            hard_legs: default_hard_legs(),
            min_leg_pt: 0.0,
            use_parton_view: default_use_parton_view(),
            runner: RunnerConfig::default(),
        }
    }
}

/// Event loop settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Worker threads; `1` runs inline, `0` lets rayon choose.
    #[serde(default = "default_threads")]
    pub threads: usize,
    /// Number of records pulled from the source per batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_threads() -> usize {
    1
}

fn default_batch_size() -> usize {
    1024
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            batch_size: default_batch_size(),
        }
    }
}

impl AnalysisConfig {
    /// Loads and validates a configuration file.
    pub fn load(path: &Path) -> Result<Self, TpError> {
        let text = fs::read_to_string(path).map_err(|err| {
            TpError::Io(
                ErrorInfo::new("read-config", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        Self::from_yaml_str(&text).map_err(|err| match err {
            TpError::Config(info) => {
                TpError::Config(info.with_context("path", path.display().to_string()))
            }
            other => other,
        })
    }

    /// Parses and validates a YAML document.
    pub fn from_yaml_str(text: &str) -> Result<Self, TpError> {
        let config: Self = serde_yaml::from_str(text)
            .map_err(|err| TpError::Config(ErrorInfo::new("parse-config", err.to_string())))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), TpError> {
        let [first, second] = self.hard_legs;
        if first == 0 || second == 0 || first == second {
            return Err(TpError::Config(
                ErrorInfo::new("hard-legs", "hard legs must be two distinct nonzero positions")
                    .with_context("first", first.to_string())
                    .with_context("second", second.to_string())
                    .with_hint("positions are 1-based, e.g. [5, 6]"),
            ));
        }
        if !self.min_leg_pt.is_finite() || self.min_leg_pt < 0.0 {
            return Err(TpError::Config(
                ErrorInfo::new("min-leg-pt", "minimum leg pT must be finite and non-negative")
                    .with_context("value", self.min_leg_pt.to_string()),
            ));
        }
        if self.runner.batch_size == 0 {
            return Err(TpError::Config(ErrorInfo::new(
                "batch-size",
                "batch size must be positive",
            )));
        }
        Ok(())
    }
}
