//! Run summaries and SHA-256 provenance.

use std::collections::BTreeMap;
use std::fs::File;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tp_core::{ErrorInfo, RunProvenance, SchemaVersion, TpError};

use crate::runner::RunOutcome;

/// Schema version written into every run summary.
pub const SUMMARY_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// Serializable record of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary<T> {
    /// Summary schema version.
    pub schema_version: SchemaVersion,
    /// Analysis name.
    pub analysis: String,
    /// Records pulled from the input.
    pub events_read: usize,
    /// Records that passed every selection.
    pub events_analyzed: usize,
    /// Skipped records per reason code.
    pub skipped: BTreeMap<String, usize>,
    /// Analysis-specific results.
    pub results: T,
    /// Input and configuration fingerprints.
    pub provenance: RunProvenance,
}

impl<T> RunSummary<T> {
    /// Packages a finished run.
    pub fn from_outcome(analysis: &str, outcome: RunOutcome<T>, provenance: RunProvenance) -> Self {
        Self {
            schema_version: SUMMARY_SCHEMA,
            analysis: analysis.to_string(),
            events_read: outcome.events_read,
            events_analyzed: outcome.events_analyzed,
            skipped: outcome.skipped,
            results: outcome.accumulator,
            provenance,
        }
    }
}

/// Hex-encoded SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Hex-encoded SHA-256 of a file's contents, streamed.
pub fn sha256_file(path: &Path) -> Result<String, TpError> {
    let io_error = |code: &str, err: io::Error| {
        TpError::Io(
            ErrorInfo::new(code, err.to_string()).with_context("path", path.display().to_string()),
        )
    };
    let mut file = File::open(path).map_err(|err| io_error("open-input", err))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(|err| io_error("hash-input", err))?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// Provenance for a run over `input_hash` with the given serialized configuration.
pub fn provenance(input_hash: String, config_text: &str) -> RunProvenance {
    let mut tool_versions = BTreeMap::new();
    tool_versions.insert(
        env!("CARGO_PKG_NAME").to_string(),
        env!("CARGO_PKG_VERSION").to_string(),
    );
    RunProvenance {
        input_hash,
        config_hash: sha256_hex(config_text.as_bytes()),
        tool_versions,
    }
}
