#![deny(missing_docs)]
#![doc = "Per-event analysis runner and the tag/probe driver built on particle history tracing."]

pub mod config;
pub mod runner;
pub mod source;
pub mod summary;
pub mod tag_probe;

pub use config::{AnalysisConfig, RunnerConfig};
pub use runner::{Accumulator, Analysis, EventVerdict, RunOutcome, Runner};
pub use source::{record_to_json_line, EventRecord, EventSource, JsonLinesSource};
pub use summary::{provenance, sha256_file, sha256_hex, RunSummary, SUMMARY_SCHEMA};
pub use tag_probe::{PairTally, ResolvedLeg, TagProbeAnalysis, TagProbePair, TagProbeTally};
