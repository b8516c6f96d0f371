//! Upward walk from a particle towards the root of the generation history.
//!
//! The walk follows the unique mother whenever there is one. At a branch
//! point with two distinct mothers it only continues through the
//! hadronization statuses it can disambiguate:
//!
//! | `abs(status)` | rule |
//! |---------------|------|
//! | 82 | next entry shares `mother1`: follow `mother2`, otherwise `mother1` |
//! | 83 | previous entry shares `mother1`: unresolved, otherwise `mother1` |
//! | 84 | next entry shares `mother1`: unresolved, otherwise `mother1` |
//! | anything else | unresolved |
//!
//! Every walk is bounded by the number of particles in the record, so a
//! cyclic history terminates as malformed instead of looping.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tp_core::{ErrorInfo, Event, Particle, TpError};

use crate::graph::ParticleHistoryGraph;

/// Structural defect found while walking a history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum HistoryFault {
    /// The starting index does not address a particle.
    #[error("start index {index} is not a particle")]
    InvalidStart {
        /// Offending index.
        index: usize,
    },
    /// The candidate ancestor index does not address a particle.
    #[error("candidate index {index} is not a particle")]
    InvalidCandidate {
        /// Offending index.
        index: usize,
    },
    /// A mother link points past the end of the record.
    #[error("particle {index} references mother {mother} outside the record")]
    MotherOutOfRange {
        /// Particle holding the link.
        index: usize,
        /// Referenced mother index.
        mother: usize,
    },
    /// The walk took more steps than there are particles.
    #[error("walk exceeded {limit} steps")]
    StepLimit {
        /// Step bound that was reached.
        limit: usize,
    },
}

impl HistoryFault {
    /// Stable machine readable code.
    pub fn code(&self) -> &'static str {
        match self {
            HistoryFault::InvalidStart { .. } => "invalid-start",
            HistoryFault::InvalidCandidate { .. } => "invalid-candidate",
            HistoryFault::MotherOutOfRange { .. } => "mother-out-of-range",
            HistoryFault::StepLimit { .. } => "step-limit",
        }
    }

    /// Whether the fault reflects a corrupt record rather than a bad query.
    pub fn is_corrupt_record(&self) -> bool {
        matches!(
            self,
            HistoryFault::MotherOutOfRange { .. } | HistoryFault::StepLimit { .. }
        )
    }
}

impl From<HistoryFault> for TpError {
    fn from(fault: HistoryFault) -> Self {
        let info = ErrorInfo::new(fault.code(), fault.to_string());
        let info = match fault {
            HistoryFault::InvalidStart { index } | HistoryFault::InvalidCandidate { index } => {
                info.with_context("index", index.to_string())
            }
            HistoryFault::MotherOutOfRange { index, mother } => info
                .with_context("index", index.to_string())
                .with_context("mother", mother.to_string()),
            HistoryFault::StepLimit { limit } => info.with_context("limit", limit.to_string()),
        };
        TpError::History(info)
    }
}

/// Detailed result of an ancestry query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum AncestryOutcome {
    /// The candidate was reached after `steps` mother hops.
    Found {
        /// Number of hops taken; `0` when the particle is its own candidate.
        steps: usize,
    },
    /// The walk reached the root without meeting the candidate.
    Exhausted,
    /// A two-mother branch point could not be disambiguated.
    Unresolved {
        /// Particle at the branch point.
        index: usize,
        /// Its status magnitude.
        status: u32,
    },
    /// The history or the query is malformed.
    Malformed(HistoryFault),
}

impl AncestryOutcome {
    /// Whether the candidate was found on the walk.
    pub fn is_found(&self) -> bool {
        matches!(self, AncestryOutcome::Found { .. })
    }
}

enum Step {
    Mother(usize),
    Unresolved(u32),
}

impl<'e> ParticleHistoryGraph<'e> {
    /// Whether `candidate` lies on the upward walk from `particle`.
    ///
    /// Returns `false` for every failure mode; use
    /// [`trace_ancestry`](Self::trace_ancestry) to see why.
    pub fn is_ancestor(&self, particle: usize, candidate: usize) -> bool {
        self.trace_ancestry(particle, candidate).is_found()
    }

    /// Walks mother links from `particle` and reports how the walk ended.
    pub fn trace_ancestry(&self, particle: usize, candidate: usize) -> AncestryOutcome {
        let outcome = self.walk(particle, candidate);
        match outcome {
            AncestryOutcome::Malformed(fault) if fault.is_corrupt_record() => {
                tracing::warn!(
                    event = ?self.event().number,
                    particle,
                    candidate,
                    code = fault.code(),
                    "malformed particle history: {fault}"
                );
            }
            AncestryOutcome::Malformed(fault) => {
                tracing::debug!(particle, candidate, code = fault.code(), "invalid ancestry query");
            }
            AncestryOutcome::Unresolved { index, status } => {
                tracing::trace!(particle, candidate, index, status, "unresolved branch point");
            }
            _ => {}
        }
        outcome
    }

    pub(crate) fn walk(&self, particle: usize, candidate: usize) -> AncestryOutcome {
        let event = self.event();
        if !event.contains(particle) {
            return AncestryOutcome::Malformed(HistoryFault::InvalidStart { index: particle });
        }
        if !event.contains(candidate) {
            return AncestryOutcome::Malformed(HistoryFault::InvalidCandidate { index: candidate });
        }

        let limit = event.len();
        let mut current = particle;
        let mut steps = 0;
        loop {
            if current == candidate {
                return AncestryOutcome::Found { steps };
            }
            if steps >= limit {
                return AncestryOutcome::Malformed(HistoryFault::StepLimit { limit });
            }
            let Some(entry) = event.get(current) else {
                return AncestryOutcome::Exhausted;
            };
            let next = match self.step_up(current, entry) {
                Step::Mother(next) => next,
                Step::Unresolved(status) => {
                    return AncestryOutcome::Unresolved {
                        index: current,
                        status,
                    }
                }
            };
            if next == 0 {
                return AncestryOutcome::Exhausted;
            }
            if !event.contains(next) {
                return AncestryOutcome::Malformed(HistoryFault::MotherOutOfRange {
                    index: current,
                    mother: next,
                });
            }
            current = next;
            steps += 1;
        }
    }

    fn step_up(&self, index: usize, entry: &Particle) -> Step {
        let mother1 = entry.mother1;
        if entry.has_unique_mother() {
            return Step::Mother(mother1);
        }
        let status = entry.status_abs();
        match status {
            // Only the first-rank hadron at a string end is attributed to mother1.
            82 if self.shares_mother1(index + 1, mother1) => Step::Mother(entry.mother2),
            82 => Step::Mother(mother1),
            83 if self.shares_mother1(index - 1, mother1) => Step::Unresolved(status),
            83 => Step::Mother(mother1),
            84 if self.shares_mother1(index + 1, mother1) => Step::Unresolved(status),
            84 => Step::Mother(mother1),
            _ => Step::Unresolved(status),
        }
    }
}

/// Ancestry query against an optional event; an absent event is never an ancestor.
pub fn is_ancestor(event: Option<&Event>, particle: usize, candidate: usize) -> bool {
    event.is_some_and(|event| ParticleHistoryGraph::new(event).is_ancestor(particle, candidate))
}
