#![deny(missing_docs)]

//! Ancestor tracing over the mother/daughter graph of one collision event.
//!
//! [`ParticleHistoryGraph`] answers structural questions about a borrowed
//! [`tp_core::Event`]: whether one particle descends from another, which
//! particles a parton fragmented into, and which outgoing parton carries
//! most of a hard-scattering leg's transverse momentum. Malformed records
//! never cause a panic or an error; queries degrade to `false`, an empty
//! list or `None` and log through `tracing`.

mod ancestry;
mod daughters;
mod graph;
mod leading;

pub use ancestry::{is_ancestor, AncestryOutcome, HistoryFault};
pub use graph::ParticleHistoryGraph;
