#![deny(missing_docs)]
#![doc = "Particle record data model and shared error types for tagprobe analyses."]

pub mod errors;
mod event;
mod particle;
pub mod provenance;

pub use errors::{ErrorInfo, TpError};
pub use event::Event;
pub use particle::{Flavour, Particle, StatusClass, GLUON, PHOTON, Z_BOSON};
pub use provenance::{RunProvenance, SchemaVersion};
