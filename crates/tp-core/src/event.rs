use serde::{Deserialize, Serialize};

use crate::particle::Particle;

fn default_weight() -> f64 {
    1.0
}

/// Ordered particle record of one collision event.
///
/// Entries are addressed 1-based so that mother and daughter links can use
/// `0` as the "no particle" sentinel. The sentinel slot itself is not stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Event number carried from the input record, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u64>,
    /// Event weight.
    #[serde(default = "default_weight")]
    pub weight: f64,
    particles: Vec<Particle>,
}

impl Event {
    /// Creates a unit-weight event from particles in record order.
    pub fn new(particles: Vec<Particle>) -> Self {
        Self {
            number: None,
            weight: default_weight(),
            particles,
        }
    }

    /// Sets the event number.
    pub fn with_number(mut self, number: u64) -> Self {
        self.number = Some(number);
        self
    }

    /// Sets the event weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Number of stored particles; valid indices are `1..=len`.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the record holds no particles.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Whether `index` addresses a stored particle.
    pub fn contains(&self, index: usize) -> bool {
        index != 0 && index <= self.particles.len()
    }

    /// Returns the particle at the 1-based `index`.
    pub fn get(&self, index: usize) -> Option<&Particle> {
        index
            .checked_sub(1)
            .and_then(|slot| self.particles.get(slot))
    }

    /// Particles in record order.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Iterates over `(index, particle)` pairs with 1-based indices.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Particle)> + '_ {
        self.particles
            .iter()
            .enumerate()
            .map(|(slot, particle)| (slot + 1, particle))
    }
}

impl FromIterator<Particle> for Event {
    fn from_iter<T: IntoIterator<Item = Particle>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
