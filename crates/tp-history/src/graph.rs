use tp_core::Event;

/// Read-only view over one event's mother/daughter graph.
///
/// The view borrows the event for the duration of the analysis step and
/// holds no other state, so every query is a pure function of the record.
#[derive(Debug, Clone, Copy)]
pub struct ParticleHistoryGraph<'e> {
    event: &'e Event,
}

impl<'e> ParticleHistoryGraph<'e> {
    /// Wraps an event record.
    pub fn new(event: &'e Event) -> Self {
        Self { event }
    }

    /// Returns the underlying event.
    pub fn event(&self) -> &'e Event {
        self.event
    }

    /// Number of particles in the record.
    pub fn len(&self) -> usize {
        self.event.len()
    }

    /// Whether the record is empty.
    pub fn is_empty(&self) -> bool {
        self.event.is_empty()
    }

    /// Whether the particle at `index` has `mother1` equal to `mother`.
    pub(crate) fn shares_mother1(&self, index: usize, mother: usize) -> bool {
        self.event
            .get(index)
            .is_some_and(|particle| particle.mother1 == mother)
    }
}
