use tp_core::Event;

use crate::ancestry::AncestryOutcome;
use crate::graph::ParticleHistoryGraph;

impl<'e> ParticleHistoryGraph<'e> {
    /// Hardest leaf of `view` that descends from `origin`.
    ///
    /// `view` is a companion record of the same event (typically its
    /// parton-level projection, or the event itself) whose `mother1` links
    /// point into this graph's event. Candidates are the entries of `view`
    /// without daughters whose `mother1` traces back to `origin`; the one
    /// with the largest transverse momentum is returned, the earliest entry
    /// winning ties.
    ///
    /// A corrupt history is reported once per query, however many
    /// candidates run into it.
    pub fn leading_outgoing_daughter(&self, view: &Event, origin: usize) -> Option<usize> {
        let mut leading: Option<(usize, f64)> = None;
        let mut corrupt = 0usize;
        let mut first_fault = None;
        for (index, entry) in view.iter() {
            if entry.has_daughter() || entry.mother1 == 0 {
                continue;
            }
            match self.walk(entry.mother1, origin) {
                AncestryOutcome::Found { .. } => {}
                AncestryOutcome::Malformed(fault) if fault.is_corrupt_record() => {
                    corrupt += 1;
                    if first_fault.is_none() {
                        first_fault = Some(fault);
                    }
                    continue;
                }
                _ => continue,
            }
            let pt = entry.pt();
            if leading.map_or(true, |(_, best)| pt > best) {
                leading = Some((index, pt));
            }
        }
        if let Some(fault) = first_fault {
            tracing::warn!(
                event = ?self.event().number,
                origin,
                candidates = corrupt,
                code = fault.code(),
                "malformed particle history: {fault}"
            );
        }
        leading.map(|(index, _)| index)
    }
}
