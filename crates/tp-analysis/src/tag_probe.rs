//! Tag/probe assignment of the two outgoing hard-scattering legs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tp_core::{Event, Flavour, Particle};
use tp_history::ParticleHistoryGraph;

use crate::config::AnalysisConfig;
use crate::runner::{Accumulator, Analysis, EventVerdict};
use crate::source::EventRecord;

/// Skip code: a configured leg position is not in the record.
pub const SKIP_MISSING_LEG: &str = "missing-leg";
/// Skip code: no leaf of the chosen view descends from a leg.
pub const SKIP_NO_OUTGOING_DAUGHTER: &str = "no-outgoing-daughter";
/// Skip code: both legs resolve to the same outgoing entry.
pub const SKIP_SHARED_DAUGHTER: &str = "shared-outgoing-daughter";
/// Skip code: a leg's outgoing daughter fails the pT threshold.
pub const SKIP_BELOW_MIN_PT: &str = "below-min-leg-pt";
/// Skip code: the tag has no transverse momentum to normalise the balance.
pub const SKIP_ZERO_TAG_PT: &str = "zero-tag-pt";

/// One hard leg matched to its leading outgoing daughter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLeg {
    /// Position of the hard leg in the full record.
    pub leg: usize,
    /// Flavour of the hard leg.
    pub flavour: Flavour,
    /// Position of the leading outgoing daughter in the resolution view.
    pub outgoing: usize,
    /// Transverse momentum of the outgoing daughter.
    pub pt: f64,
}

/// Legs ordered as reference (tag) and object of study (probe).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TagProbePair {
    /// Reference leg.
    pub tag: ResolvedLeg,
    /// Studied leg.
    pub probe: ResolvedLeg,
}

impl TagProbePair {
    /// Probe-to-tag transverse momentum ratio.
    pub fn balance(&self) -> f64 {
        self.probe.pt / self.tag.pt
    }

    /// Tally key such as `photon:gluon`.
    pub fn key(&self) -> String {
        format!("{}:{}", self.tag.flavour.as_str(), self.probe.flavour.as_str())
    }
}

/// Weighted counts for one tag/probe flavour combination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PairTally {
    /// Number of events.
    pub events: usize,
    /// Sum of event weights.
    pub sum_weights: f64,
    /// Sum of weight times probe/tag pT balance.
    pub sum_weighted_balance: f64,
}

impl PairTally {
    /// Weighted mean of the pT balance.
    pub fn mean_balance(&self) -> Option<f64> {
        (self.sum_weights != 0.0).then(|| self.sum_weighted_balance / self.sum_weights)
    }

    fn merge(&mut self, other: &PairTally) {
        self.events += other.events;
        self.sum_weights += other.sum_weights;
        self.sum_weighted_balance += other.sum_weighted_balance;
    }
}

/// Accumulated tag/probe results keyed by flavour combination.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagProbeTally {
    /// Per-combination tallies.
    pub pairs: BTreeMap<String, PairTally>,
}

impl TagProbeTally {
    /// Adds one accepted event.
    pub fn record(&mut self, pair: &TagProbePair, weight: f64) {
        let entry = self.pairs.entry(pair.key()).or_default();
        entry.events += 1;
        entry.sum_weights += weight;
        entry.sum_weighted_balance += weight * pair.balance();
    }

    /// Events across all combinations.
    pub fn total_events(&self) -> usize {
        self.pairs.values().map(|tally| tally.events).sum()
    }
}

impl Accumulator for TagProbeTally {
    fn merge(&mut self, other: Self) {
        for (key, tally) in other.pairs {
            self.pairs.entry(key).or_default().merge(&tally);
        }
    }
}

/// Resolves both hard legs and assigns tag and probe.
#[derive(Debug, Clone)]
pub struct TagProbeAnalysis {
    hard_legs: [usize; 2],
    min_leg_pt: f64,
    use_parton_view: bool,
}

impl TagProbeAnalysis {
    /// Builds the analysis from a validated configuration.
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            hard_legs: config.hard_legs,
            min_leg_pt: config.min_leg_pt,
            use_parton_view: config.use_parton_view,
        }
    }

    /// Resolves the legs of one record, or returns the skip code.
    ///
    /// A single photon leg is always the tag; otherwise the leg with the
    /// harder outgoing daughter is, the first configured leg winning ties.
    pub fn resolve(&self, record: &EventRecord) -> Result<TagProbePair, &'static str> {
        let view = match (&record.partons, self.use_parton_view) {
            (Some(partons), true) => partons,
            _ => &record.event,
        };
        let graph = ParticleHistoryGraph::new(&record.event);
        let [first, second] = self.hard_legs;
        let first = self.resolve_leg(&graph, view, first)?;
        let second = self.resolve_leg(&graph, view, second)?;
        if first.outgoing == second.outgoing {
            return Err(SKIP_SHARED_DAUGHTER);
        }
        if first.pt < self.min_leg_pt || second.pt < self.min_leg_pt {
            return Err(SKIP_BELOW_MIN_PT);
        }

        let first_photon = first.flavour == Flavour::Photon;
        let second_photon = second.flavour == Flavour::Photon;
        let (tag, probe) = match (first_photon, second_photon) {
            (true, false) => (first, second),
            (false, true) => (second, first),
            _ if second.pt > first.pt => (second, first),
            _ => (first, second),
        };
        if tag.pt <= 0.0 {
            return Err(SKIP_ZERO_TAG_PT);
        }
        Ok(TagProbePair { tag, probe })
    }

    fn resolve_leg(
        &self,
        graph: &ParticleHistoryGraph<'_>,
        view: &Event,
        leg: usize,
    ) -> Result<ResolvedLeg, &'static str> {
        let particle = graph.event().get(leg).ok_or(SKIP_MISSING_LEG)?;
        let outgoing = graph
            .leading_outgoing_daughter(view, leg)
            .ok_or(SKIP_NO_OUTGOING_DAUGHTER)?;
        let pt = view.get(outgoing).map_or(0.0, Particle::pt);
        Ok(ResolvedLeg {
            leg,
            flavour: particle.flavour(),
            outgoing,
            pt,
        })
    }
}

impl Analysis for TagProbeAnalysis {
    type Acc = TagProbeTally;

    fn name(&self) -> &str {
        "tag-probe"
    }

    fn analyze(&self, record: &EventRecord, acc: &mut TagProbeTally) -> EventVerdict {
        match self.resolve(record) {
            Ok(pair) => {
                acc.record(&pair, record.event.weight);
                EventVerdict::Analyzed
            }
            Err(reason) => {
                tracing::debug!(event = ?record.event.number, reason, "event skipped");
                EventVerdict::Skipped(reason)
            }
        }
    }
}
