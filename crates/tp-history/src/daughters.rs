use std::collections::{BTreeSet, VecDeque};

use crate::graph::ParticleHistoryGraph;

impl<'e> ParticleHistoryGraph<'e> {
    /// Direct daughters of `index` following the record's range convention.
    ///
    /// `d2 > d1` denotes the contiguous range `d1..=d2`, `d2 < d1` two
    /// separate daughters, and a single nonzero link one daughter. Links
    /// pointing outside the record are dropped.
    pub fn daughter_list(&self, index: usize) -> Vec<usize> {
        let Some(particle) = self.event().get(index) else {
            return Vec::new();
        };
        let (d1, d2) = (particle.daughter1, particle.daughter2);
        let raw: Vec<usize> = match (d1, d2) {
            (0, 0) => Vec::new(),
            (d, 0) | (0, d) => vec![d],
            (a, b) if a == b => vec![a],
            (a, b) if b > a => (a..=b.min(self.len().max(a))).collect(),
            (a, b) => vec![a, b],
        };
        self.retain_in_range(index, raw, d2, "daughter")
    }

    /// Direct mothers of `index`.
    ///
    /// Hadronization products with `m1 < m2` list every string endpoint in
    /// `m1..=m2`; other two-mother entries list both links.
    pub fn mother_list(&self, index: usize) -> Vec<usize> {
        let Some(particle) = self.event().get(index) else {
            return Vec::new();
        };
        let (m1, m2) = (particle.mother1, particle.mother2);
        let raw: Vec<usize> = match (m1, m2) {
            (0, 0) => Vec::new(),
            _ if particle.has_unique_mother() => vec![m1],
            (0, m) => vec![m],
            (a, b) if (81..=86).contains(&particle.status_abs()) && a < b => {
                (a..=b.min(self.len().max(a))).collect()
            }
            (a, b) => vec![a, b],
        };
        self.retain_in_range(index, raw, m2, "mother")
    }

    /// Every particle reachable from `start` through daughter links.
    ///
    /// Indices are returned once each in breadth-first discovery order; the
    /// start itself is never included.
    pub fn recursive_daughter_list(&self, start: usize) -> Vec<usize> {
        let mut visited = BTreeSet::new();
        let mut found = Vec::new();
        if !self.event().contains(start) {
            return found;
        }
        visited.insert(start);
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            for daughter in self.daughter_list(current) {
                if visited.insert(daughter) {
                    found.push(daughter);
                    queue.push_back(daughter);
                }
            }
        }
        found
    }

    fn retain_in_range(
        &self,
        index: usize,
        raw: Vec<usize>,
        upper: usize,
        relation: &'static str,
    ) -> Vec<usize> {
        let len = self.len();
        if upper > len || raw.iter().any(|&linked| linked > len) {
            tracing::warn!(
                event = ?self.event().number,
                index,
                relation,
                len,
                "malformed particle history: link outside the record"
            );
        }
        raw.into_iter()
            .filter(|&linked| self.event().contains(linked))
            .collect()
    }
}
