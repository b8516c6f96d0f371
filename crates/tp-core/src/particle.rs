use serde::{Deserialize, Serialize};

/// Lower bound applied to transverse quantities before taking logarithms.
const TINY: f64 = 1e-20;

/// PDG code of the gluon.
pub const GLUON: i32 = 21;
/// PDG code of the photon.
pub const PHOTON: i32 = 22;
/// PDG code of the Z boson.
pub const Z_BOSON: i32 = 23;

/// One entry of an event's particle history.
///
/// Mother and daughter references are 1-based positions in the owning
/// [`Event`](crate::Event); `0` means "no such relation".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    /// Signed PDG particle code.
    pub id: i32,
    /// Signed generator status code; positive for final particles.
    pub status: i32,
    /// First mother index.
    #[serde(default)]
    pub mother1: usize,
    /// Second mother index.
    #[serde(default)]
    pub mother2: usize,
    /// First daughter index.
    #[serde(default)]
    pub daughter1: usize,
    /// Second daughter index.
    #[serde(default)]
    pub daughter2: usize,
    /// Momentum x component.
    #[serde(default)]
    pub px: f64,
    /// Momentum y component.
    #[serde(default)]
    pub py: f64,
    /// Momentum z component.
    #[serde(default)]
    pub pz: f64,
    /// Energy.
    #[serde(default)]
    pub e: f64,
    /// Generated mass.
    #[serde(default)]
    pub m: f64,
}

impl Particle {
    /// Creates a particle without history links or momentum.
    pub fn new(id: i32, status: i32) -> Self {
        Self {
            id,
            status,
            mother1: 0,
            mother2: 0,
            daughter1: 0,
            daughter2: 0,
            px: 0.0,
            py: 0.0,
            pz: 0.0,
            e: 0.0,
            m: 0.0,
        }
    }

    /// Sets both mother indices.
    pub fn with_mothers(mut self, mother1: usize, mother2: usize) -> Self {
        self.mother1 = mother1;
        self.mother2 = mother2;
        self
    }

    /// Sets both daughter indices.
    pub fn with_daughters(mut self, daughter1: usize, daughter2: usize) -> Self {
        self.daughter1 = daughter1;
        self.daughter2 = daughter2;
        self
    }

    /// Sets the four-momentum.
    pub fn with_momentum(mut self, px: f64, py: f64, pz: f64, e: f64) -> Self {
        self.px = px;
        self.py = py;
        self.pz = pz;
        self.e = e;
        self
    }

    /// Sets the generated mass.
    pub fn with_mass(mut self, m: f64) -> Self {
        self.m = m;
        self
    }

    /// Magnitude of the PDG code.
    pub fn id_abs(&self) -> u32 {
        self.id.unsigned_abs()
    }

    /// Magnitude of the status code.
    pub fn status_abs(&self) -> u32 {
        self.status.unsigned_abs()
    }

    /// Whether the particle is still present at the end of the generation.
    pub fn is_final(&self) -> bool {
        self.status > 0
    }

    /// Generation stage encoded by the status magnitude.
    pub fn status_class(&self) -> StatusClass {
        StatusClass::from_status(self.status)
    }

    /// Whether either daughter link is set.
    pub fn has_daughter(&self) -> bool {
        self.daughter1 != 0 || self.daughter2 != 0
    }

    /// Whether the particle has at most one distinct mother.
    pub fn has_unique_mother(&self) -> bool {
        self.mother2 == self.mother1 || self.mother2 == 0
    }

    /// Quarks, including the fourth generation (`1..=8`).
    pub fn is_quark(&self) -> bool {
        (1..=8).contains(&self.id_abs())
    }

    /// Gluon (`21`).
    pub fn is_gluon(&self) -> bool {
        self.id == GLUON
    }

    /// Quark or gluon.
    pub fn is_parton(&self) -> bool {
        self.is_quark() || self.is_gluon()
    }

    /// Photon (`22`).
    pub fn is_photon(&self) -> bool {
        self.id == PHOTON
    }

    /// Z boson (`23`).
    pub fn is_z_boson(&self) -> bool {
        self.id == Z_BOSON
    }

    /// Electron, muon and tau neutrinos of either sign.
    pub fn is_neutrino(&self) -> bool {
        matches!(self.id_abs(), 12 | 14 | 16)
    }

    /// Charged leptons of either sign, including the fourth generation.
    pub fn is_charged_lepton(&self) -> bool {
        matches!(self.id_abs(), 11 | 13 | 15 | 17)
    }

    /// Coarse flavour label used for tag/probe bookkeeping.
    pub fn flavour(&self) -> Flavour {
        if self.is_quark() {
            Flavour::Quark
        } else if self.is_gluon() {
            Flavour::Gluon
        } else if self.is_photon() {
            Flavour::Photon
        } else {
            Flavour::Other
        }
    }

    /// Squared transverse momentum.
    pub fn pt2(&self) -> f64 {
        self.px * self.px + self.py * self.py
    }

    /// Transverse momentum.
    pub fn pt(&self) -> f64 {
        self.pt2().sqrt()
    }

    /// Absolute three-momentum.
    pub fn p_abs(&self) -> f64 {
        (self.pt2() + self.pz * self.pz).sqrt()
    }

    /// Azimuthal angle in `(-pi, pi]`.
    pub fn phi(&self) -> f64 {
        self.py.atan2(self.px)
    }

    /// Pseudorapidity.
    pub fn eta(&self) -> f64 {
        let value = ((self.p_abs() + self.pz.abs()) / self.pt().max(TINY)).ln();
        if self.pz > 0.0 {
            value
        } else {
            -value
        }
    }

    /// Rapidity along the beam axis, using the generated mass.
    pub fn rapidity(&self) -> f64 {
        let mt = (self.m * self.m + self.pt2()).max(0.0).sqrt();
        let value = ((self.e + self.pz.abs()) / mt.max(TINY)).ln();
        if self.pz > 0.0 {
            value
        } else {
            -value
        }
    }
}

/// Coarse particle flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Flavour {
    /// Any quark.
    Quark,
    /// Gluon.
    Gluon,
    /// Photon.
    Photon,
    /// Anything else.
    Other,
}

impl Flavour {
    /// Stable lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Flavour::Quark => "quark",
            Flavour::Gluon => "gluon",
            Flavour::Photon => "photon",
            Flavour::Other => "other",
        }
    }
}

/// Generation stage derived from the status magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusClass {
    /// 11-19: beam particles.
    Beam,
    /// 21-29: hardest subprocess.
    HardProcess,
    /// 31-39: subsequent subprocesses.
    Subprocess,
    /// 41-49: initial-state radiation.
    InitialShower,
    /// 51-59: final-state radiation.
    FinalShower,
    /// 61-69: beam-remnant treatment.
    BeamRemnant,
    /// 71-79: preparation of hadronization.
    HadronizationPrep,
    /// 81-89: primary hadrons from hadronization.
    Hadronization,
    /// 91-99: decay products.
    Decay,
    /// Anything outside the ranges above.
    Other,
}

impl StatusClass {
    /// Classifies a signed status code by its magnitude.
    pub fn from_status(status: i32) -> Self {
        match status.unsigned_abs() {
            11..=19 => StatusClass::Beam,
            21..=29 => StatusClass::HardProcess,
            31..=39 => StatusClass::Subprocess,
            41..=49 => StatusClass::InitialShower,
            51..=59 => StatusClass::FinalShower,
            61..=69 => StatusClass::BeamRemnant,
            71..=79 => StatusClass::HadronizationPrep,
            81..=89 => StatusClass::Hadronization,
            91..=99 => StatusClass::Decay,
            _ => StatusClass::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_codes() {
        assert!(Particle::new(-5, 23).is_quark());
        assert!(Particle::new(8, 23).is_quark());
        assert!(!Particle::new(9, 23).is_quark());
        assert!(Particle::new(21, 23).is_gluon());
        assert!(!Particle::new(-21, 23).is_gluon());
        assert!(Particle::new(22, 1).is_photon());
        assert!(Particle::new(23, -22).is_z_boson());
        assert!(Particle::new(-14, 1).is_neutrino());
        assert!(!Particle::new(11, 1).is_neutrino());
        assert!(Particle::new(-13, 1).is_charged_lepton());
        assert!(Particle::new(2, 1).is_parton());
        assert!(!Particle::new(22, 1).is_parton());
    }

    #[test]
    fn daughter_and_mother_links() {
        let lone = Particle::new(21, -51);
        assert!(!lone.has_daughter());
        assert!(lone.clone().with_daughters(0, 4).has_daughter());
        assert!(lone.clone().with_mothers(3, 3).has_unique_mother());
        assert!(lone.clone().with_mothers(3, 0).has_unique_mother());
        assert!(!lone.with_mothers(3, 4).has_unique_mother());
    }

    #[test]
    fn kinematics() {
        let p = Particle::new(1, 1).with_momentum(3.0, 4.0, 0.0, 5.0);
        assert!((p.pt() - 5.0).abs() < 1e-12);
        assert!(p.eta().abs() < 1e-12);
        assert!(p.rapidity().abs() < 1e-12);
        assert!((p.phi() - 4.0f64.atan2(3.0)).abs() < 1e-12);

        let forward = Particle::new(1, 1).with_momentum(1.0, 0.0, 10.0, 20.0);
        let backward = Particle::new(1, 1).with_momentum(1.0, 0.0, -10.0, 20.0);
        assert!(forward.eta() > 0.0);
        assert!((forward.eta() + backward.eta()).abs() < 1e-12);
    }

    #[test]
    fn rapidity_uses_generated_mass() {
        // m = 3, pT = 4, pz = 12: mT = 5 and E = 13, so y = ln(25 / 5).
        let massive = Particle::new(23, -22)
            .with_momentum(4.0, 0.0, 12.0, 13.0)
            .with_mass(3.0);
        assert!((massive.rapidity() - 5.0f64.ln()).abs() < 1e-12);
        assert!(massive.rapidity() < massive.eta());

        let massless = massive.clone().with_mass(0.0);
        assert!((massless.rapidity() - (25.0f64 / 4.0).ln()).abs() < 1e-12);

        let backward = massive.with_momentum(4.0, 0.0, -12.0, 13.0);
        assert!((backward.rapidity() + 5.0f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn status_classes() {
        assert_eq!(StatusClass::from_status(-23), StatusClass::HardProcess);
        assert_eq!(StatusClass::from_status(83), StatusClass::Hadronization);
        assert_eq!(StatusClass::from_status(-91), StatusClass::Decay);
        assert_eq!(StatusClass::from_status(0), StatusClass::Other);
        assert!(Particle::new(211, 83).is_final());
        assert!(!Particle::new(2, -71).is_final());
    }
}
