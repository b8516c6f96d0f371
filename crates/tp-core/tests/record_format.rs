use tp_core::{Event, Flavour, Particle};

#[test]
fn particles_parse_with_sparse_fields() {
    let json = r#"{
        "number": 42,
        "particles": [
            {"id": 2212, "status": -12},
            {"id": 21, "status": -21, "mother1": 1, "daughter1": 3, "daughter2": 4},
            {"id": 1, "status": 23, "mother1": 2, "px": 10.0, "py": 0.0, "pz": 5.0, "e": 11.2}
        ]
    }"#;
    let event: Event = serde_json::from_str(json).unwrap();
    assert_eq!(event.number, Some(42));
    assert_eq!(event.weight, 1.0);
    assert_eq!(event.len(), 3);

    let gluon = event.get(2).unwrap();
    assert!(gluon.has_daughter());
    assert_eq!(gluon.mother2, 0);
    assert_eq!(gluon.flavour(), Flavour::Gluon);

    let quark = event.get(3).unwrap();
    assert!((quark.pt() - 10.0).abs() < 1e-12);
    assert_eq!(quark.m, 0.0);
}

#[test]
fn flavour_labels_are_stable() {
    assert_eq!(Particle::new(-3, 23).flavour().as_str(), "quark");
    assert_eq!(Particle::new(22, 23).flavour().as_str(), "photon");
    assert_eq!(Particle::new(11, 23).flavour().as_str(), "other");
    assert_eq!(serde_json::to_value(Flavour::Gluon).unwrap(), "gluon");
}
