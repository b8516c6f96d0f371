use std::collections::BTreeSet;

use tp_core::{Event, Particle};
use tp_history::ParticleHistoryGraph;

fn linear_chain(depth: usize) -> Event {
    let mut particles = Vec::with_capacity(depth + 1);
    for index in 1..=depth + 1 {
        let mother = index - 1;
        let daughter = if index <= depth { index + 1 } else { 0 };
        particles.push(
            Particle::new(21, -51)
                .with_mothers(mother, 0)
                .with_daughters(daughter, 0),
        );
    }
    Event::new(particles)
}

#[test]
fn leaf_has_no_descendants() {
    let event = linear_chain(3);
    let graph = ParticleHistoryGraph::new(&event);
    assert!(graph.recursive_daughter_list(4).is_empty());
    assert!(graph.recursive_daughter_list(0).is_empty());
    assert!(graph.recursive_daughter_list(99).is_empty());
}

#[test]
fn chain_of_depth_n_lists_every_descendant_once() {
    for depth in [1, 2, 5, 17] {
        let event = linear_chain(depth);
        let graph = ParticleHistoryGraph::new(&event);
        let descendants = graph.recursive_daughter_list(1);
        assert_eq!(descendants.len(), depth);
        let unique: BTreeSet<_> = descendants.iter().copied().collect();
        assert_eq!(unique, (2..=depth + 1).collect());
    }
}

#[test]
fn shared_descendants_are_listed_once() {
    // 1 -> {2, 3}, both 2 and 3 -> 4 (a string), 4 -> {5, 6}.
    let event = Event::new(vec![
        Particle::new(21, -23).with_daughters(2, 3),
        Particle::new(2, -51).with_mothers(1, 0).with_daughters(4, 0),
        Particle::new(-2, -51).with_mothers(1, 0).with_daughters(4, 0),
        Particle::new(92, -71).with_mothers(2, 3).with_daughters(5, 6),
        Particle::new(211, 83).with_mothers(4, 4),
        Particle::new(-211, 84).with_mothers(4, 4),
    ]);
    let graph = ParticleHistoryGraph::new(&event);
    assert_eq!(graph.recursive_daughter_list(1), vec![2, 3, 4, 5, 6]);
    assert_eq!(graph.recursive_daughter_list(3), vec![4, 5, 6]);
}

#[test]
fn cyclic_daughter_links_terminate() {
    let event = Event::new(vec![
        Particle::new(21, -23).with_daughters(2, 0),
        Particle::new(21, -51).with_daughters(3, 0),
        Particle::new(21, -51).with_daughters(1, 2),
    ]);
    let graph = ParticleHistoryGraph::new(&event);
    assert_eq!(graph.recursive_daughter_list(1), vec![2, 3]);
    assert_eq!(graph.recursive_daughter_list(2), vec![3, 1]);
}

#[test]
fn repeated_enumeration_is_identical() {
    let event = linear_chain(6);
    let graph = ParticleHistoryGraph::new(&event);
    assert_eq!(graph.recursive_daughter_list(2), graph.recursive_daughter_list(2));
}
