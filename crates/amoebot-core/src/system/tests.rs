use super::*;
use crate::node::Direction;
use rand::Rng;

fn system_at(nodes: &[(i32, i32)]) -> System<u32> {
    let mut system = System::new(42);
    for &(x, y) in nodes {
        system
            .insert_particle(Node::new(x, y), Compass::aligned(), 0)
            .unwrap();
    }
    system
}

/// Expands through a random label when contracted, then contracts to either
/// end with equal probability.
struct RandomWalk;

impl Algorithm<u32> for RandomWalk {
    fn activate(&self, ctx: &mut Activation<'_, u32>) {
        if ctx.is_contracted() {
            let label = ctx.uniform_direction();
            if ctx.expand(label) {
                *ctx.memory_mut() += 1;
            }
        } else if ctx.random_bool(0.5) {
            ctx.contract_tail();
        } else {
            ctx.contract_head();
        }
    }
}

struct Idle;

impl Algorithm<u32> for Idle {
    fn activate(&self, _ctx: &mut Activation<'_, u32>) {}
}

struct DoneAfter(u64);

impl Algorithm<u32> for DoneAfter {
    fn activate(&self, _ctx: &mut Activation<'_, u32>) {}

    fn has_terminated(&self, system: &System<u32>) -> bool {
        system.counters().activations >= self.0
    }
}

#[test]
fn expand_registers_both_nodes_and_blocks_further_expansion() {
    let mut system = system_at(&[(0, 0)]);
    let id = ParticleId(0);
    system.activate_particle(id, |ctx| assert!(ctx.expand(1)));

    let particle = system.particle(id).unwrap();
    assert_eq!(
        particle.shape(),
        Shape::Expanded {
            head: Node::ORIGIN,
            tail_dir: Direction::NORTH_EAST,
        }
    );
    assert_eq!(system.particle_at(Node::ORIGIN), Some(id));
    assert_eq!(system.particle_at(Node::ORIGIN.neighbor(Direction::NORTH_EAST)), Some(id));
    let view = system.view(id);
    for label in 0..view.particle().label_count() {
        assert!(!view.can_expand(label), "label {label}");
    }
    assert_eq!(system.counters().moves, 1);
    assert!(system.check_occupancy());
}

#[test]
fn neighbors_follow_a_move() {
    let mut system = system_at(&[(0, 0), (1, 0)]);
    let a = ParticleId(0);
    let b = ParticleId(1);
    assert!(system.view(a).has_neighbor_at_label(0));
    assert!(system.view(b).has_neighbor_at_label(3));
    assert_eq!(system.particle_at(system.view(a).node_at_label(0)), Some(b));

    // b expands north-west onto (0,1); a now sees its head and tail.
    system.activate_particle(b, |ctx| assert!(ctx.expand(2)));
    let view = system.view(a);
    assert!(!view.has_expanded_tail_at_label(0));
    assert!(view.has_expanded_tail_at_label(1));
    let moving = view.particle_at_label(0).unwrap();
    assert!(moving.points_at_my_head(&view, 0));
    assert!(moving.points_at_my_tail(&view, 1));
    assert!(view.has_expanded_neighbor());
    assert_eq!(view.neighbor_count(view.unique_labels()), 1);

    system.activate_particle(b, |ctx| ctx.contract_tail());
    let view = system.view(a);
    assert!(!view.has_neighbor_at_label(0));
    assert!(view.has_neighbor_at_label(1));
    let neighbor = view.neighbor_at_label(1);
    let neighbor = neighbor.as_particle().unwrap();
    assert_eq!(neighbor.id(), b);
    assert_eq!(neighbor.head(), Node::new(0, 1));
    assert!(system.check_occupancy());
}

#[test]
fn contract_head_restores_state_and_registry() {
    let mut system = system_at(&[(0, 0), (2, 0)]);
    let before: Vec<_> = system.particles().iter().map(|p| p.shape()).collect();
    for label in 0..Direction::COUNT {
        system.activate_particle(ParticleId(0), |ctx| {
            assert!(ctx.expand(label));
            ctx.contract_head();
        });
        let after: Vec<_> = system.particles().iter().map(|p| p.shape()).collect();
        assert_eq!(after, before);
        assert_eq!(system.particle_at(Node::ORIGIN.neighbor_raw(label as u8)), None);
        assert!(system.check_occupancy());
    }
}

#[test]
fn blocked_expansion_changes_nothing() {
    let mut system = system_at(&[(0, 0), (1, 0)]);
    system.insert_object(Object::solid(Node::new(0, 1))).unwrap();
    system
        .insert_object(Object::new(Node::new(-1, 1), true, false))
        .unwrap();
    let id = ParticleId(0);
    let (east, north_east, north_west) = system.activate_particle(id, |ctx| {
        (ctx.can_expand(0), ctx.can_expand(1), ctx.can_expand(2))
    });
    assert!(!east);
    assert!(!north_east);
    assert!(north_west, "traversable objects do not block");

    system.activate_particle(id, |ctx| {
        assert!(!ctx.expand(0));
        assert!(!ctx.expand(1));
        assert!(ctx.is_contracted());
        assert!(ctx.has_object_at_label(1));
        assert!(ctx.object_at_label(1).is_some_and(|object| !object.is_traversable()));
    });
    assert_eq!(system.counters().moves, 0);
    assert_eq!(system.counters().activations, 2);
}

#[test]
fn insert_rejects_overlaps() {
    let mut system = system_at(&[(0, 0)]);
    assert!(matches!(
        system.insert_particle(Node::ORIGIN, Compass::aligned(), 0),
        Err(SystemError::Occupancy(OccupancyError::ParticleOverlap { .. }))
    ));
    system.insert_object(Object::solid(Node::new(3, 3))).unwrap();
    assert!(matches!(
        system.insert_particle(Node::new(3, 3), Compass::aligned(), 0),
        Err(SystemError::Occupancy(OccupancyError::BlockedByObject(_)))
    ));
    assert_eq!(system.particle_count(), 1);
}

#[test]
fn label_queries_are_idempotent() {
    let mut system = system_at(&[(0, 0), (1, 0), (0, 1)]);
    system.activate_particle(ParticleId(1), |ctx| assert!(ctx.expand(0)));
    let view = system.view(ParticleId(0));
    let snapshot = |view: &ParticleView<'_, u32>| {
        (0..view.particle().label_count())
            .map(|label| {
                (
                    view.node_at_label(label),
                    view.has_neighbor_at_label(label),
                    view.has_expanded_tail_at_label(label),
                )
            })
            .collect::<Vec<_>>()
    };
    assert_eq!(snapshot(&view), snapshot(&view));
}

#[test]
#[should_panic(expected = "no neighbor at label")]
fn neighbor_at_empty_label_panics() {
    let system = system_at(&[(0, 0)]);
    let view = system.view(ParticleId(0));
    let _ = view.neighbor_at_label(3);
}

#[test]
fn expanded_neighbor_is_counted_once() {
    // a at the origin; b expanded with both nodes adjacent to a.
    let mut system = system_at(&[(0, 0), (1, 0)]);
    system.activate_particle(ParticleId(1), |ctx| assert!(ctx.expand(2)));
    let view = system.view(ParticleId(0));
    assert!(view.has_particle_at_label(0));
    assert!(view.has_particle_at_label(1));
    assert_eq!(view.neighbor_count(view.unique_labels()), 1);
}

#[test]
fn expanded_neighbor_is_counted_through_its_head() {
    let mut system = system_at(&[(0, 0), (1, 0)]);
    // b's head stays on (1,0) and its tail takes (0,1).
    system.activate_particle(ParticleId(1), |ctx| assert!(ctx.expand(2)));
    let view = system.view(ParticleId(0));
    assert_eq!(view.neighbor_count(&[0]), 1);
    assert_eq!(view.neighbor_count(&[1]), 0);

    // Expanding away from a leaves only the head adjacent, and it counts.
    let mut system = system_at(&[(0, 0), (1, 0)]);
    system.activate_particle(ParticleId(1), |ctx| assert!(ctx.expand(0)));
    let view = system.view(ParticleId(0));
    assert_eq!(view.neighbor_count(view.unique_labels()), 1);

    // Expanding toward a leaves only the tail adjacent, and it does not.
    let mut system = system_at(&[(0, 0), (2, 0)]);
    system.activate_particle(ParticleId(1), |ctx| assert!(ctx.expand(3)));
    let view = system.view(ParticleId(0));
    assert!(view.has_particle_at_label(0));
    assert_eq!(view.neighbor_count(view.unique_labels()), 0);
}

#[test]
fn neighbor_memory_is_readable() {
    let mut system = system_at(&[(0, 0), (1, 0)]);
    system.activate_particle(ParticleId(1), |ctx| *ctx.memory_mut() = 7);
    let seen = system.activate_particle(ParticleId(0), |ctx| {
        ctx.particle_at_label(0).map(|neighbor| *neighbor.memory())
    });
    assert_eq!(seen, Some(7));
}

#[test]
fn max_activations_stops_after_exactly_n() {
    for (particles, n) in [(3usize, 10u64), (10, 3), (7, 7)] {
        let nodes: Vec<(i32, i32)> = (0..particles as i32).map(|x| (x, 0)).collect();
        let mut system = system_at(&nodes);
        let outcome = system.run(&Idle, &Termination::MaxActivations { activations: n }, None);
        assert_eq!(outcome.reason, StopReason::TerminationMet);
        assert_eq!(outcome.counters.activations, n);
        assert_eq!(system.counters().activations, n);
    }
}

#[test]
fn zero_activation_limit_runs_nothing() {
    let mut system = system_at(&[(0, 0)]);
    let outcome = system.run(&Idle, &Termination::MaxActivations { activations: 0 }, None);
    assert_eq!(outcome.counters.activations, 0);

    let outcome = system.run(&Idle, &Termination::Never, Some(5));
    assert_eq!(outcome.reason, StopReason::ActivationCap);
    assert_eq!(outcome.counters.activations, 5);
}

#[test]
fn empty_system_never_activates() {
    let mut system: System<u32> = System::new(1);
    assert_eq!(system.activate_once(&Idle), None);
    let outcome = system.run(&Idle, &Termination::Never, None);
    assert_eq!(outcome.reason, StopReason::NoParticles);
    assert_eq!(outcome.counters, Counters::default());
}

#[test]
fn algorithm_termination_is_checked_between_activations() {
    let mut system = system_at(&[(0, 0), (1, 0)]);
    let outcome = system.run(&DoneAfter(4), &Termination::Never, None);
    assert_eq!(outcome.reason, StopReason::AlgorithmTerminated);
    assert_eq!(outcome.counters.activations, 4);
}

#[test]
fn run_until_stops_externally() {
    let mut system = system_at(&[(0, 0), (1, 0)]);
    let outcome = system.run_until(&RandomWalk, |system| system.counters().moves >= 5);
    assert_eq!(outcome.reason, StopReason::StoppedExternally);
    assert!(outcome.counters.moves >= 5);
}

#[test]
fn rounds_complete_once_every_particle_has_activated() {
    let mut system = system_at(&[(0, 0), (1, 0), (2, 0)]);
    let ids = [ParticleId(0), ParticleId(0), ParticleId(1)];
    for id in ids {
        system.activate_particle(id, |_| {});
    }
    assert_eq!(system.counters().rounds, 0);
    system.activate_particle(ParticleId(2), |_| {});
    assert_eq!(system.counters().rounds, 1);
    for id in 0..3 {
        system.activate_particle(ParticleId(id), |_| {});
    }
    assert_eq!(system.counters().rounds, 2);

    let outcome = system.run(&Idle, &Termination::MaxRounds { rounds: 5 }, None);
    assert_eq!(outcome.reason, StopReason::TerminationMet);
    assert_eq!(outcome.counters.rounds, 5);
}

#[test]
fn disconnection_stops_a_random_walk() {
    let mut system = system_at(&[(0, 0), (1, 0)]);
    let outcome = system.run(&RandomWalk, &Termination::Disconnected, Some(100_000));
    assert_eq!(outcome.reason, StopReason::TerminationMet);
    assert!(!system.is_connected());
}

#[test]
fn random_walk_preserves_occupancy() {
    let mut system = system_at(&[(0, 0), (1, 0), (2, 0), (0, 1), (1, 1)]);
    system.insert_object(Object::solid(Node::new(-1, 0))).unwrap();
    for _ in 0..5_000 {
        system.activate_once(&RandomWalk);
        assert!(system.check_occupancy());
        for particle in system.particles() {
            assert!(particle.is_contracted() ^ particle.is_expanded());
            assert!(particle.nodes().all(|node| node != Node::new(-1, 0)));
        }
    }
    let moves: u32 = system.particles().iter().map(|p| *p.memory()).sum();
    assert!(moves > 0);
}

#[test]
fn same_seed_replays_the_same_run() {
    let trace = |seed: u64| {
        let mut system: System<u32> = System::new(seed);
        for x in 0..4 {
            system
                .insert_particle(Node::new(x, 0), Compass::aligned(), 0)
                .unwrap();
        }
        system.run(&RandomWalk, &Termination::MaxActivations { activations: 500 }, None);
        system.particles().iter().map(|p| p.shape()).collect::<Vec<_>>()
    };
    assert_eq!(trace(9), trace(9));
}

#[test]
fn activation_rng_draws_are_in_range() {
    let mut system = system_at(&[(0, 0)]);
    system.activate_particle(ParticleId(0), |ctx| {
        for _ in 0..100 {
            assert!(ctx.uniform_direction() < Direction::COUNT);
            let q = ctx.uniform_real();
            assert!((0.0..1.0).contains(&q));
            assert!(ctx.rng().random_range(0..3u8) < 3);
        }
    });
}
