//! Initial placements and the system builder that turns a [`SimConfig`] into
//! a populated [`System`].

use crate::compass::Compass;
use crate::config::{Layout, SimConfig};
use crate::constants::HEXAGON_SIDE_FACTOR;
use crate::node::{Direction, Node};
use crate::object::Object;
use crate::outline::HexagonOutline;
use crate::rng::derive_stream_rng;
use crate::system::{System, SystemError};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha12Rng;
use std::collections::HashSet;
use tracing::debug;

/// Stream index of the setup RNG derived from the run seed. The scheduler
/// draws from the base stream.
pub const SETUP_STREAM: u64 = 1;

/// Grow a connected blob of at most `count` nodes from the origin.
///
/// Frontier nodes are drawn uniformly and accepted with probability
/// `1 - hole_probability`; a rejected node leaves the frontier but may be
/// re-added later through another neighbor.
pub fn random_blob<R: Rng + ?Sized>(count: usize, hole_probability: f64, rng: &mut R) -> Vec<Node> {
    let mut nodes = Vec::with_capacity(count);
    if count == 0 {
        return nodes;
    }
    let accept = (1.0 - hole_probability).clamp(0.0, 1.0);
    let mut occupied = HashSet::from([Node::ORIGIN]);
    let mut frontier: Vec<Node> = Node::ORIGIN.neighbors().collect();
    let mut in_frontier: HashSet<Node> = frontier.iter().copied().collect();
    nodes.push(Node::ORIGIN);

    while nodes.len() < count && !frontier.is_empty() {
        let candidate = frontier.swap_remove(rng.random_range(0..frontier.len()));
        in_frontier.remove(&candidate);
        if !rng.random_bool(accept) {
            continue;
        }
        occupied.insert(candidate);
        nodes.push(candidate);
        for next in candidate.neighbors() {
            if !occupied.contains(&next) && in_frontier.insert(next) {
                frontier.push(next);
            }
        }
    }
    nodes
}

/// Side length of the object hexagon enclosing `count` particles.
pub fn hexagon_side_len(count: usize) -> usize {
    ((HEXAGON_SIDE_FACTOR * (count as f64).sqrt()).round() as usize).max(1)
}

/// A hexagonal wall of object nodes with particles placed strictly inside.
#[derive(Clone, Debug)]
pub struct Enclosure {
    pub outline: Vec<Node>,
    pub particles: Vec<Node>,
}

/// Build a hexagon outline of side `round(1.4 * sqrt(count))` from the
/// origin and place `count` particles at distinct random interior nodes.
pub fn hexagon_enclosure<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Enclosure {
    let outline = HexagonOutline::new(Node::ORIGIN, hexagon_side_len(count));
    let side = outline.side_len() as i32;
    let mut interior: Vec<Node> = (-side + 1..side)
        .flat_map(|x| (1..2 * side).map(move |y| Node::new(x, y)))
        .filter(|&node| outline.contains_interior(node))
        .collect();
    interior.shuffle(rng);
    interior.truncate(count);
    Enclosure {
        outline: outline.collect(),
        particles: interior,
    }
}

/// Validate `config`, lay out its particles and objects, and return the
/// populated system. `memory` is called once per particle, in placement
/// order, with the setup RNG.
///
/// Particles get uniformly random compass offsets. The scheduler RNG is
/// seeded from `config.seed`; setup draws come from a derived stream so the
/// layout does not shift the activation sequence.
pub fn build_system<M, F>(config: &SimConfig, mut memory: F) -> Result<System<M>, SystemError>
where
    F: FnMut(&mut ChaCha12Rng) -> M,
{
    config.validate()?;
    let mut rng = derive_stream_rng(config.seed, SETUP_STREAM);
    let mut system = System::new(config.seed);

    let particles = match config.layout {
        Layout::Blob { hole_probability } => {
            random_blob(config.num_particles, hole_probability, &mut rng)
        }
        Layout::Hexagon => {
            let enclosure = hexagon_enclosure(config.num_particles, &mut rng);
            for node in enclosure.outline {
                system.insert_object(Object::solid(node))?;
            }
            enclosure.particles
        }
    };

    for node in particles {
        let offset = Direction::wrapping(rng.random_range(0..Direction::COUNT as i64));
        let state = memory(&mut rng);
        system.insert_particle(node, Compass::new(offset), state)?;
    }

    debug!(
        seed = config.seed,
        layout = ?config.layout,
        particles = system.particle_count(),
        objects = system.registry().object_count(),
        "system built"
    );
    if matches!(config.layout, Layout::Blob { .. }) {
        debug_assert!(system.is_connected(), "blob setup must be connected");
    }
    Ok(system)
}
