use crate::config::AlgorithmKind;
use crate::node::{Direction, Node};
use crate::registry::ParticleId;
use crate::system::{Counters, RunOutcome, StopReason, System};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Scalar measurements usable as termination thresholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    Perimeter,
    NeighborPairs,
    ExpandedParticles,
    Activations,
    Moves,
    Rounds,
}

impl Measure {
    pub fn evaluate<M>(self, system: &System<M>) -> f64 {
        match self {
            Measure::Perimeter => perimeter(system) as f64,
            Measure::NeighborPairs => neighbor_pairs(system) as f64,
            Measure::ExpandedParticles => expanded_particles(system) as f64,
            Measure::Activations => system.counters().activations as f64,
            Measure::Moves => system.counters().moves as f64,
            Measure::Rounds => system.counters().rounds as f64,
        }
    }
}

// E, NE and NW cover every lattice edge exactly once.
const HALF_DIRECTIONS: [Direction; 3] = [
    Direction::EAST,
    Direction::NORTH_EAST,
    Direction::NORTH_WEST,
];

fn edges_where(nodes: &HashSet<Node>, mut keep: impl FnMut(Node, Node) -> bool) -> usize {
    nodes
        .iter()
        .flat_map(|&node| HALF_DIRECTIONS.into_iter().map(move |dir| (node, node.neighbor(dir))))
        .filter(|(_, other)| nodes.contains(other))
        .filter(|&(a, b)| keep(a, b))
        .count()
}

/// Lattice edges joining two different particles for which `keep` holds.
pub fn particle_edges_where<M>(
    system: &System<M>,
    mut keep: impl FnMut(ParticleId, ParticleId) -> bool,
) -> usize {
    let nodes: HashSet<Node> = system.occupied_nodes().collect();
    edges_where(&nodes, |a, b| match (system.particle_at(a), system.particle_at(b)) {
        (Some(a), Some(b)) if a != b => keep(a, b),
        _ => false,
    })
}

/// Lattice edges between nodes held by two different particles.
pub fn neighbor_pairs<M>(system: &System<M>) -> usize {
    particle_edges_where(system, |_, _| true)
}

/// Length of the external boundary walk, via `3 * nodes - edges - 3`.
///
/// Exact for connected configurations without holes; every occupied node
/// counts, so an expanded particle contributes two.
pub fn perimeter<M>(system: &System<M>) -> usize {
    let nodes: HashSet<Node> = system.occupied_nodes().collect();
    if nodes.is_empty() {
        return 0;
    }
    let edges = edges_where(&nodes, |_, _| true);
    (3 * nodes.len()).saturating_sub(edges + 3)
}

pub fn expanded_particles<M>(system: &System<M>) -> usize {
    system
        .particles()
        .iter()
        .filter(|particle| particle.is_expanded())
        .count()
}

fn default_schema_version() -> u32 {
    1
}

/// End-of-run report printed by the CLI.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub seed: u64,
    pub algorithm: AlgorithmKind,
    pub particle_count: usize,
    pub object_count: usize,
    pub stop_reason: StopReason,
    pub counters: Counters,
    pub perimeter: usize,
    pub neighbor_pairs: usize,
    pub connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heterogeneous_edges: Option<usize>,
}

impl RunSummary {
    pub fn collect<M>(system: &System<M>, algorithm: AlgorithmKind, outcome: &RunOutcome) -> Self {
        Self {
            schema_version: default_schema_version(),
            seed: system.seed(),
            algorithm,
            particle_count: system.particle_count(),
            object_count: system.registry().object_count(),
            stop_reason: outcome.reason,
            counters: outcome.counters,
            perimeter: perimeter(system),
            neighbor_pairs: neighbor_pairs(system),
            connected: system.is_connected(),
            heterogeneous_edges: None,
        }
    }
}
