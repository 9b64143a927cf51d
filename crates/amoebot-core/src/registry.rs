use crate::node::Node;
use crate::object::Object;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Index of a particle in its system's particle table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ParticleId(pub usize);

impl ParticleId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OccupancyError {
    #[error("node {node} is already occupied by particle {occupant}")]
    ParticleOverlap { node: Node, occupant: ParticleId },
    #[error("node {0} is blocked by a non-traversable object")]
    BlockedByObject(Node),
    #[error("node {0} already holds an object")]
    ObjectOverlap(Node),
}

/// Bookkeeping of which particle and which object sit on each node.
///
/// The registry is derived state: it must always agree with the particles'
/// shapes, so every committed move goes through [`Registry::on_particle_moved`].
#[derive(Clone, Debug, Default)]
pub struct Registry {
    particles: HashMap<Node, ParticleId>,
    objects: HashMap<Node, Object>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn particle_at(&self, node: Node) -> Option<ParticleId> {
        self.particles.get(&node).copied()
    }

    pub fn object_at(&self, node: Node) -> Option<&Object> {
        self.objects.get(&node)
    }

    /// True when a particle could not move onto `node`.
    pub fn is_blocked(&self, node: Node) -> bool {
        self.particles.contains_key(&node)
            || self
                .objects
                .get(&node)
                .is_some_and(|object| !object.is_traversable())
    }

    pub fn occupied_nodes(&self) -> impl Iterator<Item = Node> + '_ {
        self.particles.keys().copied()
    }

    pub fn objects(&self) -> impl Iterator<Item = &Object> + '_ {
        self.objects.values()
    }

    pub fn particle_node_count(&self) -> usize {
        self.particles.len()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Register a particle on every node in `nodes`. Either all nodes are
    /// claimed or none are.
    pub fn insert_particle(
        &mut self,
        id: ParticleId,
        nodes: impl IntoIterator<Item = Node> + Clone,
    ) -> Result<(), OccupancyError> {
        for node in nodes.clone() {
            if let Some(&occupant) = self.particles.get(&node) {
                return Err(OccupancyError::ParticleOverlap { node, occupant });
            }
            if self
                .objects
                .get(&node)
                .is_some_and(|object| !object.is_traversable())
            {
                return Err(OccupancyError::BlockedByObject(node));
            }
        }
        for node in nodes {
            self.particles.insert(node, id);
        }
        Ok(())
    }

    pub fn insert_object(&mut self, object: Object) -> Result<(), OccupancyError> {
        let node = object.node();
        if self.objects.contains_key(&node) {
            return Err(OccupancyError::ObjectOverlap(node));
        }
        if !object.is_traversable() {
            if let Some(&occupant) = self.particles.get(&node) {
                return Err(OccupancyError::ParticleOverlap { node, occupant });
            }
        }
        self.objects.insert(node, object);
        Ok(())
    }

    /// Move particle `id` from `old_nodes` to `new_nodes` in one update.
    ///
    /// Callers must have checked that every node in `new_nodes` is either
    /// free or already held by `id`.
    pub fn on_particle_moved(
        &mut self,
        id: ParticleId,
        old_nodes: impl IntoIterator<Item = Node>,
        new_nodes: impl IntoIterator<Item = Node> + Clone,
    ) {
        for node in old_nodes {
            if self.particles.get(&node) == Some(&id) {
                self.particles.remove(&node);
            }
        }
        for node in new_nodes {
            let previous = self.particles.insert(node, id);
            debug_assert!(
                previous.is_none() || previous == Some(id),
                "particle {id} moved onto {node} held by {previous:?}"
            );
        }
    }
}
