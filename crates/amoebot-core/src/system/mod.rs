mod activation;
mod scheduler;
mod view;

#[cfg(test)]
mod tests;

pub use activation::{Activation, Algorithm};
pub use scheduler::{RunOutcome, StopReason, Termination};
pub use view::{Neighbor, Neighborhood, ParticleView};

use crate::compass::Compass;
use crate::config::SimConfigError;
use crate::connectivity;
use crate::constants::MAX_PARTICLES;
use crate::node::Node;
use crate::object::Object;
use crate::particle::{Particle, Shape};
use crate::registry::{OccupancyError, ParticleId, Registry};
use crate::rng::create_rng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SystemError {
    #[error(transparent)]
    Config(#[from] SimConfigError),
    #[error("cannot place particle: {0}")]
    Occupancy(#[from] OccupancyError),
    #[error("too many particles: {actual} > max {max}")]
    TooManyParticles { max: usize, actual: usize },
}

/// Activation, move and round counters of a system.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub activations: u64,
    /// Committed expansions and contractions.
    pub moves: u64,
    /// Completed rounds: a round ends once every particle has been activated
    /// at least once since the previous round ended.
    pub rounds: u64,
}

/// Particles, objects and their occupancy registry, plus the random source
/// and counters of the activation scheduler.
///
/// After setup the scheduler is the only mutator: particles change state
/// exclusively inside their own activations.
pub struct System<M> {
    particles: Vec<Particle<M>>,
    registry: Registry,
    rng: ChaCha12Rng,
    seed: u64,
    counters: Counters,
    activated_this_round: Vec<bool>,
    pending_this_round: usize,
}

impl<M> System<M> {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            registry: Registry::new(),
            rng: create_rng(seed),
            seed,
            counters: Counters::default(),
            activated_this_round: Vec::new(),
            pending_this_round: 0,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle<M>] {
        &self.particles
    }

    pub fn particle(&self, id: ParticleId) -> Option<&Particle<M>> {
        self.particles.get(id.index())
    }

    pub fn particle_ids(&self) -> impl Iterator<Item = ParticleId> + '_ {
        (0..self.particles.len()).map(ParticleId)
    }

    /// A read-only label-addressed view of particle `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not part of this system.
    pub fn view(&self, id: ParticleId) -> ParticleView<'_, M> {
        assert!(
            id.index() < self.particles.len(),
            "particle {id} is not part of this system"
        );
        ParticleView::new(&self.particles, &self.registry, id)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn particle_at(&self, node: Node) -> Option<ParticleId> {
        self.registry.particle_at(node)
    }

    pub fn object_at(&self, node: Node) -> Option<&Object> {
        self.registry.object_at(node)
    }

    pub fn objects(&self) -> impl Iterator<Item = &Object> + '_ {
        self.registry.objects()
    }

    pub fn counters(&self) -> Counters {
        self.counters
    }

    /// Every node held by a particle, heads and tails alike.
    pub fn occupied_nodes(&self) -> impl Iterator<Item = Node> + '_ {
        self.particles.iter().flat_map(|particle| particle.nodes())
    }

    pub fn is_connected(&self) -> bool {
        connectivity::is_connected(self.occupied_nodes())
    }

    /// Place a contracted particle. Setup only.
    pub fn insert_particle(
        &mut self,
        head: Node,
        compass: Compass,
        memory: M,
    ) -> Result<ParticleId, SystemError> {
        self.insert_particle_with_shape(Shape::Contracted { head }, compass, memory)
    }

    /// Place a particle in an arbitrary shape. Setup only.
    pub fn insert_particle_with_shape(
        &mut self,
        shape: Shape,
        compass: Compass,
        memory: M,
    ) -> Result<ParticleId, SystemError> {
        if self.particles.len() >= MAX_PARTICLES {
            return Err(SystemError::TooManyParticles {
                max: MAX_PARTICLES,
                actual: self.particles.len() + 1,
            });
        }
        let id = ParticleId(self.particles.len());
        self.registry.insert_particle(id, shape.nodes())?;
        self.particles
            .push(Particle::with_shape(shape, compass, memory));
        self.activated_this_round.push(false);
        self.pending_this_round += 1;
        Ok(id)
    }

    pub fn insert_object(&mut self, object: Object) -> Result<(), SystemError> {
        self.registry.insert_object(object)?;
        Ok(())
    }

    /// Run `f` as one activation of particle `id`, outside random selection.
    ///
    /// Counts as an activation exactly like a scheduled one.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not part of this system.
    pub fn activate_particle<R>(
        &mut self,
        id: ParticleId,
        f: impl FnOnce(&mut Activation<'_, M>) -> R,
    ) -> R {
        let mut activation =
            Activation::new(&mut self.particles, &mut self.registry, &mut self.rng, id);
        let result = f(&mut activation);
        let moves = activation.moves();
        self.record_activation(id, moves);
        result
    }

    fn record_activation(&mut self, id: ParticleId, moves: u64) {
        self.counters.activations += 1;
        self.counters.moves += moves;
        let seen = &mut self.activated_this_round[id.index()];
        if !*seen {
            *seen = true;
            self.pending_this_round -= 1;
        }
        if self.pending_this_round == 0 {
            self.counters.rounds += 1;
            self.activated_this_round.fill(false);
            self.pending_this_round = self.particles.len();
            trace!(round = self.counters.rounds, "round completed");
        }
    }

    /// Whether every particle's nodes agree with the registry and no two
    /// particles overlap.
    pub fn check_occupancy(&self) -> bool {
        let mut total = 0;
        for (index, particle) in self.particles.iter().enumerate() {
            for node in particle.nodes() {
                total += 1;
                if self.registry.particle_at(node) != Some(ParticleId(index)) {
                    return false;
                }
                if self
                    .registry
                    .object_at(node)
                    .is_some_and(|object| !object.is_traversable())
                {
                    return false;
                }
            }
        }
        total == self.registry.particle_node_count()
    }
}
