use super::view::{Neighborhood, ParticleView};
use super::System;
use crate::label::Label;
use crate::node::Direction;
use crate::particle::Particle;
use crate::registry::{ParticleId, Registry};
use rand::Rng;
use rand_chacha::ChaCha12Rng;

/// A local, randomized rule run by every particle when it is activated.
pub trait Algorithm<M> {
    /// One complete, atomic activation of the particle behind `ctx`.
    fn activate(&self, ctx: &mut Activation<'_, M>);

    /// Algorithm-level termination, checked between activations.
    fn has_terminated(&self, _system: &System<M>) -> bool {
        false
    }
}

/// The activating particle's capabilities: read its neighborhood, mutate its
/// own memory, perform move primitives, and draw randomness.
pub struct Activation<'a, M> {
    particles: &'a mut [Particle<M>],
    registry: &'a mut Registry,
    rng: &'a mut ChaCha12Rng,
    id: ParticleId,
    moves: u64,
}

impl<'a, M> Activation<'a, M> {
    pub(crate) fn new(
        particles: &'a mut [Particle<M>],
        registry: &'a mut Registry,
        rng: &'a mut ChaCha12Rng,
        id: ParticleId,
    ) -> Self {
        assert!(
            id.index() < particles.len(),
            "particle {id} is not part of this system"
        );
        Self {
            particles,
            registry,
            rng,
            id,
            moves: 0,
        }
    }

    /// Number of committed move primitives so far in this activation.
    pub fn moves(&self) -> u64 {
        self.moves
    }

    /// A read-only view of the activating particle.
    pub fn view(&self) -> ParticleView<'_, M> {
        ParticleView::new(&*self.particles, &*self.registry, self.id)
    }

    pub fn memory(&self) -> &M {
        self.particles[self.id.index()].memory()
    }

    pub fn memory_mut(&mut self) -> &mut M {
        self.particles[self.id.index()].memory_mut()
    }

    /// Expand through contracted `label` if its cell is free.
    ///
    /// Returns `false` and leaves all state untouched when the target holds
    /// a particle or a non-traversable object.
    ///
    /// # Panics
    ///
    /// Panics if the particle is already expanded.
    pub fn expand(&mut self, label: Label) -> bool {
        let particle = &self.particles[self.id.index()];
        assert!(
            particle.is_contracted(),
            "particle {} cannot expand while expanded",
            self.id
        );
        let dir = particle.label_to_dir(label);
        let target = particle.head().neighbor(dir);
        if self.registry.is_blocked(target) {
            return false;
        }
        self.apply(|particle| particle.expand(dir));
        true
    }

    /// Contract onto the head, undoing the last expansion.
    ///
    /// # Panics
    ///
    /// Panics if the particle is contracted.
    pub fn contract_head(&mut self) {
        self.apply(Particle::contract_head);
    }

    /// Contract onto the tail, completing a move to the node expanded into.
    ///
    /// # Panics
    ///
    /// Panics if the particle is contracted.
    pub fn contract_tail(&mut self) {
        self.apply(Particle::contract_tail);
    }

    fn apply(&mut self, transition: impl FnOnce(&mut Particle<M>)) {
        let particle = &mut self.particles[self.id.index()];
        let before = particle.shape();
        transition(particle);
        let after = particle.shape();
        self.registry
            .on_particle_moved(self.id, before.nodes(), after.nodes());
        self.moves += 1;
    }

    /// A direction drawn uniformly at random, as a contracted label.
    pub fn uniform_direction(&mut self) -> Label {
        self.rng.random_range(0..Direction::COUNT)
    }

    /// A real drawn uniformly from `[0, 1)`.
    pub fn uniform_real(&mut self) -> f64 {
        self.rng.random::<f64>()
    }

    pub fn random_bool(&mut self, probability: f64) -> bool {
        self.rng.random_bool(probability.clamp(0.0, 1.0))
    }

    pub fn rng(&mut self) -> &mut ChaCha12Rng {
        &mut *self.rng
    }
}

impl<M> Neighborhood<M> for Activation<'_, M> {
    fn particles(&self) -> &[Particle<M>] {
        &*self.particles
    }

    fn registry(&self) -> &Registry {
        &*self.registry
    }

    fn id(&self) -> ParticleId {
        self.id
    }
}
