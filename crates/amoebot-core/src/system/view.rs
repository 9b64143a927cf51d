use crate::label::{Anchor, Label};
use crate::node::{Direction, Node};
use crate::object::Object;
use crate::particle::{Particle, Shape};
use crate::registry::{ParticleId, Registry};

/// What sits in the cell behind a label.
pub enum Neighbor<'a, M> {
    Particle(ParticleView<'a, M>),
    Object(&'a Object),
}

impl<'a, M> Neighbor<'a, M> {
    pub fn as_particle(&self) -> Option<&ParticleView<'a, M>> {
        match self {
            Neighbor::Particle(view) => Some(view),
            Neighbor::Object(_) => None,
        }
    }

    pub fn as_object(&self) -> Option<&'a Object> {
        match self {
            Neighbor::Particle(_) => None,
            Neighbor::Object(object) => Some(*object),
        }
    }
}

/// Label-addressed, read-only queries about one particle and its
/// surroundings.
///
/// Implemented by [`ParticleView`] (any particle, read-only) and by
/// [`super::Activation`] (the particle currently being activated), so the
/// same neighbor-resolution code serves both.
pub trait Neighborhood<M> {
    fn particles(&self) -> &[Particle<M>];
    fn registry(&self) -> &Registry;
    fn id(&self) -> ParticleId;

    fn particle(&self) -> &Particle<M> {
        &self.particles()[self.id().index()]
    }

    fn shape(&self) -> Shape {
        self.particle().shape()
    }

    fn head(&self) -> Node {
        self.particle().head()
    }

    fn tail(&self) -> Option<Node> {
        self.particle().tail()
    }

    fn is_contracted(&self) -> bool {
        self.particle().is_contracted()
    }

    fn is_expanded(&self) -> bool {
        self.particle().is_expanded()
    }

    fn unique_labels(&self) -> &'static [Label] {
        self.particle().unique_labels()
    }

    fn head_labels(&self) -> &'static [Label] {
        self.particle().head_labels()
    }

    fn tail_labels(&self) -> &'static [Label] {
        self.particle().tail_labels()
    }

    fn resolve_label(&self, label: Label) -> (Anchor, Direction) {
        self.particle().resolve_label(label)
    }

    fn node_at_label(&self, label: Label) -> Node {
        self.particle().node_at_label(label)
    }

    /// True iff a particle or an object occupies the cell at `label`.
    fn has_neighbor_at_label(&self, label: Label) -> bool {
        let node = self.node_at_label(label);
        self.registry().particle_at(node).is_some() || self.registry().object_at(node).is_some()
    }

    fn has_particle_at_label(&self, label: Label) -> bool {
        self.registry()
            .particle_at(self.node_at_label(label))
            .is_some()
    }

    fn has_object_at_label(&self, label: Label) -> bool {
        self.registry().object_at(self.node_at_label(label)).is_some()
    }

    fn try_neighbor_at_label(&self, label: Label) -> Option<Neighbor<'_, M>> {
        if let Some(view) = self.particle_at_label(label) {
            return Some(Neighbor::Particle(view));
        }
        self.registry()
            .object_at(self.node_at_label(label))
            .map(Neighbor::Object)
    }

    /// The occupant at `label`; particles take precedence over traversable
    /// objects sharing their node.
    ///
    /// # Panics
    ///
    /// Panics if the cell is empty; check [`Neighborhood::has_neighbor_at_label`]
    /// first.
    fn neighbor_at_label(&self, label: Label) -> Neighbor<'_, M> {
        match self.try_neighbor_at_label(label) {
            Some(neighbor) => neighbor,
            None => panic!(
                "particle {} has no neighbor at label {label} ({})",
                self.id(),
                self.node_at_label(label)
            ),
        }
    }

    fn particle_at_label(&self, label: Label) -> Option<ParticleView<'_, M>> {
        self.registry()
            .particle_at(self.node_at_label(label))
            .map(|id| ParticleView::new(self.particles(), self.registry(), id))
    }

    fn object_at_label(&self, label: Label) -> Option<&Object> {
        self.registry().object_at(self.node_at_label(label))
    }

    /// True iff an expanded particle sits at `label` and the label points at
    /// its tail, the node it may still retreat from. Counting code skips
    /// these labels so an expanded neighbor contributes once, through the
    /// head it expanded from.
    fn has_expanded_tail_at_label(&self, label: Label) -> bool {
        self.particle_at_label(label)
            .is_some_and(|neighbor| neighbor.points_at_my_tail(self, label))
    }

    fn has_expanded_neighbor(&self) -> bool {
        self.unique_labels().iter().any(|&label| {
            self.particle_at_label(label)
                .is_some_and(|neighbor| neighbor.is_expanded())
        })
    }

    /// Number of neighboring particles behind `labels`, not double-counting
    /// expanded neighbors.
    fn neighbor_count(&self, labels: &[Label]) -> usize {
        self.count_neighbors_where(labels, |_| true)
    }

    fn count_neighbors_where<F>(&self, labels: &[Label], mut predicate: F) -> usize
    where
        F: FnMut(&ParticleView<'_, M>) -> bool,
    {
        labels
            .iter()
            .filter(|&&label| !self.has_expanded_tail_at_label(label))
            .filter_map(|&label| self.particle_at_label(label))
            .filter(|neighbor| predicate(neighbor))
            .count()
    }

    /// Whether the contracted particle may expand through `label`.
    fn can_expand(&self, label: Label) -> bool {
        self.is_contracted() && !self.registry().is_blocked(self.node_at_label(label))
    }
}

/// Read-only handle to one particle of a system.
///
/// Handed out for neighbors so algorithms can read a neighbor's state and
/// memory without being able to change it.
pub struct ParticleView<'a, M> {
    particles: &'a [Particle<M>],
    registry: &'a Registry,
    id: ParticleId,
}

impl<M> Clone for ParticleView<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for ParticleView<'_, M> {}

impl<'a, M> ParticleView<'a, M> {
    pub(crate) fn new(particles: &'a [Particle<M>], registry: &'a Registry, id: ParticleId) -> Self {
        Self {
            particles,
            registry,
            id,
        }
    }

    pub fn memory(&self) -> &'a M {
        let particles: &'a [Particle<M>] = self.particles;
        particles[self.id.index()].memory()
    }

    /// Whether `observer`'s `label` points at this particle's head.
    pub fn points_at_my_head<N: Neighborhood<M> + ?Sized>(&self, observer: &N, label: Label) -> bool {
        self.particle().points_at_my_head(observer.particle(), label)
    }

    /// Whether `observer`'s `label` points at this particle's tail.
    pub fn points_at_my_tail<N: Neighborhood<M> + ?Sized>(&self, observer: &N, label: Label) -> bool {
        self.particle().points_at_my_tail(observer.particle(), label)
    }
}

impl<M> Neighborhood<M> for ParticleView<'_, M> {
    fn particles(&self) -> &[Particle<M>] {
        self.particles
    }

    fn registry(&self) -> &Registry {
        self.registry
    }

    fn id(&self) -> ParticleId {
        self.id
    }
}
