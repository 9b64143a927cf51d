use crate::compass::Compass;
use crate::label::{self, Anchor, Label};
use crate::node::{Direction, Node};
use serde::{Deserialize, Serialize};

/// The two occupancy states of a particle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    Contracted { head: Node },
    /// Occupies `head` and `head.neighbor(tail_dir)`; `tail_dir` is global.
    Expanded { head: Node, tail_dir: Direction },
}

impl Shape {
    pub fn head(&self) -> Node {
        match *self {
            Shape::Contracted { head } | Shape::Expanded { head, .. } => head,
        }
    }

    pub fn tail(&self) -> Option<Node> {
        match *self {
            Shape::Contracted { .. } => None,
            Shape::Expanded { head, tail_dir } => Some(head.neighbor(tail_dir)),
        }
    }

    pub fn tail_dir(&self) -> Option<Direction> {
        match *self {
            Shape::Contracted { .. } => None,
            Shape::Expanded { tail_dir, .. } => Some(tail_dir),
        }
    }

    pub fn is_expanded(&self) -> bool {
        matches!(self, Shape::Expanded { .. })
    }

    pub fn is_contracted(&self) -> bool {
        !self.is_expanded()
    }

    /// Head first, then tail if expanded.
    pub fn nodes(&self) -> impl Iterator<Item = Node> + Clone {
        std::iter::once(self.head()).chain(self.tail())
    }

    pub fn occupies(&self, node: Node) -> bool {
        self.head() == node || self.tail() == Some(node)
    }
}

/// A particle: a shape on the lattice, a private compass, and the
/// algorithm-specific memory `M`.
#[derive(Clone, Debug)]
pub struct Particle<M> {
    shape: Shape,
    compass: Compass,
    memory: M,
}

impl<M> Particle<M> {
    pub fn contracted(head: Node, compass: Compass, memory: M) -> Self {
        Self {
            shape: Shape::Contracted { head },
            compass,
            memory,
        }
    }

    pub fn with_shape(shape: Shape, compass: Compass, memory: M) -> Self {
        Self {
            shape,
            compass,
            memory,
        }
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn head(&self) -> Node {
        self.shape.head()
    }

    pub fn tail(&self) -> Option<Node> {
        self.shape.tail()
    }

    pub fn nodes(&self) -> impl Iterator<Item = Node> + Clone {
        self.shape.nodes()
    }

    pub fn is_expanded(&self) -> bool {
        self.shape.is_expanded()
    }

    pub fn is_contracted(&self) -> bool {
        self.shape.is_contracted()
    }

    pub fn compass(&self) -> Compass {
        self.compass
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub(crate) fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    /// Tail direction in this particle's own frame.
    pub fn local_tail_dir(&self) -> Option<Direction> {
        self.shape.tail_dir().map(|dir| self.compass.to_local(dir))
    }

    pub fn label_count(&self) -> usize {
        label::label_count(self.is_expanded())
    }

    pub fn unique_labels(&self) -> &'static [Label] {
        label::unique_labels(self.is_expanded())
    }

    pub fn head_labels(&self) -> &'static [Label] {
        label::head_labels(self.is_expanded())
    }

    pub fn tail_labels(&self) -> &'static [Label] {
        label::tail_labels(self.is_expanded())
    }

    /// Resolve a label to the node it is measured from and a global direction.
    ///
    /// # Panics
    ///
    /// Panics if `label` is not valid for the current shape.
    pub fn resolve_label(&self, label: Label) -> (Anchor, Direction) {
        match label::local_port(label, self.local_tail_dir()) {
            Some((anchor, local)) => (anchor, self.compass.to_global(local)),
            None => panic!(
                "label {label} is invalid for a particle with {} labels",
                self.label_count()
            ),
        }
    }

    pub fn is_head_label(&self, label: Label) -> bool {
        self.resolve_label(label).0 == Anchor::Head
    }

    /// The adjacent node reached through `label`.
    pub fn node_at_label(&self, label: Label) -> Node {
        let (anchor, dir) = self.resolve_label(label);
        self.anchor_node(anchor).neighbor(dir)
    }

    /// The global direction `label` points in, measured from its anchor.
    pub fn label_to_dir(&self, label: Label) -> Direction {
        self.resolve_label(label).1
    }

    fn anchor_node(&self, anchor: Anchor) -> Node {
        match anchor {
            Anchor::Head => self.head(),
            Anchor::Tail => self.tail().unwrap_or_else(|| self.head()),
        }
    }

    /// Whether `observer`'s `label` points at this particle's head.
    pub fn points_at_my_head<N>(&self, observer: &Particle<N>, label: Label) -> bool {
        observer.node_at_label(label) == self.head()
    }

    /// Whether `observer`'s `label` points at this particle's tail.
    pub fn points_at_my_tail<N>(&self, observer: &Particle<N>, label: Label) -> bool {
        self.tail() == Some(observer.node_at_label(label))
    }

    /// Expand toward global direction `dir`: the head stays, the tail
    /// takes the new node.
    ///
    /// # Panics
    ///
    /// Panics if the particle is already expanded.
    pub(crate) fn expand(&mut self, dir: Direction) {
        match self.shape {
            Shape::Contracted { head } => {
                self.shape = Shape::Expanded {
                    head,
                    tail_dir: dir,
                }
            }
            Shape::Expanded { .. } => panic!("expand called on an already expanded particle"),
        }
    }

    /// Contract onto the head, releasing the tail node.
    ///
    /// # Panics
    ///
    /// Panics if the particle is contracted.
    pub(crate) fn contract_head(&mut self) {
        match self.shape {
            Shape::Expanded { head, .. } => self.shape = Shape::Contracted { head },
            Shape::Contracted { .. } => panic!("contract_head called on a contracted particle"),
        }
    }

    /// Contract onto the tail, releasing the head node.
    ///
    /// # Panics
    ///
    /// Panics if the particle is contracted.
    pub(crate) fn contract_tail(&mut self) {
        match self.shape {
            Shape::Expanded { head, tail_dir } => {
                self.shape = Shape::Contracted {
                    head: head.neighbor(tail_dir),
                }
            }
            Shape::Contracted { .. } => panic!("contract_tail called on a contracted particle"),
        }
    }
}
