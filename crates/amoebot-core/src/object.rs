use crate::node::Node;
use serde::{Deserialize, Serialize};

/// A static, non-agent occupant of a single lattice node (one cell of a
/// solid obstacle, a marker, or an anchor).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Object {
    node: Node,
    traversable: bool,
    anchor: bool,
}

impl Object {
    /// A solid, non-anchor object.
    pub fn solid(node: Node) -> Self {
        Self::new(node, false, false)
    }

    pub fn new(node: Node, traversable: bool, anchor: bool) -> Self {
        Self {
            node,
            traversable,
            anchor,
        }
    }

    pub fn node(&self) -> Node {
        self.node
    }

    /// Whether particles may share this object's node.
    pub fn is_traversable(&self) -> bool {
        self.traversable
    }

    pub fn is_anchor(&self) -> bool {
        self.anchor
    }
}
