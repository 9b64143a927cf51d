use crate::node::Node;
use std::collections::{HashSet, VecDeque};

/// Whether `nodes` form a single connected component under lattice
/// adjacency. An empty set counts as connected.
pub fn is_connected(nodes: impl IntoIterator<Item = Node>) -> bool {
    let occupied: HashSet<Node> = nodes.into_iter().collect();
    let Some(&start) = occupied.iter().next() else {
        return true;
    };

    let mut visited = HashSet::with_capacity(occupied.len());
    let mut queue = VecDeque::new();
    visited.insert(start);
    queue.push_back(start);
    while let Some(node) = queue.pop_front() {
        for next in node.neighbors() {
            if occupied.contains(&next) && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }
    visited.len() == occupied.len()
}
