//! Finite, restartable cursors that walk lattice outlines one node at a time.

use crate::node::{Direction, Node};

/// `len` nodes starting at `start` and stepping in `dir`.
#[derive(Clone, Debug)]
pub struct Ray {
    start: Node,
    dir: Direction,
    len: usize,
    emitted: usize,
    current: Node,
}

impl Ray {
    pub fn new(start: Node, dir: Direction, len: usize) -> Self {
        Self {
            start,
            dir,
            len,
            emitted: 0,
            current: start,
        }
    }

    pub fn reset(&mut self) {
        self.emitted = 0;
        self.current = self.start;
    }

    /// The node following the last one this ray yields.
    pub fn end(&self) -> Node {
        (0..self.len).fold(self.start, |node, _| node.neighbor(self.dir))
    }
}

impl Iterator for Ray {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        if self.emitted == self.len {
            return None;
        }
        let node = self.current;
        self.current = node.neighbor(self.dir);
        self.emitted += 1;
        Some(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.emitted;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Ray {}

/// The outline of a regular hexagon with `side_len` edges per side: starting
/// at `start`, walk `side_len` steps in each direction 0 through 5. Yields
/// `6 * side_len` distinct nodes and ends back at `start`.
#[derive(Clone, Debug)]
pub struct HexagonOutline {
    start: Node,
    side_len: usize,
    side: usize,
    ray: Ray,
}

impl HexagonOutline {
    pub fn new(start: Node, side_len: usize) -> Self {
        Self {
            start,
            side_len,
            side: 0,
            ray: Ray::new(start, Direction::EAST, side_len),
        }
    }

    pub fn side_len(&self) -> usize {
        self.side_len
    }

    pub fn reset(&mut self) {
        self.side = 0;
        self.ray = Ray::new(self.start, Direction::EAST, self.side_len);
    }

    /// Whether `node` lies strictly inside the hexagon this outline bounds.
    pub fn contains_interior(&self, node: Node) -> bool {
        let s = self.side_len as i32;
        let x = node.x - self.start.x;
        let y = node.y - self.start.y;
        -s < x && x < s && 0 < y && y < 2 * s && 0 < x + y && x + y < 2 * s
    }
}

impl Iterator for HexagonOutline {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        loop {
            if let Some(node) = self.ray.next() {
                return Some(node);
            }
            if self.side + 1 >= Direction::COUNT {
                return None;
            }
            self.side += 1;
            let next_start = self.ray.end();
            self.ray = Ray::new(next_start, Direction::wrapping(self.side as i64), self.side_len);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ray_yields_len_nodes_and_restarts() {
        let mut ray = Ray::new(Node::new(1, 1), Direction::NORTH_WEST, 3);
        let first: Vec<Node> = ray.by_ref().collect();
        assert_eq!(
            first,
            vec![Node::new(1, 1), Node::new(0, 2), Node::new(-1, 3)]
        );
        assert_eq!(ray.next(), None);
        assert_eq!(ray.end(), Node::new(-2, 4));
        ray.reset();
        assert_eq!(ray.collect::<Vec<_>>(), first);
    }

    #[test]
    fn hexagon_outline_is_closed_and_distinct() {
        let outline = HexagonOutline::new(Node::ORIGIN, 4);
        let nodes: Vec<Node> = outline.clone().collect();
        assert_eq!(nodes.len(), 24);
        let distinct: HashSet<Node> = nodes.iter().copied().collect();
        assert_eq!(distinct.len(), 24);
        for pair in nodes.windows(2) {
            assert!(pair[0].is_adjacent(pair[1]));
        }
        assert!(nodes[23].is_adjacent(nodes[0]));
    }

    #[test]
    fn interior_test_excludes_outline_and_includes_center() {
        let outline = HexagonOutline::new(Node::ORIGIN, 3);
        for node in outline.clone() {
            assert!(!outline.contains_interior(node), "{node}");
        }
        // Centre of the hexagon drawn from (0,0) with side 3.
        assert!(outline.contains_interior(Node::new(0, 3)));
        // 3s^2 - 3s + 1 interior nodes for side s
        let interior = (-5..=5)
            .flat_map(|x| (-1..=7).map(move |y| Node::new(x, y)))
            .filter(|&n| outline.contains_interior(n))
            .count();
        assert_eq!(interior, 19);
    }

    #[test]
    fn reset_restarts_hexagon_walk() {
        let mut outline = HexagonOutline::new(Node::new(2, -1), 2);
        let first: Vec<Node> = outline.by_ref().take(5).collect();
        outline.reset();
        let again: Vec<Node> = outline.take(5).collect();
        assert_eq!(first, again);
    }
}
