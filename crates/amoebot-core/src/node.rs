use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the six lattice directions, numbered in ascending order starting
/// east: 0=E, 1=NE, 2=NW, 3=W, 4=SW, 5=SE.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Direction(u8);

impl Direction {
    pub const COUNT: usize = 6;

    pub const EAST: Direction = Direction(0);
    pub const NORTH_EAST: Direction = Direction(1);
    pub const NORTH_WEST: Direction = Direction(2);
    pub const WEST: Direction = Direction(3);
    pub const SOUTH_WEST: Direction = Direction(4);
    pub const SOUTH_EAST: Direction = Direction(5);

    /// Returns `None` for indices outside `0..6`.
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < Self::COUNT {
            Some(Direction(index))
        } else {
            None
        }
    }

    /// Reduces any integer modulo 6.
    pub fn wrapping(index: i64) -> Self {
        Direction(index.rem_euclid(Self::COUNT as i64) as u8)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Rotate by `steps` positions in ascending direction order (negative
    /// values rotate the other way).
    pub fn rotate(self, steps: i64) -> Self {
        Self::wrapping(self.0 as i64 + steps)
    }

    pub fn opposite(self) -> Self {
        self.rotate(3)
    }

    pub fn all() -> impl Iterator<Item = Direction> + Clone {
        (0..Self::COUNT as u8).map(Direction)
    }

    const fn offset(self) -> (i32, i32) {
        const X_OFFSET: [i32; 6] = [1, 0, -1, -1, 0, 1];
        const Y_OFFSET: [i32; 6] = [0, 1, 1, 0, -1, -1];
        (X_OFFSET[self.0 as usize], Y_OFFSET[self.0 as usize])
    }
}

impl TryFrom<u8> for Direction {
    type Error = InvalidDirection;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Direction::new(value).ok_or(InvalidDirection(value))
    }
}

impl From<Direction> for u8 {
    fn from(dir: Direction) -> Self {
        dir.0
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidDirection(pub u8);

impl fmt::Display for InvalidDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "direction {} is outside 0..6", self.0)
    }
}

impl std::error::Error for InvalidDirection {}

/// A node of the triangular lattice. The x-axis runs east-west and the y-axis
/// runs northeast-southwest.
///
/// Ordering is lexicographic on `(x, y)`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Node {
    pub x: i32,
    pub y: i32,
}

impl Node {
    pub const ORIGIN: Node = Node { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The adjacent node in the given global direction.
    pub fn neighbor(self, dir: Direction) -> Node {
        let (dx, dy) = dir.offset();
        Node::new(self.x + dx, self.y + dy)
    }

    /// Like [`Node::neighbor`] but takes a raw direction index.
    ///
    /// # Panics
    ///
    /// Panics if `dir` is not in `0..6`.
    pub fn neighbor_raw(self, dir: u8) -> Node {
        match Direction::new(dir) {
            Some(dir) => self.neighbor(dir),
            None => panic!("direction {dir} is outside 0..6"),
        }
    }

    pub fn neighbors(self) -> impl Iterator<Item = Node> + Clone {
        Direction::all().map(move |dir| self.neighbor(dir))
    }

    /// The direction `d` such that `self.neighbor(d) == other`, if adjacent.
    pub fn direction_to_adjacent(self, other: Node) -> Option<Direction> {
        Direction::all().find(|&dir| self.neighbor(dir) == other)
    }

    pub fn is_adjacent(self, other: Node) -> bool {
        self.direction_to_adjacent(other).is_some()
    }

    /// The unit step from `self` that most reduces lattice distance to `to`.
    ///
    /// Decomposes the offset into the x, y and diagonal (SE/NW) axes and steps
    /// along the dominant one. Returns `None` when `self == to`.
    pub fn direction_toward(self, to: Node) -> Option<Direction> {
        if self == to {
            return None;
        }
        let x_diff = to.x - self.x;
        let y_diff = to.y - self.y;
        let z_diff = if x_diff > 0 && y_diff < 0 {
            x_diff.min(-y_diff)
        } else if x_diff < 0 && y_diff > 0 {
            -(-x_diff).min(y_diff)
        } else {
            0
        };

        let dir = if z_diff.abs() > x_diff.abs() / 2 && z_diff.abs() > y_diff.abs() / 2 {
            if z_diff > 0 {
                Direction::SOUTH_EAST
            } else {
                Direction::NORTH_WEST
            }
        } else if x_diff.abs() > y_diff.abs() && x_diff.abs() > z_diff.abs() {
            if x_diff > 0 {
                Direction::EAST
            } else {
                Direction::WEST
            }
        } else if y_diff > 0 {
            Direction::NORTH_EAST
        } else {
            Direction::SOUTH_WEST
        };
        Some(dir)
    }

    /// Minimum hop count between two nodes, found by repeatedly stepping
    /// toward `self` from `other`.
    pub fn distance(self, other: Node) -> u32 {
        let mut current = other;
        let mut distance = 0;
        while let Some(dir) = current.direction_toward(self) {
            current = current.neighbor(dir);
            distance += 1;
        }
        distance
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for Node {
    fn from((x, y): (i32, i32)) -> Self {
        Node::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_nodes() -> Vec<Node> {
        let mut nodes = Vec::new();
        for x in -6..=6 {
            for y in -6..=6 {
                nodes.push(Node::new(x, y));
            }
        }
        nodes
    }

    fn axial_distance(a: Node, b: Node) -> u32 {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        ((dx.abs() + dy.abs() + (dx + dy).abs()) / 2) as u32
    }

    #[test]
    fn direction_new_rejects_out_of_range() {
        assert!(Direction::new(5).is_some());
        assert!(Direction::new(6).is_none());
        assert_eq!(Direction::try_from(9u8), Err(InvalidDirection(9)));
    }

    #[test]
    fn rotate_wraps_both_ways() {
        assert_eq!(Direction::EAST.rotate(-1), Direction::SOUTH_EAST);
        assert_eq!(Direction::SOUTH_EAST.rotate(1), Direction::EAST);
        assert_eq!(Direction::NORTH_EAST.rotate(13), Direction::NORTH_WEST);
        for dir in Direction::all() {
            assert_eq!(dir.opposite().opposite(), dir);
        }
    }

    #[test]
    fn neighbor_offsets_match_layout() {
        let origin = Node::ORIGIN;
        let expected = [(1, 0), (0, 1), (-1, 1), (-1, 0), (0, -1), (1, -1)];
        for (dir, &(x, y)) in Direction::all().zip(expected.iter()) {
            assert_eq!(origin.neighbor(dir), Node::new(x, y));
        }
    }

    #[test]
    #[should_panic(expected = "outside 0..6")]
    fn neighbor_raw_panics_on_bad_direction() {
        Node::ORIGIN.neighbor_raw(6);
    }

    #[test]
    fn opposite_direction_returns_home() {
        let node = Node::new(3, -2);
        for dir in Direction::all() {
            assert_eq!(node.neighbor(dir).neighbor(dir.opposite()), node);
        }
    }

    #[test]
    fn direction_toward_adjacent_is_the_step_taken() {
        for a in sample_nodes() {
            for dir in Direction::all() {
                assert_eq!(a.direction_toward(a.neighbor(dir)), Some(dir));
            }
        }
    }

    #[test]
    fn direction_toward_self_is_none() {
        assert_eq!(Node::new(4, 4).direction_toward(Node::new(4, 4)), None);
    }

    #[test]
    fn distance_is_symmetric_and_zero_on_diagonal() {
        let nodes = sample_nodes();
        for &a in nodes.iter().step_by(7) {
            assert_eq!(a.distance(a), 0);
            for &b in &nodes {
                assert_eq!(a.distance(b), b.distance(a));
            }
        }
    }

    #[test]
    fn distance_matches_closed_form() {
        let nodes = sample_nodes();
        for &a in nodes.iter().step_by(5) {
            for &b in &nodes {
                assert_eq!(a.distance(b), axial_distance(a, b), "{a} -> {b}");
            }
        }
    }

    #[test]
    fn ordering_is_lexicographic() {
        assert!(Node::new(0, 5) < Node::new(1, -5));
        assert!(Node::new(1, -5) < Node::new(1, -4));
        let mut nodes = vec![Node::new(2, 0), Node::new(-1, 3), Node::new(-1, -3)];
        nodes.sort();
        assert_eq!(
            nodes,
            vec![Node::new(-1, -3), Node::new(-1, 3), Node::new(2, 0)]
        );
    }

    #[test]
    fn direction_serializes_as_index() {
        let json = serde_json::to_string(&Direction::WEST).unwrap();
        assert_eq!(json, "3");
        assert!(serde_json::from_str::<Direction>("7").is_err());
    }
}
