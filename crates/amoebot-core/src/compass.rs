use crate::node::Direction;
use serde::{Deserialize, Serialize};

/// A particle's private orientation: the global direction its local
/// direction 0 points at.
///
/// All local/global conversions go through this type so callers never add or
/// subtract offsets by hand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Compass {
    offset: Direction,
}

impl Compass {
    pub const fn new(offset: Direction) -> Self {
        Self { offset }
    }

    /// The compass whose local directions equal global directions.
    pub const fn aligned() -> Self {
        Self {
            offset: Direction::EAST,
        }
    }

    pub fn offset(self) -> Direction {
        self.offset
    }

    /// Turn the whole compass by `steps`.
    pub fn rotate(self, steps: i64) -> Self {
        Self {
            offset: self.offset.rotate(steps),
        }
    }

    pub fn to_global(self, local: Direction) -> Direction {
        local.rotate(self.offset.index() as i64)
    }

    pub fn to_local(self, global: Direction) -> Direction {
        global.rotate(-(self.offset.index() as i64))
    }
}
