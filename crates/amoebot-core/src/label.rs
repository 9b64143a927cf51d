//! Particle-local port labels.
//!
//! A contracted particle has one label per local direction (0..6). An
//! expanded particle has ten: five ports on its head (every local direction
//! except the one toward its tail) followed by five on its tail (every local
//! direction except the one back toward its head). Both runs are listed in
//! ascending direction order, so the ten labels walk once around the outline
//! of the particle:
//!
//! ```text
//! label:  0    1    2    3    4  | 5    6    7    8    9
//! node:   head head head head head | tail tail tail tail tail
//! dir:    t+1  t+2  t+3  t+4  t+5 | t+4  t+5  t    t+1  t+2
//! ```
//!
//! where `t` is the local tail direction. The two lattice cells adjacent to
//! both head and tail are reached twice: label 4 and label 5 meet at
//! `head + (t+5)`, label 9 and label 0 meet at `head + (t+1)`. Dropping
//! labels 5 and 9 leaves eight labels that hit each surrounding cell once.

use crate::node::Direction;

pub type Label = usize;

/// Which of a particle's nodes a label is measured from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Anchor {
    Head,
    Tail,
}

pub const CONTRACTED_LABEL_COUNT: usize = 6;
pub const EXPANDED_LABEL_COUNT: usize = 10;

pub const CONTRACTED_LABELS: [Label; 6] = [0, 1, 2, 3, 4, 5];
pub const HEAD_LABELS: [Label; 5] = [0, 1, 2, 3, 4];
pub const TAIL_LABELS: [Label; 5] = [5, 6, 7, 8, 9];
pub const EXPANDED_UNIQUE_LABELS: [Label; 8] = [0, 1, 2, 3, 4, 6, 7, 8];

const HEAD_DIR_OFFSET: i64 = 1;
const TAIL_DIR_OFFSET: i64 = 4;

pub fn label_count(expanded: bool) -> usize {
    if expanded {
        EXPANDED_LABEL_COUNT
    } else {
        CONTRACTED_LABEL_COUNT
    }
}

/// Map a label to the node it is measured from and its local direction.
///
/// `local_tail_dir` is `None` for a contracted particle. Returns `None` when
/// the label is out of range for that state.
pub fn local_port(label: Label, local_tail_dir: Option<Direction>) -> Option<(Anchor, Direction)> {
    match local_tail_dir {
        None => Direction::new(u8::try_from(label).ok()?).map(|dir| (Anchor::Head, dir)),
        Some(t) if label < 5 => Some((Anchor::Head, t.rotate(HEAD_DIR_OFFSET + label as i64))),
        Some(t) if label < EXPANDED_LABEL_COUNT => Some((
            Anchor::Tail,
            t.rotate(TAIL_DIR_OFFSET + (label - 5) as i64),
        )),
        Some(_) => None,
    }
}

/// Labels that hit each surrounding cell exactly once, in cyclic order.
pub fn unique_labels(expanded: bool) -> &'static [Label] {
    if expanded {
        &EXPANDED_UNIQUE_LABELS
    } else {
        &CONTRACTED_LABELS
    }
}

/// Labels measured from the head, in cyclic order. For a contracted
/// particle these are all six labels.
pub fn head_labels(expanded: bool) -> &'static [Label] {
    if expanded {
        &HEAD_LABELS
    } else {
        &CONTRACTED_LABELS
    }
}

/// Labels measured from the tail; empty for a contracted particle.
pub fn tail_labels(expanded: bool) -> &'static [Label] {
    if expanded {
        &TAIL_LABELS
    } else {
        &[]
    }
}
