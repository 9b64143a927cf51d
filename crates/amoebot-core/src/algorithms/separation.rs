use super::{check_property_one, check_property_two, shared_neighbor_labels};
use crate::label::Label;
use crate::metrics::particle_edges_where;
use crate::registry::ParticleId;
use crate::system::{Activation, Algorithm, Neighborhood, System};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Red,
    Blue,
}

impl Color {
    pub fn other(self) -> Color {
        match self {
            Color::Red => Color::Blue,
            Color::Blue => Color::Red,
        }
    }

    /// A color drawn with equal probability.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Color {
        if rng.random_bool(0.5) {
            Color::Red
        } else {
            Color::Blue
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeparationMemory {
    pub color: Color,
    pub q: f64,
    pub neighbors_before: usize,
    pub same_color_before: usize,
    pub flag: bool,
}

impl SeparationMemory {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            q: 0.0,
            neighbors_before: 0,
            same_color_before: 0,
            flag: false,
        }
    }
}

fn same_color_neighbors<N>(ctx: &N, labels: &[Label], color: Color) -> usize
where
    N: Neighborhood<SeparationMemory> + ?Sized,
{
    ctx.count_neighbors_where(labels, |neighbor| neighbor.memory().color == color)
}

/// Compression extended with two colors: `lambda` biases toward more
/// neighbors and `kappa` toward more same-colored neighbors.
///
/// A particle that cannot move because a contracted particle of the other
/// color sits in the chosen direction may instead adopt that color, with the
/// probability a swap of the two colors would be accepted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Separation {
    lambda: f64,
    kappa: f64,
}

impl Separation {
    pub fn new(lambda: f64, kappa: f64) -> Self {
        Self { lambda, kappa }
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn kappa(&self) -> f64 {
        self.kappa
    }

    fn try_expand(&self, ctx: &mut Activation<'_, SeparationMemory>) {
        let label = ctx.uniform_direction();
        let q = ctx.uniform_real();
        ctx.memory_mut().q = q;
        if ctx.has_expanded_neighbor() {
            return;
        }
        if !ctx.can_expand(label) {
            self.try_recolor(ctx, label, q);
            return;
        }
        let color = ctx.memory().color;
        let labels = ctx.unique_labels();
        let before = ctx.neighbor_count(labels);
        let same_before = same_color_neighbors(&*ctx, labels, color);
        if ctx.expand(label) {
            let flag = !ctx.has_expanded_neighbor();
            let memory = ctx.memory_mut();
            memory.neighbors_before = before;
            memory.same_color_before = same_before;
            memory.flag = flag;
        }
    }

    fn try_recolor(&self, ctx: &mut Activation<'_, SeparationMemory>, label: Label, q: f64) {
        let color = ctx.memory().color;
        let other = color.other();
        let labels = ctx.unique_labels();
        let exponent = {
            let Some(neighbor) = ctx.particle_at_label(label) else {
                return;
            };
            if neighbor.memory().color == color {
                return;
            }
            let own_same = same_color_neighbors(&*ctx, labels, color) as i32;
            let own_other = same_color_neighbors(&*ctx, labels, other) as i32 - 1;
            let neighbor_labels = neighbor.unique_labels();
            let their_same = same_color_neighbors(&neighbor, neighbor_labels, other) as i32;
            let their_other = same_color_neighbors(&neighbor, neighbor_labels, color) as i32 - 1;
            (own_other + their_other) - (own_same + their_same)
        };
        if q < self.kappa.powi(exponent) {
            ctx.memory_mut().color = other;
        }
    }

    fn settle(&self, ctx: &mut Activation<'_, SeparationMemory>) {
        let memory = *ctx.memory();
        if !memory.flag || memory.neighbors_before == 5 {
            ctx.contract_head();
            return;
        }
        let labels = ctx.tail_labels();
        let after = ctx.neighbor_count(labels) as i32;
        let same_after = same_color_neighbors(&*ctx, labels, memory.color) as i32;
        let shared = shared_neighbor_labels(&*ctx);
        let bias = self.lambda.powi(after - memory.neighbors_before as i32)
            * self.kappa.powi(same_after - memory.same_color_before as i32);
        if memory.q < bias
            && (check_property_one(&*ctx, &shared) || check_property_two(&*ctx, &shared))
        {
            ctx.contract_tail();
        } else {
            ctx.contract_head();
        }
    }
}

impl Algorithm<SeparationMemory> for Separation {
    fn activate(&self, ctx: &mut Activation<'_, SeparationMemory>) {
        if ctx.is_contracted() {
            self.try_expand(ctx);
        } else {
            self.settle(ctx);
        }
    }
}

/// Lattice edges joining two particles of different colors.
pub fn heterogeneous_edges(system: &System<SeparationMemory>) -> usize {
    let color = |id: ParticleId| system.particles()[id.index()].memory().color;
    particle_edges_where(system, |a, b| color(a) != color(b))
}
