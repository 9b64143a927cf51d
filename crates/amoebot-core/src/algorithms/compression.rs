use super::{check_property_one, check_property_two, shared_neighbor_labels};
use crate::system::{Activation, Algorithm, Neighborhood};
use serde::{Deserialize, Serialize};

/// Per-particle state carried from an expansion to the following contraction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CompressionMemory {
    /// Uniform draw made when the expansion was attempted.
    pub q: f64,
    /// Counted neighbors at the node the particle expanded from.
    pub neighbors_before: usize,
    /// No expanded neighbor was seen right after expanding.
    pub flag: bool,
}

/// The stochastic compression algorithm with neighbor bias `lambda`.
///
/// A move is committed with probability `min(1, lambda^(after - before))`
/// when it keeps the local neighborhood connected (Property 1 or 2), so
/// large `lambda` favors configurations with many neighbor pairs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Compression {
    lambda: f64,
}

impl Compression {
    pub fn new(lambda: f64) -> Self {
        Self { lambda }
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    fn try_expand(&self, ctx: &mut Activation<'_, CompressionMemory>) {
        let label = ctx.uniform_direction();
        let q = ctx.uniform_real();
        ctx.memory_mut().q = q;
        if !ctx.can_expand(label) || ctx.has_expanded_neighbor() {
            return;
        }
        let before = ctx.neighbor_count(ctx.unique_labels());
        if ctx.expand(label) {
            let flag = !ctx.has_expanded_neighbor();
            let memory = ctx.memory_mut();
            memory.neighbors_before = before;
            memory.flag = flag;
        }
    }

    fn settle(&self, ctx: &mut Activation<'_, CompressionMemory>) {
        let CompressionMemory {
            q,
            neighbors_before,
            flag,
        } = *ctx.memory();
        if !flag || neighbors_before == 5 {
            ctx.contract_head();
            return;
        }
        let after = ctx.neighbor_count(ctx.tail_labels());
        let shared = shared_neighbor_labels(&*ctx);
        let bias = self.lambda.powi(after as i32 - neighbors_before as i32);
        if q < bias && (check_property_one(&*ctx, &shared) || check_property_two(&*ctx, &shared)) {
            ctx.contract_tail();
        } else {
            ctx.contract_head();
        }
    }
}

impl Algorithm<CompressionMemory> for Compression {
    fn activate(&self, ctx: &mut Activation<'_, CompressionMemory>) {
        if ctx.is_contracted() {
            self.try_expand(ctx);
        } else {
            self.settle(ctx);
        }
    }
}
