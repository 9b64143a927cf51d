//! Reference local algorithms, written purely against [`Activation`] and the
//! [`Neighborhood`] queries.
//!
//! [`Activation`]: crate::system::Activation

pub mod compression;
pub mod separation;

pub use compression::{Compression, CompressionMemory};
pub use separation::{heterogeneous_edges, Color, Separation, SeparationMemory};

use crate::label::Label;
use crate::system::Neighborhood;

/// A neighbor at `label` that counts toward neighborhood size: any particle
/// except an expanded one seen through its tail.
pub fn is_counted_neighbor<M, N>(ctx: &N, label: Label) -> bool
where
    N: Neighborhood<M> + ?Sized,
{
    ctx.has_particle_at_label(label) && !ctx.has_expanded_tail_at_label(label)
}

/// The labels of the two cells shared by head and tail that hold a counted
/// neighbor. Only meaningful for an expanded particle.
pub fn shared_neighbor_labels<M, N>(ctx: &N) -> Vec<Label>
where
    N: Neighborhood<M> + ?Sized,
{
    [ctx.head_labels()[4], ctx.tail_labels()[4]]
        .into_iter()
        .filter(|&label| is_counted_neighbor(ctx, label))
        .collect()
}

/// Property 1: `shared` is non-empty and every counted neighbor of the
/// expanded particle is reachable from a shared neighbor by walking around
/// the particle through occupied cells only.
pub fn check_property_one<M, N>(ctx: &N, shared: &[Label]) -> bool
where
    N: Neighborhood<M> + ?Sized,
{
    if shared.is_empty() {
        return false;
    }
    let labels = ctx.unique_labels();
    let len = labels.len();
    let mut reached = vec![false; len];
    for &label in shared {
        let target = ctx.node_at_label(label);
        let Some(start) = labels
            .iter()
            .position(|&unique| ctx.node_at_label(unique) == target)
        else {
            continue;
        };
        reached[start] = true;
        // Sweep counter-clockwise, then clockwise, stopping at the first gap.
        for offset in 1..len {
            let index = (start + offset) % len;
            if !is_counted_neighbor(ctx, labels[index]) {
                break;
            }
            reached[index] = true;
        }
        for offset in 1..len {
            let index = (start + len - offset) % len;
            if !is_counted_neighbor(ctx, labels[index]) {
                break;
            }
            reached[index] = true;
        }
    }
    reached.iter().filter(|&&hit| hit).count() == ctx.neighbor_count(labels)
}

/// Property 2: `shared` is empty, head and tail both have counted
/// neighbors, and each side's neighbors form one contiguous run.
pub fn check_property_two<M, N>(ctx: &N, shared: &[Label]) -> bool
where
    N: Neighborhood<M> + ?Sized,
{
    if !shared.is_empty() {
        return false;
    }
    let contiguous = |labels: &[Label]| {
        let total = ctx.neighbor_count(labels);
        let run = labels
            .iter()
            .skip_while(|&&label| !is_counted_neighbor(ctx, label))
            .take_while(|&&label| is_counted_neighbor(ctx, label))
            .count();
        total > 0 && total == run
    };
    contiguous(ctx.head_labels()) && contiguous(ctx.tail_labels())
}
