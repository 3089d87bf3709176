//! DFS postorder numbering and SCC decomposition.
//!
//! Two passes over the position graph (Kosaraju):
//!
//! 1. A depth-first search from the source records each position as it
//!    finishes. The finishing index is stored on the [`Position`] itself.
//! 2. Walking positions in *reverse* postorder, a search over the
//!    transposed edges collects every not-yet-assigned predecessor. Each such
//!    search yields exactly one maximal SCC.
//!
//! Both passes use explicit stacks; nesting depth of the content model never
//! turns into call-stack depth here.
//!
//! [`Position`]: crate::position::Position

use fixedbitset::FixedBitSet;
use petgraph::Direction;
use petgraph::visit::DfsPostOrder;

use crate::position::{Arena, PositionId};

/// Number every position reachable from `source` in DFS postorder.
///
/// Returns the positions in finishing order. Revisited positions are skipped,
/// so cycles neither loop forever nor get numbered twice.
pub(crate) fn assign_post_order<T>(arena: &mut Arena<T>, source: PositionId) -> Vec<PositionId> {
    let mut order = Vec::with_capacity(arena.node_count());
    let mut dfs = DfsPostOrder::new(&*arena, source);
    while let Some(id) = dfs.next(&*arena) {
        order.push(id);
    }

    for (index, &id) in order.iter().enumerate() {
        arena[id].set_post_order(index);
    }
    order
}

/// Partition the positions in `post_order` into maximal SCCs.
///
/// Components are returned in discovery order: the first one contains the
/// last position to finish (the source).
pub(crate) fn strongly_connected<T>(
    arena: &Arena<T>,
    post_order: &[PositionId],
) -> Vec<Vec<PositionId>> {
    let mut assigned = FixedBitSet::with_capacity(arena.node_count());
    let mut components: Vec<Vec<PositionId>> = Vec::new();
    let mut stack: Vec<PositionId> = Vec::new();

    for &root in post_order.iter().rev() {
        if assigned.put(root.index()) {
            continue;
        }

        let mut members = Vec::new();
        stack.push(root);
        while let Some(current) = stack.pop() {
            members.push(current);
            for pred in arena.neighbors_directed(current, Direction::Incoming) {
                // Predecessors the first pass never reached are outside the
                // analysed graph.
                if arena[pred].post_order().is_some() && !assigned.put(pred.index()) {
                    stack.push(pred);
                }
            }
        }
        components.push(members);
    }

    components
}
