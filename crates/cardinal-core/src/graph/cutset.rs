//! Required-component detection.
//!
//! A component is *required* when it is a cut-set of the position graph:
//! with its members removed, the sink is no longer reachable from the source.
//!
//! Two interchangeable strategies:
//!
//! - [`CutSetStrategy::Reachability`] runs one fresh search per component,
//!   `O(C · (V + E))`.
//! - [`CutSetStrategy::Dominators`] condenses the graph into its component
//!   DAG and marks every component on the sink's dominator chain. Any
//!   source→sink path avoiding a component in the original graph maps to a
//!   condensed path avoiding its node and vice versa, so both agree.

use fixedbitset::FixedBitSet;
use petgraph::algo::dominators;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use tracing::trace;

use crate::config::CutSetStrategy;
use crate::graph::component::ConnectedComponent;
use crate::position::{Arena, PositionId};

/// Compute the required flag for every component.
///
/// `component_of[i]` is the index into `components` of the position with
/// arena index `i`, or `None` when the position was never reached.
pub(crate) fn required_flags<T>(
    arena: &Arena<T>,
    source: PositionId,
    sink: PositionId,
    components: &[ConnectedComponent],
    component_of: &[Option<usize>],
    strategy: CutSetStrategy,
) -> Vec<bool> {
    match strategy {
        CutSetStrategy::Reachability => {
            by_reachability(arena, source, sink, components, component_of)
        }
        CutSetStrategy::Dominators => by_dominators(arena, source, sink, components, component_of),
    }
}

fn by_reachability<T>(
    arena: &Arena<T>,
    source: PositionId,
    sink: PositionId,
    components: &[ConnectedComponent],
    component_of: &[Option<usize>],
) -> Vec<bool> {
    let mut visited = FixedBitSet::with_capacity(arena.node_count());
    let mut stack = Vec::new();

    (0..components.len())
        .map(|index| {
            visited.clear();
            let avoided = |id: PositionId| component_of[id.index()] == Some(index);
            let required = !reaches(arena, source, sink, avoided, &mut visited, &mut stack);
            trace!(component = index, required, "cut-set check");
            required
        })
        .collect()
}

/// Iterative search from `source` to `sink` that never enters a position for
/// which `avoided` holds.
fn reaches<T>(
    arena: &Arena<T>,
    source: PositionId,
    sink: PositionId,
    avoided: impl Fn(PositionId) -> bool,
    visited: &mut FixedBitSet,
    stack: &mut Vec<PositionId>,
) -> bool {
    if avoided(source) || avoided(sink) {
        return false;
    }

    stack.clear();
    visited.insert(source.index());
    stack.push(source);

    while let Some(current) = stack.pop() {
        if current == sink {
            return true;
        }
        for next in arena.neighbors(current) {
            if !avoided(next) && !visited.put(next.index()) {
                stack.push(next);
            }
        }
    }

    false
}

fn by_dominators<T>(
    arena: &Arena<T>,
    source: PositionId,
    sink: PositionId,
    components: &[ConnectedComponent],
    component_of: &[Option<usize>],
) -> Vec<bool> {
    let mut required = vec![false; components.len()];
    let (Some(source_cc), Some(sink_cc)) =
        (component_of[source.index()], component_of[sink.index()])
    else {
        return required;
    };

    // Condensed DAG: node i stands for components[i].
    let mut condensed: DiGraph<usize, ()> = DiGraph::with_capacity(components.len(), 0);
    for index in 0..components.len() {
        condensed.add_node(index);
    }
    for edge in arena.edge_references() {
        let ends = (
            component_of[edge.source().index()],
            component_of[edge.target().index()],
        );
        if let (Some(from), Some(to)) = ends {
            if from != to {
                condensed.update_edge(NodeIndex::new(from), NodeIndex::new(to), ());
            }
        }
    }

    let doms = dominators::simple_fast(&condensed, NodeIndex::new(source_cc));
    if let Some(chain) = doms.dominators(NodeIndex::new(sink_cc)) {
        for node in chain {
            required[condensed[node]] = true;
        }
    }

    required
}
