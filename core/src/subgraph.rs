use std::collections::HashSet;

use tracing::debug;

use crate::convert::copy_nodes;
use crate::graph::{Graph, NodeId};

/// Build the subgraph induced by `nodes`, optionally widened by one hop.
///
/// Every id is scored: 2 if it is in `nodes`, 1 if it is an out-neighbor
/// (with `include_out_neighbors`) or in-neighbor (with
/// `include_in_neighbors`) of some member, 0 otherwise. Nodes scoring 0 are
/// removed; an edge survives when the scores of its endpoints sum to more
/// than 2, so edges between two expansion-only neighbors are dropped.
///
/// The result keeps the source's id range, flags and edge weights. Ids in
/// `nodes` that are holes in `graph` stay holes.
pub fn subgraph_from_nodes(
    graph: &Graph,
    nodes: &HashSet<NodeId>,
    include_out_neighbors: bool,
    include_in_neighbors: bool,
) -> Graph {
    let mut neighbors: HashSet<NodeId> = HashSet::new();
    if include_out_neighbors || include_in_neighbors {
        for &u in nodes {
            if include_out_neighbors {
                neighbors.extend(graph.neighbors_out(u).iter().map(|e| e.target));
            }
            if include_in_neighbors {
                neighbors.extend(graph.neighbors_in(u).iter().map(|e| e.target));
            }
        }
    }

    let relevance = |u: NodeId| -> u8 {
        if nodes.contains(&u) {
            2
        } else if neighbors.contains(&u) {
            1
        } else {
            0
        }
    };

    let mut result = copy_nodes(graph);
    for u in graph.nodes() {
        if relevance(u) == 0 {
            result.remove_node(u);
        }
    }

    for (u, e) in graph.edges() {
        if relevance(u) + relevance(e.target) > 2 {
            result.add_edge(u, e.target, e.weight);
        }
    }

    debug!(
        requested = nodes.len(),
        nodes = result.node_count(),
        edges = result.edge_count(),
        "extracted subgraph"
    );
    result
}
