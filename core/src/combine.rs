use tracing::debug;

use crate::graph::{Graph, NodeId};

/// Append a copy of `source` to `target` under freshly allocated ids.
///
/// Existing nodes and edges of `target` are untouched. Weights are carried
/// over when `target` is weighted.
pub fn append(target: &mut Graph, source: &Graph) {
    // only entries of existing source nodes are ever read
    let mut node_map: Vec<NodeId> = vec![0; source.upper_node_id_bound()];
    for u in source.nodes() {
        node_map[u] = target.add_node();
    }

    for (u, e) in source.edges() {
        target.add_edge(node_map[u], node_map[e.target], e.weight);
    }

    debug!(
        appended_nodes = source.node_count(),
        appended_edges = source.edge_count(),
        nodes = target.node_count(),
        "appended graph"
    );
}

/// Union `source` into `target`, keeping node ids as they are.
///
/// If `source` has a larger id range, `target` grows to match and the new
/// ids that are holes in `source` become holes in `target`. Holes of
/// `target` that exist in `source` are restored. Each edge of `source` is
/// added unless `target` already has an edge between the same endpoints,
/// which makes repeated merges idempotent.
///
/// The duplicate check scans adjacency lists, so the cost is
/// O(|E(source)| * max degree of `target`).
pub fn merge(target: &mut Graph, source: &Graph) {
    let prev_bound = target.upper_node_id_bound();
    if source.upper_node_id_bound() > prev_bound {
        let grown = target.add_nodes(source.upper_node_id_bound() - prev_bound);
        for u in grown {
            if !source.has_node(u) {
                target.remove_node(u);
            }
        }
    }

    for u in 0..target.upper_node_id_bound() {
        if !target.has_node(u) && source.has_node(u) {
            target.restore_node(u);
        }
    }

    let mut added = 0usize;
    for (u, e) in source.edges() {
        if !target.has_edge(u, e.target) {
            target.add_edge(u, e.target, e.weight);
            added += 1;
        }
    }

    debug!(
        added_edges = added,
        nodes = target.node_count(),
        edges = target.edge_count(),
        "merged graph"
    );
}
