use parking_lot::Mutex;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::error::{GraphError, Result};
use crate::graph::Graph;

/// New graph with the same id range, holes and flags as `graph`, but no edges.
pub fn copy_nodes(graph: &Graph) -> Graph {
    let mut copy = Graph::new(
        graph.upper_node_id_bound(),
        graph.is_weighted(),
        graph.is_directed(),
    );
    for u in 0..graph.upper_node_id_bound() {
        if !graph.has_node(u) {
            copy.remove_node(u);
        }
    }
    copy
}

/// Undirected version of `graph`. Reciprocal edges collapse into one.
///
/// Already-undirected input is logged and copied.
pub fn to_undirected(graph: &Graph) -> Graph {
    if !graph.is_directed() {
        warn!("graph is already undirected");
    }
    graph.converted(graph.is_weighted(), false)
}

/// Weighted version of `graph`; every edge gets the unit weight.
///
/// Already-weighted input is logged and copied.
pub fn to_weighted(graph: &Graph) -> Graph {
    if graph.is_weighted() {
        warn!("graph is already weighted");
    }
    graph.converted(true, graph.is_directed())
}

/// Unweighted version of `graph`; edge weights are discarded.
///
/// Already-unweighted input is logged and copied.
pub fn to_unweighted(graph: &Graph) -> Graph {
    if !graph.is_weighted() {
        warn!("graph is already unweighted");
    }
    graph.converted(false, graph.is_directed())
}

/// Reverse every edge of a directed graph, keeping weights and edge ids.
///
/// Each node's adjacency record is built by exactly one worker: the source's
/// in-edges become its out-edges and vice versa, inserted as partial edges
/// without touching graph counters. Holes are removed from the result under
/// a lock, since that updates graph-wide bookkeeping. Edge count, self-loop
/// count and edge-id bound are copied once the workers have joined.
///
/// Returns [`GraphError::UndirectedTranspose`] for undirected input.
pub fn transpose(graph: &Graph) -> Result<Graph> {
    if !graph.is_directed() {
        return Err(GraphError::UndirectedTranspose);
    }

    let mut transposed = Graph::new(graph.upper_node_id_bound(), graph.is_weighted(), true);
    if graph.has_edge_ids() {
        transposed.index_edges();
    }

    {
        let (adjacency, slots) = transposed.parts_mut();
        let slots = Mutex::new(slots);

        adjacency.par_iter_mut().enumerate().for_each(|(u, adj)| {
            if graph.has_node(u) {
                adj.reserve(graph.degree_in(u), graph.degree_out(u));
                for &edge in graph.neighbors_in(u) {
                    adj.push_partial_out(edge);
                }
                for &edge in graph.neighbors_out(u) {
                    adj.push_partial_in(edge);
                }
            } else {
                slots.lock().remove(u);
            }
        });
    }

    transposed.set_edge_count(graph.edge_count());
    transposed.set_self_loop_count(graph.self_loop_count());
    transposed.set_upper_edge_id_bound(graph.upper_edge_id_bound());
    debug_assert!(transposed.check_consistency());

    debug!(
        nodes = transposed.node_count(),
        edges = transposed.edge_count(),
        bound = transposed.upper_node_id_bound(),
        "transposed graph"
    );
    Ok(transposed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{NodeId, DEFAULT_EDGE_WEIGHT};
    use crate::testing::{arb_directed_graph, arb_graph, count_warnings};
    use proptest::prelude::*;

    fn edge_set(g: &Graph) -> Vec<(NodeId, NodeId, Option<u64>)> {
        let mut edges: Vec<_> = g.edges().map(|(u, e)| (u, e.target, e.id)).collect();
        edges.sort();
        edges
    }

    fn make_cycle(n: usize) -> Graph {
        let mut g = Graph::new(n, true, true);
        for u in 0..n {
            g.add_edge(u, (u + 1) % n, (u + 1) as f64);
        }
        g
    }

    #[test]
    fn test_copy_nodes_keeps_holes() {
        let mut g = make_cycle(5);
        g.remove_node(3);
        let c = copy_nodes(&g);
        assert_eq!(c.upper_node_id_bound(), 5);
        assert_eq!(c.nodes().collect::<Vec<_>>(), vec![0, 1, 2, 4]);
        assert_eq!(c.edge_count(), 0);
        assert!(c.is_weighted() && c.is_directed());
    }

    #[test]
    fn test_transpose_cycle() {
        let g = make_cycle(4);
        let t = transpose(&g).unwrap();
        assert_eq!(t.edge_count(), 4);
        for u in 0..4 {
            let v = (u + 1) % 4;
            assert!(t.has_edge(v, u));
            assert!(!t.has_edge(u, v));
            assert_eq!(t.weight(v, u), Some((u + 1) as f64));
        }
        assert!(t.check_consistency());
    }

    #[test]
    fn test_transpose_undirected_fails() {
        let g = Graph::new(3, false, false);
        assert!(matches!(transpose(&g), Err(GraphError::UndirectedTranspose)));
        let empty = Graph::default();
        assert!(matches!(transpose(&empty), Err(GraphError::UndirectedTranspose)));
    }

    #[test]
    fn test_transpose_error_message() {
        let err = transpose(&Graph::default()).unwrap_err();
        assert_eq!(err.to_string(), "transpose undefined for undirected input");
    }

    #[test]
    fn test_transpose_holes_and_self_loops() {
        let mut g = Graph::new(5, false, true);
        g.add_edge(0, 0, DEFAULT_EDGE_WEIGHT);
        g.add_edge(0, 4, DEFAULT_EDGE_WEIGHT);
        g.remove_node(2);
        g.index_edges();
        let t = transpose(&g).unwrap();
        assert!(!t.has_node(2));
        assert_eq!(t.node_count(), 4);
        assert_eq!(t.self_loop_count(), 1);
        assert_eq!(t.upper_edge_id_bound(), Some(2));
        assert_eq!(t.neighbors_out(4)[0].id, g.neighbors_out(0)[1].id);
        assert!(t.check_consistency());
    }

    #[test]
    fn test_to_undirected() {
        let g = make_cycle(3);
        let u = to_undirected(&g);
        assert!(!u.is_directed());
        assert!(u.is_weighted());
        assert_eq!(u.edge_count(), 3);
        assert!(u.has_edge(1, 0));
        assert!(u.check_consistency());
    }

    #[test]
    fn test_to_undirected_noop_still_copies() {
        let mut g = Graph::new(2, false, false);
        g.add_edge(0, 1, DEFAULT_EDGE_WEIGHT);
        let (u, warnings) = count_warnings(|| to_undirected(&g));
        assert_eq!(warnings, 1);
        assert_eq!(edge_set(&u), edge_set(&g));
    }

    #[test]
    fn test_conversions_warn_only_on_noop() {
        let g = make_cycle(3);
        assert_eq!(count_warnings(|| to_undirected(&g)).1, 0);
        assert_eq!(count_warnings(|| to_unweighted(&g)).1, 0);
        let (w, warnings) = count_warnings(|| to_weighted(&g));
        assert_eq!(warnings, 1);
        assert_eq!(edge_set(&w), edge_set(&g));

        let plain = Graph::new(2, false, true);
        assert_eq!(count_warnings(|| to_weighted(&plain)).1, 0);
        assert_eq!(count_warnings(|| to_unweighted(&plain)).1, 1);
    }

    #[test]
    fn test_to_weighted_sets_unit_weights() {
        let mut g = Graph::new(3, false, true);
        g.add_edge(0, 1, DEFAULT_EDGE_WEIGHT);
        g.index_edges();
        let w = to_weighted(&g);
        assert!(w.is_weighted());
        assert_eq!(w.weight(0, 1), Some(DEFAULT_EDGE_WEIGHT));
        assert_eq!(w.upper_edge_id_bound(), Some(1));
        assert!(w.check_consistency());
    }

    #[test]
    fn test_to_unweighted_discards_weights() {
        let g = make_cycle(3);
        let u = to_unweighted(&g);
        assert!(!u.is_weighted());
        assert_eq!(u.weight(1, 2), Some(DEFAULT_EDGE_WEIGHT));
        assert_eq!(u.edge_count(), 3);
        let (again, warnings) = count_warnings(|| to_unweighted(&u));
        assert_eq!(warnings, 1);
        assert_eq!(edge_set(&again), edge_set(&u));
    }

    proptest! {
        #[test]
        fn prop_double_transpose_is_identity(g in arb_directed_graph()) {
            let t = transpose(&g).unwrap();
            prop_assert!(t.check_consistency());
            let tt = transpose(&t).unwrap();
            prop_assert!(tt.check_consistency());
            prop_assert_eq!(tt.nodes().collect::<Vec<_>>(), g.nodes().collect::<Vec<_>>());
            prop_assert_eq!(edge_set(&tt), edge_set(&g));
            prop_assert_eq!(tt.edge_count(), g.edge_count());
            prop_assert_eq!(tt.self_loop_count(), g.self_loop_count());
            prop_assert_eq!(tt.upper_edge_id_bound(), g.upper_edge_id_bound());
        }

        #[test]
        fn prop_transpose_reverses_edges(g in arb_directed_graph()) {
            let t = transpose(&g).unwrap();
            let mut reversed: Vec<_> = g.edges().map(|(u, e)| (e.target, u, e.id)).collect();
            reversed.sort();
            prop_assert_eq!(edge_set(&t), reversed);
        }

        #[test]
        fn prop_conversions_stay_consistent(g in arb_graph()) {
            prop_assert!(to_undirected(&g).check_consistency());
            prop_assert!(to_weighted(&g).check_consistency());
            prop_assert!(to_unweighted(&g).check_consistency());
            prop_assert_eq!(copy_nodes(&g).node_count(), g.node_count());
        }
    }
}
