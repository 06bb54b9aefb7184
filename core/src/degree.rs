use rayon::prelude::*;

use crate::graph::Graph;

/// Maximum in- or out-degree over the whole id range, computed in parallel.
///
/// Holes report degree 0, so they never win the reduction. Returns 0 for an
/// empty or edgeless graph.
pub fn compute_max_degree(graph: &Graph, use_in_degree: bool) -> usize {
    (0..graph.upper_node_id_bound())
        .into_par_iter()
        .map(|u| {
            if use_in_degree {
                graph.degree_in(u)
            } else {
                graph.degree_out(u)
            }
        })
        .max()
        .unwrap_or(0)
}

pub fn max_degree(graph: &Graph) -> usize {
    compute_max_degree(graph, false)
}

pub fn max_in_degree(graph: &Graph) -> usize {
    compute_max_degree(graph, true)
}
