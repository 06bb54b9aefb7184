use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::error::{GraphError, Result};
use crate::graph::{Graph, NodeId, DEFAULT_EDGE_WEIGHT};

/// Injective map from original node ids onto the dense range `0..len()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeIdMap {
    map: HashMap<NodeId, NodeId>,
}

impl NodeIdMap {
    /// Assign dense ids `0, 1, ..` in the order `ids` are yielded.
    fn from_ordered<I>(ids: I) -> Self
    where
        I: IntoIterator<Item = NodeId>,
    {
        let map = ids
            .into_iter()
            .enumerate()
            .map(|(dense, original)| (original, dense))
            .collect();
        Self { map }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Dense id assigned to `original`.
    pub fn get(&self, original: NodeId) -> Option<NodeId> {
        self.map.get(&original).copied()
    }

    pub fn contains(&self, original: NodeId) -> bool {
        self.map.contains_key(&original)
    }

    /// `(original, dense)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.map.iter().map(|(&original, &dense)| (original, dense))
    }
}

/// Dense id to original id, plus a trailing entry holding the original
/// upper node id bound (the compacted graph alone cannot recover it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvertedIdMap {
    ids: Vec<NodeId>,
}

impl InvertedIdMap {
    /// Number of dense ids (the trailing bound entry is not counted).
    pub fn len(&self) -> usize {
        self.ids.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn original_id(&self, dense: NodeId) -> Option<NodeId> {
        self.ids[..self.len()].get(dense).copied()
    }

    /// Upper node id bound of the original graph.
    pub fn upper_node_id_bound(&self) -> usize {
        self.ids[self.len()]
    }

    /// Raw array including the trailing bound entry.
    pub fn as_slice(&self) -> &[NodeId] {
        &self.ids
    }
}

impl TryFrom<Vec<NodeId>> for InvertedIdMap {
    type Error = GraphError;

    /// Wrap a raw array whose last entry is the original upper node id bound.
    fn try_from(ids: Vec<NodeId>) -> Result<Self> {
        if ids.is_empty() {
            return Err(GraphError::InvalidInvertedMap(
                "missing upper node id bound entry".to_string(),
            ));
        }
        Ok(Self { ids })
    }
}

/// Dense ids in ascending order of original id.
pub fn get_continuous_node_ids(graph: &Graph) -> NodeIdMap {
    NodeIdMap::from_ordered(graph.nodes())
}

/// Dense ids in an order drawn from `rng`.
///
/// Same bijection guarantee as [`get_continuous_node_ids`]; pass a seeded
/// generator for reproducible assignments.
pub fn get_random_continuous_node_ids<R>(graph: &Graph, rng: &mut R) -> NodeIdMap
where
    R: Rng + ?Sized,
{
    let mut nodes: Vec<NodeId> = Vec::with_capacity(graph.node_count());
    nodes.extend(graph.nodes());
    nodes.shuffle(rng);
    NodeIdMap::from_ordered(nodes)
}

/// Relabel `graph` onto `0..node_id_map.len()` using `node_id_map`.
///
/// Every existing node of `graph` must be mapped into that range.
pub fn get_compacted_graph(graph: &Graph, node_id_map: &NodeIdMap) -> Result<Graph> {
    let size = node_id_map.len();
    for u in graph.nodes() {
        match node_id_map.get(u) {
            None => return Err(GraphError::UnmappedNode(u)),
            Some(dense) if dense >= size => {
                return Err(GraphError::DenseIdOutOfRange { dense, size })
            }
            Some(_) => {}
        }
    }

    // every existing node was checked above
    let compacted = graph.remapped(size, |u| node_id_map.map[&u]);
    debug!(
        nodes = compacted.node_count(),
        edges = compacted.edge_count(),
        from_bound = graph.upper_node_id_bound(),
        "compacted graph"
    );
    Ok(compacted)
}

/// Invert a map produced for `graph`, appending `graph`'s upper node id bound.
pub fn invert_continuous_node_ids(node_id_map: &NodeIdMap, graph: &Graph) -> Result<InvertedIdMap> {
    let n = graph.node_count();
    if node_id_map.len() != n {
        return Err(GraphError::IdMapSizeMismatch {
            map: node_id_map.len(),
            nodes: n,
        });
    }

    let mut ids = vec![0; n + 1];
    ids[n] = graph.upper_node_id_bound();
    for (original, dense) in node_id_map.iter() {
        if dense >= n {
            return Err(GraphError::DenseIdOutOfRange { dense, size: n });
        }
        ids[dense] = original;
    }
    Ok(InvertedIdMap { ids })
}

/// Rebuild a compacted graph over its original id range, without weights.
///
/// Ids listed in `inverted` are reinstated, all others stay holes. Every
/// edge is re-added once under its original endpoints with the unit
/// weight, even when the graph is weighted: only topology round-trips.
/// Use [`restore_graph_with_weights`] to keep weights.
pub fn restore_graph(inverted: &InvertedIdMap, compacted: &Graph) -> Result<Graph> {
    restore(inverted, compacted, false)
}

/// Like [`restore_graph`], but each edge keeps its weight.
pub fn restore_graph_with_weights(inverted: &InvertedIdMap, compacted: &Graph) -> Result<Graph> {
    restore(inverted, compacted, true)
}

fn restore(inverted: &InvertedIdMap, compacted: &Graph, keep_weights: bool) -> Result<Graph> {
    let n = inverted.len();
    if compacted.node_count() != n || compacted.upper_node_id_bound() != n {
        return Err(GraphError::InvalidInvertedMap(format!(
            "{} dense ids for a compacted graph with {} nodes and id bound {}",
            n,
            compacted.node_count(),
            compacted.upper_node_id_bound()
        )));
    }

    let bound = inverted.upper_node_id_bound();
    let mut present = vec![false; bound];
    for &original in &inverted.as_slice()[..n] {
        if original >= bound {
            return Err(GraphError::InvalidInvertedMap(format!(
                "original id {} is not below the bound {}",
                original, bound
            )));
        }
        if std::mem::replace(&mut present[original], true) {
            return Err(GraphError::InvalidInvertedMap(format!(
                "original id {} appears twice",
                original
            )));
        }
    }

    let mut restored = Graph::new(bound, compacted.is_weighted(), compacted.is_directed());
    for (u, &exists) in present.iter().enumerate() {
        if !exists {
            restored.remove_node(u);
        }
    }

    let ids = inverted.as_slice();
    for (u, e) in compacted.edges() {
        let weight = if keep_weights { e.weight } else { DEFAULT_EDGE_WEIGHT };
        restored.add_edge(ids[u], ids[e.target], weight);
    }

    debug!(
        nodes = restored.node_count(),
        edges = restored.edge_count(),
        bound,
        keep_weights,
        "restored graph"
    );
    Ok(restored)
}
