use std::collections::HashSet;
use std::ops::Range;

/// Index into a graph's node-id range. Removed ids stay in the range as holes.
pub type NodeId = usize;

/// Stable edge identifier, assigned once a graph is edge-indexed.
pub type EdgeId = u64;

pub type EdgeWeight = f64;

/// Weight reported for every edge of an unweighted graph.
pub const DEFAULT_EDGE_WEIGHT: EdgeWeight = 1.0;

/// One entry of an adjacency list.
///
/// `target` is the node at the other end from the owner of the list: the
/// head for outgoing lists, the tail for incoming lists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub target: NodeId,
    pub weight: EdgeWeight,
    pub id: Option<EdgeId>,
}

/// Per-node adjacency record.
///
/// Directed graphs keep independent `outgoing` and `incoming` lists.
/// Undirected graphs only use `outgoing`: an edge `{u, v}` with `u != v`
/// appears in both endpoints' lists, a self-loop appears once.
#[derive(Debug, Clone, Default)]
pub(crate) struct Adjacency {
    outgoing: Vec<Edge>,
    incoming: Vec<Edge>,
}

impl Adjacency {
    /// Pre-size both lists before a bulk build.
    pub(crate) fn reserve(&mut self, out_degree: usize, in_degree: usize) {
        self.outgoing.reserve_exact(out_degree);
        self.incoming.reserve_exact(in_degree);
    }

    /// Record an outgoing edge on this node only. Graph counters are untouched.
    pub(crate) fn push_partial_out(&mut self, edge: Edge) {
        self.outgoing.push(edge);
    }

    /// Record an incoming edge on this node only. Graph counters are untouched.
    pub(crate) fn push_partial_in(&mut self, edge: Edge) {
        self.incoming.push(edge);
    }

    fn is_empty(&self) -> bool {
        self.outgoing.is_empty() && self.incoming.is_empty()
    }
}

/// Node existence over `[0, upper bound)` plus the live node count.
///
/// This is the graph-level bookkeeping touched when a node is removed or
/// restored, as opposed to the per-node adjacency records.
#[derive(Debug, Clone)]
pub(crate) struct NodeSlots {
    exists: Vec<bool>,
    live: usize,
}

impl NodeSlots {
    fn filled(n: usize) -> Self {
        Self {
            exists: vec![true; n],
            live: n,
        }
    }

    fn contains(&self, u: NodeId) -> bool {
        self.exists.get(u).copied().unwrap_or(false)
    }

    fn bound(&self) -> usize {
        self.exists.len()
    }

    fn push(&mut self) -> NodeId {
        self.exists.push(true);
        self.live += 1;
        self.exists.len() - 1
    }

    /// Mark `u` as a hole.
    pub(crate) fn remove(&mut self, u: NodeId) {
        assert!(self.contains(u), "node {} does not exist", u);
        self.exists[u] = false;
        self.live -= 1;
    }

    fn restore(&mut self, u: NodeId) {
        assert!(
            u < self.exists.len() && !self.exists[u],
            "node {} is not a hole inside the id range",
            u
        );
        self.exists[u] = true;
        self.live += 1;
    }
}

/// Mutable sparse graph over a contiguous node-id range with holes.
///
/// Removing a node leaves a hole: ids are never shifted or reused, so an id
/// handed out once stays meaningful (or detectably invalid) for the lifetime
/// of the graph. Edge count and self-loop count are aggregate counters kept
/// in step with the adjacency lists by every public mutation.
#[derive(Debug, Clone)]
pub struct Graph {
    directed: bool,
    weighted: bool,
    slots: NodeSlots,
    adjacency: Vec<Adjacency>,
    edge_count: usize,
    self_loops: usize,
    edge_id_bound: Option<EdgeId>,
}

impl Graph {
    /// Create a graph with `n` nodes (ids `0..n`, all existing) and no edges.
    pub fn new(n: usize, weighted: bool, directed: bool) -> Self {
        Self {
            directed,
            weighted,
            slots: NodeSlots::filled(n),
            adjacency: vec![Adjacency::default(); n],
            edge_count: 0,
            self_loops: 0,
            edge_id_bound: None,
        }
    }

    /// Empty graph with room for `node_capacity` nodes.
    pub fn with_capacity(node_capacity: usize, weighted: bool, directed: bool) -> Self {
        let mut graph = Self::new(0, weighted, directed);
        graph.slots.exists.reserve(node_capacity);
        graph.adjacency.reserve(node_capacity);
        graph
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn is_weighted(&self) -> bool {
        self.weighted
    }

    /// Number of existing nodes (holes excluded).
    pub fn node_count(&self) -> usize {
        self.slots.live
    }

    /// Smallest id strictly greater than every id ever allocated.
    pub fn upper_node_id_bound(&self) -> usize {
        self.slots.bound()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn self_loop_count(&self) -> usize {
        self.self_loops
    }

    pub fn has_node(&self, u: NodeId) -> bool {
        self.slots.contains(u)
    }

    pub fn has_edge_ids(&self) -> bool {
        self.edge_id_bound.is_some()
    }

    /// Upper bound of assigned edge ids, or `None` if the graph is not edge-indexed.
    pub fn upper_edge_id_bound(&self) -> Option<EdgeId> {
        self.edge_id_bound
    }

    /// Out-degree of `u`. Holes and out-of-range ids have degree 0.
    pub fn degree_out(&self, u: NodeId) -> usize {
        self.neighbors_out(u).len()
    }

    /// In-degree of `u`. For undirected graphs this equals the degree.
    pub fn degree_in(&self, u: NodeId) -> usize {
        self.neighbors_in(u).len()
    }

    /// Outgoing edges of `u` (all incident edges if undirected).
    pub fn neighbors_out(&self, u: NodeId) -> &[Edge] {
        self.adjacency
            .get(u)
            .map(|a| a.outgoing.as_slice())
            .unwrap_or(&[])
    }

    /// Incoming edges of `u` (all incident edges if undirected).
    pub fn neighbors_in(&self, u: NodeId) -> &[Edge] {
        if !self.directed {
            return self.neighbors_out(u);
        }
        self.adjacency
            .get(u)
            .map(|a| a.incoming.as_slice())
            .unwrap_or(&[])
    }

    /// Whether an edge `u -> v` exists (`{u, v}` if undirected). O(degree(u)).
    pub fn has_edge(&self, u: NodeId, v: NodeId) -> bool {
        self.neighbors_out(u).iter().any(|e| e.target == v)
    }

    /// Weight of the first edge `u -> v`, if any.
    pub fn weight(&self, u: NodeId, v: NodeId) -> Option<EdgeWeight> {
        self.neighbors_out(u)
            .iter()
            .find(|e| e.target == v)
            .map(|e| e.weight)
    }

    /// Existing node ids in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.slots
            .exists
            .iter()
            .enumerate()
            .filter(|(_, &exists)| exists)
            .map(|(u, _)| u)
    }

    /// Every edge exactly once as `(source, edge)`, ascending by source.
    ///
    /// Undirected edges are reported from their smaller endpoint.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, &Edge)> + '_ {
        let directed = self.directed;
        self.nodes().flat_map(move |u| {
            self.adjacency[u]
                .outgoing
                .iter()
                .filter(move |e| directed || e.target >= u)
                .map(move |e| (u, e))
        })
    }

    /// Append a new node and return its id.
    pub fn add_node(&mut self) -> NodeId {
        self.adjacency.push(Adjacency::default());
        self.slots.push()
    }

    /// Append `count` new nodes and return their id range.
    pub fn add_nodes(&mut self, count: usize) -> Range<NodeId> {
        let start = self.upper_node_id_bound();
        for _ in 0..count {
            self.add_node();
        }
        start..self.upper_node_id_bound()
    }

    /// Turn `u` into a hole, dropping its incident edges.
    ///
    /// Panics if `u` does not exist.
    pub fn remove_node(&mut self, u: NodeId) {
        assert!(self.has_node(u), "remove_node: node {} does not exist", u);

        let adj = std::mem::take(&mut self.adjacency[u]);
        for e in &adj.outgoing {
            if e.target == u {
                self.self_loops -= 1;
            } else if self.directed {
                remove_entry(&mut self.adjacency[e.target].incoming, u, e.id);
            } else {
                remove_entry(&mut self.adjacency[e.target].outgoing, u, e.id);
            }
            self.edge_count -= 1;
        }
        for e in adj.incoming.iter().filter(|e| e.target != u) {
            remove_entry(&mut self.adjacency[e.target].outgoing, u, e.id);
            self.edge_count -= 1;
        }

        self.slots.remove(u);
    }

    /// Reinstate the hole `u` as an isolated node with the same id.
    ///
    /// Panics if `u` is outside the id range or already exists.
    pub fn restore_node(&mut self, u: NodeId) {
        self.slots.restore(u);
    }

    /// Add an edge `u -> v` (`{u, v}` if undirected).
    ///
    /// Unweighted graphs ignore `weight` and store [`DEFAULT_EDGE_WEIGHT`].
    /// Edge-indexed graphs assign the next free edge id.
    /// Panics if either endpoint does not exist.
    pub fn add_edge(&mut self, u: NodeId, v: NodeId, weight: EdgeWeight) {
        assert!(
            self.has_node(u) && self.has_node(v),
            "add_edge: endpoint {} or {} does not exist",
            u,
            v
        );

        let weight = if self.weighted { weight } else { DEFAULT_EDGE_WEIGHT };
        let id = match self.edge_id_bound {
            Some(next) => {
                self.edge_id_bound = Some(next + 1);
                Some(next)
            }
            None => None,
        };

        self.adjacency[u].outgoing.push(Edge { target: v, weight, id });
        if self.directed {
            self.adjacency[v].incoming.push(Edge { target: u, weight, id });
        } else if u != v {
            self.adjacency[v].outgoing.push(Edge { target: u, weight, id });
        }

        if u == v {
            self.self_loops += 1;
        }
        self.edge_count += 1;
    }

    /// Assign stable ids to every edge. No-op if already indexed.
    ///
    /// Ids are handed out in edge-iteration order starting at 0; both
    /// adjacency entries of an edge receive the same id.
    pub fn index_edges(&mut self) {
        if self.edge_id_bound.is_some() {
            return;
        }

        let mut next: EdgeId = 0;
        for u in 0..self.adjacency.len() {
            for k in 0..self.adjacency[u].outgoing.len() {
                let entry = self.adjacency[u].outgoing[k];
                if entry.id.is_some() {
                    // undirected edge already numbered from its other endpoint
                    continue;
                }
                let id = next;
                next += 1;
                self.adjacency[u].outgoing[k].id = Some(id);

                let mirror = if self.directed {
                    &mut self.adjacency[entry.target].incoming
                } else if entry.target != u {
                    &mut self.adjacency[entry.target].outgoing
                } else {
                    continue;
                };
                if let Some(m) = mirror
                    .iter_mut()
                    .find(|e| e.target == u && e.id.is_none())
                {
                    m.id = Some(id);
                }
            }
        }

        self.edge_id_bound = Some(next);
    }

    /// Split borrow for bulk parallel builds: per-node adjacency records and
    /// the node-existence bookkeeping.
    pub(crate) fn parts_mut(&mut self) -> (&mut [Adjacency], &mut NodeSlots) {
        (&mut self.adjacency, &mut self.slots)
    }

    pub(crate) fn set_edge_count(&mut self, count: usize) {
        self.edge_count = count;
    }

    pub(crate) fn set_self_loop_count(&mut self, count: usize) {
        self.self_loops = count;
    }

    pub(crate) fn set_upper_edge_id_bound(&mut self, bound: Option<EdgeId>) {
        self.edge_id_bound = bound;
    }

    /// Verify that adjacency lists, node bookkeeping and aggregate counters agree.
    pub fn check_consistency(&self) -> bool {
        if self.adjacency.len() != self.slots.bound() {
            return false;
        }
        if self.slots.exists.iter().filter(|&&e| e).count() != self.slots.live {
            return false;
        }

        let id_ok = |e: &Edge| match (self.edge_id_bound, e.id) {
            (Some(bound), Some(id)) => id < bound,
            (None, None) => true,
            _ => false,
        };

        let mut out_sum = 0usize;
        let mut in_sum = 0usize;
        let mut loops = 0usize;
        for (u, adj) in self.adjacency.iter().enumerate() {
            if !self.slots.exists[u] {
                if !adj.is_empty() {
                    return false;
                }
                continue;
            }
            if !self.directed && !adj.incoming.is_empty() {
                return false;
            }
            for e in adj.outgoing.iter().chain(adj.incoming.iter()) {
                if !self.has_node(e.target) || !id_ok(e) {
                    return false;
                }
            }
            loops += adj.outgoing.iter().filter(|e| e.target == u).count();
            out_sum += adj.outgoing.len();
            in_sum += adj.incoming.len();
        }

        let edges = if self.directed {
            if out_sum != in_sum {
                return false;
            }
            out_sum
        } else {
            if (out_sum + loops) % 2 != 0 {
                return false;
            }
            (out_sum + loops) / 2
        };

        edges == self.edge_count && loops == self.self_loops
    }

    /// Standard conversion into a graph with the given flags.
    ///
    /// Node ids and holes are kept. Directed to undirected collapses every
    /// group of edges between the same pair of nodes (either direction) into
    /// one edge carrying the weight of the first edge in iteration order.
    /// Undirected to directed emits both directions per edge (one per
    /// self-loop). Changing only the weight flag keeps topology and edge
    /// ids verbatim. Otherwise the result is indexed iff `self` was.
    pub fn converted(&self, weighted: bool, directed: bool) -> Graph {
        let mut result = Graph {
            directed,
            weighted,
            slots: self.slots.clone(),
            adjacency: vec![Adjacency::default(); self.adjacency.len()],
            edge_count: 0,
            self_loops: 0,
            edge_id_bound: None,
        };

        if directed == self.directed {
            result.adjacency = self.adjacency.clone();
            if !weighted {
                for adj in &mut result.adjacency {
                    for e in adj.outgoing.iter_mut().chain(adj.incoming.iter_mut()) {
                        e.weight = DEFAULT_EDGE_WEIGHT;
                    }
                }
            }
            result.edge_count = self.edge_count;
            result.self_loops = self.self_loops;
            result.edge_id_bound = self.edge_id_bound;
            return result;
        }

        if self.directed {
            let mut seen: HashSet<(NodeId, NodeId)> = HashSet::with_capacity(self.edge_count);
            for (u, e) in self.edges() {
                if seen.insert((u.min(e.target), u.max(e.target))) {
                    result.add_edge(u, e.target, e.weight);
                }
            }
        } else {
            for (u, e) in self.edges() {
                result.add_edge(u, e.target, e.weight);
                if u != e.target {
                    result.add_edge(e.target, u, e.weight);
                }
            }
        }

        if self.has_edge_ids() {
            result.index_edges();
        }
        result
    }

    /// Rebuild the graph on a hole-free id range of `node_count` nodes,
    /// moving every edge (with its weight) to `map(source), map(target)`.
    ///
    /// `map` must send every existing node into `0..node_count`. Edge ids
    /// are reassigned if `self` was indexed.
    pub fn remapped<F>(&self, node_count: usize, map: F) -> Graph
    where
        F: Fn(NodeId) -> NodeId,
    {
        let mut result = Graph::new(node_count, self.weighted, self.directed);
        for (u, e) in self.edges() {
            result.add_edge(map(u), map(e.target), e.weight);
        }
        if self.has_edge_ids() {
            result.index_edges();
        }
        result
    }

    /// Approximate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        use std::mem::size_of;

        let slots_mem = self.slots.exists.capacity() * size_of::<bool>();
        let records_mem = self.adjacency.capacity() * size_of::<Adjacency>();
        let edges_mem: usize = self
            .adjacency
            .iter()
            .map(|a| (a.outgoing.capacity() + a.incoming.capacity()) * size_of::<Edge>())
            .sum();

        slots_mem + records_mem + edges_mem
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new(0, false, false)
    }
}

/// Remove the first entry pointing at `target` with the given id.
fn remove_entry(list: &mut Vec<Edge>, target: NodeId, id: Option<EdgeId>) {
    if let Some(pos) = list.iter().position(|e| e.target == target && e.id == id) {
        list.remove(pos);
    }
}
