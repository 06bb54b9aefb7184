//! graph-tools-core: topology transformations over sparse in-memory graphs.
//!
//! A pure Rust library built around a mutable graph whose node ids live in a
//! contiguous range with holes: removing a node never shifts or reuses ids.
//! On top of it sit the structural operations: degree aggregation, induced
//! subgraphs, directedness and weight conversion, transpose, append and
//! merge, and id compaction with round-trip restoration.
//!
//! Every transformation builds a new graph and leaves its input untouched,
//! except [`append`] and [`merge`], which grow a caller-owned target.
//! Degree aggregation and transpose run on the current rayon pool; see
//! [`PoolConfig`] to bound it.

mod combine;
mod compact;
mod config;
mod convert;
mod degree;
mod error;
mod graph;
mod subgraph;

#[cfg(test)]
mod testing;

pub use combine::{append, merge};
pub use compact::{
    get_compacted_graph, get_continuous_node_ids, get_random_continuous_node_ids,
    invert_continuous_node_ids, restore_graph, restore_graph_with_weights, InvertedIdMap,
    NodeIdMap,
};
pub use config::{PoolConfig, THREADS_ENV};
pub use convert::{copy_nodes, to_undirected, to_unweighted, to_weighted, transpose};
pub use degree::{compute_max_degree, max_degree, max_in_degree};
pub use error::{GraphError, Result};
pub use graph::{Edge, EdgeId, EdgeWeight, Graph, NodeId, DEFAULT_EDGE_WEIGHT};
pub use subgraph::subgraph_from_nodes;
