use thiserror::Error;

use crate::graph::NodeId;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("transpose undefined for undirected input")]
    UndirectedTranspose,
    #[error("node {0} has no entry in the node id map")]
    UnmappedNode(NodeId),
    #[error("node id map has {map} entries but the graph has {nodes} nodes")]
    IdMapSizeMismatch { map: usize, nodes: usize },
    #[error("dense id {dense} is outside 0..{size}")]
    DenseIdOutOfRange { dense: NodeId, size: usize },
    #[error("invalid inverted id map: {0}")]
    InvalidInvertedMap(String),
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
