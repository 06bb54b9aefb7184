use std::collections::HashSet;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use graph_tools_core::{
    append, copy_nodes, get_compacted_graph, get_continuous_node_ids,
    get_random_continuous_node_ids, invert_continuous_node_ids, max_degree, max_in_degree, merge,
    restore_graph, subgraph_from_nodes, to_undirected, transpose, EdgeId, Graph, NodeId,
    PoolConfig,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::ThreadPool;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Run every generator (default)
    All,
    /// Erdos-Renyi uniform random edges
    Random,
    /// Preferential attachment via edge sampling (hub-and-spoke)
    Scalefree,
    /// Watts-Strogatz ring lattice + shortcuts
    Smallworld,
}

#[derive(Debug, Parser)]
#[command(
    name = "graph-tools-bench",
    about = "Time graph-tools-core transformations on synthetic graphs with holes"
)]
struct Args {
    #[arg(value_enum, default_value_t = Mode::All)]
    mode: Mode,

    /// Node ids to allocate before punching holes
    #[arg(long, default_value_t = 1_000_000)]
    nodes: usize,

    /// Worker threads (defaults to GRAPH_TOOLS_THREADS, then one per logical CPU)
    #[arg(long)]
    threads: Option<usize>,

    /// Seed for graph generation and randomized compaction
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Fraction of node ids removed after generation
    #[arg(long, default_value_t = 0.05)]
    hole_fraction: f64,
}

type Generator = fn(usize, &mut StdRng) -> Graph;

fn main() -> graph_tools_core::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = args
        .threads
        .map(PoolConfig::with_threads)
        .unwrap_or_else(PoolConfig::from_env);
    let pool = config.build_pool()?;
    info!(threads = pool.current_num_threads(), "worker pool ready");

    println!("graph-tools-bench");
    println!("=================");
    println!();

    let generators: Vec<(&str, Generator)> = match args.mode {
        Mode::Random => vec![("Erdos-Renyi random", gen_random)],
        Mode::Scalefree => vec![("Scale-free (edge sampling)", gen_scale_free)],
        Mode::Smallworld => vec![("Small-world (Watts-Strogatz)", gen_small_world)],
        Mode::All => vec![
            ("Erdos-Renyi random", gen_random as Generator),
            ("Scale-free (edge sampling)", gen_scale_free),
            ("Small-world (Watts-Strogatz)", gen_small_world),
        ],
    };

    for (name, generator) in generators {
        run_benchmark(name, generator, &args, &pool)?;
    }
    Ok(())
}

fn timed<T>(label: &str, f: impl FnOnce() -> T) -> T {
    let t = Instant::now();
    let out = f();
    println!("{:>28} {:>10.1}ms", label, t.elapsed().as_secs_f64() * 1000.0);
    out
}

fn run_benchmark(
    name: &str,
    generator: Generator,
    args: &Args,
    pool: &ThreadPool,
) -> graph_tools_core::Result<()> {
    println!("--- {} ---", name);
    println!("Target: {} node ids", args.nodes);

    let mut rng = StdRng::seed_from_u64(args.seed);
    let t = Instant::now();
    let mut graph = generator(args.nodes, &mut rng);
    punch_holes(&mut graph, args.hole_fraction, &mut rng);
    graph.index_edges();
    println!(
        "Generated in {:.2}s: {} nodes (bound {}), {} edges, {} self-loops, ~{:.0}MB",
        t.elapsed().as_secs_f64(),
        graph.node_count(),
        graph.upper_node_id_bound(),
        graph.edge_count(),
        graph.self_loop_count(),
        graph.memory_usage() as f64 / 1_048_576.0
    );
    println!();

    let max_out = timed("max out-degree", || pool.install(|| max_degree(&graph)));
    let max_in = timed("max in-degree", || pool.install(|| max_in_degree(&graph)));
    println!("{:>28} out={} in={}", "", max_out, max_in);

    let transposed = timed("transpose", || pool.install(|| transpose(&graph)))?;
    let round = timed("transpose (again)", || pool.install(|| transpose(&transposed)))?;
    if round.edge_count() != graph.edge_count() || edge_set(&round) != edge_set(&graph) {
        println!("{:>28} MISMATCH after double transpose", "");
    }
    drop(round);

    let undirected = timed("to_undirected", || to_undirected(&graph));
    println!("{:>28} {} undirected edges", "", undirected.edge_count());
    drop(undirected);

    let stride = (graph.node_count() / 100).max(1);
    let seeds: HashSet<NodeId> = graph.nodes().step_by(stride).collect();
    let sub = timed("subgraph (100 seeds, 1 hop)", || {
        subgraph_from_nodes(&graph, &seeds, true, true)
    });
    println!("{:>28} {} nodes, {} edges", "", sub.node_count(), sub.edge_count());

    let map = timed("continuous ids", || get_continuous_node_ids(&graph));
    let compacted = timed("compact", || get_compacted_graph(&graph, &map))?;
    let inverted = timed("invert ids", || invert_continuous_node_ids(&map, &graph))?;
    let restored = timed("restore", || restore_graph(&inverted, &compacted))?;
    if restored.node_count() != graph.node_count() || endpoints(&restored) != endpoints(&graph) {
        println!("{:>28} MISMATCH after compaction round trip", "");
    }
    drop((compacted, restored));

    let shuffled = timed("random continuous ids", || {
        get_random_continuous_node_ids(&graph, &mut rng)
    });
    let compacted = timed("compact (random)", || get_compacted_graph(&graph, &shuffled))?;
    println!(
        "{:>28} {} nodes, bound {}",
        "",
        compacted.node_count(),
        compacted.upper_node_id_bound()
    );
    drop(compacted);

    let mut target = copy_nodes(&graph);
    timed("merge into node copy", || merge(&mut target, &graph));
    timed("merge again (no-op)", || merge(&mut target, &graph));
    timed("append subgraph", || append(&mut target, &sub));
    println!("{:>28} {} nodes, {} edges", "", target.node_count(), target.edge_count());
    println!();

    Ok(())
}

/// Sorted `(source, target, id)` triples.
fn edge_set(graph: &Graph) -> Vec<(NodeId, NodeId, Option<EdgeId>)> {
    let mut edges: Vec<_> = graph.edges().map(|(u, e)| (u, e.target, e.id)).collect();
    edges.sort_unstable();
    edges
}

/// Sorted `(source, target)` pairs. Restore drops weights and edge ids.
fn endpoints(graph: &Graph) -> Vec<(NodeId, NodeId)> {
    let mut edges: Vec<_> = graph.edges().map(|(u, e)| (u, e.target)).collect();
    edges.sort_unstable();
    edges
}

// ---------------------------------------------------------------------------
// Generators: directed, weighted, seeded
// ---------------------------------------------------------------------------

/// Remove about `fraction` of the node ids to leave holes in the id range.
fn punch_holes(graph: &mut Graph, fraction: f64, rng: &mut StdRng) {
    let bound = graph.upper_node_id_bound();
    if bound == 0 {
        return;
    }
    let target = (bound as f64 * fraction.clamp(0.0, 1.0)) as usize;
    for _ in 0..target {
        let u = rng.gen_range(0..bound);
        if graph.has_node(u) {
            graph.remove_node(u);
        }
    }
}

/// Directed, weighted graph with `node_count` fresh ids.
fn with_nodes(node_count: usize) -> Graph {
    let mut graph = Graph::with_capacity(node_count, true, true);
    graph.add_nodes(node_count);
    graph
}

/// Erdos-Renyi: ~10 uniform random edges per node. Baseline topology.
fn gen_random(node_count: usize, rng: &mut StdRng) -> Graph {
    let mut graph = with_nodes(node_count);
    if node_count == 0 {
        return graph;
    }
    for _ in 0..node_count * 10 {
        let from = rng.gen_range(0..node_count);
        let to = rng.gen_range(0..node_count);
        graph.add_edge(from, to, rng.gen_range(0.1..10.0));
    }
    graph
}

/// Scale-free via edge-list sampling (O(edges), not O(n²)).
///
/// Preferential attachment by picking a random existing edge endpoint:
/// nodes with more edges are more likely to be picked.
fn gen_scale_free(node_count: usize, rng: &mut StdRng) -> Graph {
    let edges_per_node = 10usize;
    let seed = 5usize.min(node_count);
    let mut graph = with_nodes(node_count);
    let mut endpoints: Vec<NodeId> = Vec::with_capacity(node_count * edges_per_node * 2);

    for i in 0..seed {
        for j in (i + 1)..seed {
            graph.add_edge(i, j, 1.0);
            endpoints.extend([i, j]);
        }
    }

    for new_node in seed..node_count {
        if endpoints.is_empty() {
            break;
        }
        for _ in 0..edges_per_node.min(new_node) {
            let target = endpoints[rng.gen_range(0..endpoints.len())];
            if target != new_node {
                graph.add_edge(new_node, target, rng.gen_range(0.1..10.0));
                endpoints.extend([new_node, target]);
            }
        }
    }
    graph
}

/// Small-world (Watts-Strogatz): ring lattice with 5% of edges rewired.
fn gen_small_world(node_count: usize, rng: &mut StdRng) -> Graph {
    let k = 10usize;
    let p = 0.05f64;
    let mut graph = with_nodes(node_count);

    for i in 0..node_count {
        for j in 1..=k.min(node_count.saturating_sub(1)) {
            let neighbor = (i + j) % node_count;
            let target = if rng.gen_bool(p) {
                rng.gen_range(0..node_count)
            } else {
                neighbor
            };
            graph.add_edge(i, target, rng.gen_range(0.1..10.0));
        }
    }
    graph
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_graph() -> Graph {
        let mut rng = StdRng::seed_from_u64(7);
        let mut graph = gen_small_world(200, &mut rng);
        punch_holes(&mut graph, 0.1, &mut rng);
        graph.index_edges();
        graph
    }

    #[test]
    fn test_double_transpose_keeps_edge_set() {
        let graph = small_graph();
        let round = transpose(&transpose(&graph).unwrap()).unwrap();
        assert_eq!(edge_set(&round), edge_set(&graph));
    }

    #[test]
    fn test_edge_set_sees_reversed_edges() {
        let mut graph = with_nodes(3);
        graph.add_edge(0, 1, 1.0);
        let transposed = transpose(&graph).unwrap();
        assert_eq!(transposed.edge_count(), graph.edge_count());
        assert_ne!(endpoints(&transposed), endpoints(&graph));
    }

    #[test]
    fn test_compaction_round_trip_keeps_endpoints() {
        let graph = small_graph();
        let map = get_continuous_node_ids(&graph);
        let compacted = get_compacted_graph(&graph, &map).unwrap();
        let inverted = invert_continuous_node_ids(&map, &graph).unwrap();
        let restored = restore_graph(&inverted, &compacted).unwrap();
        assert_eq!(restored.node_count(), graph.node_count());
        assert_eq!(endpoints(&restored), endpoints(&graph));
    }
}
