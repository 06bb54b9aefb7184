//! Arbitrary-graph strategies shared by the property tests, plus a
//! log capture for asserting on advisory warnings.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use proptest::prelude::*;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use crate::graph::Graph;

struct WarnCounter(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Run `f` with a thread-local subscriber and count the warnings it emits.
pub(crate) fn count_warnings<T>(f: impl FnOnce() -> T) -> (T, usize) {
    let count = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarnCounter(Arc::clone(&count)));
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, count.load(Ordering::SeqCst))
}

type Shape = (usize, bool, bool, bool);

fn build(
    (n, directed, weighted, indexed): Shape,
    edges: Vec<(usize, usize, u8)>,
    holes: Vec<usize>,
) -> Graph {
    let mut g = Graph::new(n, weighted, directed);
    for (u, v, w) in edges {
        g.add_edge(u, v, f64::from(w));
    }
    for h in holes {
        if g.has_node(h) {
            g.remove_node(h);
        }
    }
    if indexed {
        g.index_edges();
    }
    g
}

fn graph_strategy(directed: BoxedStrategy<bool>) -> impl Strategy<Value = Graph> {
    (1usize..16, directed, any::<bool>(), any::<bool>())
        .prop_flat_map(|shape| {
            let n = shape.0;
            (
                Just(shape),
                prop::collection::vec((0..n, 0..n, 1u8..10), 0..40),
                prop::collection::vec(0..n, 0..n / 2 + 1),
            )
        })
        .prop_map(|(shape, edges, holes)| build(shape, edges, holes))
}

/// Directed or undirected graph with up to 16 ids, holes and optional edge ids.
pub(crate) fn arb_graph() -> impl Strategy<Value = Graph> {
    graph_strategy(any::<bool>().boxed())
}

pub(crate) fn arb_directed_graph() -> impl Strategy<Value = Graph> {
    graph_strategy(Just(true).boxed())
}
