//! Minimum spanning tree via Prim's algorithm with a lazy priority queue.
//!
//! # Algorithm overview
//!
//! 1. Seed the tree with the globally lightest edge (earliest inserted
//!    among equal weights).
//! 2. Push a candidate edge from every tree point to each of its
//!    not-yet-reached neighbors.
//! 3. Repeatedly pop the lightest candidate.  Stale candidates (whose
//!    target was reached in the meantime) are discarded; otherwise the
//!    edge joins the tree and the new point's frontier is pushed.
//! 4. Stop once the tree holds every point of the input graph, or fail if
//!    the queue runs dry first.
//!
//! Candidates are only generated along the input graph's adjacency lists,
//! which are directional (see [`Graph::add_edge`]).  Graphs built by
//! [`build_graph`](crate::neighbors::build_graph) hold both directions of
//! every connection, so the result there is a true minimum spanning tree.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::graph::Graph;
use crate::types::{Edge, GraphError, Point};

/// A queued edge tagged with its push sequence number.
///
/// Ordered by weight, then by sequence, so equal weights pop in the order
/// they were pushed.
#[derive(Debug)]
struct Candidate {
    edge: Edge,
    seq: u64,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.edge
            .cmp_weight(&other.edge)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

/// Min-heap of candidate edges.
#[derive(Debug, Default)]
struct CandidateQueue {
    heap: BinaryHeap<Reverse<Candidate>>,
    next_seq: u64,
}

impl CandidateQueue {
    fn push(&mut self, edge: Edge) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Candidate { edge, seq }));
    }

    fn pop(&mut self) -> Option<Edge> {
        self.heap.pop().map(|Reverse(candidate)| candidate.edge)
    }
}

/// Queue an edge from `from` to every neighbor (in `graph`) that the tree
/// has not reached yet.
fn push_frontier(
    graph: &Graph,
    tree: &Graph,
    queue: &mut CandidateQueue,
    from: Point,
) -> Result<(), GraphError> {
    for &neighbor in graph.neighbors_of(from)? {
        if !tree.contains_point(neighbor) {
            queue.push(Edge::new(from, neighbor)?);
        }
    }
    Ok(())
}

/// Build a minimum spanning tree of `graph` with Prim's algorithm.
///
/// Returns a new [`Graph`] holding every point of `graph` and exactly
/// `point_count - 1` edges.  Each tree edge points from the tree side to
/// the point it reached.
///
/// # Errors
///
/// Returns [`GraphError::EmptyGraph`] if `graph` has no edges.
/// Returns [`GraphError::Disconnected`] if some point cannot be reached
/// from the lightest edge; no partial tree is returned.
///
/// # Examples
///
/// ```
/// use proxitree_graph::{build_graph, build_mst, points_from_samples};
///
/// let points = points_from_samples(&[1, 2, 1, 3]);
/// let graph = build_graph(&points, 5.0);
/// let mst = build_mst(&graph).unwrap();
/// assert_eq!(mst.point_count(), 4);
/// assert_eq!(mst.edge_count(), 3);
/// ```
pub fn build_mst(graph: &Graph) -> Result<Graph, GraphError> {
    let sorted = graph.edges_by_weight();
    let Some(&lightest) = sorted.first() else {
        return Err(GraphError::EmptyGraph);
    };
    let total = graph.point_count();

    let mut tree = Graph::new();
    tree.add_edge(lightest);

    let mut queue = CandidateQueue::default();
    for point in tree.points() {
        push_frontier(graph, &tree, &mut queue, point)?;
    }

    while tree.point_count() < total {
        let Some(edge) = queue.pop() else {
            tracing::warn!(
                spanned = tree.point_count(),
                total,
                "candidate queue exhausted before the tree spanned the graph"
            );
            return Err(GraphError::Disconnected {
                spanned: tree.point_count(),
                total,
            });
        };

        if tree.contains_point(edge.right()) || tree.contains_edge(&edge) {
            continue;
        }

        tree.add_edge(edge);
        push_frontier(graph, &tree, &mut queue, edge.right())?;
    }

    tracing::debug!(
        points = tree.point_count(),
        edges = tree.edge_count(),
        weight = tree.total_weight(),
        "built minimum spanning tree"
    );
    Ok(tree)
}
