//! Points, edges, and directional adjacency.
//!
//! A [`Graph`] grows only through [`Graph::add_point`] and
//! [`Graph::add_edge`].  Adding an edge registers both endpoints but only
//! records the right endpoint as a neighbor of the left one; an undirected
//! connection therefore needs one edge in each direction, which is what
//! [`build_graph`](crate::neighbors::build_graph) produces.

use indexmap::IndexMap;
use petgraph::unionfind::UnionFind;
use serde::{Deserialize, Serialize};

use crate::types::{Edge, GraphError, Point};

/// A mutable collection of points and weighted edges.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// Each registered point mapped to the points it links to, in
    /// insertion order.
    points: IndexMap<Point, Vec<Point>>,
    /// Every added edge, in insertion order (duplicates kept).
    edges: Vec<Edge>,
}

/// Order-sensitive: two graphs are equal only if their points, each
/// point's neighbor list, and their edges appear in the same order.
impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.edges == other.edges && self.points.iter().eq(other.points.iter())
    }
}

impl Graph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a point.  Does nothing if the point is already present.
    pub fn add_point(&mut self, point: Point) {
        self.points.entry(point).or_default();
    }

    /// Add an edge, registering both endpoints.
    ///
    /// The right endpoint is appended to the left endpoint's neighbor
    /// list.  Equivalent edges are not merged: adding the same edge twice
    /// stores it twice.
    pub fn add_edge(&mut self, edge: Edge) {
        self.add_point(edge.left());
        self.add_point(edge.right());
        if let Some(neighbors) = self.points.get_mut(&edge.left()) {
            neighbors.push(edge.right());
        }
        self.edges.push(edge);
    }

    /// All registered points in insertion order.
    pub fn points(&self) -> impl ExactSizeIterator<Item = Point> + '_ {
        self.points.keys().copied()
    }

    /// All edges in insertion order, including duplicates.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The points `point` links to.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownPoint`] if `point` was never added.
    pub fn neighbors_of(&self, point: Point) -> Result<&[Point], GraphError> {
        self.points
            .get(&point)
            .map(Vec::as_slice)
            .ok_or(GraphError::UnknownPoint(point))
    }

    /// Number of registered points.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Number of stored edges, duplicates included.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the graph has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns `true` if `point` has been registered.
    #[must_use]
    pub fn contains_point(&self, point: Point) -> bool {
        self.points.contains_key(&point)
    }

    /// Returns `true` if an edge with the same endpoints, in the same
    /// order, has been added.
    #[must_use]
    pub fn contains_edge(&self, edge: &Edge) -> bool {
        self.edges.contains(edge)
    }

    /// Sum of all edge weights.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.edges.iter().map(Edge::weight).sum()
    }

    /// Edges sorted by ascending weight.  Equal weights keep their
    /// insertion order.
    #[must_use]
    pub fn edges_by_weight(&self) -> Vec<Edge> {
        let mut sorted = self.edges.clone();
        sorted.sort_by(Edge::cmp_weight);
        sorted
    }

    /// Number of connected components, treating every edge as undirected.
    ///
    /// Isolated points count as a component each.  An empty graph has
    /// zero components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        let mut components = UnionFind::<usize>::new(self.points.len());
        for edge in &self.edges {
            if let (Some(a), Some(b)) = (
                self.points.get_index_of(&edge.left()),
                self.points.get_index_of(&edge.right()),
            ) {
                components.union(a, b);
            }
        }
        let mut labels = components.into_labeling();
        labels.sort_unstable();
        labels.dedup();
        labels.len()
    }

    /// Number of points that are neither endpoint of any edge.
    #[must_use]
    pub fn isolated_point_count(&self) -> usize {
        let mut linked = vec![false; self.points.len()];
        for edge in &self.edges {
            for point in [edge.left(), edge.right()] {
                if let Some(index) = self.points.get_index_of(&point) {
                    linked[index] = true;
                }
            }
        }
        linked.iter().filter(|&&is_linked| !is_linked).count()
    }
}

/// Serde representation of a [`Graph`].
///
/// Adjacency is not stored: replaying the edges onto the registered points
/// rebuilds the same neighbor lists in the same order.
#[derive(Serialize, Deserialize)]
struct GraphProxy {
    points: Vec<Point>,
    edges: Vec<Edge>,
}

impl Serialize for Graph {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        GraphProxy {
            points: self.points().collect(),
            edges: self.edges.clone(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Graph {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let proxy = GraphProxy::deserialize(deserializer)?;
        let mut graph = Self::new();
        for point in proxy.points {
            graph.add_point(point);
        }
        for edge in proxy.edges {
            graph.add_edge(edge);
        }
        Ok(graph)
    }
}
