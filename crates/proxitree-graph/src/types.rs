//! Shared types for proximity graph construction.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::graph::Graph;
use crate::neighbors::NeighborSearchKind;

/// A 2D point built from one input sample.
///
/// `x` is the 1-based position of the sample in the input series and
/// `y` is the sample value itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    /// Sample index (1-based).
    pub x: i64,
    /// Sample value.
    pub y: i64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn distance_to(self, other: Self) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        dx.hypot(dy)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{},{}>", self.x, self.y)
    }
}

/// Turn a series of samples into points, assigning `x` from 1 upward.
///
/// # Examples
///
/// ```
/// use proxitree_graph::{Point, points_from_samples};
///
/// let points = points_from_samples(&[7, -3]);
/// assert_eq!(points, vec![Point::new(1, 7), Point::new(2, -3)]);
/// ```
#[must_use]
pub fn points_from_samples(samples: &[i64]) -> Vec<Point> {
    (1_i64..)
        .zip(samples)
        .map(|(x, &y)| Point::new(x, y))
        .collect()
}

/// A weighted connection from `left` to `right`.
///
/// The weight is the Euclidean distance between the endpoints and is
/// computed once at construction.  Equality and hashing look at the
/// endpoints only (order-sensitive); ordering for priority queues goes
/// through [`Edge::cmp_weight`].
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    left: Point,
    right: Point,
    weight: f64,
}

impl Edge {
    /// Create an edge between two distinct points.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DegenerateEdge`] if `left == right`.
    pub fn new(left: Point, right: Point) -> Result<Self, GraphError> {
        if left == right {
            return Err(GraphError::DegenerateEdge(left));
        }
        Ok(Self {
            left,
            right,
            weight: left.distance_to(right),
        })
    }

    /// The endpoint the edge starts from.
    #[must_use]
    pub const fn left(&self) -> Point {
        self.left
    }

    /// The endpoint the edge reaches.
    #[must_use]
    pub const fn right(&self) -> Point {
        self.right
    }

    /// Euclidean length of the edge.
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }

    /// Total order by weight alone.
    #[must_use]
    pub fn cmp_weight(&self, other: &Self) -> Ordering {
        self.weight.total_cmp(&other.weight)
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.left == other.left && self.right == other.right
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.left.hash(state);
        self.right.hash(state);
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}<->{}", self.left, self.right)
    }
}

/// Serde representation of an [`Edge`].
///
/// The weight is written out for consumers that want it, but ignored on
/// the way back in: it is always recomputed from the endpoints.
#[derive(Serialize, Deserialize)]
struct EdgeProxy {
    left: Point,
    right: Point,
    #[serde(default)]
    weight: Option<f64>,
}

impl Serialize for Edge {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        EdgeProxy {
            left: self.left,
            right: self.right,
            weight: Some(self.weight),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Edge {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let proxy = EdgeProxy::deserialize(deserializer)?;
        Self::new(proxy.left, proxy.right).map_err(serde::de::Error::custom)
    }
}

/// Configuration for building the proximity graph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Maximum distance between two points for them to be connected.
    pub radius: f64,

    /// Which neighbor search strategy to use.
    #[serde(default)]
    pub neighbor_search: NeighborSearchKind,
}

impl GraphConfig {
    /// Default connection radius.
    pub const DEFAULT_RADIUS: f64 = 20.0;

    /// Default neighbor search strategy.
    pub const DEFAULT_NEIGHBOR_SEARCH: NeighborSearchKind = NeighborSearchKind::BruteForce;

    /// Check that the configuration can be used to build a graph.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidConfig`] if the radius is negative or
    /// not finite.
    pub fn validate(&self) -> Result<(), GraphError> {
        if !self.radius.is_finite() {
            return Err(GraphError::InvalidConfig(format!(
                "radius must be finite, got {}",
                self.radius
            )));
        }
        if self.radius < 0.0 {
            return Err(GraphError::InvalidConfig(format!(
                "radius must not be negative, got {}",
                self.radius
            )));
        }
        Ok(())
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            radius: Self::DEFAULT_RADIUS,
            neighbor_search: Self::DEFAULT_NEIGHBOR_SEARCH,
        }
    }
}

/// Result of a full run: the proximity graph and its spanning tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessResult {
    /// Every point and every discovered proximity edge.
    pub graph: Graph,
    /// Minimum spanning tree over [`graph`](Self::graph).
    pub mst: Graph,
}

/// Errors raised while building graphs or spanning trees.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
pub enum GraphError {
    /// The graph has no edges, so there is no lightest edge to start from.
    #[error("graph has no edges")]
    EmptyGraph,

    /// The candidate queue ran dry before every point was reached.
    #[error("graph is disconnected: spanning tree reached {spanned} of {total} points")]
    Disconnected {
        /// Points in the partial tree when the queue ran dry.
        spanned: usize,
        /// Points in the input graph.
        total: usize,
    },

    /// An adjacency query named a point that was never added.
    #[error("point {0} is not in the graph")]
    UnknownPoint(Point),

    /// An edge was requested between a point and itself.
    #[error("cannot connect point {0} to itself")]
    DegenerateEdge(Point),

    /// Configuration is invalid.
    #[error("invalid graph configuration: {0}")]
    InvalidConfig(String),
}
