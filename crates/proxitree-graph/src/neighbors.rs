//! Neighbor discovery and proximity graph construction.
//!
//! Two points are neighbors when their distance `d` satisfies
//! `0 < d <= radius`.  The strict lower bound keeps a point from being
//! its own neighbor without any identity comparison.
//!
//! This module defines the [`NeighborSearch`] trait for pluggable search
//! strategies and the [`NeighborSearchKind`] enum for runtime selection.
//! Every strategy must return the same neighbors in the same (candidate)
//! order so the resulting [`Graph`] does not depend on the strategy.

use rstar::RTree;
use rstar::primitives::GeomWithData;
use serde::{Deserialize, Serialize};

use crate::graph::Graph;
use crate::types::{Edge, Point};

/// Selects which neighbor search strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NeighborSearchKind {
    /// Compare every point against every other point.
    ///
    /// O(n^2) distance evaluations.  Fine for a few hundred samples.
    #[default]
    BruteForce,

    /// Index the points in an R\*-tree and run one radius query per point.
    ///
    /// Pays off when the radius is small relative to the spread of the
    /// samples.
    RTree,
}

impl NeighborSearchKind {
    /// Short human-readable name, used in diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BruteForce => "brute-force",
            Self::RTree => "r-tree",
        }
    }
}

/// Trait for neighbor search strategies.
///
/// Input: the full point set and a radius.
/// Output: for each input point (same order), its neighbors in input order.
pub trait NeighborSearch {
    /// Find the neighbors of every point.
    fn search(&self, points: &[Point], radius: f64) -> Vec<Vec<Point>>;
}

impl NeighborSearch for NeighborSearchKind {
    fn search(&self, points: &[Point], radius: f64) -> Vec<Vec<Point>> {
        match *self {
            Self::BruteForce => search_brute_force(points, radius),
            Self::RTree => search_rtree(points, radius),
        }
    }
}

/// Returns `true` if `candidate` is a neighbor of `origin`.
fn is_neighbor(origin: Point, candidate: Point, radius: f64) -> bool {
    let distance = origin.distance_to(candidate);
    distance > 0.0 && distance <= radius
}

/// Every candidate within `radius` of `origin`, excluding points at
/// distance zero, in candidate order.
///
/// A zero, negative or NaN radius yields no neighbors.
///
/// # Examples
///
/// ```
/// use proxitree_graph::{Point, find_neighbors};
///
/// let points = [Point::new(1, 1), Point::new(2, 1), Point::new(3, 10)];
/// let found = find_neighbors(points[0], &points, 1.0);
/// assert_eq!(found, vec![Point::new(2, 1)]);
/// ```
#[must_use]
pub fn find_neighbors(origin: Point, candidates: &[Point], radius: f64) -> Vec<Point> {
    candidates
        .iter()
        .copied()
        .filter(|&candidate| is_neighbor(origin, candidate, radius))
        .collect()
}

fn search_brute_force(points: &[Point], radius: f64) -> Vec<Vec<Point>> {
    points
        .iter()
        .map(|&origin| find_neighbors(origin, points, radius))
        .collect()
}

/// A point's coordinates tagged with its position in the input slice.
type IndexedPoint = GeomWithData<[f64; 2], usize>;

/// Relative slack added to the squared query radius so that rounding in
/// `radius * radius` never drops a point the exact check would accept.
const QUERY_RADIUS_SLACK: f64 = 1e-9;

#[allow(clippy::cast_precision_loss)]
fn to_coords(point: Point) -> [f64; 2] {
    [point.x as f64, point.y as f64]
}

fn search_rtree(points: &[Point], radius: f64) -> Vec<Vec<Point>> {
    if radius.is_nan() || radius <= 0.0 {
        return vec![Vec::new(); points.len()];
    }

    let entries: Vec<IndexedPoint> = points
        .iter()
        .enumerate()
        .map(|(i, &p)| GeomWithData::new(to_coords(p), i))
        .collect();
    let tree = RTree::bulk_load(entries);
    let max_squared_radius = radius * radius * (1.0 + QUERY_RADIUS_SLACK);

    points
        .iter()
        .map(|&origin| {
            // The tree reports hits in no particular order; the exact
            // predicate decides membership and the index restores order.
            let mut hits: Vec<usize> = tree
                .locate_within_distance(to_coords(origin), max_squared_radius)
                .map(|entry| entry.data)
                .filter(|&i| is_neighbor(origin, points[i], radius))
                .collect();
            hits.sort_unstable();
            hits.into_iter().map(|i| points[i]).collect()
        })
        .collect()
}

/// Build a proximity graph with the default brute-force search.
///
/// See [`build_graph_with`].
#[must_use]
pub fn build_graph(points: &[Point], radius: f64) -> Graph {
    build_graph_with(points, radius, NeighborSearchKind::BruteForce)
}

/// Build a proximity graph using the given search strategy.
///
/// Every point is registered first, so points without neighbors are still
/// part of the graph.  Then, for each point in order and each of its
/// neighbors in order, an edge `point -> neighbor` is added.  Mutual
/// neighbors therefore contribute two edges, one per direction.
#[must_use]
pub fn build_graph_with(points: &[Point], radius: f64, search: NeighborSearchKind) -> Graph {
    let neighbor_lists = search.search(points, radius);

    let mut graph = Graph::new();
    for &point in points {
        graph.add_point(point);
    }
    for (&point, neighbors) in points.iter().zip(&neighbor_lists) {
        // Neighbors are never at distance zero, so no edge is degenerate.
        for edge in neighbors
            .iter()
            .filter_map(|&neighbor| Edge::new(point, neighbor).ok())
        {
            graph.add_edge(edge);
        }
    }

    tracing::debug!(
        strategy = search.name(),
        radius,
        points = graph.point_count(),
        edges = graph.edge_count(),
        "built proximity graph"
    );
    graph
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::types::points_from_samples;

    #[test]
    fn find_neighbors_excludes_origin() {
        let points = points_from_samples(&[1, 1, 1]);
        let found = find_neighbors(points[1], &points, 5.0);
        assert_eq!(found, vec![points[0], points[2]]);
    }

    #[test]
    fn find_neighbors_radius_is_inclusive() {
        let points = [Point::new(1, 0), Point::new(4, 4)];
        assert_eq!(find_neighbors(points[0], &points, 5.0), vec![points[1]]);
        assert!(find_neighbors(points[0], &points, 4.999).is_empty());
    }

    #[test]
    fn find_neighbors_zero_radius_is_empty() {
        let points = points_from_samples(&[1, 1, 1, 1]);
        for &p in &points {
            assert!(find_neighbors(p, &points, 0.0).is_empty());
        }
    }

    #[test]
    fn find_neighbors_negative_or_nan_radius_is_empty() {
        let points = points_from_samples(&[1, 1]);
        assert!(find_neighbors(points[0], &points, -3.0).is_empty());
        assert!(find_neighbors(points[0], &points, f64::NAN).is_empty());
    }

    #[test]
    fn find_neighbors_keeps_candidate_order() {
        let origin = Point::new(5, 0);
        let candidates = [Point::new(7, 0), Point::new(3, 0), Point::new(6, 0)];
        assert_eq!(find_neighbors(origin, &candidates, 2.0), candidates.to_vec());
    }

    #[test]
    fn isolated_spike_has_no_neighbors() {
        let points = points_from_samples(&[1, 1, 10, 1, 1]);
        let found: Vec<Vec<Point>> = points
            .iter()
            .map(|&p| find_neighbors(p, &points, 1.0))
            .collect();
        assert_eq!(found[0], vec![Point::new(2, 1)]);
        assert_eq!(found[1], vec![Point::new(1, 1)]);
        assert!(found[2].is_empty());
        assert_eq!(found[3], vec![Point::new(5, 1)]);
        assert_eq!(found[4], vec![Point::new(4, 1)]);
    }

    #[test]
    fn build_graph_adds_both_directions() {
        let points = points_from_samples(&[1, 1]);
        let graph = build_graph(&points, 1.0);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.edges()[0].left(), points[0]);
        assert_eq!(graph.edges()[0].right(), points[1]);
        assert_eq!(graph.edges()[1].left(), points[1]);
        assert_eq!(graph.edges()[1].right(), points[0]);
        assert_eq!(graph.neighbors_of(points[0]).unwrap(), &[points[1]]);
        assert_eq!(graph.neighbors_of(points[1]).unwrap(), &[points[0]]);
    }

    #[test]
    fn build_graph_registers_isolated_points() {
        let points = points_from_samples(&[1, 1, 10, 1, 1]);
        let graph = build_graph(&points, 1.0);
        assert_eq!(graph.point_count(), 5);
        assert_eq!(graph.edge_count(), 4);
        assert!(graph.neighbors_of(Point::new(3, 10)).unwrap().is_empty());
        assert_eq!(graph.component_count(), 3);
        assert!(graph.edges().iter().all(|e| e.left().x != 3 && e.right().x != 3));
    }

    #[test]
    fn build_graph_point_order_follows_input() {
        let points = points_from_samples(&[4, 8, 15, 16]);
        let graph = build_graph(&points, 100.0);
        let ordered: Vec<Point> = graph.points().collect();
        assert_eq!(ordered, points);
    }

    #[test]
    fn build_graph_empty_input() {
        let graph = build_graph(&[], 10.0);
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn rtree_matches_brute_force_on_fixed_input() {
        let points = points_from_samples(&[3, 9, 4, 4, 20, 21, 5, 0, -7, 3]);
        for radius in [0.0, 1.0, 1.5, 2.0_f64.sqrt(), 5.0, 50.0] {
            let brute = build_graph_with(&points, radius, NeighborSearchKind::BruteForce);
            let tree = build_graph_with(&points, radius, NeighborSearchKind::RTree);
            assert_eq!(brute.edges(), tree.edges(), "radius {radius}");
        }
    }

    #[test]
    fn neighbor_search_kind_serde_round_trip() {
        let json = serde_json::to_string(&NeighborSearchKind::RTree).unwrap();
        let deserialized: NeighborSearchKind = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, NeighborSearchKind::RTree);
    }

    proptest! {
        #[test]
        fn neighbors_are_within_radius_and_never_the_origin(
            samples in prop::collection::vec(-40_i64..40, 0..40),
            radius in 0.0_f64..30.0,
        ) {
            let points = points_from_samples(&samples);
            for &origin in &points {
                for neighbor in find_neighbors(origin, &points, radius) {
                    prop_assert_ne!(neighbor, origin);
                    prop_assert!(origin.distance_to(neighbor) <= radius);
                }
            }
        }

        #[test]
        fn rtree_and_brute_force_agree(
            samples in prop::collection::vec(-40_i64..40, 0..40),
            radius in 0.0_f64..30.0,
        ) {
            let points = points_from_samples(&samples);
            prop_assert_eq!(
                NeighborSearchKind::BruteForce.search(&points, radius),
                NeighborSearchKind::RTree.search(&points, radius),
            );
        }

        #[test]
        fn neighbor_relation_is_symmetric(
            samples in prop::collection::vec(-40_i64..40, 0..30),
            radius in 0.0_f64..30.0,
        ) {
            let points = points_from_samples(&samples);
            let graph = build_graph(&points, radius);
            for edge in graph.edges() {
                let reverse = Edge::new(edge.right(), edge.left()).unwrap();
                prop_assert!(graph.contains_edge(&reverse));
            }
        }
    }
}
