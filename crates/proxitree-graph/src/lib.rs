//! proxitree-graph: proximity graphs and minimum spanning trees (sans-IO).
//!
//! Turns a series of integer samples into points (`x` = 1-based index,
//! `y` = sample value) and then:
//! samples -> points -> neighbor discovery -> proximity graph ->
//! Prim's minimum spanning tree.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! samples and returns structured data.  Reading sample files and writing
//! images lives in `proxitree-io`; SVG rendering lives in
//! `proxitree-export`.

pub mod diagnostics;
pub mod graph;
pub mod mst;
pub mod neighbors;
pub mod types;

pub use graph::Graph;
pub use mst::build_mst;
pub use neighbors::{
    NeighborSearch, NeighborSearchKind, build_graph, build_graph_with, find_neighbors,
};
pub use types::{Edge, GraphConfig, GraphError, Point, ProcessResult, points_from_samples};

/// Run the full pipeline.
///
/// # Pipeline steps
///
/// 1. Validate the configuration
/// 2. Build one point per sample
/// 3. Discover neighbors within `config.radius` and build the graph
/// 4. Build the minimum spanning tree
///
/// # Errors
///
/// Returns [`GraphError::InvalidConfig`] if the radius is unusable.
/// Returns [`GraphError::EmptyGraph`] if no two samples are close enough
/// to be connected.
/// Returns [`GraphError::Disconnected`] if the samples form more than one
/// cluster.
pub fn process(samples: &[i64], config: &GraphConfig) -> Result<ProcessResult, GraphError> {
    config.validate()?;

    let points = points_from_samples(samples);
    let graph = build_graph_with(&points, config.radius, config.neighbor_search);
    let mst = build_mst(&graph)?;

    Ok(ProcessResult { graph, mst })
}
