//! Run diagnostics: timing and counts for each stage.
//!
//! [`process_with_diagnostics`] runs the same stages as
//! [`process`](crate::process) and records how long each took and what
//! it produced.  Time is read through the [`Clock`] trait so this crate
//! stays free of any particular time source.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::mst::build_mst;
use crate::neighbors::build_graph_with;
use crate::types::{GraphConfig, GraphError, ProcessResult, points_from_samples};

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Source of timestamps for stage measurements.
pub trait Clock {
    /// Opaque point in time.
    type Instant;

    /// The current time.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// Diagnostics collected from a single run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunDiagnostics {
    /// Stage 1: samples to points.
    pub points: StageDiagnostics,
    /// Stage 2: neighbor discovery and edge insertion.
    pub neighbor_discovery: StageDiagnostics,
    /// Stage 3: spanning tree construction.
    pub spanning_tree: StageDiagnostics,
    /// Total wall-clock duration of the run (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary counts across all stages.
    pub summary: RunSummary,
}

/// Diagnostics for a single stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Point construction metrics.
    Points {
        /// Number of input samples.
        sample_count: usize,
        /// Smallest sample value (`None` without samples).
        min_value: Option<i64>,
        /// Largest sample value (`None` without samples).
        max_value: Option<i64>,
    },
    /// Neighbor discovery metrics.
    NeighborDiscovery {
        /// Which search strategy was used.
        strategy: String,
        /// Connection radius.
        radius: f64,
        /// Edges added (both directions counted).
        edge_count: usize,
        /// Points that are neither endpoint of any edge.
        isolated_point_count: usize,
        /// Connected components of the graph.
        component_count: usize,
    },
    /// Spanning tree metrics.
    SpanningTree {
        /// Edges in the tree.
        edge_count: usize,
        /// Sum of tree edge weights.
        total_weight: f64,
    },
}

/// High-level summary counts for the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Points in the graph.
    pub point_count: usize,
    /// Edges in the proximity graph.
    pub graph_edge_count: usize,
    /// Edges in the spanning tree.
    pub tree_edge_count: usize,
    /// Sum of spanning tree edge weights.
    pub tree_weight: f64,
}

/// Run the full pipeline and collect per-stage diagnostics.
///
/// # Errors
///
/// Same as [`process`](crate::process).
pub fn process_with_diagnostics<C: Clock>(
    samples: &[i64],
    config: &GraphConfig,
    clock: &C,
) -> Result<(ProcessResult, RunDiagnostics), GraphError> {
    config.validate()?;
    let run_start = clock.now();

    let start = clock.now();
    let points = points_from_samples(samples);
    let points_stage = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Points {
            sample_count: samples.len(),
            min_value: samples.iter().copied().min(),
            max_value: samples.iter().copied().max(),
        },
    };

    let start = clock.now();
    let graph = build_graph_with(&points, config.radius, config.neighbor_search);
    let discovery_duration = clock.elapsed(&start);
    let neighbor_stage = StageDiagnostics {
        duration: discovery_duration,
        metrics: StageMetrics::NeighborDiscovery {
            strategy: config.neighbor_search.name().to_string(),
            radius: config.radius,
            edge_count: graph.edge_count(),
            isolated_point_count: graph.isolated_point_count(),
            component_count: graph.component_count(),
        },
    };

    let start = clock.now();
    let mst = build_mst(&graph)?;
    let tree_stage = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::SpanningTree {
            edge_count: mst.edge_count(),
            total_weight: mst.total_weight(),
        },
    };

    let diagnostics = RunDiagnostics {
        points: points_stage,
        neighbor_discovery: neighbor_stage,
        spanning_tree: tree_stage,
        total_duration: clock.elapsed(&run_start),
        summary: RunSummary {
            point_count: graph.point_count(),
            graph_edge_count: graph.edge_count(),
            tree_edge_count: mst.edge_count(),
            tree_weight: mst.total_weight(),
        },
    };

    Ok((ProcessResult { graph, mst }, diagnostics))
}

impl RunDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Run Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Points: {}  |  Graph edges: {}  |  Tree edges: {}",
            self.summary.point_count, self.summary.graph_edge_count, self.summary.tree_edge_count,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<24} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(80));

        let total_ms = duration_ms(self.total_duration);
        let stages = [
            ("Points", &self.points),
            ("Neighbor Discovery", &self.neighbor_discovery),
            ("Spanning Tree", &self.spanning_tree),
        ];
        for (name, diag) in stages {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<24} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.push(String::new());
        lines.push(format!("Tree weight: {:.3}", self.summary.tree_weight));

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Points {
            sample_count,
            min_value,
            max_value,
        } => match (min_value, max_value) {
            (Some(min), Some(max)) => format!("{sample_count} samples, y in [{min}, {max}]"),
            _ => format!("{sample_count} samples"),
        },
        StageMetrics::NeighborDiscovery {
            strategy,
            radius,
            edge_count,
            isolated_point_count,
            component_count,
        } => format!(
            "{strategy} r={radius:.2} edges={edge_count} isolated={isolated_point_count} components={component_count}",
        ),
        StageMetrics::SpanningTree {
            edge_count,
            total_weight,
        } => format!("edges={edge_count} weight={total_weight:.3}"),
    }
}
