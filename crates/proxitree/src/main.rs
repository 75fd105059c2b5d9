//! proxitree: build a proximity graph and its minimum spanning tree from a
//! sample file and render both as SVG.
//!
//! Reads the last comma-separated row of the sample file, optionally
//! verifies its SHA-256 checksum, connects every pair of samples within
//! the radius, runs Prim's algorithm, and writes two images: the full
//! graph and the spanning tree.  Per-stage diagnostics go to stdout; log
//! events go to stderr (filtered through `RUST_LOG`, default `info`).
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin proxitree -- [OPTIONS] <SAMPLES_PATH>
//! ```

#![allow(clippy::print_stdout)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use proxitree_export::{SvgMetadata, SvgStyle};
use proxitree_graph::diagnostics::Clock;
use proxitree_graph::{GraphConfig, GraphError, NeighborSearchKind};
use proxitree_io::IoError;
use tracing_subscriber::EnvFilter;

/// Proximity graph and minimum spanning tree renderer.
///
/// Connects every pair of samples closer than the radius, builds the
/// minimum spanning tree with Prim's algorithm, and writes both graphs
/// as SVG images.
#[derive(Debug, Parser)]
#[command(name = "proxitree", version)]
struct Cli {
    /// Path to the sample file (comma-separated integers; last row is used).
    samples_path: PathBuf,

    /// Connection radius: samples at most this far apart become neighbors.
    #[arg(long, default_value_t = GraphConfig::DEFAULT_RADIUS)]
    radius: f64,

    /// Neighbor search strategy.
    #[arg(long, value_enum, default_value_t = CLI_DEFAULT_SEARCH)]
    neighbor_search: Search,

    /// Expected SHA-256 of the concatenated sample fields.
    ///
    /// The run aborts when the digest does not match.
    #[arg(long)]
    checksum: Option<String>,

    /// Output path for the full proximity graph.
    #[arg(long, default_value = "graph.svg")]
    graph_svg: PathBuf,

    /// Output path for the minimum spanning tree.
    #[arg(long, default_value = "MST.svg")]
    mst_svg: PathBuf,

    /// Caption drawn on both images.
    ///
    /// Typically the author and date, e.g.
    /// `--caption "author: Jane Doe, created on 2024-02-25"`.
    /// Omitted when not given.
    #[arg(long, value_name = "TEXT")]
    caption: Option<String>,

    /// Output diagnostics as JSON instead of human-readable report.
    #[arg(long)]
    json: bool,

    /// Full graph config as a JSON string.
    ///
    /// When provided, `--radius` and `--neighbor-search` are ignored.
    /// The JSON must be a valid `GraphConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,
}

/// Neighbor search strategy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Search {
    /// Compare every pair of points.
    BruteForce,
    /// Query an R-tree of all points.
    RTree,
}

/// Maps a [`NeighborSearchKind`] to the local CLI [`Search`] enum.
const fn search_from_graph(kind: NeighborSearchKind) -> Search {
    match kind {
        NeighborSearchKind::BruteForce => Search::BruteForce,
        NeighborSearchKind::RTree => Search::RTree,
    }
}

/// The CLI default strategy, derived from
/// [`GraphConfig::DEFAULT_NEIGHBOR_SEARCH`] so the two cannot diverge.
const CLI_DEFAULT_SEARCH: Search = search_from_graph(GraphConfig::DEFAULT_NEIGHBOR_SEARCH);

/// Everything that can abort a run.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("error parsing --config-json: {0}")]
    ConfigJson(#[source] serde_json::Error),

    #[error("error serializing diagnostics: {0}")]
    Diagnostics(#[source] serde_json::Error),

    #[error(transparent)]
    Io(#[from] IoError),

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),
}

/// Build a [`GraphConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual parameter flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<GraphConfig, CliError> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(CliError::ConfigJson);
    }

    Ok(GraphConfig {
        radius: cli.radius,
        neighbor_search: match cli.neighbor_search {
            Search::BruteForce => NeighborSearchKind::BruteForce,
            Search::RTree => NeighborSearchKind::RTree,
        },
    })
}

/// Install the stderr log subscriber.  `RUST_LOG` overrides the `info`
/// default.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let config = config_from_cli(cli)?;

    let row = proxitree_io::read_samples(&cli.samples_path)?;
    tracing::info!(checksum = %row.digest(), "sample digest");
    if let Some(ref expected) = cli.checksum {
        row.verify(expected)?;
        tracing::info!("checksum matches");
    }
    tracing::debug!(?config, "graph config");

    let (result, diagnostics) =
        proxitree_graph::diagnostics::process_with_diagnostics(row.values(), &config, &StdClock)?;

    if cli.json {
        let json = serde_json::to_string_pretty(&diagnostics).map_err(CliError::Diagnostics)?;
        println!("{json}");
    } else {
        println!("{}", diagnostics.report());
    }

    let title = cli
        .samples_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("samples");
    let desc = format!(
        "radius={} neighbor_search={}",
        config.radius,
        config.neighbor_search.name()
    );
    let style = SvgStyle::default();
    let metadata = SvgMetadata {
        title: Some(title),
        description: Some(&desc),
        caption: cli.caption.as_deref(),
    };

    render(&result.graph, &cli.graph_svg, &style, &metadata)?;
    render(&result.mst, &cli.mst_svg, &style, &metadata)?;

    Ok(())
}

/// Render one graph and write it to `path`.
fn render(
    graph: &proxitree_graph::Graph,
    path: &Path,
    style: &SvgStyle,
    metadata: &SvgMetadata<'_>,
) -> Result<(), IoError> {
    let svg = proxitree_export::to_svg(graph, style, metadata);
    proxitree_io::write_svg(path, &svg)
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}
