pub mod centrality;
pub mod completions;
pub mod endorsements;
pub mod hypothesis;
pub mod paths;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use centra_core::config::EffectiveConfig;
use centra_core::error::ErrorCode;
use centra_core::{Dataset, NodeId, SocialGraph};
use clap::Args;
use tracing::info;

use crate::output::Coded;

/// Dataset selection shared by graph commands.
#[derive(Args, Debug, Clone, Default)]
pub struct DataArgs {
    /// Dataset file (`.toml` or `.json`). Defaults to `data` in centra.toml,
    /// then the built-in ten-user network.
    #[arg(long, value_name = "FILE")]
    pub data: Option<PathBuf>,
}

/// Load the dataset chosen by `--data`, the config, or the built-in default,
/// and build the graph.
///
/// # Errors
///
/// Returns an error tagged [`ErrorCode::DatasetParseError`] when the file
/// cannot be loaded, or the [`GraphError`](centra_core::graph::GraphError)
/// when the dataset is inconsistent.
pub fn load_graph(args: &DataArgs, config: &EffectiveConfig) -> Result<SocialGraph> {
    let path: Option<&Path> = args.data.as_deref().or(config.project.data.as_deref());
    let dataset = match path {
        Some(path) => {
            info!(path = %path.display(), "loading dataset");
            Dataset::load(path).context(Coded(ErrorCode::DatasetParseError))?
        }
        None => Dataset::builtin(),
    };
    Ok(SocialGraph::from_dataset(&dataset)?)
}

/// `name` for a known node, empty otherwise.
pub fn node_name(graph: &SocialGraph, id: NodeId) -> &str {
    graph.node(id).map_or("", |node| node.name.as_str())
}
