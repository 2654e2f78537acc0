//! `centra paths <source>`: every shortest friendship path from one user.

use std::io::{self, Write};

use anyhow::Result;
use centra_core::NodeId;
use centra_core::config::EffectiveConfig;
use centra_metrics::paths::{Path, ShortestPaths, shortest_paths_from};
use clap::Args;
use serde::Serialize;

use crate::cmd::{DataArgs, load_graph};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `centra paths`.
#[derive(Args, Debug)]
pub struct PathsArgs {
    /// Source user id.
    pub source: u32,

    /// Only report paths to this user.
    #[arg(long)]
    pub target: Option<u32>,

    #[command(flatten)]
    pub data: DataArgs,
}

#[derive(Debug, Serialize)]
struct TargetPaths {
    target: NodeId,
    /// `None` when the target is unreachable.
    distance: Option<usize>,
    paths: Vec<Path>,
}

#[derive(Debug, Serialize)]
struct PathsOutput {
    source: NodeId,
    targets: Vec<TargetPaths>,
}

fn build_output(paths: &ShortestPaths, target: Option<NodeId>) -> PathsOutput {
    let targets = match target {
        Some(target) => vec![TargetPaths {
            target,
            distance: paths.distance_to(target),
            paths: paths.paths_to(target).map(<[Path]>::to_vec).unwrap_or_default(),
        }],
        None => paths
            .iter()
            .filter(|&(target, _)| target != paths.source())
            .map(|(target, found)| TargetPaths {
                target,
                distance: paths.distance_to(target),
                paths: found.to_vec(),
            })
            .collect(),
    };
    PathsOutput {
        source: paths.source(),
        targets,
    }
}

fn join(path: &[NodeId]) -> String {
    path.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_text(output: &PathsOutput, w: &mut dyn Write) -> io::Result<()> {
    for target in &output.targets {
        if target.paths.is_empty() {
            writeln!(w, "{} unreachable", target.target)?;
        }
        for path in &target.paths {
            writeln!(w, "{} {} {}", target.target, path.len(), join(path))?;
        }
    }
    Ok(())
}

fn render_pretty(output: &PathsOutput, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("Shortest paths from {}", output.source))?;
    for target in &output.targets {
        let Some(distance) = target.distance else {
            pretty_kv(w, &target.target.to_string(), "unreachable")?;
            continue;
        };
        pretty_kv(
            w,
            &target.target.to_string(),
            format!("distance {distance}, {} path(s)", target.paths.len()),
        )?;
        for path in &target.paths {
            writeln!(w, "    {} -> {}", output.source, join(path).replace(' ', " -> "))?;
        }
    }
    Ok(())
}

/// Run `centra paths`.
///
/// # Errors
///
/// Returns [`GraphError::NodeNotFound`](centra_core::graph::GraphError) when
/// the source or target is not in the graph, or a dataset load error.
pub fn run_paths(args: &PathsArgs, config: &EffectiveConfig, mode: OutputMode) -> Result<()> {
    let graph = load_graph(&args.data, config)?;
    let target = args.target.map(NodeId);
    if let Some(target) = target {
        graph.try_node(target)?;
    }
    let paths = shortest_paths_from(&graph, NodeId(args.source))?;
    let output = build_output(&paths, target);
    render_mode(mode, &output, render_text, render_pretty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use centra_core::{Dataset, SocialGraph};

    fn builtin_paths(source: u32) -> ShortestPaths {
        let graph = SocialGraph::from_dataset(&Dataset::builtin()).expect("builtin");
        shortest_paths_from(&graph, NodeId(source)).expect("known source")
    }

    #[test]
    fn all_targets_exclude_the_source() {
        let output = build_output(&builtin_paths(0), None);
        assert_eq!(output.targets.len(), 9);
        assert!(output.targets.iter().all(|t| t.target != NodeId(0)));
    }

    #[test]
    fn single_target_lists_tied_paths() {
        let output = build_output(&builtin_paths(0), Some(NodeId(3)));
        assert_eq!(output.targets.len(), 1);
        assert_eq!(output.targets[0].distance, Some(2));
        assert_eq!(output.targets[0].paths.len(), 2);

        let mut buf = Vec::new();
        render_text(&output, &mut buf).expect("render");
        let text = String::from_utf8_lossy(&buf);
        let mut lines: Vec<&str> = text.lines().collect();
        lines.sort_unstable();
        assert_eq!(lines, ["3 2 1 3", "3 2 2 3"]);
    }

    #[test]
    fn unreachable_target_has_no_distance() {
        let graph = SocialGraph::new(
            [(NodeId(0), "a".to_string()), (NodeId(1), "b".to_string())],
            &[],
            &[],
        )
        .expect("valid");
        let paths = shortest_paths_from(&graph, NodeId(0)).expect("known source");
        let output = build_output(&paths, Some(NodeId(1)));
        assert_eq!(output.targets[0].distance, None);

        let mut buf = Vec::new();
        render_text(&output, &mut buf).expect("render");
        assert_eq!(String::from_utf8_lossy(&buf), "1 unreachable\n");
    }
}
