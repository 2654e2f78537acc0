//! Enumeration of *all* shortest paths from a source node.
//!
//! # Overview
//!
//! Betweenness needs every minimum-length path between a pair, not just one:
//! when `k` paths tie, each contributes `1/k` to its intermediate nodes.
//!
//! # Algorithm
//!
//! Breadth-first expansion over a queue of `(previous, candidate)` pairs,
//! seeded with `(source, friend)` for each friend of the source:
//!
//! 1. Extend every known shortest path to `previous` by `candidate`.
//! 2. If `candidate` has no entry yet, adopt all extended paths.
//! 3. Otherwise keep only extended paths no longer than the recorded
//!    minimum, appending the ones not already present.
//! 4. Enqueue `(candidate, friend)` for every friend of `candidate` that has
//!    not been discovered yet.
//!
//! A path is the sequence of ids visited *after* the source, ending at the
//! target, so its length is the hop distance. The source maps to the single
//! empty path. Unreachable nodes have no entry: treat absence as infinite
//! distance, never as an error.

use std::collections::{BTreeMap, VecDeque};

use centra_core::graph::{GraphError, Node, NodeId, SocialGraph};
use tracing::{instrument, trace};

/// Ordered node ids visited after the source.
pub type Path = Vec<NodeId>;

/// All shortest paths from one source to every reachable node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortestPaths {
    source: NodeId,
    paths: BTreeMap<NodeId, Vec<Path>>,
}

impl ShortestPaths {
    #[must_use]
    pub const fn source(&self) -> NodeId {
        self.source
    }

    /// Every shortest path to `target`, or `None` if unreachable.
    #[must_use]
    pub fn paths_to(&self, target: NodeId) -> Option<&[Path]> {
        self.paths.get(&target).map(Vec::as_slice)
    }

    /// Hop distance to `target`, or `None` if unreachable.
    #[must_use]
    pub fn distance_to(&self, target: NodeId) -> Option<usize> {
        self.paths
            .get(&target)
            .and_then(|paths| paths.first())
            .map(Vec::len)
    }

    /// Number of distinct shortest paths to `target` (0 if unreachable).
    #[must_use]
    pub fn path_count(&self, target: NodeId) -> usize {
        self.paths.get(&target).map_or(0, Vec::len)
    }

    /// Reachable node ids (the source included), ascending.
    pub fn reachable(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.paths.keys().copied()
    }

    /// Number of reachable nodes, the source included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// `(target, paths)` in ascending target order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &[Path])> + '_ {
        self.paths
            .iter()
            .map(|(&target, paths)| (target, paths.as_slice()))
    }

    /// Sum of distances to every reachable node.
    #[must_use]
    pub fn farness(&self) -> usize {
        self.paths
            .values()
            .filter_map(|paths| paths.first())
            .map(Vec::len)
            .sum()
    }
}

/// All shortest paths from `source`.
///
/// # Errors
///
/// Returns [`GraphError::NodeNotFound`] when `source` is not in the graph.
#[instrument(skip(graph))]
pub fn shortest_paths_from(
    graph: &SocialGraph,
    source: NodeId,
) -> Result<ShortestPaths, GraphError> {
    let origin = graph.try_node(source)?;
    Ok(enumerate(graph, origin))
}

/// [`shortest_paths_from`] for every node, keyed by source id.
#[must_use]
#[instrument(skip(graph), fields(n = graph.node_count()))]
pub fn all_shortest_paths(graph: &SocialGraph) -> BTreeMap<NodeId, ShortestPaths> {
    graph
        .nodes()
        .iter()
        .map(|node| (node.id, enumerate(graph, node)))
        .collect()
}

fn enumerate(graph: &SocialGraph, origin: &Node) -> ShortestPaths {
    let source = origin.id;
    let mut paths: BTreeMap<NodeId, Vec<Path>> = BTreeMap::new();
    paths.insert(source, vec![Vec::new()]);

    let mut frontier: VecDeque<(NodeId, NodeId)> =
        origin.friends.iter().map(|&friend| (source, friend)).collect();

    while let Some((previous, candidate)) = frontier.pop_front() {
        // `previous` was keyed before this pair was queued.
        let via_previous: Vec<Path> = paths
            .get(&previous)
            .map(|known| {
                known
                    .iter()
                    .map(|path| {
                        let mut extended = path.clone();
                        extended.push(candidate);
                        extended
                    })
                    .collect()
            })
            .unwrap_or_default();

        let known = paths.entry(candidate).or_default();
        let min_len = known.first().map_or(usize::MAX, Vec::len);
        for path in via_previous {
            if path.len() <= min_len && !known.contains(&path) {
                known.push(path);
            }
        }

        if let Some(node) = graph.node(candidate) {
            frontier.extend(
                node.friends
                    .iter()
                    .filter(|&&friend| !paths.contains_key(&friend))
                    .map(|&friend| (candidate, friend)),
            );
        }
    }

    trace!(%source, reachable = paths.len(), "shortest paths enumerated");
    ShortestPaths { source, paths }
}
