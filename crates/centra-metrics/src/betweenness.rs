//! Betweenness centrality from enumerated shortest paths.
//!
//! # Overview
//!
//! Betweenness measures how often a user lies on shortest paths between two
//! other users. High-betweenness users are bridges: removing them stretches
//! or severs the routes between groups.
//!
//! # Algorithm
//!
//! For every unordered pair `(s, t)` with `s < t` (each pair counted once),
//! let `k` be the number of shortest paths between them. Each of those paths
//! adds `1/k` to every node strictly between `s` and `t`.
//!
//! Pairs are visited in ascending `(s, t)` order, so the floating-point
//! accumulation is reproducible.
//!
//! # Complexity
//!
//! `O(N²)` pairs times the cost of materialising every shortest path, which
//! grows with the number of ties. This is meant for small graphs (tens to low
//! hundreds of nodes); it is not Brandes' algorithm and does not scale like
//! it.
//!
//! # Output
//!
//! Scores are unnormalised. Every node appears, with 0.0 when it is on no
//! shortest path. Unreachable pairs contribute nothing.

use std::collections::BTreeMap;

use centra_core::graph::{NodeId, SocialGraph};
use tracing::instrument;

use crate::paths::{ShortestPaths, all_shortest_paths};
use crate::scores::CentralityScores;

/// Betweenness centrality for every node.
#[must_use]
#[instrument(skip(graph), fields(n = graph.node_count()))]
pub fn betweenness_centrality(graph: &SocialGraph) -> CentralityScores {
    betweenness_from_paths(graph, &all_shortest_paths(graph))
}

/// Betweenness from a precomputed all-pairs enumeration.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn betweenness_from_paths(
    graph: &SocialGraph,
    all_paths: &BTreeMap<NodeId, ShortestPaths>,
) -> CentralityScores {
    let mut scores: BTreeMap<NodeId, f64> = graph.ids().map(|id| (id, 0.0)).collect();

    for (&source, shortest) in all_paths {
        for (target, paths) in shortest.iter() {
            if source >= target {
                continue;
            }

            let contrib = 1.0 / paths.len() as f64;
            for path in paths {
                for &id in path {
                    if id != source && id != target {
                        *scores.entry(id).or_insert(0.0) += contrib;
                    }
                }
            }
        }
    }

    CentralityScores::new(scores)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
