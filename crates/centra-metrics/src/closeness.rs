//! Closeness centrality: the inverse of total shortest-path distance.
//!
//! ```text
//! farness(v)   = Σ d(v, u)   over every u reachable from v
//! closeness(v) = 1 / farness(v)
//! ```
//!
//! # Disconnected graphs
//!
//! Only reachable nodes are summed. On a disconnected graph this understates
//! how far a node really is from everyone; the limitation is kept and a
//! warning is logged. A node that reaches nobody has farness 0 and is given
//! closeness 0.0.

use std::collections::BTreeMap;

use centra_core::graph::{NodeId, SocialGraph};
use tracing::{instrument, warn};

use crate::paths::{ShortestPaths, all_shortest_paths};
use crate::scores::CentralityScores;

/// Closeness centrality for every node.
#[must_use]
#[instrument(skip(graph), fields(n = graph.node_count()))]
pub fn closeness_centrality(graph: &SocialGraph) -> CentralityScores {
    closeness_from_paths(graph, &all_shortest_paths(graph))
}

/// Closeness from a precomputed all-pairs enumeration.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn closeness_from_paths(
    graph: &SocialGraph,
    all_paths: &BTreeMap<NodeId, ShortestPaths>,
) -> CentralityScores {
    let components = graph.connected_components();
    if components > 1 {
        warn!(
            components,
            "friendship graph is disconnected; closeness only sums distances to reachable nodes"
        );
    }

    graph
        .ids()
        .map(|id| {
            let farness = all_paths.get(&id).map_or(0, ShortestPaths::farness);
            let closeness = if farness == 0 {
                0.0
            } else {
                1.0 / farness as f64
            };
            (id, closeness)
        })
        .collect()
}
