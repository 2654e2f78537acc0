//! Ranking by raw incoming endorsement count.

use centra_core::graph::{NodeId, SocialGraph};
use tracing::instrument;

/// `(node, incoming endorsements)`, most endorsed first; ties by ascending id.
#[must_use]
#[instrument(skip(graph), fields(n = graph.node_count()))]
pub fn endorsement_counts(graph: &SocialGraph) -> Vec<(NodeId, usize)> {
    let mut counts: Vec<(NodeId, usize)> = graph
        .nodes()
        .iter()
        .map(|node| (node.id, node.endorsed_by.len()))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    counts
}
