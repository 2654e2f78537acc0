//! Eigenvector centrality via power iteration.
//!
//! # Overview
//!
//! Eigenvector centrality scores users by the idea that friendships with
//! high-scoring users count for more. It is the dominant eigenvector of the
//! friendship adjacency matrix.
//!
//! # Algorithm
//!
//! [`find_dominant_eigenvector_with`] on the symmetric 0/1 adjacency matrix:
//!
//! 1. Start from the all-ones vector.
//! 2. Multiply by the adjacency matrix.
//! 3. Normalise to unit L2 norm.
//! 4. Repeat until successive vectors are within `tolerance`.
//!
//! Entry `i` of the result is the score of the node at position `i`
//! (ascending id order).
//!
//! # Convergence
//!
//! The default config has no iteration cap. Bipartite friendship graphs (a
//! star, an even cycle) can make the iterate oscillate indefinitely; set
//! [`EigenvectorConfig::max_iter`] to get
//! [`LinalgError::NotConverged`] instead of looping. An uncapped run logs a
//! warning once it passes
//! [`UNCAPPED_WARN_AFTER`](centra_core::linalg::UNCAPPED_WARN_AFTER) iterations. A graph with no
//! friendships at all fails with [`LinalgError::Degenerate`].

use centra_core::config::EigenvectorSettings;
use centra_core::graph::SocialGraph;
use centra_core::linalg::{
    DEFAULT_TOLERANCE, LinalgError, PowerIteration, find_dominant_eigenvector_with,
};
use serde::Serialize;
use tracing::instrument;

use crate::scores::CentralityScores;

/// Configuration for eigenvector centrality.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EigenvectorConfig {
    /// Convergence threshold on the L2 distance between iterates.
    /// Default: 1e-5.
    pub tolerance: f64,
    /// Optional iteration cap. Default: none.
    pub max_iter: Option<usize>,
}

impl Default for EigenvectorConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iter: None,
        }
    }
}

impl From<&EigenvectorSettings> for EigenvectorConfig {
    fn from(settings: &EigenvectorSettings) -> Self {
        Self {
            tolerance: settings.tolerance,
            max_iter: settings.max_iter,
        }
    }
}

/// Result of eigenvector centrality computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EigenvectorResult {
    /// Eigenvector centrality scores: node id → score.
    pub scores: CentralityScores,
    /// Dominant eigenvalue estimate.
    pub eigenvalue: f64,
    /// Number of iterations performed.
    pub iterations: usize,
}

/// Compute eigenvector centrality over the friendship relation.
///
/// # Errors
///
/// Returns [`LinalgError::NotConverged`] when a configured cap is reached and
/// [`LinalgError::Degenerate`] when the graph has nodes but no friendships.
#[instrument(skip(graph), fields(n = graph.node_count()))]
pub fn eigenvector_centrality(
    graph: &SocialGraph,
    config: &EigenvectorConfig,
) -> Result<EigenvectorResult, LinalgError> {
    if graph.is_empty() {
        return Ok(EigenvectorResult {
            scores: CentralityScores::default(),
            eigenvalue: 0.0,
            iterations: 0,
        });
    }

    let adjacency = graph.adjacency_matrix();
    let pair = find_dominant_eigenvector_with(
        &adjacency,
        &PowerIteration {
            tolerance: config.tolerance,
            max_iter: config.max_iter,
        },
    )?;

    let scores = graph.ids().zip(pair.vector.iter().copied()).collect();

    Ok(EigenvectorResult {
        scores,
        eigenvalue: pair.eigenvalue,
        iterations: pair.iterations,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use centra_core::NodeId;

    fn graph(n: u32, edges: &[(u32, u32)]) -> SocialGraph {
        let pairs: Vec<(NodeId, NodeId)> =
            edges.iter().map(|&(a, b)| (NodeId(a), NodeId(b))).collect();
        SocialGraph::new((0..n).map(|i| (NodeId(i), format!("n{i}"))), &pairs, &[])
            .expect("valid graph")
    }

    fn score(result: &EigenvectorResult, id: u32) -> f64 {
        result.scores.get(NodeId(id)).expect("scored")
    }

    #[test]
    fn empty_graph_returns_empty() {
        let result =
            eigenvector_centrality(&graph(0, &[]), &EigenvectorConfig::default()).expect("ok");
        assert!(result.scores.is_empty());
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn simple_pair_equal_scores() {
        let result = eigenvector_centrality(&graph(2, &[(0, 1)]), &EigenvectorConfig::default())
            .expect("pair converges");
        let expected = 1.0 / 2.0_f64.sqrt();
        assert!((score(&result, 0) - expected).abs() < 1e-6);
        assert!((score(&result, 1) - expected).abs() < 1e-6);
        assert!((result.eigenvalue - 1.0).abs() < 1e-6);
    }

    #[test]
    fn triangle_is_uniform() {
        let result = eigenvector_centrality(
            &graph(3, &[(0, 1), (1, 2), (0, 2)]),
            &EigenvectorConfig::default(),
        )
        .expect("triangle converges");
        for id in 0..3 {
            assert!((score(&result, id) - 1.0 / 3.0_f64.sqrt()).abs() < 1e-6);
        }
        assert!((result.eigenvalue - 2.0).abs() < 1e-6);
    }

    #[test]
    fn chain_middle_nodes_highest() {
        let result = eigenvector_centrality(
            &graph(4, &[(0, 1), (1, 2), (2, 3)]),
            &EigenvectorConfig::default(),
        )
        .expect("chain converges");
        assert!(score(&result, 1) > score(&result, 0));
        assert!(score(&result, 2) > score(&result, 3));
        assert!((score(&result, 1) - score(&result, 2)).abs() < 1e-6);
    }

    #[test]
    fn star_oscillates_until_cap() {
        let config = EigenvectorConfig {
            tolerance: 1e-9,
            max_iter: Some(200),
        };
        let err = eigenvector_centrality(&graph(4, &[(0, 1), (0, 2), (0, 3)]), &config)
            .expect_err("bipartite star never settles");
        assert!(matches!(err, LinalgError::NotConverged { iterations: 200, .. }));
    }

    #[test]
    fn edgeless_graph_is_degenerate() {
        let err = eigenvector_centrality(&graph(3, &[]), &EigenvectorConfig::default())
            .expect_err("no friendships");
        assert!(matches!(err, LinalgError::Degenerate { .. }));
    }

    #[test]
    fn scores_are_non_negative() {
        let result = eigenvector_centrality(
            &graph(4, &[(0, 1), (1, 2), (0, 2), (2, 3)]),
            &EigenvectorConfig::default(),
        )
        .expect("converges");
        for (id, value) in result.scores.iter() {
            assert!(value >= 0.0, "score for {id} should be non-negative: {value}");
        }
    }
}
