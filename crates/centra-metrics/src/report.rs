//! Run several metrics over one graph.

use std::fmt;

use centra_core::graph::SocialGraph;
use centra_core::linalg::LinalgError;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::betweenness::betweenness_from_paths;
use crate::closeness::closeness_from_paths;
use crate::eigenvector::{EigenvectorConfig, EigenvectorResult, eigenvector_centrality};
use crate::pagerank::{PageRankConfig, PageRankResult, pagerank};
use crate::paths::all_shortest_paths;
use crate::scores::CentralityScores;

/// A centrality metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Betweenness,
    Closeness,
    Eigenvector,
    PageRank,
}

impl Metric {
    pub const ALL: [Self; 4] = [
        Self::Betweenness,
        Self::Closeness,
        Self::Eigenvector,
        Self::PageRank,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Betweenness => "betweenness",
            Self::Closeness => "closeness",
            Self::Eigenvector => "eigenvector",
            Self::PageRank => "pagerank",
        }
    }

    const fn needs_paths(self) -> bool {
        matches!(self, Self::Betweenness | Self::Closeness)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tuning for the iterative metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReportConfig {
    pub eigenvector: EigenvectorConfig,
    pub pagerank: PageRankConfig,
}

/// A requested metric that could not be computed.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricFailure {
    pub metric: Metric,
    pub error: LinalgError,
}

/// Scores for the requested metrics; unrequested or failed ones are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CentralityReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub betweenness: Option<CentralityScores>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closeness: Option<CentralityScores>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eigenvector: Option<EigenvectorResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagerank: Option<PageRankResult>,
    /// Requested metrics that failed, in request order.
    #[serde(skip)]
    pub failures: Vec<MetricFailure>,
}

impl CentralityReport {
    /// Scores for `metric`, if it was computed.
    #[must_use]
    pub fn scores(&self, metric: Metric) -> Option<&CentralityScores> {
        match metric {
            Metric::Betweenness => self.betweenness.as_ref(),
            Metric::Closeness => self.closeness.as_ref(),
            Metric::Eigenvector => self.eigenvector.as_ref().map(|r| &r.scores),
            Metric::PageRank => self.pagerank.as_ref().map(|r| &r.scores),
        }
    }

    /// Why `metric` has no scores, if it was requested and failed.
    #[must_use]
    pub fn failure(&self, metric: Metric) -> Option<&LinalgError> {
        self.failures
            .iter()
            .find(|f| f.metric == metric)
            .map(|f| &f.error)
    }
}

/// Compute `metrics` over `graph`.
///
/// The all-pairs shortest-path enumeration runs at most once and is shared
/// by betweenness and closeness. A failing metric is recorded in
/// [`CentralityReport::failures`] and the others are still computed.
#[must_use]
#[instrument(skip(graph, metrics), fields(n = graph.node_count()))]
pub fn compute(graph: &SocialGraph, metrics: &[Metric], config: &ReportConfig) -> CentralityReport {
    let mut report = CentralityReport::default();

    let paths = metrics
        .iter()
        .any(|m| m.needs_paths())
        .then(|| all_shortest_paths(graph));

    for &metric in metrics {
        match metric {
            Metric::Betweenness => {
                if let Some(all) = &paths {
                    report.betweenness = Some(betweenness_from_paths(graph, all));
                }
            }
            Metric::Closeness => {
                if let Some(all) = &paths {
                    report.closeness = Some(closeness_from_paths(graph, all));
                }
            }
            Metric::Eigenvector => match eigenvector_centrality(graph, &config.eigenvector) {
                Ok(result) => report.eigenvector = Some(result),
                Err(error) => {
                    warn!(%metric, code = error.code().code(), %error, "metric skipped");
                    report.failures.push(MetricFailure { metric, error });
                    continue;
                }
            },
            Metric::PageRank => {
                report.pagerank = Some(pagerank(graph, &config.pagerank));
            }
        }
        debug!(%metric, "metric computed");
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use centra_core::{Dataset, NodeId};

    fn builtin() -> SocialGraph {
        SocialGraph::from_dataset(&Dataset::builtin()).expect("builtin dataset is valid")
    }

    #[test]
    fn only_requested_metrics_are_filled() {
        let report = compute(&builtin(), &[Metric::Closeness], &ReportConfig::default());
        assert!(report.closeness.is_some());
        assert!(report.betweenness.is_none());
        assert!(report.eigenvector.is_none());
        assert!(report.pagerank.is_none());
        assert!(report.scores(Metric::PageRank).is_none());
    }

    #[test]
    fn all_metrics_score_every_node() {
        let graph = builtin();
        let report = compute(&graph, &Metric::ALL, &ReportConfig::default());
        assert!(report.failures.is_empty());
        for metric in Metric::ALL {
            let scores = report.scores(metric).expect("requested");
            assert_eq!(scores.len(), graph.node_count(), "{metric}");
        }
    }

    #[test]
    fn json_skips_missing_metrics() {
        let report = compute(&builtin(), &[Metric::Betweenness], &ReportConfig::default());
        let json = serde_json::to_value(&report).expect("serializable");
        let object = json.as_object().expect("object");
        assert_eq!(object.len(), 1);
        let clive = json["betweenness"]["5"].as_f64().expect("number");
        assert!((clive - 20.5).abs() < 1e-9);
    }

    #[test]
    fn shared_paths_match_direct_computation() {
        let graph = builtin();
        let report = compute(
            &graph,
            &[Metric::Betweenness, Metric::Closeness],
            &ReportConfig::default(),
        );
        assert_eq!(
            report.betweenness,
            Some(crate::betweenness::betweenness_centrality(&graph))
        );
        assert_eq!(
            report.closeness.as_ref().and_then(|s| s.get(NodeId(4))),
            Some(0.05)
        );
    }

    #[test]
    fn eigenvector_failure_keeps_other_metrics() {
        let graph = SocialGraph::new(
            [(NodeId(0), "A".to_string()), (NodeId(1), "B".to_string())],
            &[],
            &[(NodeId(0), NodeId(1)), (NodeId(1), NodeId(0))],
        )
        .expect("valid graph");

        let report = compute(&graph, &Metric::ALL, &ReportConfig::default());
        assert!(report.eigenvector.is_none());
        assert!(matches!(
            report.failure(Metric::Eigenvector),
            Some(LinalgError::Degenerate { .. })
        ));
        assert!(report.failure(Metric::PageRank).is_none());
        assert_eq!(report.failures.len(), 1);

        assert_eq!(report.betweenness.as_ref().and_then(|s| s.get(NodeId(0))), Some(0.0));
        assert_eq!(report.closeness.as_ref().and_then(|s| s.get(NodeId(1))), Some(0.0));
        let pagerank = report.scores(Metric::PageRank).expect("pagerank computed");
        assert!((pagerank.get(NodeId(0)).expect("scored") - 0.5).abs() < 1e-9);
    }

    #[test]
    fn capped_eigenvector_is_reported_not_converged() {
        let config = ReportConfig {
            eigenvector: EigenvectorConfig {
                max_iter: Some(3),
                ..EigenvectorConfig::default()
            },
            ..ReportConfig::default()
        };
        let report = compute(&builtin(), &[Metric::Eigenvector, Metric::Betweenness], &config);
        assert!(matches!(
            report.failure(Metric::Eigenvector),
            Some(LinalgError::NotConverged { iterations: 3, .. })
        ));
        assert!(report.betweenness.is_some());
    }
}
