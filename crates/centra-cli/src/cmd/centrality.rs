//! `centra centrality`: score every user with one or all metrics.
//!
//! Scores are printed in ascending node-id order for every metric. PageRank
//! and eigenvector settings come from `centra.toml` and can be overridden per
//! run with flags.
//!
//! A metric that fails (eigenvector iteration on a graph without friendships,
//! or hitting `--max-iter`) is reported with its error code next to the
//! others. The command only fails when no requested metric could be scored.

use std::io::{self, Write};

use anyhow::{Result, anyhow};
use centra_core::config::{EffectiveConfig, MAX_PAGERANK_ITERATIONS};
use centra_core::error::ErrorCode;
use centra_core::linalg::LinalgError;
use centra_core::{NodeId, SocialGraph};
use centra_metrics::CentralityScores;
use centra_metrics::eigenvector::EigenvectorConfig;
use centra_metrics::pagerank::{DanglingPolicy, PageRankConfig};
use centra_metrics::report::{CentralityReport, Metric, ReportConfig, compute};
use clap::{Args, ValueEnum};
use serde::Serialize;

use crate::cmd::{DataArgs, load_graph, node_name};
use crate::output::{Coded, OutputMode, pretty_kv, pretty_section, render_mode};

// ---------------------------------------------------------------------------
// Clap types
// ---------------------------------------------------------------------------

/// Which metric(s) to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum MetricArg {
    #[default]
    All,
    Betweenness,
    Closeness,
    Eigenvector,
    Pagerank,
}

impl MetricArg {
    fn metrics(self) -> Vec<Metric> {
        match self {
            Self::All => Metric::ALL.to_vec(),
            Self::Betweenness => vec![Metric::Betweenness],
            Self::Closeness => vec![Metric::Closeness],
            Self::Eigenvector => vec![Metric::Eigenvector],
            Self::Pagerank => vec![Metric::PageRank],
        }
    }
}

/// Arguments for `centra centrality`.
#[derive(Args, Debug, Default)]
pub struct CentralityArgs {
    /// Metric to compute.
    #[arg(long, value_enum, default_value_t = MetricArg::All)]
    pub metric: MetricArg,

    #[command(flatten)]
    pub data: DataArgs,

    /// PageRank damping factor in [0, 1].
    #[arg(long)]
    pub damping: Option<f64>,

    /// Number of PageRank iterations.
    #[arg(long)]
    pub iterations: Option<usize>,

    /// Spread rank held by users who endorse nobody over all users.
    #[arg(long)]
    pub redistribute_dangling: bool,

    /// Eigenvector convergence tolerance.
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Cap on eigenvector power iterations.
    #[arg(long)]
    pub max_iter: Option<usize>,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct NodeScore {
    id: NodeId,
    name: String,
    score: f64,
}

#[derive(Debug, Serialize)]
struct MetricError {
    code: &'static str,
    message: String,
}

#[derive(Debug, Serialize)]
struct MetricOutput {
    metric: Metric,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<MetricError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    eigenvalue: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    iterations: Option<usize>,
    /// Total PageRank mass after the last iteration.
    #[serde(skip_serializing_if = "Option::is_none")]
    mass: Option<f64>,
    scores: Vec<NodeScore>,
}

#[derive(Debug, Serialize)]
struct CentralityOutput {
    nodes: usize,
    metrics: Vec<MetricOutput>,
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// Merge config-file settings with per-run flag overrides.
fn report_config(args: &CentralityArgs, config: &EffectiveConfig) -> Result<ReportConfig> {
    let mut pagerank = PageRankConfig::from(&config.project.pagerank);
    if let Some(damping) = args.damping {
        if !(0.0..=1.0).contains(&damping) {
            return Err(anyhow!("--damping must be within [0, 1], got {damping}")
                .context(Coded(ErrorCode::InvalidParameter)));
        }
        pagerank.damping = damping;
    }
    if let Some(iterations) = args.iterations {
        if iterations > MAX_PAGERANK_ITERATIONS {
            return Err(anyhow!(
                "--iterations must be at most {MAX_PAGERANK_ITERATIONS}, got {iterations}"
            )
            .context(Coded(ErrorCode::InvalidParameter)));
        }
        pagerank.iterations = iterations;
    }
    if args.redistribute_dangling {
        pagerank.dangling = DanglingPolicy::Redistribute;
    }

    let mut eigenvector = EigenvectorConfig::from(&config.project.eigenvector);
    if let Some(tolerance) = args.tolerance {
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return Err(anyhow!("--tolerance must be > 0, got {tolerance}")
                .context(Coded(ErrorCode::InvalidParameter)));
        }
        eigenvector.tolerance = tolerance;
    }
    if let Some(max_iter) = args.max_iter {
        if max_iter == 0 {
            return Err(anyhow!("--max-iter must be at least 1")
                .context(Coded(ErrorCode::InvalidParameter)));
        }
        eigenvector.max_iter = Some(max_iter);
    }

    Ok(ReportConfig {
        eigenvector,
        pagerank,
    })
}

fn scores_for(graph: &SocialGraph, scores: &CentralityScores) -> Vec<NodeScore> {
    scores
        .iter()
        .map(|(id, score)| NodeScore {
            id,
            name: node_name(graph, id).to_string(),
            score,
        })
        .collect()
}

fn build_output(graph: &SocialGraph, metrics: &[Metric], report: &CentralityReport) -> CentralityOutput {
    let metrics = metrics
        .iter()
        .filter_map(|&metric| {
            if let Some(error) = report.failure(metric) {
                return Some(MetricOutput {
                    metric,
                    error: Some(MetricError {
                        code: error.code().code(),
                        message: error.to_string(),
                    }),
                    eigenvalue: None,
                    iterations: None,
                    mass: None,
                    scores: Vec::new(),
                });
            }
            let scores = report.scores(metric)?;
            let mut out = MetricOutput {
                metric,
                error: None,
                eigenvalue: None,
                iterations: None,
                mass: None,
                scores: scores_for(graph, scores),
            };
            match metric {
                Metric::Eigenvector => {
                    if let Some(ev) = &report.eigenvector {
                        out.eigenvalue = Some(ev.eigenvalue);
                        out.iterations = Some(ev.iterations);
                    }
                }
                Metric::PageRank => {
                    if let Some(pr) = &report.pagerank {
                        out.iterations = Some(pr.iterations);
                        out.mass = Some(pr.final_mass());
                    }
                }
                Metric::Betweenness | Metric::Closeness => {}
            }
            Some(out)
        })
        .collect();

    CentralityOutput {
        nodes: graph.node_count(),
        metrics,
    }
}

/// The first failure, when no requested metric produced scores.
fn all_failed<'a>(metrics: &[Metric], report: &'a CentralityReport) -> Option<&'a LinalgError> {
    if metrics.iter().any(|&m| report.scores(m).is_some()) {
        return None;
    }
    report.failures.first().map(|f| &f.error)
}

fn render_text(output: &CentralityOutput, w: &mut dyn Write) -> io::Result<()> {
    for metric in &output.metrics {
        writeln!(w, "{}", metric.metric)?;
        if let Some(error) = &metric.error {
            writeln!(w, "error[{}]: {}", error.code, error.message)?;
        }
        for node in &metric.scores {
            writeln!(w, "{} {:.6}", node.id, node.score)?;
        }
    }
    Ok(())
}

fn render_pretty(output: &CentralityOutput, w: &mut dyn Write) -> io::Result<()> {
    for (i, metric) in output.metrics.iter().enumerate() {
        if i > 0 {
            writeln!(w)?;
        }
        pretty_section(w, &format!("{} centrality", metric.metric))?;
        if let Some(error) = &metric.error {
            pretty_kv(w, "skipped", format!("error[{}]: {}", error.code, error.message))?;
        }
        if let Some(eigenvalue) = metric.eigenvalue {
            pretty_kv(w, "eigenvalue", format!("{eigenvalue:.6}"))?;
        }
        if let Some(iterations) = metric.iterations {
            pretty_kv(w, "iterations", iterations.to_string())?;
        }
        if let Some(mass) = metric.mass {
            pretty_kv(w, "total rank", format!("{mass:.6}"))?;
        }
        for node in &metric.scores {
            writeln!(w, "{:>4}  {:<10} {:>12.6}", node.id, node.name, node.score)?;
        }
    }
    Ok(())
}

/// Run `centra centrality`.
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded, a flag is out of range,
/// or every requested metric failed.
pub fn run_centrality(args: &CentralityArgs, config: &EffectiveConfig, mode: OutputMode) -> Result<()> {
    let graph = load_graph(&args.data, config)?;
    let report_config = report_config(args, config)?;
    let metrics = args.metric.metrics();
    let report = compute(&graph, &metrics, &report_config);
    if let Some(err) = all_failed(&metrics, &report) {
        return Err(err.clone().into());
    }
    let output = build_output(&graph, &metrics, &report);
    render_mode(mode, &output, render_text, render_pretty)
}
