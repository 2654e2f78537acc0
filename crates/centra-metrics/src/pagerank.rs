//! PageRank over the endorsement relation.
//!
//! # Overview
//!
//! An endorsement from a user who is themselves heavily endorsed counts for
//! more than one from a user nobody endorses. PageRank captures this by
//! letting rank flow along endorsement edges.
//!
//! # Algorithm
//!
//! ```text
//! PR(v) = (1 - d) / N + d * Σ PR(u) / out_degree(u)   for each u → v
//! ```
//!
//! where `d` is the damping factor (default 0.85). Every node starts at
//! `1/N` and the update runs a fixed number of times; there is no
//! convergence test. Sources are visited in ascending id order.
//!
//! # Dangling nodes
//!
//! A node that endorses nobody has no outgoing edge to pass its share along.
//! Under [`DanglingPolicy::Drop`] (the default) that share is lost and the
//! total mass sinks below 1. [`DanglingPolicy::Redistribute`] spreads it
//! evenly over every node instead, keeping the mass at 1.
//!
//! Total mass is recorded per iteration for the first
//! [`MASS_HISTORY_LIMIT`] iterations only; the final mass is always kept.

use centra_core::config::PageRankSettings;
use centra_core::graph::SocialGraph;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::scores::CentralityScores;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Longest per-iteration mass history kept in a [`PageRankResult`].
pub const MASS_HISTORY_LIMIT: usize = 10_000;

/// What to do with the rank held by nodes without outgoing endorsements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DanglingPolicy {
    /// Discard it; total mass decreases each iteration.
    #[default]
    Drop,
    /// Split it evenly across all nodes.
    Redistribute,
}

/// Configuration for PageRank computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRankConfig {
    /// Damping factor (probability of following an endorsement vs
    /// teleporting). Default: 0.85.
    pub damping: f64,
    /// Number of update rounds. Default: 100.
    pub iterations: usize,
    /// Default: [`DanglingPolicy::Drop`].
    pub dangling: DanglingPolicy,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping: 0.85,
            iterations: 100,
            dangling: DanglingPolicy::Drop,
        }
    }
}

impl From<&PageRankSettings> for PageRankConfig {
    fn from(settings: &PageRankSettings) -> Self {
        Self {
            damping: settings.damping,
            iterations: settings.iterations,
            dangling: if settings.redistribute_dangling {
                DanglingPolicy::Redistribute
            } else {
                DanglingPolicy::Drop
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Result of a PageRank computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRankResult {
    /// PageRank scores: node id → score.
    pub scores: CentralityScores,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Total rank after each of the first [`MASS_HISTORY_LIMIT`] iterations.
    pub mass: Vec<f64>,
    /// Total rank after the last iteration (1.0 when no iteration ran).
    pub final_mass: f64,
}

impl PageRankResult {
    /// Total rank after the last iteration.
    #[must_use]
    pub const fn final_mass(&self) -> f64 {
        self.final_mass
    }
}

fn mass_history(iterations: usize) -> Vec<f64> {
    Vec::with_capacity(iterations.min(MASS_HISTORY_LIMIT))
}

// ---------------------------------------------------------------------------
// PageRank
// ---------------------------------------------------------------------------

/// Compute PageRank over endorsements.
#[must_use]
#[allow(clippy::cast_precision_loss)]
#[instrument(skip(graph), fields(n = graph.node_count()))]
pub fn pagerank(graph: &SocialGraph, config: &PageRankConfig) -> PageRankResult {
    let n = graph.node_count();
    if n == 0 {
        return PageRankResult {
            scores: CentralityScores::default(),
            iterations: 0,
            mass: Vec::new(),
            final_mass: 1.0,
        };
    }

    let dangling = graph.dangling_nodes();
    if !dangling.is_empty() && config.dangling == DanglingPolicy::Drop {
        warn!(
            count = dangling.len(),
            "nodes without outgoing endorsements leak rank mass"
        );
    }

    // Outgoing targets as positions, so the inner loop indexes a Vec.
    let targets: Vec<Vec<usize>> = graph
        .nodes()
        .iter()
        .map(|node| {
            node.endorses
                .iter()
                .filter_map(|&target| graph.position(target))
                .collect()
        })
        .collect();

    let n_f64 = n as f64;
    let base = (1.0 - config.damping) / n_f64;

    let mut ranks = vec![1.0 / n_f64; n];
    let mut next = vec![0.0_f64; n];
    let mut mass = mass_history(config.iterations);
    let mut final_mass = 1.0;

    for _ in 0..config.iterations {
        for r in &mut next {
            *r = base;
        }

        let mut leaked = 0.0;
        for (idx, outgoing) in targets.iter().enumerate() {
            if outgoing.is_empty() {
                leaked += config.damping * ranks[idx];
                continue;
            }
            let share = config.damping * ranks[idx] / outgoing.len() as f64;
            for &target in outgoing {
                next[target] += share;
            }
        }

        if config.dangling == DanglingPolicy::Redistribute && leaked > 0.0 {
            let share = leaked / n_f64;
            for r in &mut next {
                *r += share;
            }
        }

        std::mem::swap(&mut ranks, &mut next);
        final_mass = ranks.iter().sum();
        if mass.len() < MASS_HISTORY_LIMIT {
            mass.push(final_mass);
        }
    }

    debug!(
        iterations = config.iterations,
        mass = final_mass,
        "pagerank finished"
    );

    PageRankResult {
        scores: graph.ids().zip(ranks).collect(),
        iterations: config.iterations,
        mass,
        final_mass,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
