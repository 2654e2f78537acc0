#![forbid(unsafe_code)]
//! Centrality metrics for the social graph.
//!
//! # Overview
//!
//! Every metric takes a [`SocialGraph`](centra_core::SocialGraph) by
//! reference and returns a fresh score map keyed by node id. The graph is
//! never mutated. Each metric answers a different question:
//!
//! - **Betweenness** (`betweenness`): who sits on the shortest paths between
//!   other users?
//! - **Closeness** (`closeness`): who can reach everyone else in few hops?
//! - **Eigenvector** (`eigenvector`): who is connected to other well-connected
//!   users?
//! - **PageRank** (`pagerank`): whose endorsements come from users who are
//!   themselves endorsed?
//!
//! Betweenness and closeness both consume the all-pairs output of
//! [`paths::all_shortest_paths`]; [`report::compute`] runs the enumeration
//! once and shares it.
//!
//! # Usage
//!
//! ```rust,ignore
//! use centra_core::{Dataset, SocialGraph};
//! use centra_metrics::betweenness::betweenness_centrality;
//! use centra_metrics::pagerank::{PageRankConfig, pagerank};
//!
//! let graph = SocialGraph::from_dataset(&Dataset::builtin())?;
//! let bc = betweenness_centrality(&graph);
//! let pr = pagerank(&graph, &PageRankConfig::default());
//! ```

pub mod betweenness;
pub mod closeness;
pub mod eigenvector;
pub mod endorsements;
pub mod pagerank;
pub mod paths;
pub mod report;
pub mod scores;

pub use scores::CentralityScores;
