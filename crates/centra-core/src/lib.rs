#![forbid(unsafe_code)]
//! centra-core library.
//!
//! The graph model, input datasets, the dense linear-algebra helpers used by
//! power iteration, and configuration loading. Everything downstream
//! (`centra-metrics`, `centra-cli`) consumes a [`graph::SocialGraph`] built
//! here and never mutates it.
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums inside the library, `anyhow::Result`
//!   at file-loading boundaries.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod dataset;
pub mod error;
pub mod graph;
pub mod linalg;

pub use dataset::Dataset;
pub use graph::{Node, NodeId, SocialGraph};
