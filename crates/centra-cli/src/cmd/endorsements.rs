//! `centra endorsements`: users ranked by incoming endorsements.

use std::io::{self, Write};

use anyhow::Result;
use centra_core::config::EffectiveConfig;
use centra_core::{NodeId, SocialGraph};
use centra_metrics::endorsements::endorsement_counts;
use clap::Args;
use serde::Serialize;

use crate::cmd::{DataArgs, load_graph, node_name};
use crate::output::{OutputMode, pretty_section, render_mode};

/// Arguments for `centra endorsements`.
#[derive(Args, Debug)]
pub struct EndorsementsArgs {
    /// Show only the N most endorsed users.
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    #[command(flatten)]
    pub data: DataArgs,
}

#[derive(Debug, Serialize)]
struct RankedUser {
    id: NodeId,
    name: String,
    endorsements: usize,
}

#[derive(Debug, Serialize)]
struct EndorsementsOutput {
    ranking: Vec<RankedUser>,
}

fn build_output(graph: &SocialGraph, top: Option<usize>) -> EndorsementsOutput {
    let ranking = endorsement_counts(graph)
        .into_iter()
        .take(top.unwrap_or(usize::MAX))
        .map(|(id, endorsements)| RankedUser {
            id,
            name: node_name(graph, id).to_string(),
            endorsements,
        })
        .collect();
    EndorsementsOutput { ranking }
}

fn render_text(output: &EndorsementsOutput, w: &mut dyn Write) -> io::Result<()> {
    for user in &output.ranking {
        writeln!(w, "{} {}", user.id, user.endorsements)?;
    }
    Ok(())
}

fn render_pretty(output: &EndorsementsOutput, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Most endorsed")?;
    for (rank, user) in output.ranking.iter().enumerate() {
        writeln!(
            w,
            "{:>3}. {:<10} (id {:>3})  {}",
            rank + 1,
            user.name,
            user.id,
            user.endorsements
        )?;
    }
    Ok(())
}

/// Run `centra endorsements`.
///
/// # Errors
///
/// Returns an error if the dataset cannot be loaded.
pub fn run_endorsements(
    args: &EndorsementsArgs,
    config: &EffectiveConfig,
    mode: OutputMode,
) -> Result<()> {
    let graph = load_graph(&args.data, config)?;
    let output = build_output(&graph, args.top);
    render_mode(mode, &output, render_text, render_pretty)
}
