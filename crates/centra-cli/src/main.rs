#![forbid(unsafe_code)]

mod cmd;
mod output;

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use centra_core::config::{EffectiveConfig, resolve_config};
use centra_core::error::ErrorCode;
use clap::{CommandFactory, Parser, Subcommand};
use output::{CliError, Coded, OutputMode, render_error, resolve_output_mode};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "centra: centrality metrics for small social networks",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format.
    #[arg(long, value_enum, global = true)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Config file to use instead of `./centra.toml`.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Graph",
        about = "Score users by centrality",
        long_about = "Compute betweenness, closeness, eigenvector and PageRank centrality for every user.",
        after_help = "EXAMPLES:\n    # All four metrics on the built-in network\n    centra centrality\n\n    # PageRank with a lower damping factor\n    centra centrality --metric pagerank --damping 0.5\n\n    # Your own network, machine-readable\n    centra centrality --data users.toml --format json"
    )]
    Centrality(cmd::centrality::CentralityArgs),

    #[command(
        next_help_heading = "Graph",
        about = "List shortest friendship paths",
        long_about = "List every shortest friendship path from one user to each reachable user.",
        after_help = "EXAMPLES:\n    # Paths from user 0 to everyone\n    centra paths 0\n\n    # Only paths ending at user 9\n    centra paths 0 --target 9"
    )]
    Paths(cmd::paths::PathsArgs),

    #[command(
        next_help_heading = "Graph",
        about = "Rank users by endorsements",
        long_about = "Rank users by how many others endorse them.",
        after_help = "EXAMPLES:\n    # Full ranking\n    centra endorsements\n\n    # Top three\n    centra endorsements --top 3"
    )]
    Endorsements(cmd::endorsements::EndorsementsArgs),

    #[command(
        next_help_heading = "Statistics",
        about = "Walk through a coin-fairness hypothesis test",
        long_about = "Significance, power, p-values, a p-hacking simulation, A/B tests and Bayesian posteriors for a coin flipped 1000 times.",
        after_help = "EXAMPLES:\n    # Default seed\n    centra hypothesis\n\n    # Another simulation run\n    centra hypothesis --seed 42 --experiments 5000"
    )]
    Hypothesis(cmd::hypothesis::HypothesisArgs),

    #[command(
        next_help_heading = "Statistics",
        about = "Compare two conversion rates",
        long_about = "Two-proportion z-test of a treatment arm against a control arm.",
        after_help = "EXAMPLES:\n    # 200 of 1000 vs 150 of 1000\n    centra ab-test --control 1000:200 --treatment 1000:150"
    )]
    AbTest(cmd::ab_test::AbTestArgs),

    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n    # Bash\n    centra completions bash > /etc/bash_completion.d/centra"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("CENTRA_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "centra=debug,info"
        } else {
            "centra=info,warn"
        })
    });

    let format = env::var("CENTRA_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
    }
}

fn load_config(explicit: Option<&Path>) -> anyhow::Result<EffectiveConfig> {
    let project_root = env::current_dir()?;
    resolve_config(&project_root, explicit).context(Coded(ErrorCode::ConfigParseError))
}

fn run(command: &Commands, config: &EffectiveConfig, mode: OutputMode) -> anyhow::Result<()> {
    match command {
        Commands::Centrality(args) => cmd::centrality::run_centrality(args, config, mode),
        Commands::Paths(args) => cmd::paths::run_paths(args, config, mode),
        Commands::Endorsements(args) => cmd::endorsements::run_endorsements(args, config, mode),
        Commands::Hypothesis(args) => cmd::hypothesis::run_hypothesis(args, mode),
        Commands::AbTest(args) => cmd::ab_test::run_ab_test(args, mode),
        Commands::Completions(args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args, &mut command, &mut io::stdout().lock())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let config = load_config(cli.config.as_deref());
    let mode = resolve_output_mode(
        cli.format,
        cli.json,
        config.as_ref().ok().and_then(EffectiveConfig::output),
    );
    debug!(?mode, "output mode resolved");

    match config.and_then(|config| run(&cli.command, &config, mode)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if render_error(mode, &CliError::from(&err)).is_err() {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}
