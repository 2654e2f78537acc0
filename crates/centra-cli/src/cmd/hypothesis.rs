//! `centra hypothesis`: the coin-fairness walkthrough.
//!
//! Tests `H0: p = 0.5` for 1000 flips of a coin against a coin biased to
//! `p = 0.55`, then shows p-values, a seeded p-hacking simulation, two A/B
//! tests and Beta posteriors for three priors after 3 heads and 7 tails.

use std::io::{self, Write};

use anyhow::Result;
use centra_stats::Normal;
use centra_stats::bayes::BetaPosterior;
use centra_stats::inference::{
    AbTest, Trial, a_b_test, count_extreme_values, count_rejections,
    normal_approximation_to_binomial,
};
use clap::Args;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::debug;

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

const FLIPS: u64 = 1000;
const CONFIDENCE: f64 = 0.95;
const OBSERVED_HEADS: u32 = 3;
const OBSERVED_TAILS: u32 = 7;

/// Arguments for `centra hypothesis`.
#[derive(Args, Debug)]
pub struct HypothesisArgs {
    /// Seed for the simulated experiments.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Number of simulated 1000-flip experiments.
    #[arg(long, default_value_t = 1000)]
    pub experiments: usize,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct Power {
    /// `Normal` approximation for the biased coin.
    alternative: Normal,
    two_sided: f64,
    one_sided: f64,
    one_sided_upper_bound: f64,
}

#[derive(Debug, Serialize)]
struct PValue {
    test: &'static str,
    heads: f64,
    p_value: f64,
}

#[derive(Debug, Serialize)]
struct Simulation {
    seed: u64,
    experiments: usize,
    /// Fair-coin runs wrongly rejected at the 5% level.
    rejections: usize,
    /// Fraction of runs at least 30 heads away from 500.
    extreme_fraction: f64,
}

#[derive(Debug, Serialize)]
struct Posterior {
    prior: BetaPosterior,
    posterior: BetaPosterior,
    mean: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    mode: Option<f64>,
}

#[derive(Debug, Serialize)]
struct HypothesisOutput {
    null: Normal,
    bounds: (f64, f64),
    power: Power,
    p_values: Vec<PValue>,
    simulation: Simulation,
    ab_tests: Vec<AbTest>,
    posteriors: Vec<Posterior>,
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

fn build_output(args: &HypothesisArgs) -> Result<HypothesisOutput> {
    let null = normal_approximation_to_binomial(FLIPS, 0.5)?;
    let alternative = normal_approximation_to_binomial(FLIPS, 0.55)?;

    let (lo, hi) = null.two_sided_bounds(CONFIDENCE)?;
    let upper = null.upper_bound(CONFIDENCE)?;
    let power = Power {
        alternative,
        two_sided: 1.0 - alternative.probability_between(lo, hi),
        one_sided: 1.0 - alternative.probability_below(upper),
        one_sided_upper_bound: upper,
    };

    let p_values = vec![
        PValue {
            test: "two_sided",
            heads: 529.5,
            p_value: null.two_sided_p_value(529.5),
        },
        PValue {
            test: "two_sided",
            heads: 531.5,
            p_value: null.two_sided_p_value(531.5),
        },
        PValue {
            test: "upper",
            heads: 524.5,
            p_value: null.upper_p_value(524.5),
        },
        PValue {
            test: "upper",
            heads: 526.5,
            p_value: null.upper_p_value(526.5),
        },
    ];

    let mut rng = StdRng::seed_from_u64(args.seed);
    let rejections = count_rejections(&mut rng, args.experiments);
    #[allow(clippy::cast_possible_truncation)]
    let extreme_fraction = count_extreme_values(&mut rng, args.experiments, FLIPS as usize);
    debug!(rejections, extreme_fraction, "simulation finished");
    let simulation = Simulation {
        seed: args.seed,
        experiments: args.experiments,
        rejections,
        extreme_fraction,
    };

    let control = Trial::new(1000, 200)?;
    let ab_tests = vec![
        a_b_test(control, Trial::new(1000, 180)?)?,
        a_b_test(control, Trial::new(1000, 150)?)?,
    ];

    let posteriors = [(1.0, 1.0), (20.0, 20.0), (30.0, 10.0)]
        .into_iter()
        .map(|(alpha, beta)| -> Result<Posterior> {
            let prior = BetaPosterior::new(alpha, beta)?;
            let posterior = prior.update(OBSERVED_HEADS, OBSERVED_TAILS);
            Ok(Posterior {
                prior,
                posterior,
                mean: posterior.mean(),
                mode: posterior.mode(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(HypothesisOutput {
        null,
        bounds: (lo, hi),
        power,
        p_values,
        simulation,
        ab_tests,
        posteriors,
    })
}

fn render_text(output: &HypothesisOutput, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "null {:.4} {:.4}", output.null.mu, output.null.sigma)?;
    writeln!(w, "bounds {:.4} {:.4}", output.bounds.0, output.bounds.1)?;
    writeln!(w, "power_two_sided {:.4}", output.power.two_sided)?;
    writeln!(w, "power_one_sided {:.4}", output.power.one_sided)?;
    for p in &output.p_values {
        writeln!(w, "p_value_{} {} {:.6}", p.test, p.heads, p.p_value)?;
    }
    writeln!(w, "rejections {}", output.simulation.rejections)?;
    writeln!(w, "extreme_fraction {:.4}", output.simulation.extreme_fraction)?;
    for ab in &output.ab_tests {
        writeln!(
            w,
            "ab_test {} {} {:.4} {:.6}",
            ab.control, ab.treatment, ab.z, ab.p_value
        )?;
    }
    for post in &output.posteriors {
        writeln!(
            w,
            "posterior {} {} {:.4}",
            post.posterior.alpha, post.posterior.beta, post.mean
        )?;
    }
    Ok(())
}

fn render_pretty(output: &HypothesisOutput, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, "Fair coin, 1000 flips")?;
    pretty_kv(w, "mean", format!("{:.4}", output.null.mu))?;
    pretty_kv(w, "std dev", format!("{:.4}", output.null.sigma))?;
    pretty_kv(
        w,
        "95% bounds",
        format!("[{:.4}, {:.4}]", output.bounds.0, output.bounds.1),
    )?;

    writeln!(w)?;
    pretty_section(w, "Power against p = 0.55")?;
    pretty_kv(w, "two-sided", format!("{:.4}", output.power.two_sided))?;
    pretty_kv(
        w,
        "one-sided",
        format!(
            "{:.4} (reject above {:.4})",
            output.power.one_sided, output.power.one_sided_upper_bound
        ),
    )?;

    writeln!(w)?;
    pretty_section(w, "p-values")?;
    for p in &output.p_values {
        pretty_kv(w, &format!("{} {}", p.test, p.heads), format!("{:.6}", p.p_value))?;
    }

    writeln!(w)?;
    pretty_section(w, "Simulation")?;
    pretty_kv(w, "seed", output.simulation.seed.to_string())?;
    pretty_kv(
        w,
        "rejections",
        format!(
            "{} of {}",
            output.simulation.rejections, output.simulation.experiments
        ),
    )?;
    pretty_kv(
        w,
        "extreme",
        format!("{:.4}", output.simulation.extreme_fraction),
    )?;

    writeln!(w)?;
    pretty_section(w, "A/B tests")?;
    for ab in &output.ab_tests {
        pretty_kv(
            w,
            &format!("{} vs {}", ab.control, ab.treatment),
            format!("z = {:.4}, p = {:.6}", ab.z, ab.p_value),
        )?;
    }

    writeln!(w)?;
    pretty_section(
        w,
        &format!("Posteriors after {OBSERVED_HEADS} heads, {OBSERVED_TAILS} tails"),
    )?;
    for post in &output.posteriors {
        let mode = post
            .mode
            .map_or_else(|| "-".to_string(), |mode| format!("{mode:.4}"));
        pretty_kv(
            w,
            &format!("Beta({}, {})", post.prior.alpha, post.prior.beta),
            format!(
                "Beta({}, {}) mean {:.4} mode {mode}",
                post.posterior.alpha, post.posterior.beta, post.mean
            ),
        )?;
    }
    Ok(())
}

/// Run `centra hypothesis`.
///
/// # Errors
///
/// Returns an error only if a built-in parameter is rejected.
pub fn run_hypothesis(args: &HypothesisArgs, mode: OutputMode) -> Result<()> {
    let output = build_output(args)?;
    render_mode(mode, &output, render_text, render_pretty)
}
