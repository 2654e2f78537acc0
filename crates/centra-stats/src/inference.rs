//! Hypothesis tests built on the normal approximation.
//!
//! # Overview
//!
//! - Coin fairness: `Binomial(n, p)` is approximated by
//!   `N(np, sqrt(np(1 - p)))`, so significance bounds and power come from
//!   [`Normal`] tail probabilities.
//! - P-hacking: running many experiments on a fair coin and testing each at
//!   the 5% level rejects about 5% of them anyway.
//! - A/B testing: the difference of two estimated success rates divided by
//!   their pooled standard error is approximately standard normal.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::error::StatsError;
use crate::normal::Normal;

/// Lowest head count out of 1000 flips that does not reject fairness at 5%.
pub const FAIR_LOW: usize = 469;
/// Highest head count out of 1000 flips that does not reject fairness at 5%.
pub const FAIR_HIGH: usize = 531;
/// Distance from `flips / 2` at which a head count counts as extreme.
pub const EXTREME_DEVIATION: usize = 30;

// ---------------------------------------------------------------------------
// Binomial approximation
// ---------------------------------------------------------------------------

/// Mean and standard deviation of `Binomial(n, p)` as a [`Normal`].
///
/// # Errors
///
/// Returns [`StatsError::InvalidParameter`] when `n` is zero or `p` is not
/// strictly between 0 and 1.
#[allow(clippy::cast_precision_loss)]
pub fn normal_approximation_to_binomial(n: u64, p: f64) -> Result<Normal, StatsError> {
    if n == 0 {
        return Err(StatsError::invalid("n", 0.0, "must be at least 1"));
    }
    if !(p > 0.0 && p < 1.0) {
        return Err(StatsError::invalid("p", p, "must lie strictly between 0 and 1"));
    }
    let n = n as f64;
    Normal::new(p * n, (p * (1.0 - p) * n).sqrt())
}

// ---------------------------------------------------------------------------
// Coin-flip experiments
// ---------------------------------------------------------------------------

/// Flip a fair coin `flips` times; `true` is heads.
pub fn run_experiment<R: Rng + ?Sized>(rng: &mut R, flips: usize) -> Vec<bool> {
    (0..flips).map(|_| rng.r#gen::<f64>() < 0.5).collect()
}

/// Number of heads in an experiment.
#[must_use]
pub fn count_heads(experiment: &[bool]) -> usize {
    experiment.iter().filter(|&&heads| heads).count()
}

/// Whether `heads` out of 1000 flips rejects fairness at the 5% level.
#[must_use]
pub const fn reject_fairness(heads: usize) -> bool {
    heads < FAIR_LOW || heads > FAIR_HIGH
}

/// How many of `experiments` fair 1000-flip runs are wrongly rejected.
#[instrument(skip(rng))]
pub fn count_rejections<R: Rng + ?Sized>(rng: &mut R, experiments: usize) -> usize {
    let rejections = (0..experiments)
        .filter(|_| reject_fairness(count_heads(&run_experiment(rng, 1000))))
        .count();
    debug!(rejections, "p-hacking simulation finished");
    rejections
}

/// Fraction of `trials` experiments of `flips` flips whose head count is at
/// least [`EXTREME_DEVIATION`] away from `flips / 2`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
#[instrument(skip(rng))]
pub fn count_extreme_values<R: Rng + ?Sized>(rng: &mut R, trials: usize, flips: usize) -> f64 {
    if trials == 0 {
        return 0.0;
    }
    let center = flips / 2;
    let extreme = (0..trials)
        .filter(|_| count_heads(&run_experiment(rng, flips)).abs_diff(center) >= EXTREME_DEVIATION)
        .count();
    extreme as f64 / trials as f64
}

// ---------------------------------------------------------------------------
// A/B testing
// ---------------------------------------------------------------------------

/// Outcome counts for one arm of an A/B test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Trial {
    /// Number of exposures (`N`).
    pub trials: u64,
    /// Number of successes (`n`).
    pub successes: u64,
}

impl Trial {
    /// # Errors
    ///
    /// Returns [`StatsError::InvalidParameter`] when there are no trials or
    /// more successes than trials.
    #[allow(clippy::cast_precision_loss)]
    pub fn new(trials: u64, successes: u64) -> Result<Self, StatsError> {
        if trials == 0 {
            return Err(StatsError::invalid("trials", 0.0, "must be at least 1"));
        }
        if successes > trials {
            return Err(StatsError::invalid(
                "successes",
                successes as f64,
                "cannot exceed trials",
            ));
        }
        Ok(Self { trials, successes })
    }
}

impl fmt::Display for Trial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.trials, self.successes)
    }
}

impl FromStr for Trial {
    type Err = StatsError;

    /// Parse `TRIALS:SUCCESSES`, e.g. `1000:200`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || StatsError::MalformedTrial(s.to_string());
        let (trials, successes) = s.split_once(':').ok_or_else(malformed)?;
        let trials = trials.trim().parse().map_err(|_| malformed())?;
        let successes = successes.trim().parse().map_err(|_| malformed())?;
        Self::new(trials, successes)
    }
}

/// Estimated success rate and its standard error.
///
/// # Errors
///
/// Returns [`StatsError::InvalidParameter`] when `trial.trials` is zero.
#[allow(clippy::cast_precision_loss)]
pub fn estimated_parameters(trial: Trial) -> Result<(f64, f64), StatsError> {
    if trial.trials == 0 {
        return Err(StatsError::invalid("trials", 0.0, "must be at least 1"));
    }
    let n = trial.trials as f64;
    let p = trial.successes as f64 / n;
    Ok((p, (p * (1.0 - p) / n).sqrt()))
}

/// `(p_B - p_A) / sqrt(sigma_A² + sigma_B²)`.
///
/// # Errors
///
/// Returns [`StatsError::InvalidParameter`] for an arm with zero trials and
/// [`StatsError::DegenerateVariance`] when both arms have zero variance.
pub fn a_b_test_statistic(a: Trial, b: Trial) -> Result<f64, StatsError> {
    let (p_a, sigma_a) = estimated_parameters(a)?;
    let (p_b, sigma_b) = estimated_parameters(b)?;
    let pooled = sigma_a.hypot(sigma_b);
    if pooled == 0.0 {
        return Err(StatsError::DegenerateVariance);
    }
    Ok((p_b - p_a) / pooled)
}

/// Result of a two-proportion A/B test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AbTest {
    pub control: Trial,
    pub treatment: Trial,
    /// Test statistic, approximately standard normal under the null.
    pub z: f64,
    /// Two-sided p-value of `z`.
    pub p_value: f64,
}

/// Run the A/B test of `treatment` against `control`.
///
/// # Errors
///
/// See [`a_b_test_statistic`].
#[instrument]
pub fn a_b_test(control: Trial, treatment: Trial) -> Result<AbTest, StatsError> {
    let z = a_b_test_statistic(control, treatment)?;
    Ok(AbTest {
        control,
        treatment,
        z,
        p_value: Normal::STANDARD.two_sided_p_value(z),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn binomial_approximation_moments() {
        let n = normal_approximation_to_binomial(1000, 0.5).expect("valid");
        assert!((n.mu - 500.0).abs() < 1e-12);
        assert!((n.sigma - 250.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn binomial_approximation_rejects_bad_input() {
        assert!(normal_approximation_to_binomial(0, 0.5).is_err());
        assert!(normal_approximation_to_binomial(10, 0.0).is_err());
        assert!(normal_approximation_to_binomial(10, 1.0).is_err());
    }

    #[test]
    fn fairness_thresholds() {
        assert!(reject_fairness(468));
        assert!(!reject_fairness(469));
        assert!(!reject_fairness(531));
        assert!(reject_fairness(532));
    }

    #[test]
    fn experiments_are_reproducible_with_a_seed() {
        let a = run_experiment(&mut StdRng::seed_from_u64(7), 100);
        let b = run_experiment(&mut StdRng::seed_from_u64(7), 100);
        assert_eq!(a, b);
        assert_eq!(a.len(), 100);
    }

    #[test]
    fn trial_parses_from_colon_pair() {
        assert_eq!("1000:200".parse::<Trial>(), Ok(Trial { trials: 1000, successes: 200 }));
        assert_eq!(" 10 : 3 ".parse::<Trial>().map(|t| t.to_string()), Ok("10:3".to_string()));
        assert!(matches!("1000".parse::<Trial>(), Err(StatsError::MalformedTrial(_))));
        assert!(matches!("a:b".parse::<Trial>(), Err(StatsError::MalformedTrial(_))));
        assert!(matches!(
            "10:11".parse::<Trial>(),
            Err(StatsError::InvalidParameter { name: "successes", .. })
        ));
    }

    #[test]
    fn zero_variance_is_degenerate() {
        let all = Trial::new(100, 100).expect("valid");
        let none = Trial::new(100, 0).expect("valid");
        assert_eq!(a_b_test_statistic(all, all), Err(StatsError::DegenerateVariance));
        assert_eq!(a_b_test_statistic(none, none), Err(StatsError::DegenerateVariance));
        // One varying arm is enough.
        assert!(a_b_test_statistic(none, Trial::new(100, 10).expect("valid")).is_ok());
    }

    #[test]
    fn zero_trial_arm_is_rejected() {
        let empty = Trial { trials: 0, successes: 0 };
        let ok = Trial::new(10, 5).expect("valid");
        assert!(matches!(
            a_b_test_statistic(empty, ok),
            Err(StatsError::InvalidParameter { name: "trials", .. })
        ));
    }
}
