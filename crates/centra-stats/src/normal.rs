//! The normal distribution and the tail probabilities used by hypothesis
//! tests.
//!
//! # Inverse CDF
//!
//! [`Normal::inverse_cdf`] bisects the standard normal CDF on `[-10, 10]`
//! until the bracket is narrower than [`INVERSE_CDF_TOLERANCE`], then maps
//! the result back through `mu + sigma * z`. Results are therefore accurate
//! to about `sigma * 1e-5`, which is plenty for significance bounds.

use std::f64::consts::SQRT_2;

use serde::Serialize;

use crate::error::StatsError;
use crate::special::erf;

/// Bracket width at which the inverse-CDF bisection stops.
pub const INVERSE_CDF_TOLERANCE: f64 = 1e-5;

const SEARCH_LOW: f64 = -10.0;
const SEARCH_HIGH: f64 = 10.0;

/// A normal distribution `N(mu, sigma²)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Normal {
    pub mu: f64,
    pub sigma: f64,
}

impl Normal {
    /// `N(0, 1)`.
    pub const STANDARD: Self = Self {
        mu: 0.0,
        sigma: 1.0,
    };

    /// # Errors
    ///
    /// Returns [`StatsError::InvalidParameter`] unless `sigma` is finite and
    /// positive and `mu` is finite.
    pub fn new(mu: f64, sigma: f64) -> Result<Self, StatsError> {
        if !mu.is_finite() {
            return Err(StatsError::invalid("mu", mu, "must be finite"));
        }
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(StatsError::invalid("sigma", sigma, "must be finite and > 0"));
        }
        Ok(Self { mu, sigma })
    }

    /// `P(X <= x)`.
    #[must_use]
    pub fn cdf(&self, x: f64) -> f64 {
        (1.0 + erf((x - self.mu) / SQRT_2 / self.sigma)) / 2.0
    }

    /// The `x` with `P(X <= x) = p`, by bisection.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::InvalidParameter`] when `p` is outside `[0, 1]`.
    pub fn inverse_cdf(&self, p: f64) -> Result<f64, StatsError> {
        if !(0.0..=1.0).contains(&p) {
            return Err(StatsError::invalid("p", p, "must lie in [0, 1]"));
        }

        let mut low = SEARCH_LOW;
        let mut high = SEARCH_HIGH;
        let mut mid = f64::midpoint(low, high);
        while high - low > INVERSE_CDF_TOLERANCE {
            mid = f64::midpoint(low, high);
            let mid_p = Self::STANDARD.cdf(mid);
            if mid_p < p {
                low = mid;
            } else if mid_p > p {
                high = mid;
            } else {
                break;
            }
        }

        Ok(self.sigma.mul_add(mid, self.mu))
    }

    /// `P(X < x)`; the CDF.
    #[must_use]
    pub fn probability_below(&self, x: f64) -> f64 {
        self.cdf(x)
    }

    /// `P(X > x)`.
    #[must_use]
    pub fn probability_above(&self, x: f64) -> f64 {
        1.0 - self.cdf(x)
    }

    /// `P(lo < X < hi)`.
    #[must_use]
    pub fn probability_between(&self, lo: f64, hi: f64) -> f64 {
        self.cdf(hi) - self.cdf(lo)
    }

    /// `P(X < lo or X > hi)`.
    #[must_use]
    pub fn probability_outside(&self, lo: f64, hi: f64) -> f64 {
        1.0 - self.probability_between(lo, hi)
    }

    /// The `z` with `P(X <= z) = probability`.
    ///
    /// # Errors
    ///
    /// See [`Normal::inverse_cdf`].
    pub fn upper_bound(&self, probability: f64) -> Result<f64, StatsError> {
        self.inverse_cdf(probability)
    }

    /// The `z` with `P(X >= z) = probability`.
    ///
    /// # Errors
    ///
    /// See [`Normal::inverse_cdf`].
    pub fn lower_bound(&self, probability: f64) -> Result<f64, StatsError> {
        self.inverse_cdf(1.0 - probability)
    }

    /// Bounds symmetric about the mean that contain `probability` of the
    /// mass, as `(lower, upper)`.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::InvalidParameter`] when `probability` is outside
    /// `[0, 1]`.
    pub fn two_sided_bounds(&self, probability: f64) -> Result<(f64, f64), StatsError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(StatsError::invalid(
                "probability",
                probability,
                "must lie in [0, 1]",
            ));
        }
        let tail = (1.0 - probability) / 2.0;
        // The upper bound has `tail` above it; the lower bound has it below.
        let upper = self.lower_bound(tail)?;
        let lower = self.upper_bound(tail)?;
        Ok((lower, upper))
    }

    /// Probability of a value at least as extreme as `x`, in either tail.
    #[must_use]
    pub fn two_sided_p_value(&self, x: f64) -> f64 {
        if x >= self.mu {
            2.0 * self.probability_above(x)
        } else {
            2.0 * self.probability_below(x)
        }
    }

    /// One-sided p-value for an upper-tail test.
    #[must_use]
    pub fn upper_p_value(&self, x: f64) -> f64 {
        self.probability_above(x)
    }

    /// One-sided p-value for a lower-tail test.
    #[must_use]
    pub fn lower_p_value(&self, x: f64) -> f64 {
        self.probability_below(x)
    }
}

impl Default for Normal {
    fn default() -> Self {
        Self::STANDARD
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
