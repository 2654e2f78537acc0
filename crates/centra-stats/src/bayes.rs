//! Bayesian inference on a success rate with a Beta prior.
//!
//! A `Beta(alpha, beta)` prior updated with `h` successes and `t` failures is
//! the posterior `Beta(alpha + h, beta + t)`.

use rand::Rng;
use rand_distr::{Beta, Distribution};
use serde::Serialize;

use crate::error::StatsError;
use crate::special::ln_gamma;

fn check_shape(name: &'static str, value: f64) -> Result<f64, StatsError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(StatsError::invalid(name, value, "must be finite and > 0"))
    }
}

/// The normalising constant `B(alpha, beta) = Γ(α)Γ(β) / Γ(α + β)`.
///
/// # Errors
///
/// Returns [`StatsError::InvalidParameter`] unless both shapes are positive.
pub fn beta_function(alpha: f64, beta: f64) -> Result<f64, StatsError> {
    let alpha = check_shape("alpha", alpha)?;
    let beta = check_shape("beta", beta)?;
    Ok((ln_gamma(alpha) + ln_gamma(beta) - ln_gamma(alpha + beta)).exp())
}

/// Density of `Beta(alpha, beta)` at `x`; zero outside `[0, 1]`.
///
/// # Errors
///
/// Returns [`StatsError::InvalidParameter`] unless both shapes are positive.
pub fn beta_pdf(x: f64, alpha: f64, beta: f64) -> Result<f64, StatsError> {
    let norm = beta_function(alpha, beta)?;
    if !(0.0..=1.0).contains(&x) {
        return Ok(0.0);
    }
    Ok(x.powf(alpha - 1.0) * (1.0 - x).powf(beta - 1.0) / norm)
}

/// Beta posterior over an unknown success probability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BetaPosterior {
    pub alpha: f64,
    pub beta: f64,
}

impl BetaPosterior {
    /// # Errors
    ///
    /// Returns [`StatsError::InvalidParameter`] unless both shapes are
    /// positive.
    pub fn new(alpha: f64, beta: f64) -> Result<Self, StatsError> {
        Ok(Self {
            alpha: check_shape("alpha", alpha)?,
            beta: check_shape("beta", beta)?,
        })
    }

    /// The uniform prior `Beta(1, 1)`.
    #[must_use]
    pub const fn uniform() -> Self {
        Self {
            alpha: 1.0,
            beta: 1.0,
        }
    }

    /// Posterior after observing `successes` and `failures`.
    #[must_use]
    pub fn update(self, successes: u32, failures: u32) -> Self {
        Self {
            alpha: self.alpha + f64::from(successes),
            beta: self.beta + f64::from(failures),
        }
    }

    #[must_use]
    pub fn mean(&self) -> f64 {
        self.alpha / (self.alpha + self.beta)
    }

    /// Most likely success rate; `None` unless both shapes exceed 1.
    #[must_use]
    pub fn mode(&self) -> Option<f64> {
        (self.alpha > 1.0 && self.beta > 1.0)
            .then(|| (self.alpha - 1.0) / (self.alpha + self.beta - 2.0))
    }

    /// Density at `x`.
    ///
    /// # Errors
    ///
    /// Propagates [`beta_pdf`] errors.
    pub fn pdf(&self, x: f64) -> Result<f64, StatsError> {
        beta_pdf(x, self.alpha, self.beta)
    }

    /// Draw a success rate from the posterior.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::InvalidParameter`] if the shapes were corrupted
    /// after construction.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<f64, StatsError> {
        Beta::new(self.alpha, self.beta)
            .map(|distribution| distribution.sample(rng))
            .map_err(|_| StatsError::invalid("alpha", self.alpha, "not a valid Beta shape"))
    }
}

impl Default for BetaPosterior {
    fn default() -> Self {
        Self::uniform()
    }
}
