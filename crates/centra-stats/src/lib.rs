#![forbid(unsafe_code)]
//! Statistical inference helpers.
//!
//! - [`normal`]: the normal distribution, its inverse CDF and tail
//!   probabilities.
//! - [`inference`]: binomial approximation, coin-flip experiments and the
//!   two-proportion A/B test.
//! - [`bayes`]: the Beta function, Beta density and a Beta posterior over a
//!   success rate.
//!
//! Everything that draws random numbers takes the RNG as an argument, so a
//! seeded `StdRng` makes every simulation reproducible.

pub mod bayes;
pub mod error;
pub mod inference;
pub mod normal;
pub mod special;

pub use error::StatsError;
pub use normal::Normal;
