//! Worked coin-fairness and A/B examples with known answers.

use centra_stats::Normal;
use centra_stats::inference::{
    Trial, a_b_test, a_b_test_statistic, count_extreme_values, count_rejections,
    normal_approximation_to_binomial,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn close(actual: f64, expected: f64, eps: f64) {
    assert!(
        (actual - expected).abs() < eps,
        "expected {expected}, got {actual}"
    );
}

fn fair_coin() -> Normal {
    normal_approximation_to_binomial(1000, 0.5).expect("valid")
}

fn biased_coin() -> Normal {
    normal_approximation_to_binomial(1000, 0.55).expect("valid")
}

// ---------------------------------------------------------------------------
// Significance and power
// ---------------------------------------------------------------------------

#[test]
fn fair_coin_moments() {
    let null = fair_coin();
    close(null.mu, 500.0, 1e-12);
    close(null.sigma, 15.8114, 1e-4);
}

#[test]
fn two_sided_bounds_at_95_percent() {
    let (lo, hi) = fair_coin().two_sided_bounds(0.95).expect("in range");
    close(lo, 469.0103, 1e-3);
    close(hi, 530.9897, 1e-3);
}

#[test]
fn power_of_two_sided_test() {
    let (lo, hi) = fair_coin().two_sided_bounds(0.95).expect("in range");
    let alt = biased_coin();
    close(alt.mu, 550.0, 1e-9);
    close(alt.sigma, 15.7321, 1e-4);
    let type_2 = alt.probability_between(lo, hi);
    close(1.0 - type_2, 0.886_55, 1e-4);
}

#[test]
fn power_of_one_sided_test() {
    let hi = fair_coin().upper_bound(0.95).expect("in range");
    close(hi, 526.0074, 1e-3);
    let type_2 = biased_coin().probability_below(hi);
    close(1.0 - type_2, 0.936_38, 1e-4);
}

// ---------------------------------------------------------------------------
// p-values
// ---------------------------------------------------------------------------

#[test]
fn two_sided_p_values_straddle_five_percent() {
    let null = fair_coin();
    close(null.two_sided_p_value(529.5), 0.062_077, 1e-5);
    close(null.two_sided_p_value(531.5), 0.046_345, 1e-5);
    // Symmetric below the mean.
    close(null.two_sided_p_value(470.5), 0.062_077, 1e-5);
}

#[test]
fn upper_p_values() {
    let null = fair_coin();
    close(null.upper_p_value(524.5), 0.060_629, 1e-5);
    close(null.upper_p_value(526.5), 0.046_868, 1e-5);
    close(null.lower_p_value(475.5), 0.060_629, 1e-5);
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

#[test]
fn p_hacking_rejects_about_five_percent() {
    let rejections = count_rejections(&mut StdRng::seed_from_u64(0), 1000);
    assert!((20..=80).contains(&rejections), "rejections: {rejections}");
    assert_eq!(
        rejections,
        count_rejections(&mut StdRng::seed_from_u64(0), 1000),
        "same seed, same answer"
    );
}

#[test]
fn extreme_values_match_p_value() {
    let fraction = count_extreme_values(&mut StdRng::seed_from_u64(1), 2000, 1000);
    // P(|X - 500| >= 30) ≈ 0.062 for a fair coin.
    assert!((0.04..0.09).contains(&fraction), "fraction: {fraction}");
}

// ---------------------------------------------------------------------------
// A/B testing
// ---------------------------------------------------------------------------

#[test]
fn ab_small_difference_is_not_significant() {
    let control = Trial::new(1000, 200).expect("valid");
    let treatment = Trial::new(1000, 180).expect("valid");
    let result = a_b_test(control, treatment).expect("non-degenerate");
    close(result.z, -1.140_35, 1e-4);
    close(result.p_value, 0.254_14, 1e-4);
}

#[test]
fn ab_large_difference_is_significant() {
    let control = Trial::new(1000, 200).expect("valid");
    let treatment = Trial::new(1000, 150).expect("valid");
    close(
        a_b_test_statistic(control, treatment).expect("non-degenerate"),
        -2.948_84,
        1e-4,
    );
    let result = a_b_test(control, treatment).expect("non-degenerate");
    close(result.p_value, 0.003_189_7, 1e-5);
}
