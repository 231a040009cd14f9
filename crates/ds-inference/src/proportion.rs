//! Chi-squared goodness-of-fit of observed counts against population share.
//!
//! Given per-category event counts and a reference population table covering
//! the same categories, tests the null hypothesis that events are distributed
//! proportionally to population:
//!
//! - `expected_i = total_observed × population_i / total_population`
//! - `X² = Σ (observed_i − expected_i)² / expected_i`, with `k − 1` degrees of
//!   freedom and an upper-tail p-value.
//!
//! ## Rounding modes
//!
//! The legacy reports this replaces rounded both the expected counts and the
//! per-category contributions to whole numbers before summing, which shifts the
//! statistic for small contributions. [`RoundingMode::Exact`] (the default)
//! keeps full f64 precision throughout; [`RoundingMode::ReportParity`] applies
//! the legacy rounding (nearest integer, ties away from zero) and exists only
//! to reproduce previously published figures.

use statrs::distribution::{ChiSquared, ContinuousCDF};

use ds_core::types::{CategoryCount, PopulationWeights};
use ds_core::{Error, Result};
use serde::Serialize;

/// Precision used for expected counts and chi-squared contributions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Full floating-point precision (recommended).
    #[default]
    Exact,
    /// Round expected counts and contributions to the nearest integer,
    /// ties away from zero. Matches the legacy report arithmetic.
    ReportParity,
}

/// Per-category breakdown of the test.
#[derive(Debug, Clone, Serialize)]
pub struct ProportionTestRow {
    /// Category label.
    pub category: String,
    /// Observed event count.
    pub observed: u64,
    /// Expected count under the population-share hypothesis.
    pub expected: f64,
    /// This category's contribution to the statistic.
    pub chi_sq_contribution: f64,
}

/// Result of a proportion goodness-of-fit test.
#[derive(Debug, Clone, Serialize)]
pub struct ProportionTestResult {
    /// Per-category rows, sorted by category label.
    pub rows: Vec<ProportionTestRow>,
    /// Chi-squared statistic (sum of contributions).
    pub statistic: f64,
    /// k − 1 for k categories.
    pub degrees_of_freedom: usize,
    /// Upper-tail p-value under χ²(degrees_of_freedom).
    pub p_value: f64,
    /// Rounding mode the result was computed with.
    pub mode: RoundingMode,
}

/// Test observed per-category counts against population-share expectations.
///
/// `observed` and `weights` must cover exactly the same category set, with
/// k ≥ 2 categories. The result is invariant under reordering of `observed`:
/// rows are sorted by category before any arithmetic.
///
/// # Errors
/// - `Validation`: fewer than 2 categories, a duplicate observed category, or
///   an expected count of zero (e.g. no events observed at all).
/// - `MissingData`: a category present in one input and absent from the other.
pub fn proportion_test(
    observed: &[CategoryCount],
    weights: &PopulationWeights,
    mode: RoundingMode,
) -> Result<ProportionTestResult> {
    let counts = validate_categories(observed, weights)?;

    let k = counts.len();
    let total_observed: u64 = counts.iter().map(|c| c.observed).sum();
    let total_population = weights.total();

    let total_observed_f = total_observed as f64;
    let total_population_f = total_population as f64;

    let mut rows = Vec::with_capacity(k);
    let mut statistic = 0.0;
    for count in &counts {
        // Category presence was validated above.
        let population = weights.get(&count.category).unwrap_or(0) as f64;
        let mut expected = total_observed_f * population / total_population_f;
        if mode == RoundingMode::ReportParity {
            expected = expected.round();
        }
        if expected == 0.0 {
            return Err(Error::Validation(format!(
                "expected count is zero for category '{}'",
                count.category
            )));
        }
        let diff = count.observed as f64 - expected;
        let mut contribution = diff * diff / expected;
        if mode == RoundingMode::ReportParity {
            contribution = contribution.round();
        }
        statistic += contribution;
        rows.push(ProportionTestRow {
            category: count.category.clone(),
            observed: count.observed,
            expected,
            chi_sq_contribution: contribution,
        });
    }

    let degrees_of_freedom = k - 1;
    let p_value = chi_squared_upper_tail(statistic, degrees_of_freedom)?;

    Ok(ProportionTestResult { rows, statistic, degrees_of_freedom, p_value, mode })
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Check the category sets match and return the counts sorted by category.
fn validate_categories(
    observed: &[CategoryCount],
    weights: &PopulationWeights,
) -> Result<Vec<CategoryCount>> {
    if observed.len() < 2 {
        return Err(Error::Validation(format!(
            "proportion test requires at least 2 categories, got {}",
            observed.len()
        )));
    }

    let mut counts: Vec<CategoryCount> = observed.to_vec();
    counts.sort_by(|a, b| a.category.cmp(&b.category));
    for pair in counts.windows(2) {
        if pair[0].category == pair[1].category {
            return Err(Error::Validation(format!(
                "duplicate observation for category '{}'",
                pair[0].category
            )));
        }
    }

    for count in &counts {
        if weights.get(&count.category).is_none() {
            return Err(Error::MissingData(format!(
                "no population weight for observed category '{}'",
                count.category
            )));
        }
    }
    if weights.len() != counts.len() {
        for category in weights.categories() {
            if counts.iter().all(|c| c.category != category) {
                return Err(Error::MissingData(format!(
                    "no observation for population category '{category}'"
                )));
            }
        }
    }

    Ok(counts)
}

/// Upper-tail p-value under χ²(df), clamped to [0, 1].
fn chi_squared_upper_tail(statistic: f64, df: usize) -> Result<f64> {
    let dist = ChiSquared::new(df as f64)
        .map_err(|e| Error::Computation(format!("chi-squared({df}) distribution: {e}")))?;
    Ok((1.0 - dist.cdf(statistic)).clamp(0.0, 1.0))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
