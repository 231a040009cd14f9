//! Univariate OLS trend fitting.
//!
//! Closed-form simple linear regression `y = intercept + slope·x` with the
//! usual inference statistics (standard errors, two-sided t-test on the slope,
//! R²). This is the single-predictor model the incidence reports fit, e.g.
//! cumulative cases against days since first case.

use statrs::distribution::{ContinuousCDF, StudentsT};

use ds_core::{Error, Result};
use serde::Serialize;

/// Fitted simple linear regression.
#[derive(Debug, Clone, Serialize)]
pub struct SimpleOlsFit {
    /// Intercept estimate.
    pub intercept: f64,
    /// Slope estimate.
    pub slope: f64,
    /// Standard error of the intercept.
    pub se_intercept: f64,
    /// Standard error of the slope.
    pub se_slope: f64,
    /// t-statistic for slope = 0.
    pub t_slope: f64,
    /// Two-sided p-value for slope = 0 (Student t, `df` degrees of freedom).
    pub p_slope: f64,
    /// Coefficient of determination.
    pub r_squared: f64,
    /// Residual standard error, sqrt(SSE / df).
    pub residual_standard_error: f64,
    /// Residual degrees of freedom, n − 2.
    pub df: usize,
    /// Number of observations.
    pub n: usize,
}

impl SimpleOlsFit {
    /// Fitted value at `x`.
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fit `y = intercept + slope·x` by ordinary least squares.
///
/// # Errors
/// `Validation` when lengths differ, n < 3, any value is non-finite, or
/// either variable is constant (the fit or R² would be undefined).
pub fn simple_ols(x: &[f64], y: &[f64]) -> Result<SimpleOlsFit> {
    let n = x.len();
    if y.len() != n {
        return Err(Error::Validation(format!(
            "x and y must have equal length, got {} and {}",
            n,
            y.len()
        )));
    }
    if n < 3 {
        return Err(Error::Validation(format!(
            "simple OLS requires at least 3 observations, got {n}"
        )));
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(Error::Validation("x and y must contain only finite values".to_string()));
    }

    let n_f = n as f64;
    let x_bar = x.iter().sum::<f64>() / n_f;
    let y_bar = y.iter().sum::<f64>() / n_f;

    let sxx: f64 = x.iter().map(|&v| (v - x_bar).powi(2)).sum();
    let syy: f64 = y.iter().map(|&v| (v - y_bar).powi(2)).sum();
    let sxy: f64 = x.iter().zip(y).map(|(&xi, &yi)| (xi - x_bar) * (yi - y_bar)).sum();

    if sxx == 0.0 {
        return Err(Error::Validation("x is constant; slope is undefined".to_string()));
    }
    if syy == 0.0 {
        return Err(Error::Validation("y is constant; R² is undefined".to_string()));
    }

    let slope = sxy / sxx;
    let intercept = y_bar - slope * x_bar;

    let sse: f64 = x
        .iter()
        .zip(y)
        .map(|(&xi, &yi)| {
            let residual = yi - (intercept + slope * xi);
            residual * residual
        })
        .sum();

    let df = n - 2;
    let sigma_sq = sse / df as f64;
    let se_slope = (sigma_sq / sxx).sqrt();
    let se_intercept = (sigma_sq * (1.0 / n_f + x_bar * x_bar / sxx)).sqrt();

    let t_slope = if se_slope > 0.0 { slope / se_slope } else { f64::INFINITY * slope.signum() };
    let p_slope = student_t_two_sided(t_slope, df)?;

    Ok(SimpleOlsFit {
        intercept,
        slope,
        se_intercept,
        se_slope,
        t_slope,
        p_slope,
        r_squared: 1.0 - sse / syy,
        residual_standard_error: sigma_sq.sqrt(),
        df,
        n,
    })
}

/// Two-sided p-value for a t-statistic with `df` degrees of freedom.
fn student_t_two_sided(t: f64, df: usize) -> Result<f64> {
    if t.is_infinite() {
        return Ok(0.0);
    }
    let dist = StudentsT::new(0.0, 1.0, df as f64)
        .map_err(|e| Error::Computation(format!("t({df}) distribution: {e}")))?;
    Ok((2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textbook_fit() {
        // Hand-checked: slope = 6/10, intercept = 4 − 0.6·3 = 2.2,
        // SSE = 2.4, SYY = 6, R² = 0.6, t = 0.6/sqrt(0.8/10) ≈ 2.1213.
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 5.0, 4.0, 5.0];
        let fit = simple_ols(&x, &y).unwrap();

        assert!((fit.slope - 0.6).abs() < 1e-12);
        assert!((fit.intercept - 2.2).abs() < 1e-12);
        assert!((fit.r_squared - 0.6).abs() < 1e-12);
        assert_eq!(fit.df, 3);
        assert!((fit.t_slope - 2.1213203435596424).abs() < 1e-9);
        // Known two-sided p for t = 2.1213 with 3 df.
        assert!((fit.p_slope - 0.1238).abs() < 1e-3, "p = {}", fit.p_slope);
    }

    #[test]
    fn perfect_line_recovers_coefficients() {
        let x: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 1.0).collect();
        let fit = simple_ols(&x, &y).unwrap();

        assert!((fit.slope - 2.0).abs() < 1e-10);
        assert!((fit.intercept - 1.0).abs() < 1e-10);
        assert!((fit.r_squared - 1.0).abs() < 1e-12);
        assert!(fit.residual_standard_error < 1e-6);
        assert!(fit.p_slope < 1e-6);
        assert!((fit.predict(20.0) - 41.0).abs() < 1e-8);
    }

    #[test]
    fn flat_noise_gives_insignificant_slope() {
        // Alternating residuals around a flat line: slope ≈ 0, p large.
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let y = [10.0, 11.0, 10.0, 11.0, 10.0, 11.0, 10.0, 11.0];
        let fit = simple_ols(&x, &y).unwrap();
        assert!(fit.slope.abs() < 0.2);
        assert!(fit.p_slope > 0.1, "p = {}", fit.p_slope);
        assert!(fit.r_squared < 0.5);
    }

    #[test]
    fn rejects_length_mismatch() {
        let err = simple_ols(&[1.0, 2.0, 3.0], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn rejects_too_few_points() {
        let err = simple_ols(&[1.0, 2.0], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn rejects_non_finite_values() {
        let err = simple_ols(&[1.0, 2.0, f64::NAN], &[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn rejects_constant_x() {
        let err = simple_ols(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn rejects_constant_y() {
        let err = simple_ols(&[1.0, 2.0, 3.0], &[5.0, 5.0, 5.0]).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
