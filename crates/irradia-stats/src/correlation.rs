//! Pearson correlation with significance testing
//!
//! Coefficients come from pairwise-complete observations; significance
//! uses the t transform of the coefficient. Degenerate inputs (constant
//! series, too few pairs) propagate NaN instead of failing, so a whole
//! correlation matrix can carry one bad metric without crashing.

use statrs::distribution::{ContinuousCDF, StudentsT};

/// Pearson correlation coefficient over pairwise-finite entries.
///
/// Returns NaN when fewer than 2 complete pairs remain or either side
/// has zero variance.
pub fn pearson_r(x: &[f64], y: &[f64]) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y.iter())
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(&a, &b)| (a, b))
        .collect();
    let n = pairs.len();
    if n < 2 {
        return f64::NAN;
    }

    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n as f64;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= 0.0 || var_y <= 0.0 {
        return f64::NAN;
    }
    cov / (var_x * var_y).sqrt()
}

/// Two-tailed p-value for a correlation coefficient via the transform
/// t = r * sqrt((n - 2) / (1 - r^2)) with n - 2 degrees of freedom.
///
/// NaN r or n < 3 yields NaN; perfect correlation yields 0.
pub fn correlation_p_value(r: f64, n: usize) -> f64 {
    if !r.is_finite() || n < 3 {
        return f64::NAN;
    }
    let r = r.clamp(-1.0, 1.0);
    if 1.0 - r * r < 1e-15 {
        // The transform degenerates at |r| = 1
        return 0.0;
    }
    let df = (n - 2) as f64;
    let t = r * (df / (1.0 - r * r)).sqrt();
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => 2.0 * (1.0 - dist.cdf(t.abs())),
        Err(_) => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pearson_perfect_positive() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 6.0, 8.0, 10.0];
        assert!((pearson_r(&x, &y) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_perfect_negative() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [5.0, 4.0, 3.0, 2.0, 1.0];
        assert!((pearson_r(&x, &y) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_reference_value() {
        // Reference: r = 0.7745967, p = 0.1240823
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 5.0, 4.0, 5.0];
        let r = pearson_r(&x, &y);
        assert!((r - 0.774_596_669_2).abs() < 1e-9, "r = {r}");
        let p = correlation_p_value(r, 5);
        assert!((p - 0.124_082_3).abs() < 1e-4, "p = {p}");
    }

    #[test]
    fn test_pearson_constant_is_nan() {
        let x = [3.0, 3.0, 3.0, 3.0];
        let y = [1.0, 2.0, 3.0, 4.0];
        assert!(pearson_r(&x, &y).is_nan());
        assert!(pearson_r(&y, &x).is_nan());
    }

    #[test]
    fn test_pearson_skips_incomplete_pairs() {
        let x = [1.0, f64::NAN, 3.0, 4.0, 5.0];
        let y = [2.0, 100.0, 6.0, f64::NAN, 10.0];
        // Complete pairs are (1,2), (3,6), (5,10): exactly proportional
        assert!((pearson_r(&x, &y) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_p_value_nan_propagates() {
        assert!(correlation_p_value(f64::NAN, 50).is_nan());
        assert!(correlation_p_value(0.5, 2).is_nan());
    }

    #[test]
    fn test_p_value_perfect_correlation() {
        assert_eq!(correlation_p_value(1.0, 10), 0.0);
        assert_eq!(correlation_p_value(-1.0, 10), 0.0);
    }

    #[test]
    fn test_p_value_strong_correlation_small() {
        let p = correlation_p_value(0.9, 20);
        assert!(p < 0.001, "p = {p}");
        assert!(p > 0.0);
    }

    #[test]
    fn test_p_value_weak_correlation_large() {
        let p = correlation_p_value(0.05, 20);
        assert!(p > 0.5, "p = {p}");
        assert!(p <= 1.0);
    }
}
