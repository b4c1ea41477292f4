//! Descriptive statistics for one metric within one group
//!
//! Provides the per-group summary used by the comparison tables:
//! - Mean, median, sample standard deviation
//! - Min, max, quartiles, IQR
//! - Missing-value accounting (NaN entries)
//! - Distribution shape (skewness, excess kurtosis)
//! - Confidence intervals for the mean

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Summary statistics for a numeric column slice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSummary {
    /// Number of finite values
    pub count: usize,
    /// Number of missing (NaN or infinite) values
    pub missing: usize,
    /// Mean of the finite values
    pub mean: f64,
    /// Median (50th percentile)
    pub median: f64,
    /// Sample standard deviation (n-1 denominator); NaN below 2 values
    pub std_dev: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// First quartile (25th percentile, linear interpolation)
    pub q1: f64,
    /// Third quartile (75th percentile)
    pub q3: f64,
}

impl MetricSummary {
    /// Compute summary statistics from a column slice. NaN entries count
    /// as missing and are excluded from every statistic.
    pub fn from_values(values: &[f64]) -> Self {
        let finite: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
        let missing = values.len() - finite.len();

        if finite.is_empty() {
            return Self::empty(missing);
        }

        let count = finite.len();
        let mean = finite.iter().sum::<f64>() / count as f64;

        // Sample variance; undefined for a single observation
        let std_dev = if count > 1 {
            let ss: f64 = finite.iter().map(|x| (x - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        } else {
            f64::NAN
        };

        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let mut sorted = finite;
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

        let median = quantile_sorted(&sorted, 0.5);
        let q1 = quantile_sorted(&sorted, 0.25);
        let q3 = quantile_sorted(&sorted, 0.75);

        Self {
            count,
            missing,
            mean,
            median,
            std_dev,
            min,
            max,
            q1,
            q3,
        }
    }

    /// Sentinel for a slice with no usable values (all NaN, count 0)
    fn empty(missing: usize) -> Self {
        Self {
            count: 0,
            missing,
            mean: f64::NAN,
            median: f64::NAN,
            std_dev: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
            q1: f64::NAN,
            q3: f64::NAN,
        }
    }

    /// Interquartile range (Q3 - Q1)
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Coefficient of variation in percent (std/mean * 100).
    ///
    /// Defined as 0 when the mean is 0 so callers never divide by zero.
    pub fn cv(&self) -> f64 {
        if self.count == 0 {
            return f64::NAN;
        }
        if self.mean == 0.0 {
            return 0.0;
        }
        self.std_dev / self.mean * 100.0
    }

    /// Share of missing values over the full slice length, in percent
    pub fn missing_pct(&self) -> f64 {
        let total = self.count + self.missing;
        if total == 0 {
            return 0.0;
        }
        self.missing as f64 / total as f64 * 100.0
    }
}

// Linear-interpolation quantile over an ascending slice, position
// (n - 1) * q between order statistics
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let position = (n - 1) as f64 * q;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let weight = position - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

/// Fisher-Pearson skewness of the finite values (biased moment form).
///
/// Returns NaN for fewer than 2 finite values or zero variance.
pub fn skewness(values: &[f64]) -> f64 {
    let finite: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    let n = finite.len();
    if n < 2 {
        return f64::NAN;
    }
    let nf = n as f64;
    let mean = finite.iter().sum::<f64>() / nf;
    let m2 = finite.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / nf;
    let m3 = finite.iter().map(|x| (x - mean).powi(3)).sum::<f64>() / nf;
    if m2 <= 0.0 {
        return f64::NAN;
    }
    m3 / m2.powf(1.5)
}

/// Excess kurtosis of the finite values (Fisher definition, normal = 0).
///
/// Returns NaN for fewer than 2 finite values or zero variance.
pub fn kurtosis(values: &[f64]) -> f64 {
    let finite: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    let n = finite.len();
    if n < 2 {
        return f64::NAN;
    }
    let nf = n as f64;
    let mean = finite.iter().sum::<f64>() / nf;
    let m2 = finite.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / nf;
    let m4 = finite.iter().map(|x| (x - mean).powi(4)).sum::<f64>() / nf;
    if m2 <= 0.0 {
        return f64::NAN;
    }
    m4 / (m2 * m2) - 3.0
}

/// Two-sided confidence interval for the mean using Student's t with
/// n-1 degrees of freedom.
///
/// Returns `None` for fewer than 2 finite values (a one-sample interval
/// needs a variance estimate) or a confidence level outside (0, 1).
pub fn mean_ci(values: &[f64], confidence: f64) -> Option<(f64, f64)> {
    let finite: Vec<f64> = values.iter().copied().filter(|x| x.is_finite()).collect();
    let n = finite.len();
    if n < 2 || confidence <= 0.0 || confidence >= 1.0 {
        return None;
    }
    let nf = n as f64;
    let mean = finite.iter().sum::<f64>() / nf;
    let variance = finite.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (nf - 1.0);
    let std_err = (variance / nf).sqrt();

    let t = StudentsT::new(0.0, 1.0, nf - 1.0).ok()?;
    let critical = t.inverse_cdf(1.0 - (1.0 - confidence) / 2.0);
    Some((mean - critical * std_err, mean + critical * std_err))
}
