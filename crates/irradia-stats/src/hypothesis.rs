//! Hypothesis tests for group comparison
//!
//! The automatic test-selection pipeline needs four tests:
//!
//! - **Shapiro-Wilk** for per-group normality (Royston AS R94)
//! - **Levene** (Brown-Forsythe variant) for variance homogeneity
//! - **One-way ANOVA** when the parametric preconditions hold
//! - **Kruskal-Wallis** as the distribution-free fallback
//!
//! All tests require finite input and return `None` on degenerate data;
//! the caller decides how a missing result feeds its decision table.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor, Normal};

/// Outcome of a hypothesis test
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TestOutcome {
    /// Test statistic (F or H depending on the test)
    pub statistic: f64,
    /// Degrees of freedom
    pub df: f64,
    /// p-value
    pub p_value: f64,
}

/// One-way ANOVA decomposition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnovaOutcome {
    /// F statistic
    pub f_statistic: f64,
    /// Between-groups degrees of freedom (k - 1)
    pub df_between: usize,
    /// Within-groups degrees of freedom (N - k)
    pub df_within: usize,
    /// p-value from the F distribution
    pub p_value: f64,
    /// Between-groups sum of squares
    pub ss_between: f64,
    /// Within-groups sum of squares
    pub ss_within: f64,
    /// Per-group means in input order
    pub group_means: Vec<f64>,
}

/// One-way analysis of variance: H0: all group means are equal.
///
/// Groups of size 1 are accepted and contribute to the pooled
/// estimate. Returns `None` for fewer than 2 groups, non-finite
/// values, an empty group, or vanishing within-groups degrees of
/// freedom. An all-constant input yields NaN statistic and p-value
/// rather than a spurious verdict.
pub fn one_way_anova(groups: &[&[f64]]) -> Option<AnovaOutcome> {
    let k = groups.len();
    if k < 2 {
        return None;
    }
    for g in groups {
        if g.is_empty() || g.iter().any(|v| !v.is_finite()) {
            return None;
        }
    }

    let total_n: usize = groups.iter().map(|g| g.len()).sum();
    let df_within = total_n.checked_sub(k).filter(|&d| d > 0)?;
    let df_between = k - 1;

    let grand_mean = groups.iter().flat_map(|g| g.iter()).sum::<f64>() / total_n as f64;
    let group_means: Vec<f64> = groups
        .iter()
        .map(|g| g.iter().sum::<f64>() / g.len() as f64)
        .collect();

    let ss_between: f64 = groups
        .iter()
        .zip(&group_means)
        .map(|(g, &m)| g.len() as f64 * (m - grand_mean).powi(2))
        .sum();
    let ss_within: f64 = groups
        .iter()
        .zip(&group_means)
        .map(|(g, &m)| g.iter().map(|&x| (x - m).powi(2)).sum::<f64>())
        .sum();

    let ms_between = ss_between / df_between as f64;
    let ms_within = ss_within / df_within as f64;

    // Zero residual variance: infinite separation if the means differ,
    // undefined (0/0) if everything is one constant
    let f_statistic = if ms_within > 1e-300 {
        ms_between / ms_within
    } else if ms_between > 1e-300 {
        f64::INFINITY
    } else {
        f64::NAN
    };

    let p_value = if f_statistic.is_nan() {
        f64::NAN
    } else if f_statistic.is_infinite() {
        0.0
    } else {
        let dist = FisherSnedecor::new(df_between as f64, df_within as f64).ok()?;
        1.0 - dist.cdf(f_statistic)
    };

    Some(AnovaOutcome {
        f_statistic,
        df_between,
        df_within,
        p_value,
        ss_between,
        ss_within,
        group_means,
    })
}

/// Kruskal-Wallis rank test: H0: all groups share one distribution.
///
/// Average ranks for ties, tie-corrected H, p-value from chi-squared
/// with k - 1 degrees of freedom. Groups of size 1 are accepted.
pub fn kruskal_wallis(groups: &[&[f64]]) -> Option<TestOutcome> {
    let k = groups.len();
    if k < 2 {
        return None;
    }
    for g in groups {
        if g.is_empty() || g.iter().any(|v| !v.is_finite()) {
            return None;
        }
    }

    let total_n: usize = groups.iter().map(|g| g.len()).sum();
    let nf = total_n as f64;

    let mut combined: Vec<(f64, usize)> = Vec::with_capacity(total_n);
    for (gi, g) in groups.iter().enumerate() {
        for &v in *g {
            combined.push((v, gi));
        }
    }
    combined.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let ranks = average_ranks(&combined);

    let mut rank_sums = vec![0.0; k];
    for ((_, gi), &rank) in combined.iter().zip(ranks.iter()) {
        rank_sums[*gi] += rank;
    }

    // H = (12 / N(N+1)) * sum n_i (mean_rank_i - grand_mean_rank)^2
    let grand_mean_rank = (nf + 1.0) / 2.0;
    let mut h = 0.0;
    for (gi, g) in groups.iter().enumerate() {
        let ni = g.len() as f64;
        h += ni * (rank_sums[gi] / ni - grand_mean_rank).powi(2);
    }
    h *= 12.0 / (nf * (nf + 1.0));

    // Tie correction: divide by 1 - sum t(t^2-1) / (N^3 - N)
    let correction = 1.0 - tie_correction(&combined) / (nf * nf * nf - nf);
    if correction > 1e-15 {
        h /= correction;
    }

    let df = (k - 1) as f64;
    let dist = ChiSquared::new(df).ok()?;
    Some(TestOutcome {
        statistic: h,
        df,
        p_value: 1.0 - dist.cdf(h),
    })
}

/// Levene variance-homogeneity test, Brown-Forsythe variant: a one-way
/// ANOVA over absolute deviations from each group's median.
///
/// Needs at least 2 values per group. `None` also covers the fully
/// degenerate case where the deviations carry no variance at all, which
/// callers treat as "test cannot run".
pub fn levene(groups: &[&[f64]]) -> Option<TestOutcome> {
    let k = groups.len();
    if k < 2 {
        return None;
    }
    for g in groups {
        if g.len() < 2 || g.iter().any(|v| !v.is_finite()) {
            return None;
        }
    }

    let deviations: Vec<Vec<f64>> = groups
        .iter()
        .map(|g| {
            let median = median_of(g);
            g.iter().map(|&x| (x - median).abs()).collect()
        })
        .collect();
    let refs: Vec<&[f64]> = deviations.iter().map(|v| v.as_slice()).collect();

    let anova = one_way_anova(&refs)?;
    if anova.f_statistic.is_nan() {
        return None;
    }
    Some(TestOutcome {
        statistic: anova.f_statistic,
        df: anova.df_between as f64,
        p_value: anova.p_value,
    })
}

fn median_of(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

// Assign average ranks to ascending (value, group) pairs; tied runs get
// the mean of their positional ranks.
fn average_ranks(sorted: &[(f64, usize)]) -> Vec<f64> {
    let n = sorted.len();
    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && (sorted[j].0 - sorted[i].0).abs() < 1e-12 {
            j += 1;
        }
        let avg = (i + 1 + j) as f64 / 2.0;
        for rank in ranks.iter_mut().take(j).skip(i) {
            *rank = avg;
        }
        i = j;
    }
    ranks
}

// Tie correction term: sum of t(t^2 - 1) over tied runs
fn tie_correction(sorted: &[(f64, usize)]) -> f64 {
    let n = sorted.len();
    let mut total = 0.0;
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && (sorted[j].0 - sorted[i].0).abs() < 1e-12 {
            j += 1;
        }
        let t = (j - i) as f64;
        if t > 1.0 {
            total += t * (t * t - 1.0);
        }
        i = j;
    }
    total
}

/// Shapiro-Wilk result: W near 1 suggests normality
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NormalityOutcome {
    /// W statistic in (0, 1]
    pub w: f64,
    /// p-value under the normality null
    pub p_value: f64,
}

/// Shapiro-Wilk normality test: H0: the sample is normally distributed.
///
/// Royston's AS R94 approximation, valid for 3 <= n <= 5000. Returns
/// `None` outside that range, for non-finite values, or when all values
/// are identical (the statistic is undefined there, and the caller's
/// decision table routes such groups to the rank-based branch).
pub fn shapiro_wilk(values: &[f64]) -> Option<NormalityOutcome> {
    let n = values.len();
    if !(3..=5000).contains(&n) {
        return None;
    }
    if values.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let mut x = values.to_vec();
    x.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    if x[n - 1] - x[0] < 1e-300 {
        return None;
    }

    // n = 3 has exact weights and an exact p-value
    if n == 3 {
        let mean = (x[0] + x[1] + x[2]) / 3.0;
        let ss: f64 = x.iter().map(|&v| (v - mean).powi(2)).sum();
        if ss < 1e-300 {
            return None;
        }
        let numerator = std::f64::consts::FRAC_1_SQRT_2 * (x[2] - x[0]);
        let w = (numerator * numerator / ss).clamp(0.75, 1.0);
        let p = 1.0 - (6.0 / std::f64::consts::PI) * w.sqrt().acos();
        return Some(NormalityOutcome {
            w,
            p_value: p.clamp(0.0, 1.0),
        });
    }

    let half = n / 2;
    let normal = Normal::new(0.0, 1.0).ok()?;
    let weights = royston_weights(n, half, &normal)?;

    // W = (sum a_i * (x_{n+1-i} - x_i))^2 / sum (x - mean)^2
    let mut range_sum = 0.0;
    for i in 0..half {
        range_sum += weights[i] * (x[n - 1 - i] - x[i]);
    }
    let mean = x.iter().sum::<f64>() / n as f64;
    let ss: f64 = x.iter().map(|&v| (v - mean).powi(2)).sum();
    if ss < 1e-300 {
        return None;
    }
    let w = range_sum * range_sum / ss;
    if !(0.0..=1.0 + 1e-10).contains(&w) {
        return None;
    }
    let w = w.min(1.0);

    Some(NormalityOutcome {
        w,
        p_value: w_to_p(w, n, &normal).clamp(0.0, 1.0),
    })
}

// Royston (1995) AS R94 polynomial coefficients
const C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.07119, 4.434685, -2.706056];
const C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
const C3: [f64; 4] = [0.544, -0.39978, 0.025054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
const C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const G: [f64; 2] = [-2.273, 0.459];

fn poly(coefficients: &[f64], x: f64) -> f64 {
    let mut acc = coefficients[coefficients.len() - 1];
    for &c in coefficients.iter().rev().skip(1) {
        acc = acc * x + c;
    }
    acc
}

// Weights for the lower-half order statistics: Blom scores normalized,
// with the first one (n <= 5) or two (n > 5) replaced by polynomial
// corrections in 1/sqrt(n).
fn royston_weights(n: usize, half: usize, normal: &Normal) -> Option<Vec<f64>> {
    let mut m = vec![0.0; half];
    let mut m_sq_sum = 0.0;
    for (i, mi) in m.iter_mut().enumerate() {
        let p = (i as f64 + 1.0 - 0.375) / (n as f64 + 0.25);
        *mi = normal.inverse_cdf(p);
        m_sq_sum += *mi * *mi;
    }
    m_sq_sum *= 2.0;
    let m_norm = m_sq_sum.sqrt();
    let rsn = 1.0 / (n as f64).sqrt();

    let mut weights = vec![0.0; half];
    let a1 = poly(&C1, rsn) - m[0] / m_norm;

    if n <= 5 {
        let numerator = m_sq_sum - 2.0 * m[0] * m[0];
        let denominator = 1.0 - 2.0 * a1 * a1;
        if numerator <= 0.0 || denominator <= 0.0 {
            return None;
        }
        let scale = (numerator / denominator).sqrt();
        weights[0] = a1;
        for i in 1..half {
            weights[i] = -m[i] / scale;
        }
    } else {
        let a2 = poly(&C2, rsn) - m[1] / m_norm;
        let numerator = m_sq_sum - 2.0 * m[0] * m[0] - 2.0 * m[1] * m[1];
        let denominator = 1.0 - 2.0 * a1 * a1 - 2.0 * a2 * a2;
        if numerator <= 0.0 || denominator <= 0.0 {
            return None;
        }
        let scale = (numerator / denominator).sqrt();
        weights[0] = a1;
        weights[1] = a2;
        for i in 2..half {
            weights[i] = -m[i] / scale;
        }
    }

    Some(weights)
}

// Royston's transformation of W to a normal deviate: gamma-log for
// n <= 11, log-normal in ln(n) above that.
fn w_to_p(w: f64, n: usize, normal: &Normal) -> f64 {
    let nf = n as f64;
    let w1 = 1.0 - w;
    if w1 <= 0.0 {
        return 1.0;
    }
    let y = w1.ln();

    let z = if n <= 11 {
        let gamma = poly(&G, nf);
        if y >= gamma {
            return 0.0;
        }
        let shifted = -(gamma - y).ln();
        let location = poly(&C3, nf);
        let scale = poly(&C4, nf).exp();
        if scale < 1e-300 {
            return 0.0;
        }
        (shifted - location) / scale
    } else {
        let log_n = nf.ln();
        let location = poly(&C5, log_n);
        let scale = poly(&C6, log_n).exp();
        if scale < 1e-300 {
            return 0.0;
        }
        (y - location) / scale
    };

    1.0 - normal.cdf(z)
}
