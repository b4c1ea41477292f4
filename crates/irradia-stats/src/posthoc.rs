//! Tukey HSD post-hoc comparisons
//!
//! After an omnibus test reports a significant difference somewhere,
//! Tukey's honestly-significant-difference procedure locates which
//! pairs of groups actually differ, holding the family-wise error rate
//! at the chosen level. The Tukey-Kramer standard error handles unequal
//! group sizes.
//!
//! The studentized range distribution this needs is not available in
//! `statrs`, so it is evaluated here by direct numerical integration of
//! its defining double integral.

use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, ContinuousCDF, Normal};
use statrs::function::gamma::ln_gamma;

/// One pairwise comparison from Tukey's HSD
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PairwiseDiff {
    /// Index of the first group in input order
    pub group_a: usize,
    /// Index of the second group in input order
    pub group_b: usize,
    /// mean(group_b) - mean(group_a)
    pub mean_diff: f64,
    /// Lower bound of the simultaneous confidence interval
    pub lower: f64,
    /// Upper bound of the simultaneous confidence interval
    pub upper: f64,
    /// Family-wise adjusted p-value
    pub p_value: f64,
    /// Whether the adjusted p-value falls below the requested alpha
    pub significant: bool,
}

/// Tukey-Kramer pairwise comparisons over all group pairs.
///
/// Returns one entry per unordered pair (a, b) with a < b in input
/// order. `None` when the layout cannot support the procedure: fewer
/// than 2 groups, an empty group, non-finite data, no residual degrees
/// of freedom, zero within-group variance, or alpha outside (0, 1).
pub fn tukey_hsd(groups: &[&[f64]], alpha: f64) -> Option<Vec<PairwiseDiff>> {
    let k = groups.len();
    if k < 2 || !(0.0..1.0).contains(&alpha) || alpha <= 0.0 {
        return None;
    }
    for g in groups {
        if g.is_empty() || g.iter().any(|v| !v.is_finite()) {
            return None;
        }
    }

    let total_n: usize = groups.iter().map(|g| g.len()).sum();
    let df_within = total_n.checked_sub(k).filter(|&d| d > 0)?;

    let means: Vec<f64> = groups
        .iter()
        .map(|g| g.iter().sum::<f64>() / g.len() as f64)
        .collect();
    let ss_within: f64 = groups
        .iter()
        .zip(&means)
        .map(|(g, &m)| g.iter().map(|&x| (x - m).powi(2)).sum::<f64>())
        .sum();
    let ms_within = ss_within / df_within as f64;
    if ms_within <= 1e-300 {
        return None;
    }

    let df = df_within as f64;
    let q_critical = studentized_range_quantile(1.0 - alpha, k, df)?;

    let mut pairs = Vec::with_capacity(k * (k - 1) / 2);
    for a in 0..k {
        for b in (a + 1)..k {
            let se = (ms_within / 2.0 * (1.0 / groups[a].len() as f64 + 1.0 / groups[b].len() as f64))
                .sqrt();
            let mean_diff = means[b] - means[a];
            let q = mean_diff.abs() / se;
            let p_value = (1.0 - studentized_range_cdf(q, k, df)).clamp(0.0, 1.0);
            let margin = q_critical * se;
            pairs.push(PairwiseDiff {
                group_a: a,
                group_b: b,
                mean_diff,
                lower: mean_diff - margin,
                upper: mean_diff + margin,
                p_value,
                significant: p_value < alpha,
            });
        }
    }
    Some(pairs)
}

/// CDF of the studentized range distribution with `k` groups and `df`
/// within-group degrees of freedom.
///
/// Evaluated as E[P(range of k standard normals <= q * S)] where S is
/// the square root of a scaled chi-squared variate, via composite
/// Gauss-Legendre quadrature. Large `df` falls back to the normal-range
/// limit. Returns NaN for an unsupported layout.
pub fn studentized_range_cdf(q: f64, k: usize, df: f64) -> f64 {
    if k < 2 || !df.is_finite() || df <= 0.0 {
        return f64::NAN;
    }
    if q <= 0.0 {
        return 0.0;
    }
    if df > 1e4 {
        return normal_range_cdf(q, k);
    }

    // Density of S = sqrt(chi2_df / df):
    //   f(u) = C u^(df-1) exp(-df u^2 / 2)
    let half_df = df / 2.0;
    let ln_const = half_df * df.ln() - (half_df - 1.0) * std::f64::consts::LN_2 - ln_gamma(half_df);

    // S concentrates near 1 with spread ~ 1/sqrt(2 df)
    let upper = 1.0 + 10.0 / df.sqrt();
    let value = gauss_legendre(
        |u| {
            let ln_density = ln_const + (df - 1.0) * u.ln() - half_df * u * u;
            ln_density.exp() * normal_range_cdf(q * u, k)
        },
        1e-12,
        upper,
        16,
    );
    value.clamp(0.0, 1.0)
}

/// Quantile of the studentized range distribution, by bisection on the
/// CDF. `None` when p is outside (0, 1) or the layout is unsupported.
pub fn studentized_range_quantile(p: f64, k: usize, df: f64) -> Option<f64> {
    if !(0.0..1.0).contains(&p) || p <= 0.0 || k < 2 || !df.is_finite() || df <= 0.0 {
        return None;
    }

    let mut hi = 10.0;
    while studentized_range_cdf(hi, k, df) < p {
        hi *= 2.0;
        if hi > 1e6 {
            return Some(hi);
        }
    }
    let mut lo = 0.0;
    for _ in 0..200 {
        let mid = (lo + hi) / 2.0;
        if studentized_range_cdf(mid, k, df) < p {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo < 1e-8 * hi.max(1.0) {
            break;
        }
    }
    Some((lo + hi) / 2.0)
}

// P(range of k iid standard normals <= w), by integrating
// k phi(z) (Phi(z) - Phi(z - w))^(k-1) over the real line.
fn normal_range_cdf(w: f64, k: usize) -> f64 {
    if w <= 0.0 {
        return 0.0;
    }
    let normal = match Normal::new(0.0, 1.0) {
        Ok(n) => n,
        Err(_) => return f64::NAN,
    };
    let value = gauss_legendre(
        |z| {
            let inner = normal.cdf(z) - normal.cdf(z - w);
            k as f64 * normal.pdf(z) * inner.powi(k as i32 - 1)
        },
        -8.0,
        8.0,
        8,
    );
    value.clamp(0.0, 1.0)
}

// 16-point Gauss-Legendre abscissae and weights on [-1, 1], positive
// half; the rule is symmetric.
const GL_NODES: [f64; 8] = [
    0.095_012_509_837_637_440_185,
    0.281_603_550_779_258_913_230,
    0.458_016_777_657_227_386_342,
    0.617_876_244_402_643_748_447,
    0.755_404_408_355_003_033_895,
    0.865_631_202_387_831_743_880,
    0.944_575_023_073_232_576_078,
    0.989_400_934_991_649_932_596,
];
const GL_WEIGHTS: [f64; 8] = [
    0.189_450_610_455_068_496_285,
    0.182_603_415_044_923_588_867,
    0.169_156_519_395_002_538_189,
    0.149_595_988_816_576_732_081,
    0.124_628_971_255_533_872_052,
    0.095_158_511_682_492_784_810,
    0.062_253_523_938_647_892_863,
    0.027_152_459_411_754_094_852,
];

// Composite 16-point Gauss-Legendre over [a, b] split into `panels`
// equal subintervals.
fn gauss_legendre<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, panels: usize) -> f64 {
    let width = (b - a) / panels as f64;
    let mut total = 0.0;
    for p in 0..panels {
        let lo = a + p as f64 * width;
        let mid = lo + width / 2.0;
        let half = width / 2.0;
        let mut panel_sum = 0.0;
        for (node, weight) in GL_NODES.iter().zip(GL_WEIGHTS.iter()) {
            panel_sum += weight * (f(mid + half * node) + f(mid - half * node));
        }
        total += panel_sum * half;
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use statrs::distribution::StudentsT;

    const GROUP_A: [f64; 5] = [10.0, 12.0, 11.0, 13.0, 9.0];
    const GROUP_B: [f64; 5] = [20.0, 22.0, 21.0, 19.0, 23.0];
    const GROUP_C: [f64; 5] = [10.0, 11.0, 12.0, 9.0, 13.0];

    #[test]
    fn test_quantile_matches_published_table() {
        // Standard upper-5% points of the studentized range
        let q = studentized_range_quantile(0.95, 3, 12.0).unwrap();
        assert!((q - 3.773).abs() < 5e-3, "q(0.95, 3, 12) = {}", q);
        let q = studentized_range_quantile(0.95, 4, 20.0).unwrap();
        assert!((q - 3.958).abs() < 5e-3, "q(0.95, 4, 20) = {}", q);
    }

    #[test]
    fn test_two_group_case_reduces_to_student_t() {
        // For k = 2 the studentized range is sqrt(2) |t_df|
        let t = StudentsT::new(0.0, 1.0, 10.0).unwrap();
        let expected = std::f64::consts::SQRT_2 * t.inverse_cdf(0.975);
        let q = studentized_range_quantile(0.95, 2, 10.0).unwrap();
        assert!((q - expected).abs() < 1e-4, "q = {}, expected = {}", q, expected);
    }

    #[test]
    fn test_cdf_at_critical_point() {
        let p = studentized_range_cdf(3.773, 3, 12.0);
        assert!((p - 0.95).abs() < 1e-3, "p = {}", p);
    }

    #[test]
    fn test_cdf_monotone_and_bounded() {
        let mut prev = 0.0;
        for i in 1..40 {
            let q = i as f64 * 0.25;
            let p = studentized_range_cdf(q, 3, 12.0);
            assert!((0.0..=1.0).contains(&p));
            assert!(p >= prev, "cdf decreased at q = {}", q);
            prev = p;
        }
        assert!(prev > 0.999);
        assert_eq!(studentized_range_cdf(0.0, 3, 12.0), 0.0);
        assert_eq!(studentized_range_cdf(-1.0, 3, 12.0), 0.0);
    }

    #[test]
    fn test_large_df_matches_normal_limit() {
        // 2 Phi(w / sqrt 2) - 1 is the k = 2 normal-range CDF
        let normal = Normal::new(0.0, 1.0).unwrap();
        let w = 2.771_808;
        let expected = 2.0 * normal.cdf(w / std::f64::consts::SQRT_2) - 1.0;
        let p = studentized_range_cdf(w, 2, 1e7);
        assert!((p - expected).abs() < 1e-6, "p = {}, expected = {}", p, expected);
    }

    #[test]
    fn test_unsupported_layouts() {
        assert!(studentized_range_cdf(2.0, 1, 10.0).is_nan());
        assert!(studentized_range_cdf(2.0, 3, 0.0).is_nan());
        assert!(studentized_range_quantile(1.0, 3, 12.0).is_none());
        assert!(studentized_range_quantile(0.0, 3, 12.0).is_none());
        assert!(studentized_range_quantile(0.95, 1, 12.0).is_none());
    }

    #[test]
    fn test_tukey_locates_the_outlier_group() {
        let pairs = tukey_hsd(&[&GROUP_A, &GROUP_B, &GROUP_C], 0.05).unwrap();
        assert_eq!(pairs.len(), 3);

        let ab = &pairs[0];
        assert_eq!((ab.group_a, ab.group_b), (0, 1));
        assert!((ab.mean_diff - 10.0).abs() < 1e-9);
        assert!(ab.significant);
        assert!(ab.p_value < 1e-4, "p_ab = {}", ab.p_value);
        // diff +- q_crit * sqrt(MSW / n) = 10 +- 3.773 * 0.7071
        assert!((ab.lower - 7.332).abs() < 5e-3, "lower = {}", ab.lower);
        assert!((ab.upper - 12.668).abs() < 5e-3, "upper = {}", ab.upper);

        let ac = &pairs[1];
        assert_eq!((ac.group_a, ac.group_b), (0, 2));
        assert!(!ac.significant);
        assert!(ac.p_value > 0.9, "p_ac = {}", ac.p_value);

        let bc = &pairs[2];
        assert_eq!((bc.group_a, bc.group_b), (1, 2));
        assert!(bc.significant);
        assert!((bc.mean_diff + 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_tukey_unequal_group_sizes() {
        let small = [1.0, 2.0, 3.0];
        let large = [10.0, 11.0, 12.0, 13.0, 14.0, 15.0];
        let pairs = tukey_hsd(&[&small, &large], 0.05).unwrap();
        assert_eq!(pairs.len(), 1);
        assert!(pairs[0].significant);
        assert!(pairs[0].mean_diff > 0.0);
    }

    #[test]
    fn test_tukey_degenerate_inputs() {
        assert!(tukey_hsd(&[&GROUP_A], 0.05).is_none());
        assert!(tukey_hsd(&[&GROUP_A, &[]], 0.05).is_none());
        assert!(tukey_hsd(&[&[1.0], &[2.0]], 0.05).is_none());
        assert!(tukey_hsd(&[&[5.0, 5.0], &[5.0, 5.0]], 0.05).is_none());
        assert!(tukey_hsd(&[&GROUP_A, &GROUP_B], 0.0).is_none());
        assert!(tukey_hsd(&[&GROUP_A, &GROUP_B], 1.0).is_none());
    }
}
