//! Property-based tests for the statistical primitives

use irradia_stats::{
    correlation_p_value, kruskal_wallis, one_way_anova, pearson_r, shapiro_wilk, MetricSummary,
};
use proptest::prelude::*;

fn finite_values(min_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1.0e6f64..1.0e6, min_len..50)
}

proptest! {
    #[test]
    fn test_summary_orders_its_quantiles(values in finite_values(1)) {
        let summary = MetricSummary::from_values(&values);
        prop_assert_eq!(summary.count, values.len());
        prop_assert!(summary.min <= summary.q1 + 1e-9);
        prop_assert!(summary.q1 <= summary.median + 1e-9);
        prop_assert!(summary.median <= summary.q3 + 1e-9);
        prop_assert!(summary.q3 <= summary.max + 1e-9);
    }

    #[test]
    fn test_summary_counts_non_finite_as_missing(
        values in finite_values(1),
        gaps in prop::collection::vec(any::<prop::sample::Index>(), 1..5),
    ) {
        let mut padded = values.clone();
        for gap in &gaps {
            let at = gap.index(padded.len() + 1);
            padded.insert(at, f64::NAN);
        }
        let summary = MetricSummary::from_values(&padded);
        prop_assert_eq!(summary.count, values.len());
        prop_assert_eq!(summary.count + summary.missing, padded.len());
    }

    #[test]
    fn test_pearson_is_symmetric(
        pairs in prop::collection::vec((-1.0e3f64..1.0e3, -1.0e3f64..1.0e3), 3..40)
    ) {
        let x: Vec<f64> = pairs.iter().map(|p| p.0).collect();
        let y: Vec<f64> = pairs.iter().map(|p| p.1).collect();
        let forward = pearson_r(&x, &y);
        let backward = pearson_r(&y, &x);
        if forward.is_nan() {
            prop_assert!(backward.is_nan());
        } else {
            prop_assert!((forward - backward).abs() < 1e-12);
            prop_assert!((-1.0 - 1e-9..=1.0 + 1e-9).contains(&forward));
        }
    }

    #[test]
    fn test_correlation_p_is_a_probability(
        r in -1.0f64..1.0,
        n in 3usize..200,
    ) {
        let p = correlation_p_value(r, n);
        prop_assert!(p.is_nan() || (0.0..=1.0).contains(&p));
    }

    #[test]
    fn test_shapiro_p_is_a_probability(values in finite_values(3)) {
        if let Some(outcome) = shapiro_wilk(&values) {
            prop_assert!((0.0..=1.0).contains(&outcome.p_value));
            prop_assert!((0.0..=1.0).contains(&outcome.w));
        }
    }

    #[test]
    fn test_omnibus_p_values_are_probabilities(
        a in finite_values(2),
        b in finite_values(2),
    ) {
        if let Some(outcome) = kruskal_wallis(&[&a, &b]) {
            prop_assert!((0.0..=1.0).contains(&outcome.p_value));
        }
        if let Some(outcome) = one_way_anova(&[&a, &b]) {
            prop_assert!(
                outcome.p_value.is_nan() || (0.0..=1.0).contains(&outcome.p_value)
            );
        }
    }

    #[test]
    fn test_shifting_a_group_never_lowers_kruskal_statistic(
        base in prop::collection::vec(-100.0f64..100.0, 4..20),
        shift in 500.0f64..1000.0,
    ) {
        let shifted: Vec<f64> = base.iter().map(|v| v + shift).collect();
        let separated = kruskal_wallis(&[&base, &shifted]).unwrap();
        let identical = kruskal_wallis(&[&base, &base]).unwrap();
        prop_assert!(separated.statistic >= identical.statistic - 1e-9);
    }
}
