//! Automatic group comparison
//!
//! Given one metric and several groups, pick the right omnibus test,
//! run it, and follow up with pairwise comparisons when it fires:
//!
//! 1. Groups with no usable values are dropped; fewer than two usable
//!    groups ends the comparison as insufficient data.
//! 2. Shapiro-Wilk per group decides normality (untestable counts as
//!    not normal), Levene decides variance homogeneity (untestable
//!    counts as homogeneous).
//! 3. The decision table picks ANOVA only when every group is normal
//!    and variances are equal; anything else runs Kruskal-Wallis.
//! 4. A significant omnibus result triggers Tukey HSD; a failed
//!    post-hoc leaves `post_hoc` empty without failing the comparison.

use crate::error::{AnalysisError, AnalysisResult};
use crate::table::MergedTable;
use irradia_stats::{kruskal_wallis, levene, one_way_anova, shapiro_wilk, tukey_hsd};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Significance level shared by every gate in the pipeline
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Which omnibus test a comparison ran
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestKind {
    Anova,
    KruskalWallis,
    InsufficientData,
}

impl TestKind {
    /// Human-readable test name
    pub fn name(&self) -> &'static str {
        match self {
            TestKind::Anova => "ANOVA",
            TestKind::KruskalWallis => "Kruskal-Wallis",
            TestKind::InsufficientData => "insufficient-data",
        }
    }
}

impl fmt::Display for TestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The normality-by-variance decision table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestChoice {
    Parametric,
    RankBased,
}

impl TestChoice {
    /// Select the omnibus test from the two preconditions. Every arm is
    /// spelled out; only the fully parametric corner runs ANOVA.
    pub fn select(all_normal: bool, equal_variances: bool) -> Self {
        match (all_normal, equal_variances) {
            (true, true) => TestChoice::Parametric,
            (true, false) => TestChoice::RankBased,
            (false, true) => TestChoice::RankBased,
            (false, false) => TestChoice::RankBased,
        }
    }
}

/// Normality verdict for one group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupNormality {
    pub group: String,
    /// Usable observations the verdict is based on
    pub count: usize,
    /// Shapiro-Wilk p-value; `None` when the test cannot run (fewer
    /// than 3 values, or a constant group)
    pub p_value: Option<f64>,
    /// True only for a tested group with p above the significance level
    pub normal: bool,
}

/// One Tukey HSD pair, with group indices resolved to labels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostHocPair {
    pub group_a: String,
    pub group_b: String,
    /// mean(group_b) - mean(group_a)
    pub mean_diff: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub p_value: f64,
    pub significant: bool,
}

/// Full outcome of one metric comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub metric: String,
    pub test: TestKind,
    /// F for ANOVA, H for Kruskal-Wallis, NaN when insufficient
    pub statistic: f64,
    pub p_value: f64,
    pub significant: bool,
    /// Eta-squared for ANOVA, epsilon-squared for Kruskal-Wallis,
    /// clamped to [0, 1]
    pub effect_size: f64,
    /// Per-group normality in table group order, empty when the
    /// comparison ended as insufficient
    pub normality: Vec<GroupNormality>,
    pub equal_variances: bool,
    /// Pairwise comparisons, present only for a significant result
    /// whose post-hoc succeeded
    pub post_hoc: Option<Vec<PostHocPair>>,
}

impl TestResult {
    fn insufficient(metric: &str) -> Self {
        Self {
            metric: metric.to_string(),
            test: TestKind::InsufficientData,
            statistic: f64::NAN,
            p_value: f64::NAN,
            significant: false,
            effect_size: f64::NAN,
            normality: Vec::new(),
            equal_variances: true,
            post_hoc: None,
        }
    }
}

struct Omnibus {
    test: TestKind,
    statistic: f64,
    p_value: f64,
    effect_size: f64,
}

/// Runs the comparison pipeline at a configurable significance level
#[derive(Debug, Clone, Copy)]
pub struct GroupComparisonEngine {
    alpha: f64,
}

impl Default for GroupComparisonEngine {
    fn default() -> Self {
        Self {
            alpha: SIGNIFICANCE_LEVEL,
        }
    }
}

impl GroupComparisonEngine {
    /// Engine at the default 0.05 level
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine at a custom significance level
    pub fn with_alpha(alpha: f64) -> Self {
        Self { alpha }
    }

    /// Compare one metric across the selected groups.
    pub fn compare(
        &self,
        table: &MergedTable,
        metric: &str,
        groups: &[&str],
    ) -> AnalysisResult<TestResult> {
        if !table.has_metric(metric) {
            return Err(AnalysisError::UnknownMetric {
                metric: metric.to_string(),
            });
        }
        for group in groups {
            if !table.groups().iter().any(|g| g == group) {
                return Err(AnalysisError::UnknownGroup {
                    group: group.to_string(),
                });
            }
        }

        // Usable series in table group order
        let mut names: Vec<String> = Vec::new();
        let mut series: Vec<Vec<f64>> = Vec::new();
        for group in table.groups() {
            if !groups.iter().any(|s| s == group) {
                continue;
            }
            let values = table.group_values(metric, group).unwrap_or_default();
            if !values.is_empty() {
                names.push(group.clone());
                series.push(values);
            }
        }
        if names.len() < 2 {
            return Ok(TestResult::insufficient(metric));
        }
        let refs: Vec<&[f64]> = series.iter().map(|v| v.as_slice()).collect();

        let normality: Vec<GroupNormality> = names
            .iter()
            .zip(&series)
            .map(|(group, values)| {
                let p_value = shapiro_wilk(values).map(|outcome| outcome.p_value);
                GroupNormality {
                    group: group.clone(),
                    count: values.len(),
                    p_value,
                    normal: p_value.map_or(false, |p| p > self.alpha),
                }
            })
            .collect();
        let all_normal = normality.iter().all(|n| n.normal);
        let equal_variances = levene(&refs).map_or(true, |t| t.p_value > self.alpha);

        let omnibus = match TestChoice::select(all_normal, equal_variances) {
            TestChoice::Parametric => run_anova(&refs),
            TestChoice::RankBased => run_kruskal(&refs),
        };
        let omnibus = match omnibus {
            Some(o) => o,
            None => return Ok(TestResult::insufficient(metric)),
        };

        let significant = omnibus.p_value < self.alpha;
        let post_hoc = if significant {
            tukey_hsd(&refs, self.alpha).map(|pairs| {
                pairs
                    .into_iter()
                    .map(|pair| PostHocPair {
                        group_a: names[pair.group_a].clone(),
                        group_b: names[pair.group_b].clone(),
                        mean_diff: pair.mean_diff,
                        ci_lower: pair.lower,
                        ci_upper: pair.upper,
                        p_value: pair.p_value,
                        significant: pair.significant,
                    })
                    .collect()
            })
        } else {
            None
        };

        Ok(TestResult {
            metric: metric.to_string(),
            test: omnibus.test,
            statistic: omnibus.statistic,
            p_value: omnibus.p_value,
            significant,
            effect_size: omnibus.effect_size,
            normality,
            equal_variances,
            post_hoc,
        })
    }

    /// Compare every metric in the table across all its groups.
    pub fn compare_all_metrics(&self, table: &MergedTable) -> AnalysisResult<Vec<TestResult>> {
        let groups: Vec<&str> = table.groups().iter().map(|g| g.as_str()).collect();
        table
            .metrics()
            .into_iter()
            .map(|metric| self.compare(table, metric, &groups))
            .collect()
    }
}

fn run_anova(groups: &[&[f64]]) -> Option<Omnibus> {
    let anova = one_way_anova(groups)?;
    let ss_total = anova.ss_between + anova.ss_within;
    let effect_size = if ss_total > 1e-300 {
        (anova.ss_between / ss_total).clamp(0.0, 1.0)
    } else {
        0.0
    };
    Some(Omnibus {
        test: TestKind::Anova,
        statistic: anova.f_statistic,
        p_value: anova.p_value,
        effect_size,
    })
}

fn run_kruskal(groups: &[&[f64]]) -> Option<Omnibus> {
    let kw = kruskal_wallis(groups)?;
    let k = groups.len() as f64;
    let n: usize = groups.iter().map(|g| g.len()).sum();
    let denominator = n as f64 - k;
    let effect_size = if denominator > 0.0 {
        ((kw.statistic - k + 1.0) / denominator).clamp(0.0, 1.0)
    } else {
        0.0
    };
    Some(Omnibus {
        test: TestKind::KruskalWallis,
        statistic: kw.statistic,
        p_value: kw.p_value,
        effect_size,
    })
}
