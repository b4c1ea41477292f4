//! Aggregated insight report
//!
//! One call that composes ranking, comparison, and completeness into
//! the shape a report front-end wants: who leads each metric, how far
//! ahead, and whether the separation is statistically real. No
//! statistic is computed here that the underlying engines do not
//! already provide.

use crate::compare::{GroupComparisonEngine, TestResult};
use crate::error::AnalysisResult;
use crate::ranking::rank;
use crate::table::MergedTable;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Headline findings for one metric
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricInsight {
    pub metric: String,
    /// Group with the highest mean
    pub best_group: String,
    /// Group with the lowest mean among groups that have data
    pub worst_group: String,
    /// Best-group mean minus worst-group mean, in metric units
    pub performance_gap: f64,
    /// Share of the whole table's rows missing this metric, 0-100
    pub missing_pct: f64,
    /// Full comparison outcome backing the headline
    pub comparison: TestResult,
}

/// Dataset-wide insight report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightReport {
    pub total_records: usize,
    pub group_count: usize,
    pub date_range: Option<(NaiveDateTime, NaiveDateTime)>,
    /// Metrics whose comparison came back significant
    pub significant_metrics: Vec<String>,
    /// One entry per metric with at least one usable group; metrics
    /// with no usable data anywhere are left out
    pub metrics: Vec<MetricInsight>,
}

/// Build the insight report for a merged table.
pub fn summarize_insights(table: &MergedTable) -> AnalysisResult<InsightReport> {
    let engine = GroupComparisonEngine::new();
    let groups: Vec<&str> = table.groups().iter().map(|g| g.as_str()).collect();

    let mut significant_metrics = Vec::new();
    let mut metrics = Vec::new();

    for metric in table.metrics() {
        let comparison = engine.compare(table, metric, &groups)?;
        if comparison.significant {
            significant_metrics.push(metric.to_string());
        }

        let entries = rank(table, metric)?;
        let mut usable = entries.iter().filter(|e| !e.mean.is_nan());
        let best = match usable.next() {
            Some(entry) => entry,
            None => continue,
        };
        let worst = usable.last().unwrap_or(best);

        let missing_pct = table
            .metric_values(metric)
            .map_or(0.0, |values| {
                if values.is_empty() {
                    0.0
                } else {
                    let missing = values.iter().filter(|v| !v.is_finite()).count();
                    missing as f64 / values.len() as f64 * 100.0
                }
            });

        metrics.push(MetricInsight {
            metric: metric.to_string(),
            best_group: best.group.clone(),
            worst_group: worst.group.clone(),
            performance_gap: best.mean - worst.mean,
            missing_pct,
            comparison,
        });
    }

    Ok(InsightReport {
        total_records: table.len(),
        group_count: table.groups().len(),
        date_range: table.date_range(),
        significant_metrics,
        metrics,
    })
}
