//! Metric-to-metric correlation
//!
//! Pearson correlations across the whole merged table, group labels
//! ignored. Cells are computed pairwise-complete: a row contributes to
//! a pair only when both metrics are present in it.

use crate::error::{AnalysisError, AnalysisResult};
use crate::table::MergedTable;
use irradia_stats::{correlation_p_value, pearson_r};
use serde::{Deserialize, Serialize};

/// Symmetric correlation matrix with matching p-values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    /// Metric names, indexing both axes
    pub metrics: Vec<String>,
    /// Pearson r per metric pair
    pub r: Vec<Vec<f64>>,
    /// Two-sided p-value per metric pair
    pub p: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    fn index_of(&self, metric: &str) -> Option<usize> {
        self.metrics.iter().position(|m| m == metric)
    }

    /// Correlation between two metrics by name
    pub fn r_between(&self, a: &str, b: &str) -> Option<f64> {
        Some(self.r[self.index_of(a)?][self.index_of(b)?])
    }

    /// p-value between two metrics by name
    pub fn p_between(&self, a: &str, b: &str) -> Option<f64> {
        Some(self.p[self.index_of(a)?][self.index_of(b)?])
    }
}

/// Correlate the selected metrics across all rows.
///
/// The diagonal is r = 1, p = 0 by convention and is never tested. A
/// constant or empty metric yields NaN in its off-diagonal cells.
/// p-values use the total row count as sample size, not the
/// pairwise-complete count.
pub fn correlate(table: &MergedTable, metrics: &[&str]) -> AnalysisResult<CorrelationMatrix> {
    let mut columns = Vec::with_capacity(metrics.len());
    for metric in metrics {
        let values = table
            .metric_values(metric)
            .ok_or_else(|| AnalysisError::UnknownMetric {
                metric: metric.to_string(),
            })?;
        columns.push(values);
    }

    let k = metrics.len();
    let n = table.len();
    let mut r = vec![vec![0.0; k]; k];
    let mut p = vec![vec![0.0; k]; k];

    for i in 0..k {
        r[i][i] = 1.0;
        p[i][i] = 0.0;
        for j in (i + 1)..k {
            let rij = pearson_r(columns[i], columns[j]);
            let pij = correlation_p_value(rij, n);
            r[i][j] = rij;
            r[j][i] = rij;
            p[i][j] = pij;
            p[j][i] = pij;
        }
    }

    Ok(CorrelationMatrix {
        metrics: metrics.iter().map(|m| m.to_string()).collect(),
        r,
        p,
    })
}
