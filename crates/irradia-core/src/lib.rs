//! irradia-core - Comparative analysis of irradiance measurements
//!
//! Takes one CSV export per site group, merges them into a single
//! table, and answers the questions a resource assessment asks:
//!
//! - **Descriptive**: per-group summary statistics and distribution
//!   shape
//! - **Comparison**: automatic ANOVA / Kruskal-Wallis selection with
//!   effect sizes and Tukey post-hoc pairs
//! - **Ranking**: groups ordered by mean with confidence intervals
//! - **Correlation**: metric-to-metric Pearson matrix
//! - **Temporal**: monthly and hourly profiles
//! - **Insights**: the headline report composed from all of the above
//!
//! # Key Components
//!
//! - [`DatasetLoader`] reads and merges the per-group sources
//! - [`MergedTable`] is the one data structure every engine consumes
//! - [`TableCache`] memoizes merges across repeated analyses
//! - [`GroupComparisonEngine`] runs the test-selection pipeline

pub mod cache;
pub mod compare;
pub mod correlate;
pub mod descriptive;
pub mod error;
pub mod export;
pub mod insights;
pub mod loader;
pub mod ranking;
pub mod table;
pub mod temporal;

pub use cache::TableCache;
pub use compare::{
    GroupComparisonEngine, GroupNormality, PostHocPair, TestChoice, TestKind, TestResult,
    SIGNIFICANCE_LEVEL,
};
pub use correlate::{correlate, CorrelationMatrix};
pub use descriptive::{distribution_shape, summarize, ShapeRow, SummaryStatRow};
pub use error::{AnalysisError, AnalysisResult};
pub use export::{
    write_correlation_csv, write_insights_json, write_ranking_csv, write_summary_csv, ExportConfig,
};
pub use insights::{summarize_insights, InsightReport, MetricInsight};
pub use loader::{DatasetLoader, SourceSpec};
pub use ranking::{rank, ConfidenceBounds, RankingEntry};
pub use table::MergedTable;
pub use temporal::{hourly_profile, monthly_profile, ProfileBin};
