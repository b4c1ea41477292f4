//! irradia-stats - Statistical functions for solar resource comparison
//!
//! Pure numeric primitives over `f64` slices:
//!
//! - **Summary**: descriptive statistics with quantiles, distribution
//!   shape, and confidence intervals for the mean
//! - **Hypothesis**: Shapiro-Wilk, Levene (Brown-Forsythe), one-way
//!   ANOVA, Kruskal-Wallis
//! - **Post-hoc**: Tukey-Kramer HSD backed by the studentized range
//!   distribution
//! - **Correlation**: Pearson r with a two-tailed t-test on the
//!   coefficient
//!
//! # Design
//!
//! Missing values are NaN. Summaries filter them and report how many
//! were dropped; hypothesis tests require finite input and return
//! `None` on degenerate data. Nothing in this crate panics on bad
//! input - the caller decides what a missing result means.

pub mod correlation;
pub mod hypothesis;
pub mod posthoc;
pub mod summary;

pub use correlation::*;
pub use hypothesis::*;
pub use posthoc::*;
pub use summary::*;
