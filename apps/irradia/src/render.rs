//! Plain-text rendering of analysis results
//!
//! Fixed-width tables on stdout. NaN prints as "-" so missing cells
//! read as absent rather than as a number.

use irradia_core::{
    CorrelationMatrix, InsightReport, ProfileBin, RankingEntry, SummaryStatRow, TestResult,
};

/// Format a statistic with three decimals, NaN as "-"
fn num(value: f64) -> String {
    if value.is_nan() {
        "-".to_string()
    } else {
        format!("{value:.3}")
    }
}

/// Format a p-value with four decimals, NaN as "-"
fn pval(value: f64) -> String {
    if value.is_nan() {
        "-".to_string()
    } else {
        format!("{value:.4}")
    }
}

pub fn print_summary(rows: &[SummaryStatRow]) {
    println!(
        "{:<14} {:<10} {:>6} {:>9} {:>10} {:>10} {:>10} {:>8} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "group", "metric", "count", "missing%", "mean", "median", "std", "cv%", "min", "q1", "q3", "iqr", "max"
    );
    println!("{}", "-".repeat(139));
    for row in rows {
        println!(
            "{:<14} {:<10} {:>6} {:>9} {:>10} {:>10} {:>10} {:>8} {:>10} {:>10} {:>10} {:>10} {:>10}",
            row.group,
            row.metric,
            row.count,
            num(row.missing_pct),
            num(row.mean),
            num(row.median),
            num(row.std_dev),
            num(row.cv),
            num(row.min),
            num(row.q1),
            num(row.q3),
            num(row.iqr),
            num(row.max)
        );
    }
}

pub fn print_comparison(result: &TestResult, alpha: f64) {
    println!("Metric:          {}", result.metric);
    println!("Test:            {}", result.test);
    println!("Statistic:       {}", num(result.statistic));
    println!("p-value:         {}", pval(result.p_value));
    println!(
        "Significant:     {} (alpha = {})",
        if result.significant { "yes" } else { "no" },
        alpha
    );
    println!("Effect size:     {}", num(result.effect_size));
    println!(
        "Equal variances: {}",
        if result.equal_variances { "yes" } else { "no" }
    );

    if !result.normality.is_empty() {
        println!();
        println!("Normality (Shapiro-Wilk):");
        println!("{:<14} {:>6} {:>9} {:>7}", "group", "count", "p-value", "normal");
        for entry in &result.normality {
            println!(
                "{:<14} {:>6} {:>9} {:>7}",
                entry.group,
                entry.count,
                entry.p_value.map_or_else(|| "-".to_string(), pval),
                if entry.normal { "yes" } else { "no" }
            );
        }
    }

    if let Some(pairs) = &result.post_hoc {
        println!();
        println!("Post-hoc (Tukey HSD):");
        println!(
            "{:<30} {:>10} {:>24} {:>9} {:>12}",
            "pair", "diff", "95% CI", "p-value", "significant"
        );
        for pair in pairs {
            println!(
                "{:<30} {:>10} {:>24} {:>9} {:>12}",
                format!("{} vs {}", pair.group_a, pair.group_b),
                num(pair.mean_diff),
                format!("[{}, {}]", num(pair.ci_lower), num(pair.ci_upper)),
                pval(pair.p_value),
                if pair.significant { "yes" } else { "no" }
            );
        }
    }
}

pub fn print_ranking(entries: &[RankingEntry]) {
    println!(
        "{:<5} {:<14} {:>10} {:>10} {:>6} {:>24}",
        "rank", "group", "mean", "std", "count", "95% CI"
    );
    println!("{}", "-".repeat(74));
    for entry in entries {
        let ci = entry.ci95.as_ref().map_or_else(
            || "-".to_string(),
            |b| format!("[{}, {}]", num(b.lower), num(b.upper)),
        );
        println!(
            "{:<5} {:<14} {:>10} {:>10} {:>6} {:>24}",
            entry.rank,
            entry.group,
            num(entry.mean),
            num(entry.std_dev),
            entry.count,
            ci
        );
    }
}

pub fn print_correlation(matrix: &CorrelationMatrix) {
    print!("{:<12}", "");
    for name in &matrix.metrics {
        print!(" {name:>10}");
    }
    println!();
    for (i, name) in matrix.metrics.iter().enumerate() {
        print!("{name:<12}");
        for value in &matrix.r[i] {
            print!(" {:>10}", num(*value));
        }
        println!();
    }
}

pub fn print_profile(bins: &[ProfileBin]) {
    if bins.is_empty() {
        println!("No timestamp column in the sources; nothing to profile.");
        return;
    }
    println!(
        "{:<14} {:<10} {:>10} {:>6}",
        "group", "period", "mean", "count"
    );
    println!("{}", "-".repeat(43));
    for bin in bins {
        println!(
            "{:<14} {:<10} {:>10} {:>6}",
            bin.group,
            bin.period,
            num(bin.mean),
            bin.count
        );
    }
}

pub fn print_insights(report: &InsightReport) {
    println!(
        "Records:     {} rows across {} groups",
        report.total_records, report.group_count
    );
    if let Some((start, end)) = &report.date_range {
        println!(
            "Date range:  {} to {}",
            start.format("%Y-%m-%d %H:%M"),
            end.format("%Y-%m-%d %H:%M")
        );
    }
    if report.significant_metrics.is_empty() {
        println!("No metric shows a significant group difference.");
    } else {
        println!(
            "Significant: {}",
            report.significant_metrics.join(", ")
        );
    }

    println!();
    println!(
        "{:<10} {:<14} {:<14} {:>10} {:>9} {:<16} {:>9}",
        "metric", "best", "worst", "gap", "missing%", "test", "p-value"
    );
    println!("{}", "-".repeat(88));
    for insight in &report.metrics {
        println!(
            "{:<10} {:<14} {:<14} {:>10} {:>9} {:<16} {:>9}",
            insight.metric,
            insight.best_group,
            insight.worst_group,
            num(insight.performance_gap),
            num(insight.missing_pct),
            insight.comparison.test.to_string(),
            pval(insight.comparison.p_value)
        );
    }
}
