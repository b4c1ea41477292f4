//! Flat-file export of analysis results
//!
//! Tabular results go out as delimited text with a header row, one
//! file per table; the insight report goes out as pretty-printed JSON.
//! Numeric cells use plain `{}` formatting, so NaN sentinels survive a
//! round trip through `parse::<f64>()`.

use crate::correlate::CorrelationMatrix;
use crate::descriptive::SummaryStatRow;
use crate::error::AnalysisResult;
use crate::insights::InsightReport;
use crate::ranking::RankingEntry;
use std::path::Path;

/// Export configuration
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Field delimiter for tabular files
    pub delimiter: u8,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

/// Write the descriptive summary table.
pub fn write_summary_csv(
    path: impl AsRef<Path>,
    rows: &[SummaryStatRow],
    config: &ExportConfig,
) -> AnalysisResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(config.delimiter)
        .from_path(path.as_ref())?;
    writer.write_record([
        "group",
        "metric",
        "count",
        "missing_pct",
        "mean",
        "median",
        "std_dev",
        "cv",
        "min",
        "q1",
        "q3",
        "iqr",
        "max",
    ])?;
    for row in rows {
        writer.write_record([
            row.group.clone(),
            row.metric.clone(),
            row.count.to_string(),
            row.missing_pct.to_string(),
            row.mean.to_string(),
            row.median.to_string(),
            row.std_dev.to_string(),
            row.cv.to_string(),
            row.min.to_string(),
            row.q1.to_string(),
            row.q3.to_string(),
            row.iqr.to_string(),
            row.max.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the ranking table. Absent confidence bounds export as empty
/// fields.
pub fn write_ranking_csv(
    path: impl AsRef<Path>,
    entries: &[RankingEntry],
    config: &ExportConfig,
) -> AnalysisResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(config.delimiter)
        .from_path(path.as_ref())?;
    writer.write_record([
        "rank",
        "group",
        "mean",
        "std_dev",
        "count",
        "ci95_lower",
        "ci95_upper",
    ])?;
    for entry in entries {
        let (lower, upper) = entry
            .ci95
            .map_or((String::new(), String::new()), |ci| {
                (ci.lower.to_string(), ci.upper.to_string())
            });
        writer.write_record([
            entry.rank.to_string(),
            entry.group.clone(),
            entry.mean.to_string(),
            entry.std_dev.to_string(),
            entry.count.to_string(),
            lower,
            upper,
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the correlation r matrix, metrics across both axes.
pub fn write_correlation_csv(
    path: impl AsRef<Path>,
    matrix: &CorrelationMatrix,
    config: &ExportConfig,
) -> AnalysisResult<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(config.delimiter)
        .from_path(path.as_ref())?;

    let mut header = Vec::with_capacity(matrix.metrics.len() + 1);
    header.push("metric".to_string());
    header.extend(matrix.metrics.iter().cloned());
    writer.write_record(&header)?;

    for (name, row) in matrix.metrics.iter().zip(&matrix.r) {
        let mut record = Vec::with_capacity(row.len() + 1);
        record.push(name.clone());
        record.extend(row.iter().map(|v| v.to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the insight report as pretty-printed JSON. NaN values come
/// out as JSON null.
pub fn write_insights_json(path: impl AsRef<Path>, report: &InsightReport) -> AnalysisResult<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path.as_ref(), json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlate::correlate;
    use crate::descriptive::summarize;
    use crate::insights::summarize_insights;
    use crate::ranking::rank;
    use crate::table::fixtures::three_plants;

    #[test]
    fn test_summary_export_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        let table = three_plants();
        let rows = summarize(&table, "GHI", &["alpha", "bravo", "carol"]).unwrap();

        write_summary_csv(&path, &rows, &ExportConfig::default()).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(
            reader.headers().unwrap().iter().next(),
            Some("group")
        );
        let records: Vec<csv::StringRecord> =
            reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 3);
        assert_eq!(&records[1][0], "bravo");
        let mean: f64 = records[1][4].parse().unwrap();
        assert!((mean - 21.0).abs() < 1e-12);
        // alpha: q1 = 10, q3 = 12
        let iqr: f64 = records[0][11].parse().unwrap();
        assert!((iqr - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_summary_header_matches_the_row_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        let table = three_plants();
        let rows = summarize(&table, "GHI", &["alpha"]).unwrap();
        write_summary_csv(&path, &rows, &ExportConfig::default()).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let header: Vec<String> = reader
            .headers()
            .unwrap()
            .iter()
            .map(str::to_string)
            .collect();
        assert_eq!(
            header,
            vec![
                "group",
                "metric",
                "count",
                "missing_pct",
                "mean",
                "median",
                "std_dev",
                "cv",
                "min",
                "q1",
                "q3",
                "iqr",
                "max",
            ]
        );
    }

    #[test]
    fn test_nan_cells_survive_the_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        let table = crate::table::MergedTable::from_parts(
            vec!["void".into()],
            vec![0, 0],
            vec![("WS".to_string(), vec![f64::NAN, f64::NAN])],
            None,
        );
        let rows = summarize(&table, "WS", &["void"]).unwrap();
        write_summary_csv(&path, &rows, &ExportConfig::default()).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let record = reader.records().next().unwrap().unwrap();
        let mean: f64 = record[4].parse().unwrap();
        assert!(mean.is_nan());
    }

    #[test]
    fn test_ranking_export_with_and_without_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranking.csv");
        let table = crate::table::MergedTable::from_parts(
            vec!["solo".into(), "pair".into()],
            vec![0, 1, 1],
            vec![("GHI".to_string(), vec![9.0, 3.0, 5.0])],
            None,
        );
        let entries = rank(&table, "GHI").unwrap();
        write_ranking_csv(&path, &entries, &ExportConfig::default()).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let header: Vec<String> = reader
            .headers()
            .unwrap()
            .iter()
            .map(str::to_string)
            .collect();
        assert_eq!(
            header,
            vec!["rank", "group", "mean", "std_dev", "count", "ci95_lower", "ci95_upper"]
        );

        let records: Vec<csv::StringRecord> =
            reader.records().map(|r| r.unwrap()).collect();
        // solo has one observation and exports empty bounds
        assert_eq!(&records[0][1], "solo");
        let solo_std: f64 = records[0][3].parse().unwrap();
        assert!(solo_std.is_nan());
        assert_eq!(&records[0][5], "");
        assert_eq!(&records[1][1], "pair");
        let pair_std: f64 = records[1][3].parse().unwrap();
        assert!((pair_std - 2.0_f64.sqrt()).abs() < 1e-12);
        assert!(!records[1][5].is_empty());
    }

    #[test]
    fn test_correlation_matrix_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corr.csv");
        let table = three_plants();
        let matrix = correlate(&table, &["GHI", "DNI"]).unwrap();
        write_correlation_csv(&path, &matrix, &ExportConfig::default()).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "metric,GHI,DNI");
        assert!(lines[1].starts_with("GHI,1,"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_custom_delimiter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.tsv");
        let table = three_plants();
        let rows = summarize(&table, "GHI", &["alpha"]).unwrap();
        write_summary_csv(&path, &rows, &ExportConfig { delimiter: b'\t' }).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.lines().next().unwrap().contains('\t'));
    }

    #[test]
    fn test_insights_json_is_valid_and_nan_free() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("insights.json");
        let table = three_plants();
        let report = summarize_insights(&table).unwrap();
        write_insights_json(&path, &report).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["total_records"], 15);
        assert_eq!(value["metrics"][0]["best_group"], "bravo");
        assert!(!content.contains("NaN"));
    }
}
