//! CLI argument parsing for irradia

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Binning granularity for temporal profiles
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProfilePeriod {
    /// Calendar month (YYYY-MM)
    Month,
    /// Hour of day (00-23)
    Hour,
}

/// One GROUP=PATH source mapping from the command line
#[derive(Debug, Clone)]
pub struct Source {
    pub group: String,
    pub path: String,
}

/// Parse a `--source` value of the form `GROUP=PATH`
pub fn parse_source(raw: &str) -> Result<Source, String> {
    match raw.split_once('=') {
        Some((group, path)) if !group.is_empty() && !path.is_empty() => Ok(Source {
            group: group.to_string(),
            path: path.to_string(),
        }),
        _ => Err(format!("expected GROUP=PATH, got '{raw}'")),
    }
}

#[derive(Parser, Debug)]
#[command(name = "irradia")]
#[command(version)]
#[command(about = "Comparative analysis of solar irradiance datasets", long_about = None)]
pub struct Cli {
    /// Dataset source as GROUP=PATH (repeat once per group)
    #[arg(
        long = "source",
        value_name = "GROUP=PATH",
        value_parser = parse_source,
        required = true
    )]
    pub sources: Vec<Source>,

    /// Column holding row timestamps (default: any column named "timestamp")
    #[arg(long = "timestamp-column", value_name = "NAME")]
    pub timestamp_column: Option<String>,

    /// Field delimiter of the source files (default: comma)
    #[arg(long = "delimiter", value_name = "CHAR")]
    pub delimiter: Option<char>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Per-group summary statistics for one metric
    Summary {
        /// Metric column to summarize
        #[arg(long, value_name = "METRIC")]
        metric: String,
        /// Write the table as CSV instead of printing it
        #[arg(long, value_name = "PATH")]
        export: Option<PathBuf>,
    },
    /// Test whether the groups differ on one metric
    Compare {
        /// Metric column to test
        #[arg(long, value_name = "METRIC")]
        metric: String,
    },
    /// Groups ordered by mean, best first
    Rank {
        /// Metric column to rank by
        #[arg(long, value_name = "METRIC")]
        metric: String,
        /// Write the table as CSV instead of printing it
        #[arg(long, value_name = "PATH")]
        export: Option<PathBuf>,
    },
    /// Pearson correlation matrix between metrics
    Correlate {
        /// Comma-separated metrics (default: every numeric column)
        #[arg(long, value_name = "A,B,C", value_delimiter = ',')]
        metrics: Vec<String>,
        /// Write the matrix as CSV instead of printing it
        #[arg(long, value_name = "PATH")]
        export: Option<PathBuf>,
    },
    /// Mean per group and calendar period
    Profile {
        /// Metric column to profile
        #[arg(long, value_name = "METRIC")]
        metric: String,
        /// Bin rows by month or by hour of day
        #[arg(long, value_enum, default_value = "month")]
        by: ProfilePeriod,
    },
    /// Headline report across every metric
    Insights {
        /// Write the report as JSON to this path instead of printing it
        #[arg(long, value_name = "PATH")]
        json: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_sources_and_subcommand() {
        let cli = Cli::parse_from([
            "irradia",
            "--source",
            "north=/data/north.csv",
            "--source",
            "south=/data/south.csv",
            "summary",
            "--metric",
            "GHI",
        ]);
        assert_eq!(cli.sources.len(), 2);
        assert_eq!(cli.sources[0].group, "north");
        assert_eq!(cli.sources[1].path, "/data/south.csv");
        match cli.command {
            Command::Summary { metric, export } => {
                assert_eq!(metric, "GHI");
                assert!(export.is_none());
            }
            _ => panic!("expected summary subcommand"),
        }
    }

    #[test]
    fn test_cli_requires_a_source() {
        let result = Cli::try_parse_from(["irradia", "rank", "--metric", "GHI"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_rejects_malformed_source() {
        let result = Cli::try_parse_from([
            "irradia",
            "--source",
            "no-equals-sign",
            "rank",
            "--metric",
            "GHI",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_splits_correlate_metric_list() {
        let cli = Cli::parse_from([
            "irradia",
            "--source",
            "north=n.csv",
            "correlate",
            "--metrics",
            "GHI,DNI,DHI",
        ]);
        match cli.command {
            Command::Correlate { metrics, .. } => {
                assert_eq!(metrics, vec!["GHI", "DNI", "DHI"]);
            }
            _ => panic!("expected correlate subcommand"),
        }
    }

    #[test]
    fn test_cli_profile_defaults_to_month() {
        let cli = Cli::parse_from([
            "irradia",
            "--source",
            "north=n.csv",
            "profile",
            "--metric",
            "GHI",
        ]);
        match cli.command {
            Command::Profile { by, .. } => assert!(matches!(by, ProfilePeriod::Month)),
            _ => panic!("expected profile subcommand"),
        }
    }

    #[test]
    fn test_parse_source_splits_on_first_equals() {
        let source = parse_source("north=/data/a=b.csv").unwrap();
        assert_eq!(source.group, "north");
        assert_eq!(source.path, "/data/a=b.csv");

        assert!(parse_source("nopath=").is_err());
        assert!(parse_source("=nopath").is_err());
    }
}
