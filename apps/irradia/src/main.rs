//! irradia - comparative irradiance analysis from the command line
//!
//! Loads one CSV per site group, merges them, and runs the requested
//! analysis. Tabular subcommands print a plain table or, with
//! `--export`, write it as CSV instead.

mod cli;
mod render;

use clap::Parser;
use cli::{Cli, Command, ProfilePeriod};
use irradia_core::{
    correlate, hourly_profile, monthly_profile, rank, summarize, summarize_insights,
    write_correlation_csv, write_insights_json, write_ranking_csv, write_summary_csv,
    DatasetLoader, ExportConfig, GroupComparisonEngine, SourceSpec, SIGNIFICANCE_LEVEL,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let mut loader = DatasetLoader::new();
    if let Some(name) = &cli.timestamp_column {
        loader = loader.with_timestamp_column(name.as_str());
    }
    if let Some(delimiter) = cli.delimiter {
        loader = loader.with_delimiter(u8::try_from(delimiter)?);
    }

    let sources: Vec<SourceSpec> = cli
        .sources
        .iter()
        .map(|s| SourceSpec::new(&s.group, &s.path))
        .collect();
    let table = loader.load(&sources)?;
    tracing::info!(
        "Merged {} rows across {} groups",
        table.len(),
        table.groups().len()
    );

    let config = ExportConfig::default();
    match &cli.command {
        Command::Summary { metric, export } => {
            let groups: Vec<&str> = table.groups().iter().map(String::as_str).collect();
            let rows = summarize(&table, metric, &groups)?;
            match export {
                Some(path) => {
                    write_summary_csv(path, &rows, &config)?;
                    tracing::info!("Wrote {} summary rows to {}", rows.len(), path.display());
                }
                None => render::print_summary(&rows),
            }
        }
        Command::Compare { metric } => {
            let groups: Vec<&str> = table.groups().iter().map(String::as_str).collect();
            let result = GroupComparisonEngine::new().compare(&table, metric, &groups)?;
            render::print_comparison(&result, SIGNIFICANCE_LEVEL);
        }
        Command::Rank { metric, export } => {
            let entries = rank(&table, metric)?;
            match export {
                Some(path) => {
                    write_ranking_csv(path, &entries, &config)?;
                    tracing::info!("Wrote {} ranking rows to {}", entries.len(), path.display());
                }
                None => render::print_ranking(&entries),
            }
        }
        Command::Correlate { metrics, export } => {
            let selected: Vec<&str> = if metrics.is_empty() {
                table.metrics()
            } else {
                metrics.iter().map(String::as_str).collect()
            };
            let matrix = correlate(&table, &selected)?;
            match export {
                Some(path) => {
                    write_correlation_csv(path, &matrix, &config)?;
                    tracing::info!("Wrote correlation matrix to {}", path.display());
                }
                None => render::print_correlation(&matrix),
            }
        }
        Command::Profile { metric, by } => {
            let bins = match by {
                ProfilePeriod::Month => monthly_profile(&table, metric)?,
                ProfilePeriod::Hour => hourly_profile(&table, metric)?,
            };
            render::print_profile(&bins);
        }
        Command::Insights { json } => {
            let report = summarize_insights(&table)?;
            match json {
                Some(path) => {
                    write_insights_json(path, &report)?;
                    tracing::info!("Wrote insight report to {}", path.display());
                }
                None => render::print_insights(&report),
            }
        }
    }

    Ok(())
}
