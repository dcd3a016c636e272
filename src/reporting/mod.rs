//! Report rendering. The core produces a [`CohesionReport`]; this module only
//! formats it.

pub mod console;
pub mod dot;
pub(crate) mod shared;

use crate::types::CohesionReport;
use anyhow::Result;
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    /// Method dependency graphs as Graphviz DOT.
    Dot,
}

/// Serializes the report as pretty JSON.
///
/// # Errors
/// Returns error if serialization fails.
pub fn to_json(report: &CohesionReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Prints the report in the requested format.
///
/// # Errors
/// Returns error if JSON serialization fails.
pub fn print(report: &CohesionReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => console::print_report(report),
        OutputFormat::Json => println!("{}", to_json(report)?),
        OutputFormat::Dot => print!("{}", dot::to_dot(report)),
    }
    Ok(())
}
