use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;

use crate::analysis::Engine;
use crate::cli::args::Cli;
use crate::config::Config;
use crate::model::Batch;
use crate::reporting;

/// Loads configuration, applies command-line overrides, analyzes the model
/// and prints the report. Returns `true` if any type failed.
///
/// # Errors
/// Returns error if config or model cannot be loaded, or the pool fails.
pub fn handle_analyze(cli: &Cli) -> Result<bool> {
    let config = build_config(cli)?;
    let content = fs::read_to_string(&cli.model)
        .with_context(|| format!("Failed to read model {}", cli.model.display()))?;
    let batch = Batch::from_json(&content)
        .with_context(|| format!("Invalid symbol model in {}", cli.model.display()))?;

    if batch.types.is_empty() {
        println!("{}", "No types to analyze.".dimmed());
        return Ok(false);
    }
    if config.verbose {
        eprintln!("Analyzing {} types...", batch.types.len());
    }

    let report = Engine::new(config).run(&batch.types)?;
    reporting::print(&report, cli.format)?;
    Ok(report.has_failures())
}

/// Resolves the effective config: file first, then flags.
///
/// # Errors
/// Returns error if the config file or an `--exclude` pattern is invalid.
pub fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load()?,
    };

    config.verbose = cli.verbose;
    let analysis = &mut config.analysis;
    if cli.no_alias_tracking {
        analysis.alias_tracking = false;
    }
    if cli.no_filter_external {
        analysis.filter_external_calls = false;
    }
    if cli.no_unify {
        analysis.unify_wrapped_results = false;
    }
    if let Some(g) = cli.granularity {
        analysis.field_granularity = g.into();
    }
    if let Some(n) = cli.workers {
        analysis.workers = n;
    }
    for pattern in &cli.exclude {
        config.exclude(pattern)?;
    }
    Ok(config)
}
