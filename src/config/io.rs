// src/config/io.rs
use super::types::{Config, LcomToml};
use crate::error::{LcomError, Result};
use regex::Regex;
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "lcom.toml";

/// Loads `lcom.toml` from the working directory if present.
///
/// # Errors
/// Returns error if the file exists but cannot be parsed.
pub fn load_toml_config(config: &mut Config) -> Result<()> {
    let path = Path::new(CONFIG_FILE);
    if !path.exists() {
        return Ok(());
    }
    load_from_path(config, path)
}

/// # Errors
/// Returns error if the file cannot be read or parsed.
pub fn load_from_path(config: &mut Config, path: &Path) -> Result<()> {
    let content = fs::read_to_string(path).map_err(|source| LcomError::Io {
        source,
        path: path.to_path_buf(),
    })?;
    parse_toml(config, &content)?;
    tracing::debug!(path = %path.display(), "Loaded configuration");
    Ok(())
}

/// # Errors
/// Returns error on invalid TOML or an invalid `exclude_types` pattern.
pub fn parse_toml(config: &mut Config, content: &str) -> Result<()> {
    let parsed: LcomToml = toml::from_str(content)?;
    config.analysis = parsed.analysis;
    compile_patterns(config)
}

/// Recompiles `exclude_patterns` from `analysis.exclude_types`.
///
/// # Errors
/// Returns error if a pattern is not a valid regex.
pub fn compile_patterns(config: &mut Config) -> Result<()> {
    config.exclude_patterns = config
        .analysis
        .exclude_types
        .iter()
        .map(|p| Regex::new(p))
        .collect::<std::result::Result<_, _>>()?;
    Ok(())
}
