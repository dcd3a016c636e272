// src/config/mod.rs
pub mod io;
pub mod types;

pub use self::types::{AnalysisConfig, Config, FieldGranularity, LcomToml};
use crate::error::Result;
use std::path::Path;

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_analysis(analysis: AnalysisConfig) -> Self {
        Self {
            analysis,
            ..Self::default()
        }
    }

    /// Creates a new config and loads local settings (`lcom.toml`).
    ///
    /// # Errors
    /// Returns error if a local `lcom.toml` exists but is invalid.
    pub fn load() -> Result<Self> {
        let mut config = Self::new();
        io::load_toml_config(&mut config)?;
        Ok(config)
    }

    /// Creates a config from an explicit file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::new();
        io::load_from_path(&mut config, path)?;
        Ok(config)
    }

    /// Replaces the analysis options with those in `content`.
    ///
    /// # Errors
    /// Returns error on invalid TOML or regex.
    pub fn parse_toml(&mut self, content: &str) -> Result<()> {
        io::parse_toml(self, content)
    }

    /// Appends an exclusion pattern.
    ///
    /// # Errors
    /// Returns error if the pattern is not a valid regex.
    pub fn exclude(&mut self, pattern: &str) -> Result<()> {
        self.analysis.exclude_types.push(pattern.to_string());
        io::compile_patterns(self)
    }

    #[must_use]
    pub fn is_excluded(&self, type_name: &str) -> bool {
        self.exclude_patterns.iter().any(|re| re.is_match(type_name))
    }
}
