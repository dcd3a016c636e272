use serde::{Deserialize, Serialize};

/// How nested member chains resolve to field paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldGranularity {
    /// Any access to `B.x` counts as an access to `B`.
    #[default]
    Root,
    /// `B.x` resolves to the deepest declared path; touching `B` as a whole
    /// touches every leaf under it.
    Leaf,
}

impl std::fmt::Display for FieldGranularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Root => f.write_str("root"),
            Self::Leaf => f.write_str("leaf"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_true")]
    pub alias_tracking: bool,
    #[serde(default = "default_true")]
    pub filter_external_calls: bool,
    #[serde(default = "default_true")]
    pub unify_wrapped_results: bool,
    #[serde(default)]
    pub field_granularity: FieldGranularity,
    /// Worker threads for batch analysis. 0 means one per core.
    #[serde(default)]
    pub workers: usize,
    /// Regex patterns of type names to skip.
    #[serde(default)]
    pub exclude_types: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            alias_tracking: true,
            filter_external_calls: true,
            unify_wrapped_results: true,
            field_granularity: FieldGranularity::default(),
            workers: 0,
            exclude_types: Vec::new(),
        }
    }
}

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LcomToml {
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub exclude_patterns: Vec<regex::Regex>,
    pub verbose: bool,
    pub analysis: AnalysisConfig,
}
