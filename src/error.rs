// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// Input faults that poison the analysis of a single type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("field '{path}' is nested under '{parent}', which is not declared")]
    OrphanField { path: String, parent: String },

    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),

    #[error("field path '{0}' has an empty segment")]
    EmptySegment(String),

    #[error("method '{0}' is declared more than once")]
    DuplicateMethod(String),
}

#[derive(Debug, Error)]
pub enum LcomError {
    #[error("Malformed symbol model for '{type_name}': {source}")]
    Model {
        type_name: String,
        source: ModelError,
    },

    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid symbol model JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Thread pool error: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error("Analysis cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, LcomError>;

// Allow `?` on std::io::Error by converting to LcomError::Io with unknown path.
impl From<std::io::Error> for LcomError {
    fn from(source: std::io::Error) -> Self {
        LcomError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}

impl LcomError {
    #[must_use]
    pub fn model(type_name: &str, source: ModelError) -> Self {
        LcomError::Model {
            type_name: type_name.to_string(),
            source,
        }
    }
}
