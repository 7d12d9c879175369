use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or querying the category registry.
///
/// All of these abort the run before any tool is invoked.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read registry file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse registry TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Duplicate category name '{name}' in categories '{first}' and '{second}'")]
    DuplicateName {
        name: String,
        first: String,
        second: String,
    },

    #[error("Invalid category '{category}': {reason}")]
    InvalidCategory { category: String, reason: String },

    #[error("Invalid noise pattern '{pattern}' in category '{category}': {source}")]
    NoisePattern {
        category: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unknown category '{0}'")]
    UnknownCategory(String),
}
