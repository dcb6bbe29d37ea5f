//! Configuration errors

use thiserror::Error;

/// Errors raised while reading the ACI node configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Missing section [{section}]")]
    MissingSection { section: String },

    #[error("Missing key '{key}' in section [{section}]")]
    MissingKey { section: String, key: String },

    #[error("Node '{node}' is not listed in [aci_targets] (known nodes: {})", .known.join(", "))]
    UnknownNode { node: String, known: Vec<String> },

    #[error("Invalid integer for '{key}' in section [{section}]: {value}")]
    InvalidInteger {
        section: String,
        key: String,
        value: String,
    },

    #[error("Invalid configuration value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}
