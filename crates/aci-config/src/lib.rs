//! ACI Node Configuration
//!
//! Reads `aci_nodes.conf` and resolves the settings for one target node

pub mod error;
pub mod node_config;

pub use error::ConfigError;
pub use node_config::{AciNodeConfig, RoutingConfig};

/// Result type for configuration loading
pub type Result<T> = std::result::Result<T, ConfigError>;
