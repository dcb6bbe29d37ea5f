//! CLI commands

pub mod update;

pub use update::{UpdateCommand, UpdateReport};
