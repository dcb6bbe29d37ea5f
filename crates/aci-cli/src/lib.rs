//! ACI node setup CLI
//!
//! Command-line tool that adds ACI network settings (MTU, VLAN
//! sub-interface and static route) to an AutoYaST installation profile.

pub mod cli;
pub mod commands;

pub use cli::Cli;

#[cfg(test)]
mod tests;
