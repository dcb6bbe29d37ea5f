//! Command line arguments

use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "setup-aci-nodes")]
#[command(about = "Add ACI network settings to an AutoYaST profile")]
#[command(version)]
#[command(long_about = "
Add ACI network settings to an AutoYaST profile

Reads the ACI settings for one node from the configuration file, then sets
the MTU of the node's physical device, adds a VLAN sub-interface on top of
it and adds a static route through that VLAN. Entries that already exist in
the profile are left untouched.

Examples:
  setup-aci-nodes -n node1 -i autoinst.xml
  setup-aci-nodes -c /etc/aci_nodes.conf -n node1 -i autoinst.xml -o out.xml
")]
pub struct Cli {
    /// Path of the ACI configuration file
    #[arg(short, long, default_value = "aci_nodes.conf")]
    pub config_file: PathBuf,

    /// FQDN or host name of the node the profile is for
    #[arg(short, long)]
    pub node_name: String,

    /// AutoYaST profile to modify
    #[arg(short, long)]
    pub input_file: PathBuf,

    /// Where to write the updated profile
    #[arg(short, long, default_value = "/root/out_autoinst.xml")]
    pub output_file: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    pub debug: bool,

    /// Suppress all output except errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Log filter derived from the verbosity flags
    pub fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else if self.verbose {
            "info"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }
}
