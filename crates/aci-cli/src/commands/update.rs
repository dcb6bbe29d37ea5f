//! Update command

use aci_node_config::AciNodeConfig;
use anyhow::{Context, Result};
use autoyast_net_core::{
    add_route, add_vlan_interface, set_interface_mtu, vlan_device_name, EditOutcome,
    ProfileDocument,
};
use std::fmt;
use std::path::Path;

/// Applies the ACI settings of one node to a profile
pub struct UpdateCommand {
    config: AciNodeConfig,
}

/// Outcome of each edit made by [`UpdateCommand`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    pub ether_device: String,
    pub vlan_device: String,
    pub mtu: EditOutcome,
    pub vlan_interface: EditOutcome,
    pub route: EditOutcome,
}

impl UpdateCommand {
    pub fn new(config: AciNodeConfig) -> Self {
        Self { config }
    }

    /// Create command from the configuration file entry of `node_name`
    pub fn from_config_file(path: &Path, node_name: &str) -> Result<Self> {
        let config = AciNodeConfig::load(path, node_name).with_context(|| {
            format!(
                "Failed to read configuration for node '{}' from {}",
                node_name,
                path.display()
            )
        })?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &AciNodeConfig {
        &self.config
    }

    /// Apply all edits to a loaded profile
    pub fn apply(&self, doc: &mut ProfileDocument) -> Result<UpdateReport> {
        let config = &self.config;
        let routing = &config.routing;

        let mtu = set_interface_mtu(doc, &config.ether_device, config.mtu)
            .with_context(|| format!("Failed to set MTU on {}", config.ether_device))?;

        let vlan_interface =
            add_vlan_interface(doc, &config.ether_device, config.mtu, config.vlan_id)
                .context("Failed to add VLAN interface")?;

        let route = add_route(
            doc,
            config.vlan_id,
            &routing.destination,
            &routing.gateway,
            &routing.netmask,
        )
        .context("Failed to add route")?;

        Ok(UpdateReport {
            ether_device: config.ether_device.clone(),
            vlan_device: vlan_device_name(config.vlan_id),
            mtu,
            vlan_interface,
            route,
        })
    }

    /// Load `input`, apply all edits and write the result to `output`
    pub fn execute(&self, input: &Path, output: &Path) -> Result<UpdateReport> {
        log::info!(
            "Updating {} for node {}",
            input.display(),
            self.config.node_name
        );

        let mut doc = ProfileDocument::load(input)
            .with_context(|| format!("Failed to load profile: {}", input.display()))?;

        let report = self.apply(&mut doc)?;

        doc.write(output)
            .with_context(|| format!("Failed to write profile: {}", output.display()))?;

        Ok(report)
    }
}

impl fmt::Display for UpdateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "mtu {}: {}", self.ether_device, self.mtu)?;
        writeln!(f, "vlan interface {}: {}", self.vlan_device, self.vlan_interface)?;
        write!(f, "route via {}: {}", self.vlan_device, self.route)
    }
}
