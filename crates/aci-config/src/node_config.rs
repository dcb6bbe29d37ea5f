//! ACI node configuration (`aci_nodes.conf`)
//!
//! ```ini
//! [DEFAULT]
//! vlan_id = 100
//! mtu = 1600
//!
//! [aci_targets]
//! node1 = eth0
//!
//! [routing]
//! destination = 0.0.0.0
//! gateway = 10.0.0.1
//! netmask = 0.0.0.0
//! ```
//!
//! Section and key names are matched case-insensitively. Keys missing from
//! a section fall back to `[DEFAULT]`.

use std::collections::HashMap;
use std::net::IpAddr;
use std::path::Path;

use config::{Config, File, FileFormat};

use crate::error::ConfigError;
use crate::Result;

pub const DEFAULT_SECTION: &str = "DEFAULT";
pub const TARGETS_SECTION: &str = "aci_targets";
pub const ROUTING_SECTION: &str = "routing";

/// Lowest MTU accepted for an interface
pub const MIN_MTU: i64 = 68;

/// Routing parameters shared by all nodes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingConfig {
    pub destination: String,
    pub gateway: String,
    pub netmask: String,
}

/// Configuration resolved for a single target node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AciNodeConfig {
    pub node_name: String,
    pub vlan_id: u16,
    pub mtu: u16,
    /// Physical device carrying the ACI VLAN on this node
    pub ether_device: String,
    pub routing: RoutingConfig,
}

impl AciNodeConfig {
    /// Load the configuration file and resolve it for `node_name`
    pub fn load<P: AsRef<Path>>(path: P, node_name: &str) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Reading ACI configuration from {}", path.display());

        let sections = IniSections::read(File::from(path).format(FileFormat::Ini))?;
        Self::from_sections(&sections, node_name)
    }

    /// Parse configuration content and resolve it for `node_name`
    pub fn parse(content: &str, node_name: &str) -> Result<Self> {
        let sections = IniSections::read(File::from_str(content, FileFormat::Ini))?;
        Self::from_sections(&sections, node_name)
    }

    fn from_sections(sections: &IniSections, node_name: &str) -> Result<Self> {
        let vlan_id = sections.get_int(DEFAULT_SECTION, "vlan_id")?;
        let mtu = sections.get_int(DEFAULT_SECTION, "mtu")?;
        let ether_device = sections.target(node_name)?;

        let routing = RoutingConfig {
            destination: sections.get(ROUTING_SECTION, "destination")?,
            gateway: sections.get(ROUTING_SECTION, "gateway")?,
            netmask: sections.get(ROUTING_SECTION, "netmask")?,
        };

        let config = Self {
            node_name: node_name.to_string(),
            vlan_id: validate_vlan_id(vlan_id)?,
            mtu: validate_mtu(mtu)?,
            ether_device: validate_device_name(ether_device)?,
            routing,
        };
        config.routing.warn_unusual();

        log::debug!("Resolved configuration for {}: {:?}", node_name, config);
        Ok(config)
    }
}

impl RoutingConfig {
    /// Fields holding neither an IP address nor their AutoYaST placeholder
    pub fn unusual_fields(&self) -> Vec<&'static str> {
        self.unusual().into_iter().map(|(field, _)| field).collect()
    }

    fn unusual(&self) -> Vec<(&'static str, &str)> {
        [
            ("destination", self.destination.as_str(), "default"),
            ("gateway", self.gateway.as_str(), "-"),
            ("netmask", self.netmask.as_str(), "-"),
        ]
        .into_iter()
        .filter(|(_, value, placeholder)| value != placeholder && value.parse::<IpAddr>().is_err())
        .map(|(field, value, _)| (field, value))
        .collect()
    }

    fn warn_unusual(&self) {
        for (field, value) in self.unusual() {
            log::warn!("Routing {} '{}' is not an IP address", field, value);
        }
    }
}

/// Raw INI content keyed by section
#[derive(Debug)]
struct IniSections {
    sections: HashMap<String, HashMap<String, String>>,
}

impl IniSections {
    fn read<S>(source: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = Config::builder().add_source(source).build()?;
        let sections = settings.try_deserialize()?;
        Ok(Self { sections })
    }

    fn section(&self, name: &str) -> Option<&HashMap<String, String>> {
        self.sections
            .iter()
            .find(|(section, _)| section.eq_ignore_ascii_case(name))
            .map(|(_, values)| values)
    }

    fn get(&self, section: &str, key: &str) -> Result<String> {
        let values = self
            .section(section)
            .ok_or_else(|| ConfigError::MissingSection {
                section: section.to_string(),
            })?;

        let fallback = || {
            if section.eq_ignore_ascii_case(DEFAULT_SECTION) {
                None
            } else {
                self.section(DEFAULT_SECTION)
                    .and_then(|defaults| lookup(defaults, key))
            }
        };

        lookup(values, key)
            .or_else(fallback)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ConfigError::MissingKey {
                section: section.to_string(),
                key: key.to_string(),
            })
    }

    fn get_int(&self, section: &str, key: &str) -> Result<i64> {
        let value = self.get(section, key)?;
        value.parse().map_err(|_| ConfigError::InvalidInteger {
            section: section.to_string(),
            key: key.to_string(),
            value,
        })
    }

    /// Device mapped to `node` in `[aci_targets]`
    fn target(&self, node: &str) -> Result<String> {
        let targets = self
            .section(TARGETS_SECTION)
            .ok_or_else(|| ConfigError::MissingSection {
                section: TARGETS_SECTION.to_string(),
            })?;

        match lookup(targets, node).map(|device| device.trim()) {
            Some(device) if !device.is_empty() => Ok(device.to_string()),
            Some(_) => Err(ConfigError::MissingKey {
                section: TARGETS_SECTION.to_string(),
                key: node.to_string(),
            }),
            None => {
                let mut known: Vec<String> = targets.keys().cloned().collect();
                known.sort();
                Err(ConfigError::UnknownNode {
                    node: node.to_string(),
                    known,
                })
            }
        }
    }
}

fn lookup<'a>(values: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    values
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .map(|(_, value)| value.as_str())
}

fn validate_vlan_id(vlan_id: i64) -> Result<u16> {
    match u16::try_from(vlan_id) {
        Ok(tag @ 1..=4094) => Ok(tag),
        _ => Err(ConfigError::InvalidValue {
            field: "vlan_id".to_string(),
            value: vlan_id.to_string(),
        }),
    }
}

fn validate_mtu(mtu: i64) -> Result<u16> {
    match u16::try_from(mtu) {
        Ok(mtu) if i64::from(mtu) >= MIN_MTU => Ok(mtu),
        _ => Err(ConfigError::InvalidValue {
            field: "mtu".to_string(),
            value: mtu.to_string(),
        }),
    }
}

/// Check a kernel interface name
fn validate_device_name(name: String) -> Result<String> {
    let valid = name.len() <= 15
        && name.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.');

    if valid {
        Ok(name)
    } else {
        Err(ConfigError::InvalidValue {
            field: "ether_device".to_string(),
            value: name,
        })
    }
}
