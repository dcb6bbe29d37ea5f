//! Interface entries in `networking/interfaces`

use crate::document::ProfileDocument;
use crate::types::{EditOutcome, Element, QName, SkipReason};
use crate::Result;

/// Interface entry as written into a profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceEntry {
    pub bootproto: Option<String>,
    pub device: String,
    pub dhclient_set_default_route: Option<bool>,
    pub etherdevice: Option<String>,
    pub mtu: Option<u16>,
    pub startmode: Option<String>,
    pub vlan_id: Option<u16>,
}

impl InterfaceEntry {
    /// Create new interface entry
    pub fn new(device: String) -> Self {
        Self {
            bootproto: None,
            device,
            dhclient_set_default_route: None,
            etherdevice: None,
            mtu: None,
            startmode: None,
            vlan_id: None,
        }
    }

    /// DHCP-configured VLAN sub-interface on top of `ether_device`
    pub fn vlan(ether_device: &str, mtu: u16, vlan_id: u16) -> Self {
        Self::new(vlan_device_name(vlan_id))
            .with_bootproto("dhcp")
            .with_default_route(true)
            .with_etherdevice(ether_device)
            .with_mtu(mtu)
            .with_startmode("auto")
            .with_vlan_id(vlan_id)
    }

    pub fn with_bootproto(mut self, bootproto: &str) -> Self {
        self.bootproto = Some(bootproto.to_string());
        self
    }

    /// Set `dhclient_set_default_route`
    pub fn with_default_route(mut self, enabled: bool) -> Self {
        self.dhclient_set_default_route = Some(enabled);
        self
    }

    pub fn with_etherdevice(mut self, device: &str) -> Self {
        self.etherdevice = Some(device.to_string());
        self
    }

    pub fn with_mtu(mut self, mtu: u16) -> Self {
        self.mtu = Some(mtu);
        self
    }

    pub fn with_startmode(mut self, startmode: &str) -> Self {
        self.startmode = Some(startmode.to_string());
        self
    }

    pub fn with_vlan_id(mut self, vlan_id: u16) -> Self {
        self.vlan_id = Some(vlan_id);
        self
    }

    /// Render as an `interface` element with fields in profile order
    pub fn to_element(&self) -> Element {
        let mut element = Element::new(QName::yast("interface"));
        let mut field = |name: &str, value: String| {
            element.push_element(Element::with_text(QName::yast(name), value));
        };

        if let Some(bootproto) = &self.bootproto {
            field("bootproto", bootproto.clone());
        }
        field("device", self.device.clone());
        if let Some(enabled) = self.dhclient_set_default_route {
            field(
                "dhclient_set_default_route",
                if enabled { "yes" } else { "no" }.to_string(),
            );
        }
        if let Some(etherdevice) = &self.etherdevice {
            field("etherdevice", etherdevice.clone());
        }
        if let Some(mtu) = self.mtu {
            field("mtu", mtu.to_string());
        }
        if let Some(startmode) = &self.startmode {
            field("startmode", startmode.clone());
        }
        if let Some(vlan_id) = self.vlan_id {
            field("vlan_id", vlan_id.to_string());
        }

        element
    }

    /// Read an entry back from an `interface` element
    ///
    /// Returns `None` when the element carries no `device` field. Numeric
    /// fields that do not parse are treated as absent.
    pub fn from_element(element: &Element) -> Option<Self> {
        let device = element.field_text("device")?;

        Some(Self {
            bootproto: element.field_text("bootproto"),
            device,
            dhclient_set_default_route: element
                .field_text("dhclient_set_default_route")
                .map(|value| value.trim() == "yes"),
            etherdevice: element.field_text("etherdevice"),
            mtu: element
                .field_text("mtu")
                .and_then(|value| value.trim().parse().ok()),
            startmode: element.field_text("startmode"),
            vlan_id: element
                .field_text("vlan_id")
                .and_then(|value| value.trim().parse().ok()),
        })
    }
}

/// Device name of the VLAN sub-interface for `vlan_id`
pub fn vlan_device_name(vlan_id: u16) -> String {
    format!("vlan.{}", vlan_id)
}

fn is_interface_for(interface: &Element, device: &str) -> bool {
    interface.field_text("device").as_deref() == Some(device)
}

/// Check whether an interface entry for `device` exists
pub fn interface_exists(doc: &ProfileDocument, device: &str) -> Result<bool> {
    Ok(doc
        .interfaces()?
        .find_all("interface")
        .any(|interface| is_interface_for(interface, device)))
}

/// Add an `mtu` field to the interface entry for `device`
///
/// Only the first matching entry is considered. An existing `mtu` is left
/// untouched, which makes repeated calls no-ops.
pub fn set_interface_mtu(doc: &mut ProfileDocument, device: &str, mtu: u16) -> Result<EditOutcome> {
    let interfaces = doc.interfaces_mut()?;

    let Some(interface) = interfaces.find_all_mut("interface").find(|interface| {
        log::debug!(
            "Checking interface {:?} for device {}",
            interface.field_text("device"),
            device
        );
        is_interface_for(interface, device)
    }) else {
        log::warn!("No interface with device {} found, MTU not set", device);
        return Ok(EditOutcome::Skipped(SkipReason::DeviceNotFound));
    };

    if let Some(existing) = interface.field_text("mtu") {
        log::info!(
            "Interface {} already has MTU {}, leaving it unchanged",
            device,
            existing.trim()
        );
        return Ok(EditOutcome::Skipped(SkipReason::AlreadyPresent));
    }

    interface.push_element(Element::with_text(QName::yast("mtu"), mtu.to_string()));
    log::info!("Set MTU {} on interface {}", mtu, device);

    Ok(EditOutcome::Applied)
}

/// Append a VLAN sub-interface entry unless one for `vlan_id` exists
pub fn add_vlan_interface(
    doc: &mut ProfileDocument,
    ether_device: &str,
    mtu: u16,
    vlan_id: u16,
) -> Result<EditOutcome> {
    let vlan_device = vlan_device_name(vlan_id);

    if interface_exists(doc, &vlan_device)? {
        log::info!("Interface {} already exists, skipping", vlan_device);
        return Ok(EditOutcome::Skipped(SkipReason::AlreadyPresent));
    }

    let entry = InterfaceEntry::vlan(ether_device, mtu, vlan_id);
    doc.interfaces_mut()?.push_element(entry.to_element());
    log::info!(
        "Added interface {} on {} with MTU {}",
        vlan_device,
        ether_device,
        mtu
    );

    Ok(EditOutcome::Applied)
}
