//! Static routes in `networking/routing/routes`

use crate::document::{list_element, ProfileDocument};
use crate::error::ProfileError;
use crate::interface::vlan_device_name;
use crate::types::{EditOutcome, Element, QName, SkipReason};
use crate::Result;

/// Route entry as written into a profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub destination: String,
    pub device: String,
    pub gateway: String,
    pub netmask: String,
}

impl RouteEntry {
    pub fn new(destination: &str, device: &str, gateway: &str, netmask: &str) -> Self {
        Self {
            destination: destination.to_string(),
            device: device.to_string(),
            gateway: gateway.to_string(),
            netmask: netmask.to_string(),
        }
    }

    /// Render as a `route` element
    pub fn to_element(&self) -> Element {
        let mut element = Element::new(QName::yast("route"));
        for (name, value) in [
            ("destination", &self.destination),
            ("device", &self.device),
            ("gateway", &self.gateway),
            ("netmask", &self.netmask),
        ] {
            element.push_element(Element::with_text(QName::yast(name), value.as_str()));
        }
        element
    }

    pub fn from_element(element: &Element) -> Option<Self> {
        Some(Self {
            destination: element.field_text("destination")?,
            device: element.field_text("device")?,
            gateway: element.field_text("gateway")?,
            netmask: element.field_text("netmask")?,
        })
    }
}

/// Check whether a route through `device` exists
///
/// A profile without a `routes` list has no routes at all.
pub fn route_exists(doc: &ProfileDocument, device: &str) -> Result<bool> {
    let routing = doc.routing()?;
    let Some(routes) = routing.find("routes") else {
        return Ok(false);
    };

    Ok(routes
        .find_all("route")
        .any(|route| route.field_text("device").as_deref() == Some(device)))
}

/// Append a route through the VLAN sub-interface for `vlan_id`
///
/// The `routes` list is created when the routing section has none yet.
pub fn add_route(
    doc: &mut ProfileDocument,
    vlan_id: u16,
    destination: &str,
    gateway: &str,
    netmask: &str,
) -> Result<EditOutcome> {
    let device = vlan_device_name(vlan_id);

    if route_exists(doc, &device)? {
        log::info!("Route via {} already exists, skipping", device);
        return Ok(EditOutcome::Skipped(SkipReason::AlreadyPresent));
    }

    let routing = doc.routing_mut()?;
    if routing.find("routes").is_none() {
        log::debug!("Creating routes list in routing section");
        routing.push_element(list_element("routes"));
    }

    let routes = routing
        .find_mut("routes")
        .ok_or_else(|| ProfileError::not_found("routes"))?;
    routes.push_element(RouteEntry::new(destination, &device, gateway, netmask).to_element());
    log::info!(
        "Added route to {}/{} via {} on {}",
        destination,
        netmask,
        gateway,
        device
    );

    Ok(EditOutcome::Applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CONFIG_NS;

    const PROFILE: &str = r#"<profile xmlns="http://www.suse.com/1.0/yast2ns" xmlns:config="http://www.suse.com/1.0/configns">
  <networking>
    <interfaces config:type="list"/>
    <routing>
      <ipv4_forward config:type="boolean">false</ipv4_forward>
    </routing>
  </networking>
</profile>"#;

    fn routes(doc: &ProfileDocument) -> Vec<RouteEntry> {
        doc.routing()
            .unwrap()
            .find("routes")
            .map(|routes| {
                routes
                    .find_all("route")
                    .filter_map(RouteEntry::from_element)
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn test_add_route_creates_routes_list() {
        let mut doc = ProfileDocument::parse(PROFILE).unwrap();

        let outcome = add_route(&mut doc, 100, "0.0.0.0", "10.0.0.1", "0.0.0.0").unwrap();
        assert_eq!(outcome, EditOutcome::Applied);

        let routes_element = doc.routing().unwrap().find("routes").unwrap();
        assert_eq!(
            routes_element.attribute(&QName::new(Some(CONFIG_NS), "type")),
            Some("list")
        );
        assert_eq!(
            routes(&doc),
            vec![RouteEntry::new("0.0.0.0", "vlan.100", "10.0.0.1", "0.0.0.0")]
        );

        let output = doc.to_xml_string().unwrap();
        assert!(output.contains(r#"<routes config:type="list">"#));
    }

    #[test]
    fn test_add_route_is_idempotent() {
        let mut doc = ProfileDocument::parse(PROFILE).unwrap();

        add_route(&mut doc, 100, "0.0.0.0", "10.0.0.1", "0.0.0.0").unwrap();
        let outcome = add_route(&mut doc, 100, "10.1.0.0", "10.0.0.254", "255.255.0.0").unwrap();

        assert_eq!(outcome, EditOutcome::Skipped(SkipReason::AlreadyPresent));
        assert_eq!(routes(&doc).len(), 1);
        assert_eq!(routes(&doc)[0].gateway, "10.0.0.1");
    }

    #[test]
    fn test_add_route_appends_to_existing_list() {
        let content = r#"<profile xmlns="http://www.suse.com/1.0/yast2ns" xmlns:config="http://www.suse.com/1.0/configns">
  <networking>
    <routing>
      <routes config:type="list">
        <route>
          <destination>default</destination>
          <device>eth0</device>
          <gateway>192.168.1.1</gateway>
          <netmask>-</netmask>
        </route>
      </routes>
    </routing>
  </networking>
</profile>"#;
        let mut doc = ProfileDocument::parse(content).unwrap();

        add_route(&mut doc, 200, "10.200.0.0", "10.0.0.1", "255.255.0.0").unwrap();

        let all = routes(&doc);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].device, "eth0");
        assert_eq!(all[1].device, "vlan.200");
        assert_eq!(doc.routing().unwrap().find_all("routes").count(), 1);
    }

    #[test]
    fn test_missing_routing_section() {
        let content = r#"<profile xmlns="http://www.suse.com/1.0/yast2ns"><networking/></profile>"#;
        let mut doc = ProfileDocument::parse(content).unwrap();

        let err = add_route(&mut doc, 100, "0.0.0.0", "10.0.0.1", "0.0.0.0").unwrap_err();
        assert!(matches!(err, ProfileError::NotFound { ref element } if element == "routing"));
    }
}
