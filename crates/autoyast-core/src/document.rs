//! AutoYaST profile document

use std::fs;
use std::path::Path;

use crate::error::ProfileError;
use crate::types::{Element, QName, CONFIG_NS};
use crate::xml;
use crate::Result;

/// Loaded AutoYaST profile
///
/// The document is owned by a single editor for its whole lifetime: it is
/// loaded once, mutated through the functions in [`crate::interface`] and
/// [`crate::route`], and written once.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileDocument {
    root: Element,
}

impl ProfileDocument {
    /// Load a profile from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading profile from {}", path.display());

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse profile content
    pub fn parse(content: &str) -> Result<Self> {
        let root = xml::parse_document(content)?;
        let document = Self { root };

        // Reject documents without a networking section up front.
        document.networking()?;
        Ok(document)
    }

    /// Write the profile to disk
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = self.to_xml_string()?;
        fs::write(path, content)?;

        log::info!("Wrote profile to {}", path.display());
        Ok(())
    }

    /// Serialize the profile with the content namespace as default
    pub fn to_xml_string(&self) -> Result<String> {
        xml::serialize_document(&self.root)
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// The `networking` section
    pub fn networking(&self) -> Result<&Element> {
        self.root
            .find("networking")
            .ok_or_else(|| ProfileError::not_found("networking"))
    }

    pub fn networking_mut(&mut self) -> Result<&mut Element> {
        self.root
            .find_mut("networking")
            .ok_or_else(|| ProfileError::not_found("networking"))
    }

    /// The `networking/interfaces` list
    pub fn interfaces(&self) -> Result<&Element> {
        self.networking()?
            .find("interfaces")
            .ok_or_else(|| ProfileError::not_found("interfaces"))
    }

    pub fn interfaces_mut(&mut self) -> Result<&mut Element> {
        self.networking_mut()?
            .find_mut("interfaces")
            .ok_or_else(|| ProfileError::not_found("interfaces"))
    }

    /// The `networking/routing` section
    pub fn routing(&self) -> Result<&Element> {
        self.networking()?
            .find("routing")
            .ok_or_else(|| ProfileError::not_found("routing"))
    }

    pub fn routing_mut(&mut self) -> Result<&mut Element> {
        self.networking_mut()?
            .find_mut("routing")
            .ok_or_else(|| ProfileError::not_found("routing"))
    }
}

/// Empty list container such as `<routes config:type="list"/>`
pub(crate) fn list_element(local: &str) -> Element {
    Element::new(QName::yast(local))
        .with_attribute(QName::new(Some(CONFIG_NS), "type"), "list")
}
