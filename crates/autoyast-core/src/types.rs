//! Core profile types and data structures

use std::fmt;

/// Namespace of AutoYaST profile content
pub const YAST2_NS: &str = "http://www.suse.com/1.0/yast2ns";

/// Namespace of AutoYaST type annotations (`config:type="list"`)
pub const CONFIG_NS: &str = "http://www.suse.com/1.0/configns";

/// Prefix registered for [`CONFIG_NS`] when writing
pub const CONFIG_PREFIX: &str = "config";

/// Expanded element or attribute name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub namespace: Option<String>,
    pub local: String,
}

impl QName {
    pub fn new(namespace: Option<&str>, local: &str) -> Self {
        Self {
            namespace: namespace.map(str::to_string),
            local: local.to_string(),
        }
    }

    /// Name in the AutoYaST content namespace
    pub fn yast(local: &str) -> Self {
        Self::new(Some(YAST2_NS), local)
    }

    /// Name without namespace
    pub fn local(local: &str) -> Self {
        Self::new(None, local)
    }

    pub fn is(&self, namespace: &str, local: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.local == local
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local),
            None => write!(f, "{}", self.local),
        }
    }
}

/// Child node of an element
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

/// XML element with ordered children
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: QName,
    pub attributes: Vec<(QName, String)>,
    pub children: Vec<Node>,
    /// Prefixes declared on this element in the source document
    pub prefixes: Vec<(String, String)>,
}

impl Element {
    pub fn new(name: QName) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            children: Vec::new(),
            prefixes: Vec::new(),
        }
    }

    /// Create a leaf element holding only text
    pub fn with_text(name: QName, text: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.children.push(Node::Text(text.into()));
        element
    }

    pub fn with_attribute(mut self, name: QName, value: impl Into<String>) -> Self {
        self.attributes.push((name, value.into()));
        self
    }

    pub fn attribute(&self, name: &QName) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Iterate over child elements
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// First child element with the given content-namespace tag
    pub fn find(&self, local: &str) -> Option<&Element> {
        self.elements().find(|e| e.name.is(YAST2_NS, local))
    }

    pub fn find_mut(&mut self, local: &str) -> Option<&mut Element> {
        self.elements_mut().find(|e| e.name.is(YAST2_NS, local))
    }

    /// All child elements with the given content-namespace tag
    pub fn find_all<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |e| e.name.is(YAST2_NS, local))
    }

    pub fn find_all_mut<'a>(
        &'a mut self,
        local: &'a str,
    ) -> impl Iterator<Item = &'a mut Element> {
        self.elements_mut().filter(move |e| e.name.is(YAST2_NS, local))
    }

    /// Concatenated direct text content
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Text of a child field such as `device` or `mtu`
    pub fn field_text(&self, local: &str) -> Option<String> {
        self.find(local).map(Element::text)
    }

    pub fn has_field(&self, local: &str) -> bool {
        self.find(local).is_some()
    }

    pub fn push_element(&mut self, element: Element) {
        self.children.push(Node::Element(element));
    }
}

/// Result of a single profile edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The document was changed
    Applied,
    /// The document was left untouched
    Skipped(SkipReason),
}

/// Why an edit was a no-op
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The entry or field already exists
    AlreadyPresent,
    /// No interface carries the requested device
    DeviceNotFound,
}

impl EditOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, EditOutcome::Applied)
    }
}

impl fmt::Display for EditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditOutcome::Applied => write!(f, "applied"),
            EditOutcome::Skipped(SkipReason::AlreadyPresent) => {
                write!(f, "skipped (already present)")
            }
            EditOutcome::Skipped(SkipReason::DeviceNotFound) => {
                write!(f, "skipped (device not found)")
            }
        }
    }
}
