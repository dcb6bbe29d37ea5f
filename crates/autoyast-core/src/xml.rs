//! XML reading and writing for profile documents
//!
//! Element and attribute names are stored expanded, so prefixes used in the
//! source document do not matter once it is loaded. When writing, the AutoYaST
//! content namespace becomes the default namespace and the type annotation
//! namespace is bound to `config`, which is what the installer emits itself.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::{PrefixDeclaration, ResolveResult};
use quick_xml::{NsReader, Writer};

use crate::error::ProfileError;
use crate::types::{Element, Node, QName, CONFIG_NS, CONFIG_PREFIX, YAST2_NS};
use crate::Result;

/// Parse document content into its root element
pub fn parse_document(content: &str) -> Result<Element> {
    let mut reader = NsReader::from_str(content);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let (resolved, event) = reader.read_resolved_event()?;
        let namespace = owned_namespace(resolved)?;

        match event {
            Event::Start(start) => {
                let element = build_element(&reader, namespace, &start)?;
                stack.push(element);
            }
            Event::Empty(start) => {
                let element = build_element(&reader, namespace, &start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| ProfileError::parse("unexpected closing tag"))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                push_text(&mut stack, &text)?;
            }
            Event::CData(data) => {
                let text = utf8(&data)?;
                push_text(&mut stack, text)?;
            }
            Event::Comment(comment) => {
                if let Some(parent) = stack.last_mut() {
                    parent.children.push(Node::Comment(utf8(&comment)?.to_string()));
                }
            }
            Event::Eof => break,
            // Declaration, DOCTYPE and processing instructions are regenerated
            // or dropped on write.
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ProfileError::parse(format!(
            "unclosed element {}",
            open.name
        )));
    }

    root.ok_or_else(|| ProfileError::parse("document has no root element"))
}

/// Serialize a root element into a complete document
pub fn serialize_document(root: &Element) -> Result<String> {
    let prefixes = PrefixMap::collect(root);
    let mut writer = Writer::new(Vec::new());

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
        .map_err(write_error)?;
    writer
        .write_event(Event::Text(BytesText::new("\n")))
        .map_err(write_error)?;
    write_element(&mut writer, root, &prefixes, true)?;
    writer
        .write_event(Event::Text(BytesText::new("\n")))
        .map_err(write_error)?;

    String::from_utf8(writer.into_inner())
        .map_err(|e| ProfileError::serialize(format!("output is not UTF-8: {}", e)))
}

fn build_element(
    reader: &NsReader<&[u8]>,
    namespace: Option<String>,
    start: &BytesStart<'_>,
) -> Result<Element> {
    let local_name = start.local_name();
    let mut element = Element::new(QName {
        namespace,
        local: utf8(local_name.as_ref())?.to_string(),
    });

    for attr in start.attributes() {
        let attr = attr?;

        if let Some(binding) = attr.key.as_namespace_binding() {
            let prefix = match binding {
                PrefixDeclaration::Default => String::new(),
                PrefixDeclaration::Named(prefix) => utf8(prefix)?.to_string(),
            };
            let uri = attr.unescape_value()?.into_owned();
            element.prefixes.push((prefix, uri));
            continue;
        }

        let (resolved, local) = reader.resolve_attribute(attr.key);
        let name = QName {
            namespace: owned_namespace(resolved)?,
            local: utf8(local.as_ref())?.to_string(),
        };
        let value = attr.unescape_value()?.into_owned();
        element.attributes.push((name, value));
    }

    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.push_element(element),
        None => {
            if root.is_some() {
                return Err(ProfileError::parse("document has more than one root element"));
            }
            *root = Some(element);
        }
    }
    Ok(())
}

fn push_text(stack: &mut [Element], text: &str) -> Result<()> {
    let Some(parent) = stack.last_mut() else {
        if text.trim().is_empty() {
            return Ok(());
        }
        return Err(ProfileError::parse("text content outside of root element"));
    };

    match parent.children.last_mut() {
        Some(Node::Text(previous)) => previous.push_str(text),
        _ => parent.children.push(Node::Text(text.to_string())),
    }
    Ok(())
}

fn owned_namespace(resolved: ResolveResult<'_>) -> Result<Option<String>> {
    match resolved {
        ResolveResult::Bound(ns) => Ok(Some(utf8(ns.as_ref())?.to_string())),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(ProfileError::parse(format!(
            "unknown namespace prefix '{}'",
            String::from_utf8_lossy(&prefix)
        ))),
    }
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| ProfileError::parse(format!("invalid UTF-8: {}", e)))
}

fn write_error<E: std::fmt::Display>(err: E) -> ProfileError {
    ProfileError::serialize(err.to_string())
}

/// Prefix assignment for every non-default namespace in use
#[derive(Debug, Default)]
struct PrefixMap {
    assigned: Vec<(String, String)>,
}

impl PrefixMap {
    fn collect(root: &Element) -> Self {
        let mut source_prefixes = Vec::new();
        gather_source_prefixes(root, &mut source_prefixes);

        let mut map = PrefixMap::default();
        map.visit(root, &source_prefixes);
        map
    }

    fn visit(&mut self, element: &Element, source_prefixes: &[(String, String)]) {
        if let Some(ns) = &element.name.namespace {
            if ns != YAST2_NS {
                self.assign(ns, source_prefixes);
            }
        }
        // Attributes never pick up the default namespace, so even the content
        // namespace needs a prefix there.
        for (name, _) in &element.attributes {
            if let Some(ns) = &name.namespace {
                self.assign(ns, source_prefixes);
            }
        }
        for child in element.elements() {
            self.visit(child, source_prefixes);
        }
    }

    fn assign(&mut self, namespace: &str, source_prefixes: &[(String, String)]) {
        if self.prefix(namespace).is_some() {
            return;
        }

        let prefix = if namespace == CONFIG_NS {
            CONFIG_PREFIX.to_string()
        } else {
            source_prefixes
                .iter()
                .find(|(prefix, uri)| {
                    uri == namespace
                        && !prefix.is_empty()
                        && prefix != CONFIG_PREFIX
                        && !self.assigned.iter().any(|(_, taken)| taken == prefix)
                })
                .map(|(prefix, _)| prefix.clone())
                .unwrap_or_else(|| self.generated_prefix())
        };

        self.assigned.push((namespace.to_string(), prefix));
    }

    fn generated_prefix(&self) -> String {
        let mut index = 0;
        loop {
            let candidate = format!("ns{}", index);
            if !self.assigned.iter().any(|(_, taken)| *taken == candidate) {
                return candidate;
            }
            index += 1;
        }
    }

    fn prefix(&self, namespace: &str) -> Option<&str> {
        self.assigned
            .iter()
            .find(|(ns, _)| ns == namespace)
            .map(|(_, prefix)| prefix.as_str())
    }

    fn element_name(&self, name: &QName) -> Result<String> {
        match name.namespace.as_deref() {
            Some(YAST2_NS) => Ok(name.local.clone()),
            Some(ns) => match self.prefix(ns) {
                Some(prefix) => Ok(format!("{}:{}", prefix, name.local)),
                None => Err(ProfileError::serialize(format!(
                    "no prefix bound for namespace {}",
                    ns
                ))),
            },
            None => Err(ProfileError::serialize(format!(
                "element '{}' has no namespace and cannot be written under the default namespace",
                name.local
            ))),
        }
    }

    fn attribute_name(&self, name: &QName) -> Result<String> {
        match name.namespace.as_deref() {
            None => Ok(name.local.clone()),
            Some(ns) => match self.prefix(ns) {
                Some(prefix) => Ok(format!("{}:{}", prefix, name.local)),
                None => Err(ProfileError::serialize(format!(
                    "no prefix bound for namespace {}",
                    ns
                ))),
            },
        }
    }
}

fn gather_source_prefixes(element: &Element, out: &mut Vec<(String, String)>) {
    out.extend(element.prefixes.iter().cloned());
    for child in element.elements() {
        gather_source_prefixes(child, out);
    }
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    element: &Element,
    prefixes: &PrefixMap,
    is_root: bool,
) -> Result<()> {
    let name = prefixes.element_name(&element.name)?;
    let mut start = BytesStart::new(name.as_str());

    if is_root {
        start.push_attribute(("xmlns", YAST2_NS));
        for (ns, prefix) in &prefixes.assigned {
            let key = format!("xmlns:{}", prefix);
            start.push_attribute((key.as_str(), ns.as_str()));
        }
    }

    for (key, value) in &element.attributes {
        let key = prefixes.attribute_name(key)?;
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(write_error);
    }

    writer.write_event(Event::Start(start)).map_err(write_error)?;
    for child in &element.children {
        match child {
            Node::Element(child) => write_element(writer, child, prefixes, false)?,
            Node::Text(text) => writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(write_error)?,
            Node::Comment(comment) => writer
                .write_event(Event::Comment(BytesText::from_escaped(comment.as_str())))
                .map_err(write_error)?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(name.as_str())))
        .map_err(write_error)
}
