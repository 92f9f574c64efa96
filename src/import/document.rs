//! Source document tree.
//!
//! The interchange file is read once with quick-xml into an arena of
//! [`Node`]s. The walker and the deferred queues hold [`NodeId`]s into this
//! arena, so a pending reference costs one integer and never borrows the
//! tree.
//!
//! ## Namespaces
//!
//! ```xml
//! <xmi:XMI xmlns:xmi="http://www.omg.org/spec/XMI/20131001"
//!          xmlns:uml="http://www.omg.org/spec/UML/20131001">
//!   <uml:Model xmi:type="uml:Model" xmi:id="m1" name="Model">
//!     <packagedElement xmi:type="uml:Class" xmi:id="c1" name="A"/>
//!   </uml:Model>
//! </xmi:XMI>
//! ```
//!
//! - `uml:` tags and untyped containment slots carry document structure
//! - `diagram:` tags carry representation metadata
//! - `xmi:` attributes carry identity (`xmi:id`, `xmi:idref`, `xmi:type`),
//!   and `href="path#id"` carries cross-document references

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use rustc_hash::FxHashMap;

use super::error::{ImportError, ImportResult};

/// Index of a node in a [`Document`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// One XML element.
#[derive(Clone, Debug)]
pub struct Node {
    /// Qualified tag name, e.g. `packagedElement` or `uml:Model`.
    pub name: String,
    attrs: Vec<(String, String)>,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    /// Concatenated text content, if any.
    pub text: Option<String>,
}

impl Node {
    /// Tag prefix (`uml` in `uml:Model`).
    pub fn prefix(&self) -> Option<&str> {
        self.name.split_once(':').map(|(p, _)| p)
    }

    /// Tag name without prefix.
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Raw attribute value by qualified key.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// All attributes in document order.
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn xmi_id(&self) -> Option<&str> {
        self.attr("xmi:id")
    }

    pub fn xmi_idref(&self) -> Option<&str> {
        self.attr("xmi:idref")
    }

    /// Full `xmi:type` value, e.g. `uml:Class`.
    pub fn xmi_type(&self) -> Option<&str> {
        self.attr("xmi:type")
    }

    /// `xmi:type` without its prefix, e.g. `Class`.
    pub fn type_name(&self) -> Option<&str> {
        self.xmi_type().map(local_part)
    }

    pub fn href(&self) -> Option<&str> {
        self.attr("href")
    }

    /// A boolean attribute; absent and anything but `true` read as false.
    pub fn flag(&self, key: &str) -> bool {
        self.attr(key) == Some("true")
    }

    /// Non-empty `name` attribute.
    pub fn name_attr(&self) -> Option<&str> {
        self.attr("name").filter(|n| !n.is_empty())
    }
}

/// A reference read from an attribute or a reference child element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reference {
    /// Identifier of the referent (the href fragment for hrefs).
    pub id: String,
    /// Document part of an href, when the referent lives in another document.
    pub external: Option<String>,
}

impl Reference {
    fn local(id: &str) -> Self {
        Self {
            id: id.to_string(),
            external: None,
        }
    }

    /// Parse `path#fragment`; a bare `#fragment` is a same-document reference.
    pub fn from_href(href: &str) -> Option<Self> {
        let (path, fragment) = href.rsplit_once('#')?;
        if fragment.is_empty() {
            return None;
        }
        Some(Self {
            id: fragment.to_string(),
            external: (!path.is_empty()).then(|| path.to_string()),
        })
    }

    pub fn is_external(&self) -> bool {
        self.external.is_some()
    }
}

// ============================================================================
// DOCUMENT
// ============================================================================

/// Parsed interchange document.
#[derive(Clone, Debug)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    /// Declared XML namespaces on the root element (prefix -> URI).
    namespaces: FxHashMap<String, String>,
}

impl Document {
    /// Parse a document from bytes.
    pub fn parse(input: &[u8]) -> ImportResult<Self> {
        let mut reader = Reader::from_reader(input);
        reader.config_mut().trim_text(true);

        let mut nodes: Vec<Node> = Vec::new();
        let mut stack: Vec<NodeId> = Vec::new();
        let mut root: Option<NodeId> = None;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let id = open_node(&mut nodes, &stack, &mut root, e)?;
                    stack.push(id);
                }
                Ok(Event::Empty(ref e)) => {
                    open_node(&mut nodes, &stack, &mut root, e)?;
                }
                Ok(Event::End(_)) => {
                    stack.pop();
                }
                Ok(Event::Text(ref t)) => {
                    let text = t
                        .unescape()
                        .map_err(|e| ImportError::malformed(format!("text error: {e}")))?;
                    append_text(&mut nodes, &stack, &text);
                }
                Ok(Event::CData(ref c)) => {
                    let text = String::from_utf8_lossy(c.as_ref()).into_owned();
                    append_text(&mut nodes, &stack, &text);
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(ImportError::malformed(format!(
                        "XML parse error at position {}: {e}",
                        reader.error_position()
                    )));
                }
                _ => {}
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(ImportError::malformed("unexpected end of document"));
        }
        let root = root.ok_or_else(|| ImportError::malformed("document has no root element"))?;

        let namespaces = nodes[root.index()]
            .attrs
            .iter()
            .filter_map(|(k, v)| k.strip_prefix("xmlns:").map(|p| (p.to_string(), v.clone())))
            .collect();

        Ok(Self {
            nodes,
            root,
            namespaces,
        })
    }

    /// The root element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Number of element nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Namespace URI declared for `prefix` on the root element.
    pub fn namespace(&self, prefix: &str) -> Option<&str> {
        self.namespaces.get(prefix).map(String::as_str)
    }

    /// Direct children of `id` whose local tag name is `local`.
    pub fn children_named<'a>(
        &'a self,
        id: NodeId,
        local: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.node(id)
            .children
            .iter()
            .copied()
            .filter(move |c| self.node(*c).local_name() == local)
    }

    /// First direct child of `id` named `local`.
    pub fn first_child_named(&self, id: NodeId, local: &str) -> Option<NodeId> {
        self.children_named(id, local).next()
    }

    /// Every descendant of `id` named `local`, in document order.
    pub fn descendants_named(&self, id: NodeId, local: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.node(id).children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            let node = self.node(next);
            if node.local_name() == local {
                found.push(next);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        found
    }

    /// References held by `id` under `feature`.
    ///
    /// A reference feature appears either as a space-separated attribute
    /// (`general="c1"`, `memberEnd="p1 p2"`) or as child elements carrying
    /// `xmi:idref` or `href`. Attribute values come first, then children, each
    /// in document order.
    pub fn references(&self, id: NodeId, feature: &str) -> Vec<Reference> {
        let mut refs: Vec<Reference> = self
            .node(id)
            .attr(feature)
            .map(|v| v.split_whitespace().map(Reference::local).collect())
            .unwrap_or_default();

        for child in self.children_named(id, feature) {
            let node = self.node(child);
            if let Some(idref) = node.xmi_idref() {
                refs.push(Reference::local(idref));
            } else if let Some(r) = node.href().and_then(Reference::from_href) {
                refs.push(r);
            }
        }
        refs
    }

    /// First reference held by `id` under `feature`.
    pub fn reference(&self, id: NodeId, feature: &str) -> Option<Reference> {
        self.references(id, feature).into_iter().next()
    }

    /// Text of the first child named `local`, or the attribute of that name.
    pub fn text_or_attr(&self, id: NodeId, local: &str) -> Option<String> {
        self.node(id)
            .attr(local)
            .map(str::to_string)
            .or_else(|| {
                self.first_child_named(id, local)
                    .and_then(|c| self.node(c).text.clone())
            })
    }
}

fn open_node(
    nodes: &mut Vec<Node>,
    stack: &[NodeId],
    root: &mut Option<NodeId>,
    e: &BytesStart<'_>,
) -> ImportResult<NodeId> {
    let name = std::str::from_utf8(e.name().as_ref())
        .map_err(|e| ImportError::malformed(format!("invalid tag name: {e}")))?
        .to_string();

    let mut attrs = Vec::new();
    for attr_result in e.attributes() {
        let attr =
            attr_result.map_err(|e| ImportError::malformed(format!("attribute error: {e}")))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| ImportError::malformed(format!("attribute key error: {e}")))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| ImportError::malformed(format!("attribute value error: {e}")))?
            .to_string();
        attrs.push((key, value));
    }

    let id = NodeId(nodes.len() as u32);
    let parent = stack.last().copied();
    match parent {
        Some(p) => nodes[p.index()].children.push(id),
        None if root.is_some() => {
            return Err(ImportError::malformed(format!(
                "second top-level element <{name}>"
            )));
        }
        None => *root = Some(id),
    }

    nodes.push(Node {
        name,
        attrs,
        children: Vec::new(),
        parent,
        text: None,
    });
    Ok(id)
}

fn append_text(nodes: &mut [Node], stack: &[NodeId], text: &str) {
    if let Some(top) = stack.last() {
        let node = &mut nodes[top.index()];
        match &mut node.text {
            Some(existing) => existing.push_str(text),
            None => node.text = Some(text.to_string()),
        }
    }
}

fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}
