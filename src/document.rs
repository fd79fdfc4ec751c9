//! Document model: an arena of markup nodes addressed by stable ids
//!
//! Every element owns its presentation state (attributes, style declarations,
//! visibility) together with the template text captured on its first
//! resolution. Re-resolution always reads that captured template, never the
//! element's current payload.

use crate::error::{ParseError, SelectorError};
use crate::markup::{self, is_void, Attribute, ElementNode, MarkupNode, TagHead};

/// Attribute marking an element for template resolution
pub const FORMATTED_MARKER: &str = "formatted";

/// Generational identity of a node within a [`Document`]
///
/// Slots of released nodes are reused with a bumped generation, so a stale
/// id resolves to nothing rather than to the slot's new occupant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl NodeId {
    pub fn index(self) -> usize {
        self.index
    }
}

/// Whether an element is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Visible,
}

impl Visibility {
    pub fn as_css(self) -> &'static str {
        match self {
            Visibility::Hidden => "hidden",
            Visibility::Visible => "visible",
        }
    }
}

/// Which part of an element holds its template text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    /// The element's children, as markup
    InnerMarkup,
    /// The value of a form field (see [`Document::value`])
    Value,
}

/// Ordered inline style declarations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    declarations: Vec<(String, String)>,
}

impl Style {
    /// Parse the contents of a `style` attribute
    pub fn parse(text: &str) -> Self {
        let declarations = text
            .split(';')
            .filter_map(|decl| decl.split_once(':'))
            .map(|(name, value)| (name.trim().to_ascii_lowercase(), value.trim().to_string()))
            .filter(|(name, _)| !name.is_empty())
            .collect();
        Self { declarations }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    /// Set a declaration, replacing an existing one in place
    pub fn set(&mut self, property: &str, value: impl Into<String>) {
        let value = value.into();
        match self.declarations.iter_mut().find(|(name, _)| name == property) {
            Some(existing) => existing.1 = value,
            None => self.declarations.push((property.to_string(), value)),
        }
    }

    pub fn remove(&mut self, property: &str) -> Option<String> {
        let pos = self.declarations.iter().position(|(name, _)| name == property)?;
        Some(self.declarations.remove(pos).1)
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn to_css(&self) -> String {
        self.declarations
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// An element and its presentation state
#[derive(Debug, Clone)]
pub struct Element {
    /// Lowercase tag name
    pub tag: String,
    attributes: Vec<Attribute>,
    pub style: Style,
    pub visibility: Visibility,
    visibility_declared: bool,
    self_closing: bool,
    original_template: Option<String>,
}

impl Element {
    /// Create an empty element with the given tag
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attributes: Vec::new(),
            style: Style::default(),
            visibility: Visibility::Visible,
            visibility_declared: false,
            self_closing: false,
            original_template: None,
        }
    }

    fn from_head(head: TagHead) -> Self {
        let mut element = Element::new(head.name);
        element.self_closing = head.self_closing;

        for attr in head.attributes {
            if attr.name == "style" {
                element.style = Style::parse(attr.value.as_deref().unwrap_or(""));
            } else {
                element.attributes.push(attr);
            }
        }

        // Templated elements stay hidden until resolved
        let declared = element.style.remove("visibility");
        element.visibility_declared = declared.is_some();
        element.visibility = match declared {
            Some(value) if value.eq_ignore_ascii_case("hidden") => Visibility::Hidden,
            Some(_) => Visibility::Visible,
            None if element.is_templated() => Visibility::Hidden,
            None => Visibility::Visible,
        };

        element
    }

    /// Value of an attribute; boolean attributes yield an empty string
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_deref().unwrap_or(""))
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
    }

    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = Some(value.into());
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(attr) => attr.value = value,
            None => self.attributes.push(Attribute::new(name, value)),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attribute("class").unwrap_or("").split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Whether the field value lives in the text content, as for `<textarea>`
    pub fn holds_text_value(&self) -> bool {
        self.tag == "textarea"
    }

    /// Whether the element carries the `formatted` marker
    pub fn is_templated(&self) -> bool {
        self.has_attribute(FORMATTED_MARKER)
    }

    /// Template captured by the first resolution, if any
    pub fn original_template(&self) -> Option<&str> {
        self.original_template.as_deref()
    }

    /// Store `current` as the template on first call; later calls ignore it
    pub fn capture_template(&mut self, current: String) -> &str {
        self.original_template.get_or_insert(current)
    }

    fn write_open_tag(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for attr in &self.attributes {
            out.push(' ');
            out.push_str(&attr.name);
            if let Some(value) = &attr.value {
                out.push_str("=\"");
                out.push_str(&value.replace('"', "&quot;"));
                out.push('"');
            }
        }

        let mut style = self.style.clone();
        if self.is_templated() || self.visibility_declared {
            style.set("visibility", self.visibility.as_css());
        }
        if !style.is_empty() {
            out.push_str(" style=\"");
            out.push_str(&style.to_css().replace('"', "&quot;"));
            out.push('"');
        }

        out.push_str(if self.self_closing { " />" } else { ">" });
    }

    fn has_close_tag(&self) -> bool {
        !(self.self_closing || is_void(&self.tag))
    }
}

#[derive(Debug, Clone)]
enum NodeData {
    Root,
    Element(Element),
    Text(String),
    Raw(String),
    /// Released slot waiting for reuse
    Vacant,
}

#[derive(Debug, Clone)]
struct Node {
    generation: u32,
    data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A parsed page
///
/// Replacing an element's children releases the old subtree and its slots
/// are handed out again, so repeated re-resolution does not grow the arena.
/// Ids of released nodes stop resolving.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    free_list: Vec<usize>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                generation: 0,
                data: NodeData::Root,
                parent: None,
                children: Vec::new(),
            }],
            free_list: Vec::new(),
        }
    }

    /// Parse markup into a document
    pub fn parse(source: &str) -> Result<Self, Vec<ParseError>> {
        let nodes = markup::parse(source)?;
        let mut doc = Document::new();
        let root = doc.root();
        doc.append_markup(root, nodes);
        Ok(doc)
    }

    /// The synthetic node holding top-level content
    pub fn root(&self) -> NodeId {
        NodeId {
            index: 0,
            generation: 0,
        }
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .get(id.index)
            .filter(|node| node.generation == id.generation)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.index)
            .filter(|node| node.generation == id.generation)
    }

    fn alloc(&mut self, parent: Option<NodeId>, data: NodeData) -> NodeId {
        match self.free_list.pop() {
            Some(index) => {
                let node = &mut self.nodes[index];
                node.data = data;
                node.parent = parent;
                NodeId {
                    index,
                    generation: node.generation,
                }
            }
            None => {
                self.nodes.push(Node {
                    generation: 0,
                    data,
                    parent,
                    children: Vec::new(),
                });
                NodeId {
                    index: self.nodes.len() - 1,
                    generation: 0,
                }
            }
        }
    }

    /// Allocate a node and link it as child number `index` of `parent`
    ///
    /// A stale `parent` yields a detached node.
    fn insert_node(&mut self, parent: NodeId, index: Option<usize>, data: NodeData) -> NodeId {
        if self.node(parent).is_none() {
            return self.alloc(None, data);
        }
        let id = self.alloc(Some(parent), data);
        if let Some(node) = self.node_mut(parent) {
            let index = index.unwrap_or(node.children.len()).min(node.children.len());
            node.children.insert(index, id);
        }
        id
    }

    /// Return a subtree's slots to the free list
    fn release(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let Some(node) = self.node_mut(next) else {
                continue;
            };
            node.generation = node.generation.wrapping_add(1);
            node.data = NodeData::Vacant;
            node.parent = None;
            stack.extend(std::mem::take(&mut node.children));
            self.free_list.push(next.index);
        }
    }

    fn clear_children(&mut self, id: NodeId) {
        let Some(node) = self.node_mut(id) else {
            return;
        };
        for child in std::mem::take(&mut node.children) {
            self.release(child);
        }
    }

    fn append_markup(&mut self, parent: NodeId, nodes: Vec<MarkupNode>) {
        for node in nodes {
            match node {
                MarkupNode::Element(ElementNode { head, children }) => {
                    let id = self.append_element(parent, Element::from_head(head));
                    self.append_markup(id, children);
                }
                MarkupNode::Text(text) => {
                    self.append_text(parent, text);
                }
                MarkupNode::Raw(raw) => {
                    self.insert_node(parent, None, NodeData::Raw(raw));
                }
            }
        }
    }

    /// Append an element as the last child of `parent`
    pub fn append_element(&mut self, parent: NodeId, element: Element) -> NodeId {
        self.insert_node(parent, None, NodeData::Element(element))
    }

    /// Insert an element as child number `index` of `parent`
    pub fn insert_element(&mut self, parent: NodeId, index: usize, element: Element) -> NodeId {
        self.insert_node(parent, Some(index), NodeData::Element(element))
    }

    /// Append a text node as the last child of `parent`
    pub fn append_text(&mut self, parent: NodeId, text: impl Into<String>) -> NodeId {
        self.insert_node(parent, None, NodeData::Text(text.into()))
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.node(id)?.data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.node_mut(id)?.data {
            NodeData::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Children of a node; empty for a released id
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    /// Whether the node is still reachable from the root
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            match self.node(current).map(|node| node.parent) {
                Some(Some(parent)) => current = parent,
                Some(None) => return current == self.root(),
                None => return false,
            }
        }
    }

    /// All descendants of `id` in document order
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    fn elements(&self) -> impl Iterator<Item = (NodeId, &Element)> + '_ {
        self.descendants(self.root())
            .into_iter()
            .filter_map(move |id| self.element(id).map(|el| (id, el)))
    }

    /// Every element with the given tag, in document order
    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.elements()
            .filter(|(_, el)| el.tag.eq_ignore_ascii_case(tag))
            .map(|(id, _)| id)
            .collect()
    }

    /// First element whose `id` attribute matches
    pub fn element_by_id(&self, element_id: &str) -> Option<NodeId> {
        self.elements()
            .find(|(_, el)| el.id() == Some(element_id))
            .map(|(id, _)| id)
    }

    /// Every element carrying all classes of a whitespace-separated list
    pub fn elements_by_class(&self, selector: &str) -> Result<Vec<NodeId>, SelectorError> {
        let wanted: Vec<&str> = selector.split_whitespace().collect();
        if wanted.is_empty() {
            return Err(SelectorError::EmptyClassName);
        }
        if let Some(bad) = wanted
            .iter()
            .find(|c| !c.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'))
        {
            return Err(SelectorError::InvalidClassName {
                selector: selector.to_string(),
                name: bad.to_string(),
            });
        }

        Ok(self
            .elements()
            .filter(|(_, el)| wanted.iter().all(|c| el.has_class(c)))
            .map(|(id, _)| id)
            .collect())
    }

    /// The `head` element, created when the markup has none
    pub fn ensure_head(&mut self) -> NodeId {
        if let Some(head) = self.elements_by_tag("head").first() {
            return *head;
        }
        let parent = self
            .elements_by_tag("html")
            .first()
            .copied()
            .unwrap_or_else(|| self.root());
        self.insert_element(parent, 0, Element::new("head"))
    }

    /// Serialized children of a node
    pub fn inner_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(id) {
            self.write_node(*child, &mut out);
        }
        out
    }

    /// Serialized node including its own tag
    pub fn outer_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    /// Serialize the whole document
    pub fn to_markup(&self) -> String {
        self.inner_markup(self.root())
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        match &node.data {
            NodeData::Vacant => {}
            NodeData::Root => {
                for child in self.children(id) {
                    self.write_node(*child, out);
                }
            }
            NodeData::Text(text) | NodeData::Raw(text) => out.push_str(text),
            NodeData::Element(el) => {
                el.write_open_tag(out);
                if el.has_close_tag() {
                    for child in self.children(id) {
                        self.write_node(*child, out);
                    }
                    out.push_str("</");
                    out.push_str(&el.tag);
                    out.push('>');
                }
            }
        }
    }

    /// Replace the children of `id` with freshly parsed markup
    ///
    /// Markup that does not parse is kept verbatim as a single text node.
    pub fn set_inner_markup(&mut self, id: NodeId, markup_text: &str) {
        if self.node(id).is_none() {
            return;
        }
        self.clear_children(id);
        match markup::parse(markup_text) {
            Ok(nodes) => self.append_markup(id, nodes),
            Err(errors) => {
                log::debug!(
                    "keeping unparsable markup as text ({} parse errors)",
                    errors.len()
                );
                self.append_text(id, markup_text);
            }
        }
    }

    /// Value of a form field: the text content of a `<textarea>`, the
    /// `value` attribute otherwise
    pub fn value(&self, id: NodeId) -> Option<String> {
        let el = self.element(id)?;
        if el.holds_text_value() {
            Some(self.inner_markup(id))
        } else {
            el.attribute("value").map(str::to_string)
        }
    }

    pub fn set_value(&mut self, id: NodeId, value: impl Into<String>) {
        match self.element(id).map(Element::holds_text_value) {
            Some(true) => {
                self.clear_children(id);
                self.append_text(id, value);
            }
            Some(false) => {
                if let Some(el) = self.element_mut(id) {
                    el.set_attribute("value", value);
                }
            }
            None => {}
        }
    }

    /// Current payload of an element
    pub fn payload(&self, id: NodeId, payload: Payload) -> String {
        match payload {
            Payload::InnerMarkup => self.inner_markup(id),
            Payload::Value => self.value(id).unwrap_or_default(),
        }
    }

    pub fn set_payload(&mut self, id: NodeId, payload: Payload, text: &str) {
        match payload {
            Payload::InnerMarkup => self.set_inner_markup(id, text),
            Payload::Value => self.set_value(id, text),
        }
    }

    /// Template of an element: captured from its payload on first use,
    /// returned unchanged afterwards
    pub fn capture_template(&mut self, id: NodeId, payload: Payload) -> Option<String> {
        let current = match self.element(id)?.original_template() {
            Some(template) => return Some(template.to_string()),
            None => self.payload(id, payload),
        };
        let el = self.element_mut(id)?;
        Some(el.capture_template(current).to_string())
    }

    /// Reveal an element
    pub fn show(&mut self, id: NodeId) {
        if let Some(el) = self.element_mut(id) {
            el.visibility = Visibility::Visible;
        }
    }

    /// Reveal the element with the given id; `false` if there is none
    pub fn show_by_id(&mut self, element_id: &str) -> bool {
        match self.element_by_id(element_id) {
            Some(id) => {
                self.show(id);
                true
            }
            None => false,
        }
    }
}
