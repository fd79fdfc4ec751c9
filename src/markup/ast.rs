//! Syntax tree produced by the markup parser

/// Elements that never have children or a closing tag
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Check whether a (lowercase) tag name is a void element
pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// A single `name` or `name="value"` pair on a tag
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    /// `None` for boolean attributes such as `formatted`
    pub value: Option<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// The parsed contents of an opening tag
#[derive(Debug, Clone, PartialEq)]
pub struct TagHead {
    /// Lowercase tag name
    pub name: String,
    pub attributes: Vec<Attribute>,
    /// Tag was written as `<name ... />`
    pub self_closing: bool,
}

impl TagHead {
    /// Whether this tag opens an element that has no closing tag
    pub fn is_leaf(&self) -> bool {
        self.self_closing || is_void(&self.name)
    }

    /// Value of an attribute; boolean attributes yield an empty string
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_deref().unwrap_or(""))
    }
}

/// An element with its children
#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    pub head: TagHead,
    pub children: Vec<MarkupNode>,
}

/// A node in the parsed markup
#[derive(Debug, Clone, PartialEq)]
pub enum MarkupNode {
    Element(ElementNode),
    /// Character data, kept exactly as written
    Text(String),
    /// Comments and `<!...>` directives
    Raw(String),
}
