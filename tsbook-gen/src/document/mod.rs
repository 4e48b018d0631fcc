//! In-memory markup document
//!
//! The converter's HTML output is parsed with html5ever into an `RcDom` tree.
//! [`NodeRef`] wraps a tree handle with the lookups and edits the linker and
//! the post-processing steps need. Text held in the tree is decoded, and the
//! serializer escapes it again on output.

use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{parse_document, Attribute, LocalName, Namespace, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io;
use std::rc::Rc;
use thiserror::Error;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Input that cannot be loaded as a document
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Malformed markup: {reason}")]
pub struct ParseError {
    pub reason: String,
}

impl ParseError {
    fn new(reason: &str) -> Self {
        Self {
            reason: reason.to_string(),
        }
    }
}

/// Shared handle to one node of a [`Document`]
///
/// Equality and hashing are by node identity, not content.
#[derive(Clone)]
pub struct NodeRef(Handle);

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for NodeRef {}

impl Hash for NodeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.0) as usize).hash(state);
    }
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.data {
            NodeData::Element { name, .. } => write!(f, "<{}>", &*name.local),
            NodeData::Text { contents } => write!(f, "{:?}", &**contents.borrow()),
            NodeData::Document => f.write_str("#document"),
            _ => f.write_str("#other"),
        }
    }
}

impl NodeRef {
    /// Create a detached HTML element
    pub fn new_element(name: &str, attrs: &[(&str, &str)]) -> Self {
        let attrs = attrs
            .iter()
            .map(|(name, value)| attribute(name, value))
            .collect();
        Self(Node::new(NodeData::Element {
            name: QualName::new(
                None,
                Namespace::from(HTML_NAMESPACE),
                LocalName::from(name.to_ascii_lowercase()),
            ),
            attrs: RefCell::new(attrs),
            template_contents: RefCell::new(None),
            mathml_annotation_xml_integration_point: false,
        }))
    }

    /// Create a detached text node holding plain (unescaped) text
    pub fn new_text(text: &str) -> Self {
        Self(Node::new(NodeData::Text {
            contents: RefCell::new(StrTendril::from_slice(text)),
        }))
    }

    /// Lowercase tag name, for elements
    pub fn name(&self) -> Option<&str> {
        match &self.0.data {
            NodeData::Element { name, .. } => Some(&*name.local),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        self.name().is_some()
    }

    /// Whether this is an element named `name`
    pub fn is(&self, name: &str) -> bool {
        self.name() == Some(name)
    }

    pub fn attr(&self, name: &str) -> Option<String> {
        match &self.0.data {
            NodeData::Element { attrs, .. } => attrs
                .borrow()
                .iter()
                .find(|a| &*a.name.local == name)
                .map(|a| a.value.to_string()),
            _ => None,
        }
    }

    pub fn id(&self) -> Option<String> {
        self.attr("id")
    }

    /// Whether the whitespace-separated class list contains `class`
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|v| v.split_ascii_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Decoded character data, for text nodes
    pub fn text(&self) -> Option<String> {
        match &self.0.data {
            NodeData::Text { contents } => Some(contents.borrow().to_string()),
            _ => None,
        }
    }

    /// Level of an `h1` to `h6` element
    pub fn heading_level(&self) -> Option<u8> {
        match self.name()? {
            "h1" => Some(1),
            "h2" => Some(2),
            "h3" => Some(3),
            "h4" => Some(4),
            "h5" => Some(5),
            "h6" => Some(6),
            _ => None,
        }
    }

    pub fn parent(&self) -> Option<NodeRef> {
        let weak = self.0.parent.take()?;
        let parent = weak.upgrade();
        self.0.parent.set(Some(weak));
        parent.map(NodeRef)
    }

    pub fn children(&self) -> Vec<NodeRef> {
        self.0.children.borrow().iter().cloned().map(NodeRef).collect()
    }

    /// Ancestors, nearest first, ending at the document root
    pub fn ancestors(&self) -> Vec<NodeRef> {
        let mut chain = Vec::new();
        let mut current = self.parent();
        while let Some(parent) = current {
            current = parent.parent();
            chain.push(parent);
        }
        chain
    }

    /// Whether this node is `container` or lies inside it
    pub fn is_within(&self, container: &NodeRef) -> bool {
        self == container || self.ancestors().contains(container)
    }

    /// All nodes below this one in document order (excluding itself)
    pub fn descendants(&self) -> Vec<NodeRef> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeRef> = self.children().into_iter().rev().collect();
        while let Some(next) = stack.pop() {
            stack.extend(next.children().into_iter().rev());
            out.push(next);
        }
        out
    }

    /// Next sibling element, skipping text and comments
    pub fn next_element_sibling(&self) -> Option<NodeRef> {
        let parent = self.parent()?;
        let siblings = parent.children();
        let index = siblings.iter().position(|s| s == self)?;
        siblings[index + 1..].iter().find(|s| s.is_element()).cloned()
    }

    /// Concatenated text of everything below this node
    pub fn text_content(&self) -> String {
        self.descendants()
            .iter()
            .filter_map(NodeRef::text)
            .collect()
    }

    /// Set (or replace) an attribute
    pub fn set_attribute(&self, name: &str, value: &str) {
        if let NodeData::Element { attrs, .. } = &self.0.data {
            let mut attrs = attrs.borrow_mut();
            match attrs.iter_mut().find(|a| &*a.name.local == name) {
                Some(existing) => existing.value = StrTendril::from_slice(value),
                None => attrs.push(attribute(name, value)),
            }
        }
    }

    /// Remove this node from its parent
    pub fn detach(&self) {
        if let Some(weak) = self.0.parent.take() {
            if let Some(parent) = weak.upgrade() {
                parent.children.borrow_mut().retain(|c| !Rc::ptr_eq(c, &self.0));
            }
        }
    }

    pub fn append(&self, child: &NodeRef) {
        self.attach(None, child);
    }

    pub fn prepend(&self, child: &NodeRef) {
        self.attach(Some(0), child);
    }

    /// Insert `new` as the next sibling of this node
    pub fn insert_after(&self, new: &NodeRef) {
        let Some(parent) = self.parent() else {
            return;
        };
        new.detach();
        if let Some(index) = parent.position_of(self) {
            parent.attach(Some(index + 1), new);
        }
    }

    /// Put `replacements`, in order, where this node was
    pub fn replace_with(&self, replacements: &[NodeRef]) {
        let Some(parent) = self.parent() else {
            return;
        };
        let Some(index) = parent.position_of(self) else {
            return;
        };
        self.detach();
        for (offset, node) in replacements.iter().enumerate() {
            parent.attach(Some(index + offset), node);
        }
    }

    fn position_of(&self, child: &NodeRef) -> Option<usize> {
        self.0
            .children
            .borrow()
            .iter()
            .position(|c| Rc::ptr_eq(c, &child.0))
    }

    /// Attach `child` at `index`, or last when `index` is `None`
    fn attach(&self, index: Option<usize>, child: &NodeRef) {
        child.detach();
        child.0.parent.set(Some(Rc::downgrade(&self.0)));
        let mut children = self.0.children.borrow_mut();
        match index {
            Some(index) if index <= children.len() => children.insert(index, child.0.clone()),
            _ => children.push(child.0.clone()),
        }
    }
}

fn attribute(name: &str, value: &str) -> Attribute {
    Attribute {
        name: QualName::new(None, Namespace::from(""), LocalName::from(name)),
        value: StrTendril::from_slice(value),
    }
}

/// A text node together with its ancestor chain (nearest first)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLeaf {
    pub node: NodeRef,
    pub ancestors: Vec<NodeRef>,
}

/// Parsed document tree
#[derive(Debug, Clone)]
pub struct Document {
    root: NodeRef,
}

impl Document {
    /// Parse markup into a tree
    ///
    /// html5ever repairs damaged structure the way browsers do. Input that
    /// holds no markup at all is rejected.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        if input.trim().is_empty() {
            return Err(ParseError::new("document is empty"));
        }
        if !input.contains('<') {
            return Err(ParseError::new("no markup found"));
        }
        let dom = parse_document(RcDom::default(), ParseOpts::default()).one(input);
        Ok(Self {
            root: NodeRef(dom.document),
        })
    }

    /// Serialize the tree to HTML
    pub fn to_html(&self) -> io::Result<String> {
        let mut out = Vec::new();
        let handle: SerializableHandle = self.root.0.clone().into();
        serialize(
            &mut out,
            &handle,
            SerializeOpts {
                traversal_scope: TraversalScope::ChildrenOnly(None),
                ..Default::default()
            },
        )?;
        String::from_utf8(out).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    /// Elements satisfying `predicate`, in document order
    pub fn find_elements<F>(&self, predicate: F) -> Vec<NodeRef>
    where
        F: Fn(&NodeRef) -> bool,
    {
        self.root
            .descendants()
            .into_iter()
            .filter(|node| node.is_element() && predicate(node))
            .collect()
    }

    /// First element whose id attribute equals `id`
    pub fn find_by_id(&self, id: &str) -> Option<NodeRef> {
        self.root
            .descendants()
            .into_iter()
            .find(|node| node.id().as_deref() == Some(id))
    }

    /// First element named `name`
    pub fn find_first(&self, name: &str) -> Option<NodeRef> {
        self.root.descendants().into_iter().find(|node| node.is(name))
    }

    /// Paragraph and list item elements in document order
    pub fn content_blocks(&self) -> Vec<NodeRef> {
        self.find_elements(|el| el.is("p") || el.is("li"))
    }

    /// Text nodes below `block` in document order, with their ancestors
    pub fn text_leaves(&self, block: &NodeRef) -> Vec<TextLeaf> {
        block
            .descendants()
            .into_iter()
            .filter(|node| node.text().is_some())
            .map(|node| TextLeaf {
                ancestors: node.ancestors(),
                node,
            })
            .collect()
    }
}
