//! Tree node model.
//!
//! Nodes live in a single arena per parsed [`Document`] and are addressed by
//! [`NodeId`] rather than by pointer or `Rc<RefCell<_>>`. This keeps the
//! annotation side-table (`crate::annotation::Annotations`) decoupled from
//! node lifetimes: annotations are just parallel maps keyed by the same
//! small integer index used to address the tree.

use std::collections::BTreeMap;

/// Index into a [`NodeArena`]. Stable for the lifetime of one parsed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Text content as it will be serialized. Plain text is escaped normally;
/// CDATA content is rendered via the CDATA-safe splitting algorithm
/// (`crate::cdata`) and never escapes `&`, `<`, `>`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TextContent {
    #[default]
    Empty,
    Plain(String),
    Cdata(String),
}

impl TextContent {
    pub fn is_empty(&self) -> bool {
        match self {
            TextContent::Empty => true,
            TextContent::Plain(s) => s.is_empty(),
            TextContent::Cdata(s) => s.is_empty(),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TextContent::Empty => "",
            TextContent::Plain(s) => s,
            TextContent::Cdata(s) => s,
        }
    }

    /// Returns a copy of this content with its underlying string replaced,
    /// preserving whether it was CDATA or plain text.
    pub fn with_str(&self, s: String) -> TextContent {
        match self {
            TextContent::Cdata(_) => TextContent::Cdata(s),
            _ => {
                if s.is_empty() {
                    TextContent::Empty
                } else {
                    TextContent::Plain(s)
                }
            }
        }
    }

    pub fn is_cdata(&self) -> bool {
        matches!(self, TextContent::Cdata(_))
    }
}

impl From<&str> for TextContent {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            TextContent::Empty
        } else {
            TextContent::Plain(s.to_string())
        }
    }
}

impl From<String> for TextContent {
    fn from(s: String) -> Self {
        if s.is_empty() {
            TextContent::Empty
        } else {
            TextContent::Plain(s)
        }
    }
}

/// A qualified name, either namespaced (Clark notation, `{uri}local`) or bare.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub namespace: Option<String>,
    pub local: String,
}

impl QName {
    pub fn local(local: impl Into<String>) -> Self {
        QName {
            namespace: None,
            local: local.into(),
        }
    }

    pub fn namespaced(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        QName {
            namespace: Some(namespace.into()),
            local: local.into(),
        }
    }

    /// Parse Clark notation (`{uri}local`) or a bare local name.
    pub fn parse_clark(s: &str) -> Self {
        if let Some(rest) = s.strip_prefix('{') {
            if let Some(end) = rest.find('}') {
                return QName::namespaced(&rest[..end], &rest[end + 1..]);
            }
        }
        QName::local(s)
    }

    /// Render in Clark notation (`{uri}local`, or just `local` when unnamespaced).
    pub fn to_clark(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{{{ns}}}{}", self.local),
            None => self.local.clone(),
        }
    }
}

/// Attribute name as stored on an element: either a [`QName`] (typical,
/// Clark-notation-capable path) or a literal string already in
/// `prefix:localname` form, as produced by the HTML5 parser, or an `xmlns`
/// declaration, which must pass through unprocessed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AttrName {
    QName(QName),
    Literal(String),
}

impl AttrName {
    pub fn local(name: impl Into<String>) -> Self {
        AttrName::QName(QName::local(name))
    }

    /// The raw string this name should be matched/compared against by
    /// predicates that accept exact-string or regex matchers.
    pub fn match_key(&self) -> String {
        match self {
            AttrName::QName(q) => q.local.clone(),
            AttrName::Literal(s) => s.clone(),
        }
    }

    pub fn is_xmlns(&self) -> bool {
        match self {
            AttrName::Literal(s) => s == "xmlns" || s.starts_with("xmlns:"),
            AttrName::QName(_) => false,
        }
    }
}

/// A single ordered attribute entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: AttrName,
    pub value: String,
}

/// Namespace map: prefix (`None` = default namespace) -> URI.
pub type NsMap = BTreeMap<Option<String>, String>;

#[derive(Debug, Clone)]
pub struct Element {
    pub name: QName,
    pub attributes: Vec<Attribute>,
    pub text: TextContent,
    pub tail: TextContent,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
    pub nsmap: NsMap,
}

impl Element {
    pub fn attribute(&self, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.match_key() == local_name)
            .map(|a| a.value.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Comment {
    pub text: String,
    pub tail: TextContent,
    pub parent: Option<NodeId>,
}

#[derive(Debug, Clone)]
pub struct ProcessingInstruction {
    pub target: String,
    pub text: Option<String>,
    pub tail: TextContent,
    pub parent: Option<NodeId>,
}

/// A node in the tree: an element, a comment, or a processing instruction.
/// Text is not a node in its own right — it lives as `.text`/`.tail` on the
/// surrounding element, matching spec.md's data model (§3).
#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Comment(Comment),
    Pi(ProcessingInstruction),
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        match self {
            Node::Element(e) => e.parent,
            Node::Comment(c) => c.parent,
            Node::Pi(p) => p.parent,
        }
    }

    pub fn tail(&self) -> &TextContent {
        match self {
            Node::Element(e) => &e.tail,
            Node::Comment(c) => &c.tail,
            Node::Pi(p) => &p.tail,
        }
    }

    pub fn set_tail(&mut self, tail: TextContent) {
        match self {
            Node::Element(e) => e.tail = tail,
            Node::Comment(c) => c.tail = tail,
            Node::Pi(p) => p.tail = tail,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Tag name used for error messages and `#comment`/`?target` synthetic
    /// tag names used by predicates that want a uniform "tag" vocabulary.
    pub fn display_tag(&self) -> String {
        match self {
            Node::Element(e) => e.name.to_clark(),
            Node::Comment(_) => "#comment".to_string(),
            Node::Pi(p) => format!("?{}", p.target),
        }
    }
}

/// Owns every node of one parsed document.
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Pre-order traversal of the subtree rooted at `id`, including `id` itself.
    pub fn iter_subtree(&self, id: NodeId) -> SubtreeIter<'_> {
        SubtreeIter {
            arena: self,
            stack: vec![id],
        }
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.get(id) {
            Node::Element(e) => &e.children,
            _ => &[],
        }
    }

    /// Siblings of `id`, in document order, including `id` itself. Mirrors
    /// `siblings()` in the original Python source: elements with no parent
    /// (the root) are considered to have only themselves as a sibling.
    pub fn siblings(&self, id: NodeId) -> Vec<NodeId> {
        match self.get(id).parent() {
            None => vec![id],
            Some(parent) => self.children(parent).to_vec(),
        }
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let sibs = self.siblings(id);
        let pos = sibs.iter().position(|&n| n == id)?;
        sibs.get(pos + 1).copied()
    }
}

pub struct SubtreeIter<'a> {
    arena: &'a NodeArena,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for SubtreeIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        let children = self.arena.children(id);
        for &child in children.iter().rev() {
            self.stack.push(child);
        }
        Some(id)
    }
}

/// A fully parsed document: its node arena, the root element, and any
/// document-level metadata (DOCTYPE, leading comments/PIs).
#[derive(Debug, Clone)]
pub struct Document {
    pub arena: NodeArena,
    pub root: NodeId,
    pub doctype: Option<String>,
    /// Comments and processing instructions that appeared before the root
    /// element, in document order.
    pub prologue: Vec<NodeId>,
}

impl Document {
    pub fn root_element(&self) -> &Element {
        self.arena
            .get(self.root)
            .as_element()
            .expect("document root must be an element")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clark_notation_round_trips() {
        let q = QName::parse_clark("{http://www.w3.org/2000/svg}rect");
        assert_eq!(q.namespace.as_deref(), Some("http://www.w3.org/2000/svg"));
        assert_eq!(q.local, "rect");
        assert_eq!(q.to_clark(), "{http://www.w3.org/2000/svg}rect");
    }

    #[test]
    fn bare_name_has_no_namespace() {
        let q = QName::parse_clark("div");
        assert_eq!(q.namespace, None);
        assert_eq!(q.to_clark(), "div");
    }

    #[test]
    fn xmlns_literal_detected() {
        assert!(AttrName::Literal("xmlns".into()).is_xmlns());
        assert!(AttrName::Literal("xmlns:xlink".into()).is_xmlns());
        assert!(!AttrName::Literal("class".into()).is_xmlns());
    }

    #[test]
    fn siblings_of_root_is_itself() {
        let mut arena = NodeArena::new();
        let root = arena.push(Node::Element(Element {
            name: QName::local("root"),
            attributes: vec![],
            text: TextContent::Empty,
            tail: TextContent::Empty,
            children: vec![],
            parent: None,
            nsmap: NsMap::new(),
        }));
        assert_eq!(arena.siblings(root), vec![root]);
    }

    #[test]
    fn subtree_iter_is_preorder() {
        let mut arena = NodeArena::new();
        let child = arena.push(Node::Element(Element {
            name: QName::local("child"),
            attributes: vec![],
            text: TextContent::Empty,
            tail: TextContent::Empty,
            children: vec![],
            parent: None,
            nsmap: NsMap::new(),
        }));
        let root = arena.push(Node::Element(Element {
            name: QName::local("root"),
            attributes: vec![],
            text: TextContent::Empty,
            tail: TextContent::Empty,
            children: vec![child],
            parent: None,
            nsmap: NsMap::new(),
        }));
        if let Node::Element(e) = arena.get_mut(child) {
            e.parent = Some(root);
        }
        let order: Vec<_> = arena.iter_subtree(root).collect();
        assert_eq!(order, vec![root, child]);
    }
}
