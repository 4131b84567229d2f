//! Bridges an `html5ever` + `markup5ever_rcdom` parse into this crate's node
//! model, following the same `parse_document(RcDom::default(),
//! opts).from_utf8().one(...)` entry point `hast_to_mdast/mod.rs::parse_html`
//! uses, adapted from "build an mdast tree" to "build a
//! `markuplift::node::Document`".
//!
//! `RcDom` represents text as sibling nodes rather than as `.text`/`.tail` on
//! the surrounding element (spec.md §3's data model); bridging accumulates
//! each run of text nodes and attaches it to the right side-table slot when
//! the next non-text sibling (or the closing tag) is reached.

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::ParseOpts;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::error::{FormatError, Result};
use crate::node::{Attribute, AttrName, Comment, Document, Element, Node, NodeArena, NodeId, NsMap, ProcessingInstruction, QName, TextContent};

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

pub fn parse_str(source: &str) -> Result<Document> {
    parse_bytes(source.as_bytes())
}

pub fn parse_bytes(source: &[u8]) -> Result<Document> {
    let dom: RcDom = parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .one(source);
    build_document(&dom)
}

fn build_document(dom: &RcDom) -> Result<Document> {
    let mut arena = NodeArena::new();
    let mut prologue = Vec::new();
    let mut doctype = None;
    let mut root = None;

    for child in dom.document.children.borrow().iter() {
        match &child.data {
            NodeData::Doctype { name, .. } => {
                doctype = Some(format!("<!DOCTYPE {name}>"));
            }
            NodeData::Element { .. } => {
                root = Some(convert_element(&mut arena, child, None));
            }
            NodeData::Comment { contents } => {
                let comment = Comment {
                    text: contents.to_string(),
                    tail: TextContent::Empty,
                    parent: None,
                };
                prologue.push(arena.push(Node::Comment(comment)));
            }
            NodeData::ProcessingInstruction { target, contents } => {
                let pi = ProcessingInstruction {
                    target: target.to_string(),
                    text: Some(contents.to_string()).filter(|s| !s.is_empty()),
                    tail: TextContent::Empty,
                    parent: None,
                };
                prologue.push(arena.push(Node::Pi(pi)));
            }
            _ => {}
        }
    }

    let root = root.ok_or_else(|| FormatError::Parse("HTML5 document has no root element".to_string()))?;
    Ok(Document {
        arena,
        root,
        doctype,
        prologue,
    })
}

fn qname_from_html5ever(name: &markup5ever::QualName) -> QName {
    let ns = name.ns.to_string();
    if ns.is_empty() || ns == HTML_NAMESPACE {
        QName::local(name.local.to_string())
    } else {
        QName::namespaced(ns, name.local.to_string())
    }
}

fn attr_name_from_html5ever(name: &markup5ever::QualName) -> AttrName {
    match &name.prefix {
        Some(prefix) => AttrName::Literal(format!("{prefix}:{}", name.local)),
        None => AttrName::local(name.local.to_string()),
    }
}

fn convert_element(arena: &mut NodeArena, handle: &Handle, parent: Option<NodeId>) -> NodeId {
    let (name, attrs) = match &handle.data {
        NodeData::Element { name, attrs, .. } => (name.clone(), attrs.borrow().clone()),
        _ => unreachable!("convert_element called on a non-element node"),
    };

    let attributes: Vec<Attribute> = attrs
        .iter()
        .map(|attr| Attribute {
            name: attr_name_from_html5ever(&attr.name),
            value: attr.value.to_string(),
        })
        .collect();

    let element = Element {
        name: qname_from_html5ever(&name),
        attributes,
        text: TextContent::Empty,
        tail: TextContent::Empty,
        children: vec![],
        parent,
        nsmap: NsMap::new(),
    };
    let id = arena.push(Node::Element(element));
    populate_children(arena, id, handle);
    id
}

/// Walk `handle`'s html5ever children, accumulating text runs and attaching
/// them as `.text` (before the first real child) or as the preceding
/// child's `.tail` (afterward), matching `lxml`'s text/tail model that the
/// rest of this crate is built around.
fn populate_children(arena: &mut NodeArena, id: NodeId, handle: &Handle) {
    let mut pending_text = String::new();
    let mut last_child: Option<NodeId> = None;
    let mut children_ids = Vec::new();

    for child in handle.children.borrow().iter() {
        match &child.data {
            NodeData::Text { contents } => {
                pending_text.push_str(&contents.borrow());
            }
            NodeData::Element { .. } => {
                flush_pending_text(arena, id, last_child, &mut pending_text);
                let child_id = convert_element(arena, child, Some(id));
                children_ids.push(child_id);
                last_child = Some(child_id);
            }
            NodeData::Comment { contents } => {
                flush_pending_text(arena, id, last_child, &mut pending_text);
                let comment = Comment {
                    text: contents.to_string(),
                    tail: TextContent::Empty,
                    parent: Some(id),
                };
                let child_id = arena.push(Node::Comment(comment));
                children_ids.push(child_id);
                last_child = Some(child_id);
            }
            NodeData::ProcessingInstruction { target, contents } => {
                flush_pending_text(arena, id, last_child, &mut pending_text);
                let pi = ProcessingInstruction {
                    target: target.to_string(),
                    text: Some(contents.to_string()).filter(|s| !s.is_empty()),
                    tail: TextContent::Empty,
                    parent: Some(id),
                };
                let child_id = arena.push(Node::Pi(pi));
                children_ids.push(child_id);
                last_child = Some(child_id);
            }
            _ => {}
        }
    }
    flush_pending_text(arena, id, last_child, &mut pending_text);

    if let Node::Element(e) = arena.get_mut(id) {
        e.children = children_ids;
    }
}

fn flush_pending_text(arena: &mut NodeArena, parent_id: NodeId, last_child: Option<NodeId>, pending: &mut String) {
    if pending.is_empty() {
        return;
    }
    let text = TextContent::from(std::mem::take(pending));
    match last_child {
        Some(child_id) => arena.get_mut(child_id).set_tail(text),
        None => {
            if let Node::Element(e) = arena.get_mut(parent_id) {
                e.text = text;
            }
        }
    }
}
