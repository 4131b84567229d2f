//! Bridges a `quick-xml` event stream into this crate's node model.
//! `quick-xml` is push-based (it has no DOM of its own, unlike
//! `html5ever`/`RcDom`), so this builds the arena directly off a stack of
//! open elements, mirroring the same text/tail accumulation strategy
//! `parsing::html5` uses against `RcDom`'s sibling text nodes.
//!
//! Namespace resolution is done by hand against each element's own `xmlns`
//! attributes plus its parent's resolved map, rather than via `quick-xml`'s
//! namespace-aware reader, so the result lines up directly with
//! [`crate::node::Element::nsmap`] and [`crate::namespace`]'s model.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{FormatError, Result};
use crate::node::{Attribute, AttrName, Comment, Document, Element, Node, NodeArena, NodeId, NsMap, ProcessingInstruction, QName, TextContent};
use crate::util::XML_NAMESPACE;

pub fn parse_str(source: &str, preserve_cdata: bool) -> Result<Document> {
    parse_bytes(source.as_bytes(), preserve_cdata)
}

pub fn parse_bytes(source: &[u8], preserve_cdata: bool) -> Result<Document> {
    let mut reader = Reader::from_reader(source);
    reader.config_mut().trim_text(false);

    let mut arena = NodeArena::new();
    let mut prologue = Vec::new();
    let mut doctype: Option<String> = None;
    let mut root: Option<NodeId> = None;

    let mut stack: Vec<Frame> = Vec::new();
    let mut ns_stack: Vec<NsMap> = vec![NsMap::new()];
    let mut buf = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| FormatError::Parse(e.to_string()))?;
        match event {
            Event::Start(e) => {
                let parent_nsmap = ns_stack.last().expect("namespace stack never empty").clone();
                let (elem, nsmap) = build_element(&reader, e.name().as_ref(), e.attributes(), &parent_nsmap)?;
                let parent_id = stack.last().map(|f| f.id);
                let id = push_element(&mut arena, elem, parent_id);
                ns_stack.push(nsmap);
                attach_and_descend(&mut arena, &mut stack, &mut root, id);
            }
            Event::Empty(e) => {
                let parent_nsmap = ns_stack.last().expect("namespace stack never empty").clone();
                let (elem, _nsmap) = build_element(&reader, e.name().as_ref(), e.attributes(), &parent_nsmap)?;
                let parent_id = stack.last().map(|f| f.id);
                let id = push_element(&mut arena, elem, parent_id);
                attach_child(&mut arena, &mut stack, &mut root, id);
            }
            Event::End(_) => {
                let mut frame = stack.pop().expect("unbalanced end tag");
                flush_pending(&mut arena, frame.id, frame.last_child, &mut frame.pending_text, &mut frame.pending_is_cdata);
                ns_stack.pop();
            }
            Event::Text(e) => {
                let text = e
                    .unescape()
                    .map_err(|err| FormatError::Parse(err.to_string()))?
                    .into_owned();
                if let Some(frame) = stack.last_mut() {
                    frame.pending_text.push_str(&text);
                } else if !text.trim().is_empty() {
                    // Significant text outside the root element is malformed XML;
                    // whitespace-only text between prologue items is ignored.
                }
            }
            Event::CData(e) => {
                let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                if let Some(frame) = stack.last_mut() {
                    if frame.pending_text.is_empty() && preserve_cdata {
                        frame.pending_is_cdata = true;
                    }
                    frame.pending_text.push_str(&text);
                }
            }
            Event::Comment(e) => {
                let text = e
                    .unescape()
                    .map_err(|err| FormatError::Parse(err.to_string()))?
                    .into_owned();
                let parent_id = stack.last().map(|f| f.id);
                let comment = Comment {
                    text,
                    tail: TextContent::Empty,
                    parent: parent_id,
                };
                let id = arena.push(Node::Comment(comment));
                if stack.is_empty() {
                    prologue.push(id);
                } else {
                    attach_child(&mut arena, &mut stack, &mut root, id);
                }
            }
            Event::PI(e) => {
                let raw = String::from_utf8_lossy(e.as_ref()).into_owned();
                let (target, text) = match raw.split_once(char::is_whitespace) {
                    Some((t, rest)) => (t.to_string(), Some(rest.trim_start().to_string()).filter(|s| !s.is_empty())),
                    None => (raw, None),
                };
                let parent_id = stack.last().map(|f| f.id);
                let pi = ProcessingInstruction {
                    target,
                    text,
                    tail: TextContent::Empty,
                    parent: parent_id,
                };
                let id = arena.push(Node::Pi(pi));
                if stack.is_empty() {
                    prologue.push(id);
                } else {
                    attach_child(&mut arena, &mut stack, &mut root, id);
                }
            }
            Event::DocType(e) => {
                let raw = String::from_utf8_lossy(e.as_ref()).into_owned();
                doctype = Some(format!("<!DOCTYPE {}>", raw.trim()));
            }
            Event::Decl(_) => {}
            Event::Eof => break,
        }
        buf.clear();
    }

    let root = root.ok_or_else(|| FormatError::Parse("XML document has no root element".to_string()))?;
    Ok(Document {
        arena,
        root,
        doctype,
        prologue,
    })
}

struct Frame {
    id: NodeId,
    last_child: Option<NodeId>,
    pending_text: String,
    pending_is_cdata: bool,
}

fn push_element(arena: &mut NodeArena, elem: Element, parent: Option<NodeId>) -> NodeId {
    let mut elem = elem;
    elem.parent = parent;
    arena.push(Node::Element(elem))
}

/// Attach `id` as a child of the current frame (if any), then push a new
/// frame for it so its own children/text accumulate separately.
fn attach_and_descend(arena: &mut NodeArena, stack: &mut Vec<Frame>, root: &mut Option<NodeId>, id: NodeId) {
    attach_child(arena, stack, root, id);
    stack.push(Frame {
        id,
        last_child: None,
        pending_text: String::new(),
        pending_is_cdata: false,
    });
}

fn attach_child(arena: &mut NodeArena, stack: &mut [Frame], root: &mut Option<NodeId>, id: NodeId) {
    match stack.last_mut() {
        Some(frame) => {
            flush_pending(arena, frame.id, frame.last_child, &mut frame.pending_text, &mut frame.pending_is_cdata);
            if let Node::Element(e) = arena.get_mut(frame.id) {
                e.children.push(id);
            }
            frame.last_child = Some(id);
        }
        None => {
            if root.is_none() {
                *root = Some(id);
            }
        }
    }
}

fn flush_pending(
    arena: &mut NodeArena,
    parent_id: NodeId,
    last_child: Option<NodeId>,
    pending: &mut String,
    is_cdata: &mut bool,
) {
    if pending.is_empty() {
        *is_cdata = false;
        return;
    }
    let text = std::mem::take(pending);
    let content = if *is_cdata {
        TextContent::Cdata(text)
    } else {
        TextContent::from(text)
    };
    *is_cdata = false;
    match last_child {
        Some(child_id) => arena.get_mut(child_id).set_tail(content),
        None => {
            if let Node::Element(e) = arena.get_mut(parent_id) {
                e.text = content;
            }
        }
    }
}

/// Build an [`Element`] (without its final `parent` link, which the caller
/// fills in) from a raw tag name and attribute iterator, resolving
/// namespaces against `parent_nsmap`. Returns the element's own resolved
/// nsmap too, for the caller to push onto the namespace scope stack.
fn build_element(
    reader: &Reader<&[u8]>,
    raw_name: &[u8],
    attributes: quick_xml::events::attributes::Attributes,
    parent_nsmap: &NsMap,
) -> Result<(Element, NsMap)> {
    let mut own_declarations = NsMap::new();
    let mut raw_attrs: Vec<(String, String)> = Vec::new();

    for attr in attributes {
        let attr = attr.map_err(|e| FormatError::Parse(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .decode_and_unescape_value(reader.decoder())
            .map_err(|e| FormatError::Parse(e.to_string()))?
            .into_owned();
        if key == "xmlns" {
            own_declarations.insert(None, value);
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            own_declarations.insert(Some(prefix.to_string()), value);
        } else {
            raw_attrs.push((key, value));
        }
    }

    let mut nsmap = parent_nsmap.clone();
    nsmap.extend(own_declarations);

    let name = resolve_qname(&String::from_utf8_lossy(raw_name), &nsmap, true);

    let attributes = raw_attrs
        .into_iter()
        .map(|(key, value)| Attribute {
            name: resolve_attr_name(&key, &nsmap),
            value,
        })
        .collect();

    let element = Element {
        name,
        attributes,
        text: TextContent::Empty,
        tail: TextContent::Empty,
        children: vec![],
        parent: None,
        nsmap: nsmap.clone(),
    };
    Ok((element, nsmap))
}

/// Resolve a raw `prefix:local` or bare tag name against `nsmap`.
/// `apply_default` controls whether an unprefixed name picks up the default
/// namespace — true for elements, false for attributes (XML namespaces:
/// unprefixed attribute names are never implicitly namespaced).
fn resolve_qname(raw: &str, nsmap: &NsMap, apply_default: bool) -> QName {
    match raw.split_once(':') {
        Some(("xml", local)) => QName::namespaced(XML_NAMESPACE, local),
        Some((prefix, local)) => match nsmap.get(&Some(prefix.to_string())) {
            Some(uri) => QName::namespaced(uri.clone(), local),
            None => QName::local(raw.to_string()),
        },
        None => {
            if apply_default {
                match nsmap.get(&None) {
                    Some(uri) => QName::namespaced(uri.clone(), raw.to_string()),
                    None => QName::local(raw.to_string()),
                }
            } else {
                QName::local(raw.to_string())
            }
        }
    }
}

fn resolve_attr_name(raw: &str, nsmap: &NsMap) -> AttrName {
    if raw.contains(':') {
        AttrName::QName(resolve_qname(raw, nsmap, false))
    } else {
        AttrName::local(raw.to_string())
    }
}
