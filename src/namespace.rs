//! Namespace resolution: Clark notation ↔ `prefix:local` serialization,
//! new-declaration detection, and xmlns attribute emission (spec.md §4.7).
//! Grounded in `namespace.py`.

use crate::node::{AttrName, Document, Element, NodeId, NsMap, QName};
use crate::util::XML_NAMESPACE;

/// Serialize an element's tag name, resolving its namespace (if any) against
/// its own `nsmap` to `prefix:local`, or bare `local` when unnamespaced or in
/// the default namespace. Tags in the `xml:` namespace always use the `xml:`
/// prefix, which is never declared via xmlns.
pub fn format_tag_name(elem: &Element) -> String {
    format_qname(&elem.name, &elem.nsmap)
}

fn format_qname(name: &QName, nsmap: &NsMap) -> String {
    let Some(namespace) = &name.namespace else {
        return name.local.clone();
    };
    if namespace == XML_NAMESPACE {
        return format!("xml:{}", name.local);
    }
    for (prefix, uri) in nsmap {
        if uri == namespace {
            return match prefix {
                Some(p) => format!("{p}:{}", name.local),
                None => name.local.clone(),
            };
        }
    }
    name.local.clone()
}

/// Serialize an attribute name against `nsmap`. `xmlns`/`xmlns:*` literal
/// names, and already-literal `prefix:local` names as produced by the HTML5
/// parser, pass through unchanged.
pub fn format_attribute_name(name: &AttrName, nsmap: &NsMap) -> String {
    match name {
        AttrName::Literal(s) => s.clone(),
        AttrName::QName(q) => format_qname(q, nsmap),
    }
}

/// Namespace declarations present in `id`'s nsmap but absent (or bound to a
/// different URI) in its parent's — or, for the root, every entry in its own
/// nsmap. Sorted with the default namespace (`None` prefix) first, then
/// alphabetically by prefix.
pub fn new_namespace_declarations(doc: &Document, id: NodeId) -> Vec<(Option<String>, String)> {
    let elem = doc
        .arena
        .get(id)
        .as_element()
        .expect("namespace declarations only apply to elements");
    let parent_nsmap = doc
        .arena
        .get(id)
        .parent()
        .and_then(|p| doc.arena.get(p).as_element())
        .map(|p| &p.nsmap);

    let mut declarations: Vec<(Option<String>, String)> = elem
        .nsmap
        .iter()
        .filter(|(prefix, uri)| {
            parent_nsmap
                .map(|pm| pm.get(*prefix) != Some(*uri))
                .unwrap_or(true)
        })
        .map(|(prefix, uri)| (prefix.clone(), uri.clone()))
        .collect();

    declarations.sort_by(|(a, _), (b, _)| (a.is_some(), a.clone()).cmp(&(b.is_some(), b.clone())));
    declarations
}

/// Format declarations as `xmlns="..."`/`xmlns:prefix="..."` strings. The
/// input is expected pre-sorted by [`new_namespace_declarations`].
pub fn format_xmlns_declarations(declarations: &[(Option<String>, String)]) -> Vec<String> {
    declarations
        .iter()
        .map(|(prefix, uri)| match prefix {
            Some(p) => format!(r#"xmlns:{p}="{uri}""#),
            None => format!(r#"xmlns="{uri}""#),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Document, Node, NodeArena, TextContent};

    fn svg_uri() -> String {
        "http://www.w3.org/2000/svg".to_string()
    }

    #[test]
    fn bare_tag_name_has_no_prefix() {
        let elem = Element {
            name: QName::local("div"),
            attributes: vec![],
            text: TextContent::Empty,
            tail: TextContent::Empty,
            children: vec![],
            parent: None,
            nsmap: NsMap::new(),
        };
        assert_eq!(format_tag_name(&elem), "div");
    }

    #[test]
    fn default_namespace_tag_has_no_prefix() {
        let mut nsmap = NsMap::new();
        nsmap.insert(None, svg_uri());
        let elem = Element {
            name: QName::namespaced(svg_uri(), "svg"),
            attributes: vec![],
            text: TextContent::Empty,
            tail: TextContent::Empty,
            children: vec![],
            parent: None,
            nsmap,
        };
        assert_eq!(format_tag_name(&elem), "svg");
    }

    #[test]
    fn prefixed_namespace_tag_gets_prefix() {
        let mut nsmap = NsMap::new();
        nsmap.insert(Some("bx".to_string()), "https://boxy-svg.com".to_string());
        let elem = Element {
            name: QName::namespaced("https://boxy-svg.com", "grid"),
            attributes: vec![],
            text: TextContent::Empty,
            tail: TextContent::Empty,
            children: vec![],
            parent: None,
            nsmap,
        };
        assert_eq!(format_tag_name(&elem), "bx:grid");
    }

    #[test]
    fn xml_namespace_always_uses_xml_prefix() {
        let elem = Element {
            name: QName::namespaced(XML_NAMESPACE, "space"),
            attributes: vec![],
            text: TextContent::Empty,
            tail: TextContent::Empty,
            children: vec![],
            parent: None,
            nsmap: NsMap::new(),
        };
        assert_eq!(format_tag_name(&elem), "xml:space");
    }

    #[test]
    fn xmlns_literal_attribute_passes_through() {
        assert_eq!(
            format_attribute_name(&AttrName::Literal("xmlns:xlink".to_string()), &NsMap::new()),
            "xmlns:xlink"
        );
    }

    #[test]
    fn root_declares_all_of_its_own_nsmap() {
        let mut arena = NodeArena::new();
        let mut nsmap = NsMap::new();
        nsmap.insert(None, svg_uri());
        let root = arena.push(Node::Element(Element {
            name: QName::namespaced(svg_uri(), "svg"),
            attributes: vec![],
            text: TextContent::Empty,
            tail: TextContent::Empty,
            children: vec![],
            parent: None,
            nsmap,
        }));
        let doc = Document {
            arena,
            root,
            doctype: None,
            prologue: vec![],
        };
        let decls = new_namespace_declarations(&doc, root);
        assert_eq!(decls, vec![(None, svg_uri())]);
    }

    #[test]
    fn child_with_unchanged_nsmap_declares_nothing() {
        let mut arena = NodeArena::new();
        let mut nsmap = NsMap::new();
        nsmap.insert(None, svg_uri());
        let child = arena.push(Node::Element(Element {
            name: QName::namespaced(svg_uri(), "rect"),
            attributes: vec![],
            text: TextContent::Empty,
            tail: TextContent::Empty,
            children: vec![],
            parent: None,
            nsmap: nsmap.clone(),
        }));
        let root = arena.push(Node::Element(Element {
            name: QName::namespaced(svg_uri(), "svg"),
            attributes: vec![],
            text: TextContent::Empty,
            tail: TextContent::Empty,
            children: vec![child],
            parent: None,
            nsmap,
        }));
        if let Node::Element(e) = arena.get_mut(child) {
            e.parent = Some(root);
        }
        let doc = Document {
            arena,
            root,
            doctype: None,
            prologue: vec![],
        };
        assert!(new_namespace_declarations(&doc, child).is_empty());
    }
}
