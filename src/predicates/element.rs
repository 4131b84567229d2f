//! Built-in element predicate factories (spec.md §4.1 and §4.7's HTML5 domain
//! vocabularies). Grounded in `predicates.py` of the original source, with
//! XPath convenience predicates deliberately left unported (out of scope).

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{FormatError, Result};
use crate::node::Node;
use crate::util::{has_direct_significant_text, is_in_mixed_content as util_is_in_mixed_content};

use super::{ElementPredicateFactory, Matcher};

fn tag_matches(node: &Node, matcher: &Matcher) -> bool {
    match node {
        Node::Element(e) => matcher.matches(&e.name.local),
        _ => false,
    }
}

/// An exact-match name/target matcher must not be the empty string; a
/// regex or arbitrary predicate matcher has no such constraint.
fn validate_non_empty(matcher: &Matcher, what: &str) -> Result<()> {
    if let Matcher::Exact(s) = matcher {
        if s.is_empty() {
            return Err(FormatError::PredicateValidation(format!("{what} must not be empty")));
        }
    }
    Ok(())
}

/// Matches elements whose local tag name satisfies `matcher`.
pub fn tag_equals(matcher: impl Into<Matcher>) -> Result<ElementPredicateFactory> {
    let matcher = matcher.into();
    validate_non_empty(&matcher, "tag name")?;
    Ok(Arc::new(move |_doc| {
        let matcher = matcher.clone();
        Arc::new(move |doc, id| tag_matches(doc.arena.get(id), &matcher))
    }))
}

/// Matches elements whose local tag name is exactly one of `names`.
pub fn tag_in(names: impl IntoIterator<Item = impl Into<String>>) -> Result<ElementPredicateFactory> {
    let set: HashSet<String> = names.into_iter().map(Into::into).collect();
    if set.is_empty() {
        return Err(FormatError::PredicateValidation("tag_in requires at least one tag name".to_string()));
    }
    if set.iter().any(|s| s.is_empty()) {
        return Err(FormatError::PredicateValidation("tag name must not be empty".to_string()));
    }
    Ok(Arc::new(move |_doc| {
        let set = set.clone();
        Arc::new(move |doc, id| match doc.arena.get(id) {
            Node::Element(e) => set.contains(&e.name.local),
            _ => false,
        })
    }))
}

fn tag_in_static(names: &'static [&'static str]) -> ElementPredicateFactory {
    Arc::new(move |_doc| {
        Arc::new(move |doc, id| match doc.arena.get(id) {
            Node::Element(e) => names.contains(&e.name.local.as_str()),
            _ => false,
        })
    })
}

/// Matches elements that carry an attribute whose name satisfies `name_matcher`.
pub fn has_attribute(name_matcher: impl Into<Matcher>) -> Result<ElementPredicateFactory> {
    let name_matcher = name_matcher.into();
    validate_non_empty(&name_matcher, "attribute name")?;
    Ok(Arc::new(move |_doc| {
        let name_matcher = name_matcher.clone();
        Arc::new(move |doc, id| match doc.arena.get(id) {
            Node::Element(e) => e
                .attributes
                .iter()
                .any(|a| name_matcher.matches(&a.name.match_key())),
            _ => false,
        })
    }))
}

/// Matches elements that carry an attribute whose name AND value both satisfy
/// the given matchers.
pub fn attribute_equals(
    name_matcher: impl Into<Matcher>,
    value_matcher: impl Into<Matcher>,
) -> Result<ElementPredicateFactory> {
    let name_matcher = name_matcher.into();
    let value_matcher = value_matcher.into();
    validate_non_empty(&name_matcher, "attribute name")?;
    Ok(Arc::new(move |_doc| {
        let name_matcher = name_matcher.clone();
        let value_matcher = value_matcher.clone();
        Arc::new(move |doc, id| match doc.arena.get(id) {
            Node::Element(e) => e.attributes.iter().any(|a| {
                name_matcher.matches(&a.name.match_key()) && value_matcher.matches(&a.value)
            }),
            _ => false,
        })
    }))
}

/// Matches elements carrying a `class` attribute whose whitespace-separated
/// token list contains `class_name` exactly.
pub fn has_css_class(class_name: impl Into<String>) -> ElementPredicateFactory {
    let class_name = class_name.into();
    Arc::new(move |_doc| {
        let class_name = class_name.clone();
        Arc::new(move |doc, id| match doc.arena.get(id) {
            Node::Element(e) => e
                .attribute("class")
                .map(|v| v.split_whitespace().any(|tok| tok == class_name))
                .unwrap_or(false),
            _ => false,
        })
    })
}

fn attribute_count(node: &Node) -> usize {
    match node {
        Node::Element(e) => e.attributes.len(),
        _ => 0,
    }
}

/// Matches elements with at least `min` attributes. `min` is a `usize`, so
/// there is no negative-count case to reject; this still returns `Result`
/// for consistency with the other attribute-count factories.
pub fn attribute_count_min(min: usize) -> Result<ElementPredicateFactory> {
    Ok(Arc::new(move |_doc| {
        Arc::new(move |doc, id| attribute_count(doc.arena.get(id)) >= min)
    }))
}

/// Matches elements with at most `max` attributes.
pub fn attribute_count_max(max: usize) -> Result<ElementPredicateFactory> {
    Ok(Arc::new(move |_doc| {
        Arc::new(move |doc, id| attribute_count(doc.arena.get(id)) <= max)
    }))
}

/// Matches elements with an attribute count in `[min, max]` inclusive.
pub fn attribute_count_between(min: usize, max: usize) -> Result<ElementPredicateFactory> {
    if min > max {
        return Err(FormatError::PredicateValidation(format!(
            "attribute_count_between: min ({min}) must not exceed max ({max})"
        )));
    }
    Ok(Arc::new(move |_doc| {
        Arc::new(move |doc, id| {
            let n = attribute_count(doc.arena.get(id));
            n >= min && n <= max
        })
    }))
}

/// Matches comment nodes.
pub fn is_comment() -> ElementPredicateFactory {
    Arc::new(|_doc| Arc::new(|doc, id| matches!(doc.arena.get(id), Node::Comment(_))))
}

/// Matches processing-instruction nodes, optionally restricted to a given
/// target (`<?target ...?>`).
pub fn is_processing_instruction(target: Option<impl Into<Matcher>>) -> Result<ElementPredicateFactory> {
    let target = target.map(Into::into);
    if let Some(matcher) = &target {
        validate_non_empty(matcher, "processing-instruction target")?;
    }
    Ok(Arc::new(move |_doc| {
        let target = target.clone();
        Arc::new(move |doc, id| match doc.arena.get(id) {
            Node::Pi(pi) => target.as_ref().is_none_or(|m| m.matches(&pi.target)),
            _ => false,
        })
    }))
}

/// Matches element nodes (as opposed to comments or processing instructions).
pub fn is_element() -> ElementPredicateFactory {
    Arc::new(|_doc| Arc::new(|doc, id| matches!(doc.arena.get(id), Node::Element(_))))
}

/// Matches elements that have at least one child that is itself an element.
pub fn has_child_elements() -> ElementPredicateFactory {
    Arc::new(|_doc| {
        Arc::new(|doc, id| {
            doc.arena
                .children(id)
                .iter()
                .any(|&c| matches!(doc.arena.get(c), Node::Element(_)))
        })
    })
}

/// Whether `id`'s subtree contains any non-whitespace text anywhere (its own
/// text, any descendant's text/tail, or any non-empty CDATA section).
fn subtree_has_significant_text(doc: &crate::node::Document, id: crate::node::NodeId) -> bool {
    doc.arena
        .iter_subtree(id)
        .any(|node_id| has_direct_significant_text(doc, node_id))
}

/// Matches elements whose subtree has some significant (non-whitespace) text
/// content, anywhere, or at least one CDATA section.
pub fn has_significant_content() -> ElementPredicateFactory {
    Arc::new(|_doc| Arc::new(|doc, id| subtree_has_significant_text(doc, id)))
}

/// Matches elements whose subtree has no significant text content at all
/// (only whitespace, or none).
pub fn has_no_significant_content() -> ElementPredicateFactory {
    Arc::new(|_doc| Arc::new(|doc, id| !subtree_has_significant_text(doc, id)))
}

/// Matches elements that have both direct significant text AND at least one
/// child element — i.e. genuinely mixed content, not just incidental
/// whitespace around block children.
pub fn has_mixed_content() -> ElementPredicateFactory {
    Arc::new(|_doc| {
        Arc::new(|doc, id| {
            has_direct_significant_text(doc, id)
                && doc
                    .arena
                    .children(id)
                    .iter()
                    .any(|&c| matches!(doc.arena.get(c), Node::Element(_)))
        })
    })
}

/// Matches elements whose parent carries direct significant text (i.e. the
/// element sits next to non-whitespace text inside mixed content).
pub fn is_in_mixed_content() -> ElementPredicateFactory {
    Arc::new(|_doc| Arc::new(|doc, id| util_is_in_mixed_content(doc, id)))
}

/// Matches elements whose local tag name is one of `tags`. Intended for the
/// XML side, where there is no fixed whitespace-significant vocabulary —
/// callers name the elements that matter for their document.
pub fn whitespace_significant_elements(
    tags: impl IntoIterator<Item = impl Into<String>>,
) -> Result<ElementPredicateFactory> {
    tag_in(tags)
}

/// HTML5 elements the HTML Standard classifies as block-level, for the
/// purposes of deciding default indentation behaviour.
pub fn html_block_elements() -> ElementPredicateFactory {
    tag_in_static(&[
        "address", "article", "aside", "blockquote", "details", "dialog", "dd", "div", "dl",
        "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5",
        "h6", "header", "hgroup", "hr", "html", "body", "li", "main", "nav", "ol", "p", "pre",
        "section", "table", "ul",
    ])
}

/// HTML5 elements treated as inline for default formatting decisions.
pub fn html_inline_elements() -> ElementPredicateFactory {
    tag_in_static(&[
        "a", "abbr", "b", "bdi", "bdo", "br", "cite", "code", "data", "dfn", "em", "i", "kbd",
        "mark", "q", "rp", "rt", "ruby", "s", "samp", "small", "span", "strong", "sub", "sup",
        "time", "u", "var", "wbr",
    ])
}

/// The 13 HTML5 void elements (no closing tag, no content model).
pub fn html_void_elements() -> ElementPredicateFactory {
    tag_in_static(&[
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
        "track", "wbr",
    ])
}

/// HTML5 elements whose content is whitespace-significant by the HTML
/// Standard's own rules, regardless of any `xml:space`-style annotation.
pub fn html_whitespace_significant_elements() -> ElementPredicateFactory {
    tag_in_static(&["pre", "textarea", "script", "style"])
}

/// CSS `display: block` elements, used by the default HTML5 strip-whitespace
/// heuristic (block elements that are not themselves whitespace-significant).
pub fn css_block_elements() -> ElementPredicateFactory {
    html_block_elements()
}

/// HTML5 document-metadata elements (`<head>` children and friends).
pub fn html_metadata_elements() -> ElementPredicateFactory {
    tag_in_static(&["base", "link", "meta", "noscript", "script", "style", "title"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Document, Element, NodeArena, NsMap, QName, TextContent};

    fn doc_with(build: impl FnOnce(&mut NodeArena) -> crate::node::NodeId) -> Document {
        let mut arena = NodeArena::new();
        let root = build(&mut arena);
        Document {
            arena,
            root,
            doctype: None,
            prologue: vec![],
        }
    }

    fn elem(tag: &str, attrs: Vec<(&str, &str)>, text: &str) -> Element {
        Element {
            name: QName::local(tag),
            attributes: attrs
                .into_iter()
                .map(|(n, v)| crate::node::Attribute {
                    name: crate::node::AttrName::local(n),
                    value: v.to_string(),
                })
                .collect(),
            text: TextContent::from(text),
            tail: TextContent::Empty,
            children: vec![],
            parent: None,
            nsmap: NsMap::new(),
        }
    }

    #[test]
    fn tag_equals_matches_only_named_tag() {
        let doc = doc_with(|a| a.push(Node::Element(elem("div", vec![], ""))));
        let pred = tag_equals("div").unwrap()(&doc);
        assert!(pred(&doc, doc.root));
        let pred2 = tag_equals("span").unwrap()(&doc);
        assert!(!pred2(&doc, doc.root));
    }

    #[test]
    fn tag_equals_rejects_empty_name() {
        assert!(tag_equals("").is_err());
    }

    #[test]
    fn tag_in_rejects_empty_list_and_empty_name() {
        assert!(tag_in(Vec::<String>::new()).is_err());
        assert!(tag_in(["div", ""]).is_err());
    }

    #[test]
    fn has_attribute_checks_presence() {
        let doc = doc_with(|a| a.push(Node::Element(elem("a", vec![("href", "x")], ""))));
        assert!(has_attribute("href").unwrap()(&doc)(&doc, doc.root));
        assert!(!has_attribute("class").unwrap()(&doc)(&doc, doc.root));
    }

    #[test]
    fn has_attribute_rejects_empty_name() {
        assert!(has_attribute("").is_err());
    }

    #[test]
    fn attribute_count_between_rejects_min_greater_than_max() {
        assert!(attribute_count_between(5, 3).is_err());
        assert!(attribute_count_between(3, 5).is_ok());
    }

    #[test]
    fn is_processing_instruction_rejects_empty_target() {
        assert!(is_processing_instruction(Some("")).is_err());
        assert!(is_processing_instruction::<&str>(None).is_ok());
    }

    #[test]
    fn attribute_equals_checks_name_and_value() {
        let doc = doc_with(|a| a.push(Node::Element(elem("input", vec![("type", "text")], ""))));
        assert!(attribute_equals("type", "text").unwrap()(&doc)(&doc, doc.root));
        assert!(!attribute_equals("type", "checkbox").unwrap()(&doc)(&doc, doc.root));
    }

    #[test]
    fn has_css_class_matches_one_token_among_many() {
        let doc =
            doc_with(|a| a.push(Node::Element(elem("div", vec![("class", "a b c")], ""))));
        assert!(has_css_class("b")(&doc)(&doc, doc.root));
        assert!(!has_css_class("z")(&doc)(&doc, doc.root));
    }

    #[test]
    fn html_void_elements_contains_br_not_div() {
        let doc = doc_with(|a| a.push(Node::Element(elem("br", vec![], ""))));
        assert!(html_void_elements()(&doc)(&doc, doc.root));
        let doc2 = doc_with(|a| a.push(Node::Element(elem("div", vec![], ""))));
        assert!(!html_void_elements()(&doc2)(&doc2, doc2.root));
    }

    #[test]
    fn has_significant_content_detects_nonwhitespace_text() {
        let doc = doc_with(|a| a.push(Node::Element(elem("p", vec![], "hello"))));
        assert!(has_significant_content()(&doc)(&doc, doc.root));
        let doc2 = doc_with(|a| a.push(Node::Element(elem("p", vec![], "   "))));
        assert!(has_no_significant_content()(&doc2)(&doc2, doc2.root));
    }

    #[test]
    fn has_child_elements_requires_element_child() {
        let doc = doc_with(|a| {
            let child = a.push(Node::Element(elem("span", vec![], "")));
            let mut root = elem("div", vec![], "");
            root.children = vec![child];
            let root_id = a.push(Node::Element(root));
            if let Node::Element(e) = a.get_mut(child) {
                e.parent = Some(root_id);
            }
            root_id
        });
        assert!(has_child_elements()(&doc)(&doc, doc.root));
    }
}
