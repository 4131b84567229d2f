//! Small text and tree helpers shared by the annotation passes, predicates,
//! and transform catalog. Grounded in `utilities.py` of the original source.

use crate::node::{AttrName, Document, Element, NodeId, TextContent};

/// The reserved `xml:` namespace URI (spec.md §4.7).
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// The value of `xml:space` on `elem`, whether stored as a namespaced
/// attribute (XML parse path) or as the literal string `xml:space` (HTML5
/// parse path never produces this, but a hand-built tree might).
pub fn xml_space_attr(elem: &Element) -> Option<&str> {
    elem.attributes
        .iter()
        .find(|a| match &a.name {
            AttrName::QName(q) => q.namespace.as_deref() == Some(XML_NAMESPACE) && q.local == "space",
            AttrName::Literal(s) => s == "xml:space",
        })
        .map(|a| a.value.as_str())
}

/// Whether a string consists only of XML whitespace (or is empty).
pub fn is_xml_whitespace(text: &str) -> bool {
    text.trim().is_empty()
}

/// Whether a string contains at least one non-whitespace character.
pub fn is_significant_text(text: &str) -> bool {
    !is_xml_whitespace(text)
}

/// Whether `id` has direct significant text: its own `.text`, or the `.tail`
/// of any of its children, contains non-whitespace characters.
pub fn has_direct_significant_text(doc: &Document, id: NodeId) -> bool {
    let node = doc.arena.get(id);
    if let Some(elem) = node.as_element() {
        if matches!(&elem.text, TextContent::Plain(s) if is_significant_text(s)) {
            return true;
        }
        if matches!(&elem.text, TextContent::Cdata(_)) && !elem.text.as_str().is_empty() {
            // CDATA content is always significant content, whitespace or not.
            return true;
        }
        for &child in &elem.children {
            let tail = doc.arena.get(child).tail();
            if matches!(tail, TextContent::Plain(s) if is_significant_text(s)) {
                return true;
            }
            if matches!(tail, TextContent::Cdata(_)) && !tail.as_str().is_empty() {
                return true;
            }
        }
    }
    false
}

/// Whether `id` is "in mixed content": its parent carries direct significant
/// text (non-whitespace in the parent's `.text` or in a sibling's `.tail`).
pub fn is_in_mixed_content(doc: &Document, id: NodeId) -> bool {
    match doc.arena.get(id).parent() {
        None => false,
        Some(parent) => has_direct_significant_text(doc, parent),
    }
}

/// Collapse every run of whitespace in `s` to a single ASCII space, preserving
/// leading/trailing whitespace as a single space if present.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_whitespace() {
            out.push(' ');
            while let Some(&next) = chars.peek() {
                if next.is_whitespace() {
                    chars.next();
                } else {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_internal_runs() {
        assert_eq!(normalize_ws("a   b\n\tc"), "a b c");
    }

    #[test]
    fn normalize_preserves_single_leading_trailing_space() {
        assert_eq!(normalize_ws("  a  "), " a ");
    }

    #[test]
    fn whitespace_only_is_not_significant() {
        assert!(!is_significant_text("   \n\t "));
        assert!(is_significant_text("  x "));
    }
}
