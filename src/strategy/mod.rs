//! The four pluggable strategy surfaces (spec.md §4.4): escaping, DOCTYPE,
//! empty-element, and attribute-formatting. Each is a narrow trait with
//! monomorphized XML and HTML5 implementations; the core engine never
//! branches on "is this HTML?" — it consults a strategy instead. Grounded in
//! `escaping.py`, `doctype.py`, `empty_element.py`, and
//! `attribute_formatting.py`.

pub mod html5;
pub mod xml;

use crate::node::Document;

/// Escape `&`, `<`, `>` in document order, matching `xml.sax.saxutils.escape`.
fn escape_entities(data: &str) -> String {
    data.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Choose the surrounding quote character to avoid escaping it when possible,
/// mirroring `xml.sax.saxutils.quoteattr`'s tail logic: prefer `"`, fall back
/// to `'` when the value contains `"` but not `'`, and escape `"` as
/// `&quot;` only when both characters are present.
fn quote_minimizing_escapes(escaped: &str) -> String {
    if escaped.contains('"') {
        if escaped.contains('\'') {
            format!("\"{}\"", escaped.replace('"', "&quot;"))
        } else {
            format!("'{escaped}'")
        }
    } else {
        format!("\"{escaped}\"")
    }
}

/// Escapes text content, comment text, and quotes attribute values in a
/// format-appropriate way.
pub trait EscapingStrategy: Send + Sync {
    /// Produce a fully quoted attribute value (including the surrounding
    /// quote characters) from a raw value.
    fn quote_attribute(&self, value: &str) -> String;

    /// Escape raw text content. `tag` is the local name of the enclosing
    /// element, when known, so HTML5 can special-case RAWTEXT elements.
    fn escape_text(&self, text: &str, tag: Option<&str>) -> String;

    /// Escape raw comment text content.
    fn escape_comment_text(&self, text: &str) -> String;
}

/// Produces the DOCTYPE string (if any) a formatter should emit, and whether
/// one should be synthesized when the parsed document did not carry one.
pub trait DoctypeStrategy: Send + Sync {
    /// The DOCTYPE this format uses when none is otherwise available.
    fn default_doctype(&self) -> Option<&str>;

    /// Whether a DOCTYPE should be added even when the parsed document had
    /// none and the caller did not supply one explicitly.
    fn should_ensure_doctype(&self) -> bool;
}

/// How an element with no children and no text (after transforms) should
/// close: with an explicit end tag, XML self-closing syntax, or as an HTML5
/// void element (no end tag, no slash).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyElementTagStyle {
    Explicit,
    SelfClosing,
    Void,
}

/// Decides how an empty element closes. Only HTML5 branches on the tag name
/// (void vs non-void); XML is uniformly self-closing.
pub trait EmptyElementStrategy: Send + Sync {
    fn tag_style(&self, tag: &str) -> EmptyElementTagStyle;
}

/// Per-attribute formatting: combine built-in rules (e.g. HTML5 boolean
/// attribute minimization) with user-supplied attribute formatters, and
/// decide whether the attribute should be minimized to a bare name.
pub trait AttributeFormattingStrategy: Send + Sync {
    /// Returns `(formatted_value, should_minimize)`. `should_minimize=true`
    /// means the attribute serializes as a bare name with no `="value"`.
    fn format_attribute(&self, tag: &str, name: &str, value: &str) -> (String, bool);
}

/// Parses a source document into this crate's node model, optionally
/// preserving CDATA sections as such rather than collapsing them to plain
/// text.
pub trait ParsingStrategy: Send + Sync {
    fn parse_str(&self, source: &str) -> crate::error::Result<Document>;
    fn parse_bytes(&self, source: &[u8]) -> crate::error::Result<Document>;
}
