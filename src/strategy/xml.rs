//! XML-strict strategy implementations. Grounded in `escaping.py`'s
//! `XmlEscapingStrategy`, `doctype.py`'s `XmlDoctypeStrategy`/
//! `NullDoctypeStrategy`, `empty_element.py`'s `XmlEmptyElementStrategy`, and
//! `attribute_formatting.py`'s `XmlAttributeStrategy`/`NullAttributeStrategy`.

use crate::error::Result;
use crate::node::Document;

use super::{
    escape_entities, quote_minimizing_escapes, AttributeFormattingStrategy, DoctypeStrategy,
    EmptyElementStrategy, EmptyElementTagStyle, EscapingStrategy, ParsingStrategy,
};

/// Escapes `&`, `<`, `>` everywhere and encodes newlines/tabs/CR in
/// attribute values as character references, per `xml.sax.saxutils.quoteattr`.
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlEscapingStrategy;

impl EscapingStrategy for XmlEscapingStrategy {
    fn quote_attribute(&self, value: &str) -> String {
        let escaped = escape_entities(value)
            .replace('\n', "&#10;")
            .replace('\r', "&#13;")
            .replace('\t', "&#9;");
        quote_minimizing_escapes(&escaped)
    }

    fn escape_text(&self, text: &str, _tag: Option<&str>) -> String {
        escape_entities(text)
    }

    fn escape_comment_text(&self, text: &str) -> String {
        escape_entities(text)
    }
}

/// XML documents carry no default DOCTYPE and none is ever synthesized.
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlDoctypeStrategy;

impl DoctypeStrategy for XmlDoctypeStrategy {
    fn default_doctype(&self) -> Option<&str> {
        None
    }

    fn should_ensure_doctype(&self) -> bool {
        false
    }
}

/// A strategy that never supplies or ensures a DOCTYPE, for callers that
/// want doctype handling fully disabled regardless of format.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDoctypeStrategy;

impl DoctypeStrategy for NullDoctypeStrategy {
    fn default_doctype(&self) -> Option<&str> {
        None
    }

    fn should_ensure_doctype(&self) -> bool {
        false
    }
}

/// Every empty XML element is self-closing; there is no void-element concept.
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlEmptyElementStrategy;

impl EmptyElementStrategy for XmlEmptyElementStrategy {
    fn tag_style(&self, _tag: &str) -> EmptyElementTagStyle {
        EmptyElementTagStyle::SelfClosing
    }
}

/// No built-in attribute rules; formatting is entirely user-formatter-driven.
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlAttributeStrategy;

impl AttributeFormattingStrategy for XmlAttributeStrategy {
    fn format_attribute(&self, _tag: &str, _name: &str, value: &str) -> (String, bool) {
        (value.to_string(), false)
    }
}

/// Identical behaviour to [`XmlAttributeStrategy`]; kept as a separate type
/// so a formatter can express "no built-in attribute rules" independent of
/// document kind.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAttributeStrategy;

impl AttributeFormattingStrategy for NullAttributeStrategy {
    fn format_attribute(&self, _tag: &str, _name: &str, value: &str) -> (String, bool) {
        (value.to_string(), false)
    }
}

/// Parses with `quick-xml`, preserving CDATA sections as such.
#[derive(Debug, Clone, Copy)]
pub struct XmlParsingStrategy {
    pub preserve_cdata: bool,
}

impl Default for XmlParsingStrategy {
    fn default() -> Self {
        XmlParsingStrategy { preserve_cdata: true }
    }
}

impl ParsingStrategy for XmlParsingStrategy {
    fn parse_str(&self, source: &str) -> Result<Document> {
        crate::parsing::xml::parse_str(source, self.preserve_cdata)
    }

    fn parse_bytes(&self, source: &[u8]) -> Result<Document> {
        crate::parsing::xml::parse_bytes(source, self.preserve_cdata)
    }
}
