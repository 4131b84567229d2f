//! HTML5 strategy implementations. Grounded in `escaping.py`'s
//! `HtmlEscapingStrategy`, `doctype.py`'s `Html5DoctypeStrategy`,
//! `empty_element.py`'s `Html5EmptyElementStrategy` (and its exact 13-entry
//! void-element set), and `attribute_formatting.py`'s
//! `Html5AttributeStrategy` (and its 22-entry boolean-attribute set).

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::error::Result;
use crate::node::Document;

use super::{
    escape_entities, quote_minimizing_escapes, AttributeFormattingStrategy, DoctypeStrategy,
    EmptyElementStrategy, EmptyElementTagStyle, EscapingStrategy, ParsingStrategy,
};

/// Elements whose content the HTML5 parser never decodes entities in
/// (RAWTEXT states): re-escaping their already-raw text would double-encode it.
const RAWTEXT_ELEMENTS: [&str; 2] = ["script", "style"];

/// Escapes `&`, `<`, `>` in ordinary text, but passes `<script>`/`<style>`
/// content through verbatim, and allows literal newlines in attribute values.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlEscapingStrategy;

impl EscapingStrategy for HtmlEscapingStrategy {
    fn quote_attribute(&self, value: &str) -> String {
        let escaped = escape_entities(value);
        quote_minimizing_escapes(&escaped)
    }

    fn escape_text(&self, text: &str, tag: Option<&str>) -> String {
        if tag.is_some_and(|t| RAWTEXT_ELEMENTS.contains(&t)) {
            text.to_string()
        } else {
            escape_entities(text)
        }
    }

    fn escape_comment_text(&self, text: &str) -> String {
        escape_entities(text)
    }
}

/// HTML5 documents default to `<!DOCTYPE html>` and always ensure one is
/// present even if the parsed source lacked it.
#[derive(Debug, Default, Clone, Copy)]
pub struct Html5DoctypeStrategy;

impl DoctypeStrategy for Html5DoctypeStrategy {
    fn default_doctype(&self) -> Option<&str> {
        Some("<!DOCTYPE html>")
    }

    fn should_ensure_doctype(&self) -> bool {
        true
    }
}

static HTML5_VOID_ELEMENTS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
        "track", "wbr",
    ]
    .into_iter()
    .collect()
});

/// The 13 WHATWG void elements render as a single tag with no slash; every
/// other HTML5 element, even when empty, keeps an explicit end tag (HTML5
/// self-closing syntax on non-void elements is invalid and must not be
/// emitted).
#[derive(Debug, Default, Clone, Copy)]
pub struct Html5EmptyElementStrategy;

impl EmptyElementStrategy for Html5EmptyElementStrategy {
    fn tag_style(&self, tag: &str) -> EmptyElementTagStyle {
        if HTML5_VOID_ELEMENTS.contains(tag) {
            EmptyElementTagStyle::Void
        } else {
            EmptyElementTagStyle::Explicit
        }
    }
}

static HTML5_BOOLEAN_ATTRIBUTES: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "async",
        "autofocus",
        "autoplay",
        "checked",
        "controls",
        "default",
        "defer",
        "disabled",
        "formnovalidate",
        "hidden",
        "ismap",
        "itemscope",
        "loop",
        "multiple",
        "muted",
        "nomodule",
        "novalidate",
        "open",
        "readonly",
        "required",
        "reversed",
        "selected",
    ]
    .into_iter()
    .collect()
});

/// Minimizes HTML5 boolean attributes (`checked`, `disabled`, ...) to a bare
/// name, discarding whatever value the source carried.
#[derive(Debug, Default, Clone, Copy)]
pub struct Html5AttributeStrategy;

impl AttributeFormattingStrategy for Html5AttributeStrategy {
    fn format_attribute(&self, _tag: &str, name: &str, value: &str) -> (String, bool) {
        if HTML5_BOOLEAN_ATTRIBUTES.contains(name) {
            (String::new(), true)
        } else {
            (value.to_string(), false)
        }
    }
}

/// Parses with `html5ever`, HTML5's error-tolerant tree construction
/// algorithm. HTML5 has no CDATA concept: the parser never produces CDATA
/// sections, so `preserve_cdata` has no observable effect here and exists
/// only for interface symmetry with [`super::xml::XmlParsingStrategy`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Html5ParsingStrategy;

impl ParsingStrategy for Html5ParsingStrategy {
    fn parse_str(&self, source: &str) -> Result<Document> {
        crate::parsing::html5::parse_str(source)
    }

    fn parse_bytes(&self, source: &[u8]) -> Result<Document> {
        crate::parsing::html5::parse_bytes(source)
    }
}
