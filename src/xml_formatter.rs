//! The XML-strict façade (spec.md §6): binds [`Formatter`] to XML escaping,
//! parsing, DOCTYPE, empty-element, and attribute strategies, with no
//! default predicates — XML has no universal block/inline vocabulary the
//! way HTML5 does. Grounded in `xml_formatter.py`.

use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::formatter::Formatter;
use crate::node::{Document, NodeId};
use crate::strategy::xml::{XmlAttributeStrategy, XmlDoctypeStrategy, XmlEmptyElementStrategy, XmlEscapingStrategy, XmlParsingStrategy};

/// A [`Formatter`] preconfigured for XML: every empty element is
/// self-closing, no DOCTYPE is synthesized, and CDATA sections round-trip
/// (see [`XmlParsingStrategy`]).
pub struct XmlFormatter(Formatter);

impl XmlFormatter {
    pub fn new() -> Self {
        XmlFormatter(Formatter::new(
            Arc::new(XmlParsingStrategy::default()),
            Arc::new(XmlEscapingStrategy),
            Arc::new(XmlDoctypeStrategy),
            Arc::new(XmlAttributeStrategy),
            Arc::new(XmlEmptyElementStrategy),
        ))
    }

    /// Unwrap into the general [`Formatter`] for builder-method customization
    /// (`with_block_when`, `with_wrap_attributes_when`, ...). Rewrap the
    /// result with [`XmlFormatter::from_formatter`].
    pub fn into_inner(self) -> Formatter {
        self.0
    }

    /// Wrap an already-configured [`Formatter`] back into the XML façade's
    /// narrower method surface.
    pub fn from_formatter(formatter: Formatter) -> Self {
        XmlFormatter(formatter)
    }

    pub fn format_str(&self, source: &str, doctype: Option<&str>, xml_declaration: bool) -> Result<String> {
        self.0.format_str(source, doctype, xml_declaration)
    }

    pub fn format_bytes(&self, source: &[u8], doctype: Option<&str>, xml_declaration: bool) -> Result<String> {
        self.0.format_bytes(source, doctype, xml_declaration)
    }

    pub fn format_file(&self, path: &Path, doctype: Option<&str>, xml_declaration: bool) -> Result<String> {
        self.0.format_file(path, doctype, xml_declaration)
    }

    pub fn format_tree(&self, doc: &Document, doctype: Option<&str>, xml_declaration: bool) -> Result<String> {
        self.0.format_tree(doc, doctype, xml_declaration)
    }

    pub fn format_element(&self, doc: &Document, id: NodeId, doctype: Option<&str>) -> Result<String> {
        self.0.format_element(doc, id, doctype)
    }
}

impl Default for XmlFormatter {
    fn default() -> Self {
        Self::new()
    }
}
