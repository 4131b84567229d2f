//! The HTML5-lenient façade (spec.md §6): binds [`Formatter`] to HTML5
//! escaping, parsing, DOCTYPE, empty-element, and attribute strategies, plus
//! the default block/inline/whitespace predicates built from the HTML5 tag
//! vocabularies. No `xml_declaration` flag is exposed — meaningless for
//! HTML5, matching `html5_formatter.py`, which hardcodes it to `False`.
//! Grounded in `html5_formatter.py`.

use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::formatter::Formatter;
use crate::node::{Document, NodeId};
use crate::predicates::element::{css_block_elements, html_block_elements, html_inline_elements, html_whitespace_significant_elements};
use crate::predicates::{all_of, not_matching};
use crate::strategy::html5::{Html5AttributeStrategy, Html5DoctypeStrategy, Html5EmptyElementStrategy, Html5ParsingStrategy, HtmlEscapingStrategy};

/// A [`Formatter`] preconfigured for HTML5: void elements close with a
/// single tag, a `<!DOCTYPE html>` is ensured, and the default predicates
/// classify elements using the WHATWG block/inline/whitespace-significant
/// vocabularies.
pub struct Html5Formatter(Formatter);

impl Html5Formatter {
    pub fn new() -> Self {
        let formatter = Formatter::new(
            Arc::new(Html5ParsingStrategy),
            Arc::new(HtmlEscapingStrategy),
            Arc::new(Html5DoctypeStrategy),
            Arc::new(Html5AttributeStrategy),
            Arc::new(Html5EmptyElementStrategy),
        )
        .with_block_when(html_block_elements())
        .with_inline_when(html_inline_elements())
        .with_preserve_whitespace_when(html_whitespace_significant_elements())
        .with_normalize_whitespace_when(not_matching(html_whitespace_significant_elements()))
        .with_strip_whitespace_when(all_of(vec![
            not_matching(html_whitespace_significant_elements()),
            css_block_elements(),
        ]));
        Html5Formatter(formatter)
    }

    /// Unwrap into the general [`Formatter`] for builder-method customization.
    /// Rewrap the result with [`Html5Formatter::from_formatter`].
    pub fn into_inner(self) -> Formatter {
        self.0
    }

    /// Wrap an already-configured [`Formatter`] back into the HTML5 façade's
    /// narrower method surface.
    pub fn from_formatter(formatter: Formatter) -> Self {
        Html5Formatter(formatter)
    }

    pub fn format_str(&self, source: &str, doctype: Option<&str>) -> Result<String> {
        self.0.format_str(source, doctype, false)
    }

    pub fn format_bytes(&self, source: &[u8], doctype: Option<&str>) -> Result<String> {
        self.0.format_bytes(source, doctype, false)
    }

    pub fn format_file(&self, path: &Path, doctype: Option<&str>) -> Result<String> {
        self.0.format_file(path, doctype, false)
    }

    pub fn format_tree(&self, doc: &Document, doctype: Option<&str>) -> Result<String> {
        self.0.format_tree(doc, doctype, false)
    }

    pub fn format_element(&self, doc: &Document, id: NodeId, doctype: Option<&str>) -> Result<String> {
        self.0.format_element(doc, id, doctype)
    }
}

impl Default for Html5Formatter {
    fn default() -> Self {
        Self::new()
    }
}
