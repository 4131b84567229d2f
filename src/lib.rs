// markuplift — a configurable pretty-printer for XML and HTML5 documents.
//
// Architecture:
//   source string/bytes → parsing strategy → node arena (`node::Document`)
//     → annotation passes (`annotation`) → serializer (`serializer`) → string
//
// Two façades sit on top of the general [`formatter::Formatter`] engine:
// [`XmlFormatter`] (strict XML, no default predicates) and
// [`Html5Formatter`] (lenient HTML5, WHATWG-vocabulary default predicates).
// Both are built from the same predicate layer (`predicates`), strategy
// layer (`strategy`), and annotation/serialization pipeline — only the
// bound strategies and default predicates differ.

mod cdata;
mod namespace;
mod serializer;
mod util;

pub mod annotation;
pub mod error;
pub mod formatter;
pub mod html5_formatter;
pub mod node;
pub mod parsing;
pub mod predicates;
pub mod strategy;
pub mod xml_formatter;

pub use error::{FormatError, Result};
pub use formatter::Formatter;
pub use html5_formatter::Html5Formatter;
pub use node::{AttrName, Attribute, Comment, Document, Element, Node, NodeArena, NodeId, ProcessingInstruction, QName, TextContent};
pub use xml_formatter::XmlFormatter;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn xml_formatter_round_trips_simple_document() {
        let formatter = XmlFormatter::new();
        let out = formatter.format_str("<root><child>hi</child></root>", None, false).unwrap();
        assert!(out.contains("<root>"));
        assert!(out.contains("<child>hi</child>"));
    }

    #[test]
    fn html5_formatter_ensures_doctype() {
        let formatter = Html5Formatter::new();
        let out = formatter.format_str("<html><body><p>hi</p></body></html>", None).unwrap();
        assert!(out.starts_with("<!DOCTYPE html>"));
    }
}
