// End-to-end API tests: the six literal scenarios and the round-trip/
// idempotence properties markuplift's formatting is expected to satisfy.

use pretty_assertions::assert_eq;

use markuplift::node::{Document, Element, Node, NodeArena, NsMap, QName, TextContent};
use markuplift::predicates::element::tag_in;
use markuplift::{Html5Formatter, XmlFormatter};

#[test]
fn basic_block_nesting() {
    let formatter = XmlFormatter::from_formatter(
        XmlFormatter::new()
            .into_inner()
            .with_block_when(tag_in(["root", "block"]).unwrap())
            .with_indent_size(2),
    );
    let out = formatter
        .format_str("<root><block><block>text</block></block></root>", None, false)
        .unwrap();
    assert_eq!(out, "<root>\n  <block>\n    <block>text</block>\n  </block>\n</root>");
}

#[test]
fn mixed_content_keeps_unmarked_child_inline() {
    let formatter = XmlFormatter::from_formatter(
        XmlFormatter::new()
            .into_inner()
            .with_block_when(tag_in(["root", "block"]).unwrap())
            .with_indent_size(2),
    );
    let out = formatter
        .format_str("<root><block>before <inline>x</inline> after</block></root>", None, false)
        .unwrap();
    assert_eq!(out, "<root>\n  <block>before <inline>x</inline> after</block>\n</root>");
}

#[test]
fn xml_space_preserve_wins_over_normalize() {
    let formatter = XmlFormatter::from_formatter(
        XmlFormatter::new()
            .into_inner()
            .with_normalize_whitespace_when(tag_in(["p"]).unwrap()),
    );
    let out = formatter
        .format_str(r#"<p xml:space="preserve">  a   b  </p>"#, None, false)
        .unwrap();
    assert_eq!(out, r#"<p xml:space="preserve">  a   b  </p>"#);
}

#[test]
fn html5_boolean_attribute_and_void_element() {
    let formatter = Html5Formatter::new();
    let out = formatter
        .format_str(r#"<div><input checked="checked" disabled="true" type="text"></div>"#, None)
        .unwrap();
    assert_eq!(
        out,
        "<!DOCTYPE html>\n<div>\n  <input checked disabled type=\"text\">\n</div>"
    );
}

#[test]
fn cdata_containing_close_marker_is_split() {
    let mut arena = NodeArena::new();
    let root = arena.push(Node::Element(Element {
        name: QName::local("root"),
        attributes: vec![],
        text: TextContent::Cdata("before]]>after".to_string()),
        tail: TextContent::Empty,
        children: vec![],
        parent: None,
        nsmap: NsMap::new(),
    }));
    let doc = Document {
        arena,
        root,
        doctype: None,
        prologue: vec![],
    };

    let formatter = XmlFormatter::new();
    let out = formatter.format_element(&doc, doc.root, None).unwrap();
    assert_eq!(out, "<root><![CDATA[before]]]]>&gt;<![CDATA[after]]></root>");
}

#[test]
fn namespace_declared_once_on_introducing_element() {
    let formatter = XmlFormatter::from_formatter(XmlFormatter::new().into_inner().with_block_when(tag_in(["root", "svg", "rect"]).unwrap()));
    let out = formatter
        .format_str(r#"<root><svg xmlns="http://www.w3.org/2000/svg"><rect/></svg></root>"#, None, false)
        .unwrap();
    assert!(out.contains(r#"<svg xmlns="http://www.w3.org/2000/svg">"#));
    assert!(!out.contains("<root xmlns"));
    assert!(out.contains("<rect />"));
}

#[test]
fn formatting_is_idempotent() {
    let formatter = XmlFormatter::from_formatter(XmlFormatter::new().into_inner().with_block_when(tag_in(["root", "block"]).unwrap()));
    let once = formatter.format_str("<root><block>  text  </block></root>", None, false).unwrap();
    let twice = formatter.format_str(&once, None, false).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn reparsing_formatted_output_reformats_to_the_same_string() {
    let formatter = Html5Formatter::new();
    let first = formatter.format_str("<html><body><p>hello <b>world</b></p></body></html>", None).unwrap();
    let second = formatter.format_str(&first, None).unwrap();
    assert_eq!(first, second);
}
