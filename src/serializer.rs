//! Event-driven tree serialization (spec.md §4.5): walks the annotated tree
//! and emits output, consulting the bound strategies and user formatter
//! hooks at each element. Grounded in `document_formatter.py`'s
//! `_format_element`, `_is_self_closing`, `_validate_attribute_reordering`,
//! `_text_content`/`_tail_content`, and the `_escape_text_content`/
//! `_escape_comment_text_content` singledispatch pair.
//!
//! The original walks the tree with an explicit `etree.iterwalk` event
//! iterator (`start`/`end`/`comment`/`pi`). This serializes the same tree in
//! the same document order via ordinary recursive descent, which produces
//! identical output and reads more naturally in Rust.

use crate::annotation::Annotations;
use crate::error::{FormatError, Result};
use crate::formatter::{AttributeReorderer, AttributeValueFormatter, Formatter, TextTransformFn};
use crate::namespace;
use crate::node::{Document, Node, NodeId, TextContent};
use crate::predicates::{AttributePredicate, ElementPredicate};
use crate::strategy::{AttributeFormattingStrategy, EmptyElementStrategy, EmptyElementTagStyle, EscapingStrategy};

/// Everything the walk needs, bound to one document and one set of
/// annotations. Borrowed for the whole walk; never mutated.
pub(crate) struct SerializeContext<'a> {
    pub doc: &'a Document,
    pub annotations: &'a Annotations,
    pub one_indent: &'a str,
    pub wrap_attributes: &'a ElementPredicate,
    pub attribute_reorderers: &'a [(ElementPredicate, AttributeReorderer)],
    pub text_content_formatters: &'a [(ElementPredicate, TextTransformFn)],
    pub attribute_content_formatters: &'a [(AttributePredicate, AttributeValueFormatter)],
    pub escaping: &'a dyn EscapingStrategy,
    pub attribute_strategy: &'a dyn AttributeFormattingStrategy,
    pub empty_element: &'a dyn EmptyElementStrategy,
    pub formatter: &'a Formatter,
}

/// Serialize the subtree rooted at `id`, appending to `out`.
pub(crate) fn serialize_subtree(ctx: &SerializeContext, id: NodeId, out: &mut String) -> Result<()> {
    match ctx.doc.arena.get(id) {
        Node::Element(_) => serialize_element(ctx, id, out),
        Node::Comment(comment) => {
            serialize_comment(ctx, id, &comment.text.clone(), out);
            Ok(())
        }
        Node::Pi(pi) => {
            serialize_pi(ctx, id, &pi.target.clone(), pi.text.clone(), out);
            Ok(())
        }
    }
}

fn content_for(ctx: &SerializeContext, id: NodeId) -> TextContent {
    match ctx.doc.arena.get(id) {
        Node::Element(e) => e.text.clone(),
        Node::Comment(c) => TextContent::from(c.text.clone()),
        Node::Pi(_) => TextContent::Empty,
    }
}

/// Apply `.text`-transforms then the first matching user text-content
/// formatter. CDATA content skips the transform chain (whitespace
/// normalization never touches CDATA-preserved content) but is still
/// eligible for a user formatter, which may return either variant. `Empty`
/// content still runs through the transform chain as `""` — an element with
/// no text node at all still needs, e.g., a newline-and-indent inserted
/// before its first block child.
fn compute_text_content(ctx: &SerializeContext, id: NodeId) -> TextContent {
    let mut content = content_for(ctx, id);
    if !content.is_cdata() {
        let mut s = content.as_str().to_string();
        for transform in ctx.annotations.text_transforms(id) {
            s = transform(&s);
        }
        content = TextContent::from(s);
    }
    let physical_level = ctx.annotations.physical_level(id).unwrap_or(0);
    for (predicate, formatter) in ctx.text_content_formatters {
        if predicate(ctx.doc, id) {
            content = formatter(content, ctx.formatter, physical_level);
            break;
        }
    }
    content
}

/// Apply `.tail`-transforms only; tail content has no user formatter hook.
/// `Empty` content still runs through the chain as `""`, for the same reason
/// as [`compute_text_content`]: a block element with no tail text still needs
/// a newline-and-indent inserted before a following block sibling.
fn compute_tail_content(ctx: &SerializeContext, id: NodeId) -> TextContent {
    let mut tail = ctx.doc.arena.get(id).tail().clone();
    if !tail.is_cdata() {
        let mut s = tail.as_str().to_string();
        for transform in ctx.annotations.tail_transforms(id) {
            s = transform(&s);
        }
        tail = TextContent::from(s);
    }
    tail
}

fn escape_text_content(ctx: &SerializeContext, content: &TextContent, tag: Option<&str>) -> String {
    match content {
        TextContent::Empty => String::new(),
        TextContent::Plain(s) => ctx.escaping.escape_text(s, tag),
        TextContent::Cdata(s) => crate::cdata::render_safe_cdata(s),
    }
}

fn escape_comment_content(ctx: &SerializeContext, content: &TextContent) -> String {
    match content {
        TextContent::Empty => String::new(),
        TextContent::Plain(s) => ctx.escaping.escape_comment_text(s),
        // A CDATA-marked comment body is passed through unescaped, matching
        // the original's `isinstance(content, CDATA)` branch in
        // `_escape_comment_text_content`.
        TextContent::Cdata(s) => s.clone(),
    }
}

fn serialize_element(ctx: &SerializeContext, id: NodeId, out: &mut String) -> Result<()> {
    let elem = ctx.doc.arena.get(id).as_element().expect("serialize_element on non-element");
    let tag = namespace::format_tag_name(elem);
    let physical_level = ctx.annotations.physical_level(id).unwrap_or(0);
    let must_wrap = (ctx.wrap_attributes)(ctx.doc, id);

    out.push('<');
    out.push_str(&tag);

    let attribute_spacer = if must_wrap {
        format!("\n{}", ctx.one_indent.repeat(physical_level as usize + 1))
    } else {
        " ".to_string()
    };

    let mut attribute_names: Vec<String> = elem.attributes.iter().map(|a| a.name.match_key()).collect();
    for (predicate, reorderer) in ctx.attribute_reorderers {
        if predicate(ctx.doc, id) {
            let reordered = reorderer(&attribute_names);
            validate_attribute_reordering(&attribute_names, &reordered, &tag)?;
            attribute_names = reordered;
            break;
        }
    }

    let value_level = physical_level + u32::from(must_wrap);
    let mut emitted_any_attribute = false;
    for name in &attribute_names {
        let Some(attr) = elem.attributes.iter().find(|a| &a.name.match_key() == name) else {
            continue;
        };
        let serialized_name = namespace::format_attribute_name(&attr.name, &elem.nsmap);

        let mut value = attr.value.clone();
        for (predicate, formatter) in ctx.attribute_content_formatters {
            if predicate(ctx.doc, id, name, &attr.value) {
                value = formatter(&value, ctx.formatter, value_level);
                break;
            }
        }

        let (formatted_value, minimize) = ctx.attribute_strategy.format_attribute(&tag, name, &value);
        out.push_str(&attribute_spacer);
        out.push_str(&serialized_name);
        emitted_any_attribute = true;
        if !minimize {
            out.push('=');
            out.push_str(&ctx.escaping.quote_attribute(&formatted_value));
        }
    }

    let xmlns_decls = namespace::format_xmlns_declarations(&namespace::new_namespace_declarations(ctx.doc, id));
    for decl in &xmlns_decls {
        out.push_str(&attribute_spacer);
        out.push_str(decl);
        emitted_any_attribute = true;
    }

    if emitted_any_attribute && must_wrap {
        out.push('\n');
        out.push_str(&ctx.one_indent.repeat(physical_level as usize));
    }

    let text_content = compute_text_content(ctx, id);
    let is_self_closing = text_content.is_empty() && elem.children.is_empty();

    let omits_end_tag = if is_self_closing {
        match ctx.empty_element.tag_style(&elem.name.local) {
            EmptyElementTagStyle::Void => {
                out.push('>');
                true
            }
            EmptyElementTagStyle::SelfClosing => {
                if !must_wrap {
                    out.push(' ');
                }
                out.push_str("/>");
                true
            }
            EmptyElementTagStyle::Explicit => {
                out.push('>');
                false
            }
        }
    } else {
        out.push('>');
        out.push_str(&escape_text_content(ctx, &text_content, Some(&elem.name.local)));
        false
    };

    for &child in &elem.children {
        serialize_subtree(ctx, child, out)?;
    }

    if !omits_end_tag {
        out.push_str("</");
        out.push_str(&tag);
        out.push('>');
    }

    let tail_content = compute_tail_content(ctx, id);
    out.push_str(&escape_text_content(ctx, &tail_content, None));

    Ok(())
}

fn serialize_comment(ctx: &SerializeContext, id: NodeId, _raw_text: &str, out: &mut String) {
    let content = compute_text_content(ctx, id);
    let escaped = escape_comment_content(ctx, &content);
    out.push_str("<!--");
    if !escaped.is_empty() {
        if escaped.starts_with('-') {
            out.push(' ');
        }
        out.push_str(&escaped);
        if escaped.ends_with('-') {
            out.push(' ');
        }
    }
    out.push_str("-->");

    let tail_content = compute_tail_content(ctx, id);
    out.push_str(&escape_text_content(ctx, &tail_content, None));
}

/// Processing instructions are emitted verbatim (target and data are never
/// escaped or transformed); only the tail goes through the normal pipeline.
fn serialize_pi(ctx: &SerializeContext, id: NodeId, target: &str, text: Option<String>, out: &mut String) {
    out.push_str("<?");
    out.push_str(target);
    if let Some(text) = text.filter(|t| !t.is_empty()) {
        out.push(' ');
        out.push_str(&text);
    }
    out.push_str("?>");

    let tail_content = compute_tail_content(ctx, id);
    out.push_str(&escape_text_content(ctx, &tail_content, None));
}

/// Check that `reordered` is a permutation of `original`, producing the same
/// multi-line diagnostic shape as `_validate_attribute_reordering`.
fn validate_attribute_reordering(original: &[String], reordered: &[String], tag: &str) -> Result<()> {
    if original.len() != reordered.len() {
        return Err(FormatError::ReordererContractViolation {
            tag: tag.to_string(),
            detail: format!(
                "expected {} attribute name(s), got {}",
                original.len(),
                reordered.len()
            ),
        });
    }

    let mut missing = Vec::new();
    for name in original {
        if !reordered.contains(name) {
            missing.push(name.clone());
        }
    }
    let mut extra = Vec::new();
    for name in reordered {
        if !original.contains(name) {
            extra.push(name.clone());
        }
    }
    if !missing.is_empty() || !extra.is_empty() {
        let mut detail = String::new();
        if !missing.is_empty() {
            detail.push_str(&format!("missing: {}", missing.join(", ")));
        }
        if !extra.is_empty() {
            if !detail.is_empty() {
                detail.push_str("; ");
            }
            detail.push_str(&format!("unexpected: {}", extra.join(", ")));
        }
        return Err(FormatError::ReordererContractViolation {
            tag: tag.to_string(),
            detail,
        });
    }

    let mut original_sorted = original.to_vec();
    let mut reordered_sorted = reordered.to_vec();
    original_sorted.sort();
    reordered_sorted.sort();
    if original_sorted != reordered_sorted {
        let mut original_counts: std::collections::HashMap<&str, i32> = std::collections::HashMap::new();
        for name in original {
            *original_counts.entry(name.as_str()).or_insert(0) += 1;
        }
        for name in reordered {
            *original_counts.entry(name.as_str()).or_insert(0) -= 1;
        }
        let mut duplicated: Vec<&str> = original_counts
            .into_iter()
            .filter(|(_, count)| *count != 0)
            .map(|(name, _)| name)
            .collect();
        duplicated.sort();
        return Err(FormatError::ReordererContractViolation {
            tag: tag.to_string(),
            detail: format!("attribute name(s) reordered into a duplicate: {}", duplicated.join(", ")),
        });
    }

    Ok(())
}
