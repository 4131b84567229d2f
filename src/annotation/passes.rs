//! The fifteen ordered annotation passes (spec.md §4.2). Each pass walks the
//! whole tree in document order and writes to the shared [`Annotations`]
//! side-table; later passes read what earlier passes wrote. Document order
//! here is pre-order (parent before children), which is what lets the
//! inheritance passes (4, 5, 7) cascade correctly in a single walk, exactly
//! as the single `for elem in root.iter()` loop does in `annotation.py`.

use std::sync::Arc;

use crate::error::Result;
use crate::node::Document;
use crate::predicates::ElementPredicate;
use crate::util::{is_in_mixed_content, normalize_ws, xml_space_attr};

use super::{all_nodes, transforms, Annotations, ConflictMode, ElementType, TextTransform, Whitespace};

/// Pass 1. Elements matched by the user's block predicate become `Block`.
/// Conflicting with an existing, different type is an error.
pub fn explicit_block(doc: &Document, annotations: &mut Annotations, predicate: &ElementPredicate) -> Result<()> {
    for id in all_nodes(doc) {
        if predicate(doc, id) {
            let tag = doc.arena.get(id).display_tag();
            annotations.set_type(id, ElementType::Block, &tag, ConflictMode::Raise)?;
        }
    }
    Ok(())
}

/// Pass 2. Elements matched by the user's inline predicate become `Inline`.
pub fn explicit_inline(doc: &Document, annotations: &mut Annotations, predicate: &ElementPredicate) -> Result<()> {
    for id in all_nodes(doc) {
        if predicate(doc, id) {
            let tag = doc.arena.get(id).display_tag();
            annotations.set_type(id, ElementType::Inline, &tag, ConflictMode::Raise)?;
        }
    }
    Ok(())
}

/// Pass 3. An element whose parent has direct significant text becomes
/// `Inline`, unless already typed.
pub fn mixed_content_inline(doc: &Document, annotations: &mut Annotations) -> Result<()> {
    for id in all_nodes(doc) {
        if is_in_mixed_content(doc, id) {
            let tag = doc.arena.get(id).display_tag();
            annotations.set_type(id, ElementType::Inline, &tag, ConflictMode::Skip)?;
        }
    }
    Ok(())
}

/// Pass 4. Descendants of an `Inline` element become `Inline`, unless
/// already typed. Does not cross a block boundary because an element typed
/// `Block` by an earlier pass is skipped, stopping the cascade there.
pub fn inline_inheritance(doc: &Document, annotations: &mut Annotations) -> Result<()> {
    for id in all_nodes(doc) {
        if let Some(parent) = doc.arena.get(id).parent() {
            if annotations.element_type(parent) == Some(ElementType::Inline) {
                let tag = doc.arena.get(id).display_tag();
                annotations.set_type(id, ElementType::Inline, &tag, ConflictMode::Skip)?;
            }
        }
    }
    Ok(())
}

/// Pass 5. An element becomes `Block` iff its parent is `Block`, it is not
/// itself in mixed content, and no sibling is already `Inline`.
pub fn block_subtree_inheritance(doc: &Document, annotations: &mut Annotations) -> Result<()> {
    for id in all_nodes(doc) {
        if let Some(parent) = doc.arena.get(id).parent() {
            let parent_is_block = annotations.element_type(parent) == Some(ElementType::Block);
            let in_mixed = is_in_mixed_content(doc, id);
            let sibling_is_inline = doc
                .arena
                .siblings(id)
                .iter()
                .any(|&s| annotations.element_type(s) == Some(ElementType::Inline));
            if parent_is_block && !in_mixed && !sibling_is_inline {
                let tag = doc.arena.get(id).display_tag();
                annotations.set_type(id, ElementType::Block, &tag, ConflictMode::Skip)?;
            }
        }
    }
    Ok(())
}

/// Pass 6. The user's preserve predicate sets `whitespace=preserve`,
/// overwriting any existing whitespace annotation.
pub fn explicit_preserve(doc: &Document, annotations: &mut Annotations, predicate: &ElementPredicate) {
    for id in all_nodes(doc) {
        if predicate(doc, id) {
            annotations.set_whitespace(id, Whitespace::Preserve, ConflictMode::Overwrite);
        }
    }
}

/// Pass 7. Descendants of a `preserve` element become `preserve`, unless
/// already annotated.
pub fn preserve_inheritance(doc: &Document, annotations: &mut Annotations) {
    for id in all_nodes(doc) {
        if let Some(parent) = doc.arena.get(id).parent() {
            if annotations.whitespace(parent) == Some(Whitespace::Preserve) {
                annotations.set_whitespace(id, Whitespace::Preserve, ConflictMode::Skip);
            }
        }
    }
}

/// Pass 8. The user's normalize predicate sets `whitespace=normalize`,
/// overwriting.
pub fn explicit_normalize(doc: &Document, annotations: &mut Annotations, predicate: &ElementPredicate) {
    for id in all_nodes(doc) {
        if predicate(doc, id) {
            annotations.set_whitespace(id, Whitespace::Normalize, ConflictMode::Overwrite);
        }
    }
}

/// Pass 9. The user's strip predicate sets `whitespace=strip`, overwriting.
pub fn explicit_strip(doc: &Document, annotations: &mut Annotations, predicate: &ElementPredicate) {
    for id in all_nodes(doc) {
        if predicate(doc, id) {
            annotations.set_whitespace(id, Whitespace::Strip, ConflictMode::Overwrite);
        }
    }
}

/// Pass 10. `xml:space="preserve"`, or inheriting a `strict` parent without
/// an intervening `xml:space="default"`, sets `whitespace=strict`. Always
/// overwrites: `xml:space` semantics are non-negotiable (spec.md §3).
pub fn xml_space(doc: &Document, annotations: &mut Annotations) {
    for id in all_nodes(doc) {
        let Some(elem) = doc.arena.get(id).as_element() else {
            continue;
        };
        let space = xml_space_attr(elem);
        let is_preserve = space == Some("preserve");
        let is_default = space == Some("default");
        let parent_strict = doc
            .arena
            .get(id)
            .parent()
            .map(|p| annotations.whitespace(p) == Some(Whitespace::Strict))
            .unwrap_or(false);
        if is_preserve || (parent_strict && !is_default) {
            annotations.set_whitespace(id, Whitespace::Strict, ConflictMode::Overwrite);
        }
    }
}

/// Pass 11. Elements still lacking a `type` receive `default_type`.
pub fn default_type(doc: &Document, annotations: &mut Annotations, default_type: ElementType) -> Result<()> {
    for id in all_nodes(doc) {
        if annotations.element_type(id).is_none() {
            let tag = doc.arena.get(id).display_tag();
            annotations.set_type(id, default_type, &tag, ConflictMode::Skip)?;
        }
    }
    Ok(())
}

/// Pass 12. `logical_level` = parent's `logical_level` + 1; root is 0.
pub fn logical_level(doc: &Document, annotations: &mut Annotations) {
    annotations.set_logical_level(doc.root, 0);
    for id in all_nodes(doc) {
        if let Some(parent) = doc.arena.get(id).parent() {
            if let Some(parent_level) = annotations.logical_level(parent) {
                annotations.set_logical_level(id, parent_level + 1);
            }
        }
    }
}

/// Pass 13. `physical_level` = parent's level, +1 only when the parent is
/// `Block` (an inline parent does not add an indentation level).
pub fn physical_level(doc: &Document, annotations: &mut Annotations) {
    annotations.set_physical_level(doc.root, 0);
    for id in all_nodes(doc) {
        if let Some(parent) = doc.arena.get(id).parent() {
            if let Some(parent_level) = annotations.physical_level(parent) {
                let level = match annotations.element_type(parent) {
                    Some(ElementType::Inline) => parent_level,
                    Some(ElementType::Block) => parent_level + 1,
                    None => parent_level,
                };
                annotations.set_physical_level(id, level);
            }
        }
    }
}

fn normalize_transform() -> TextTransform {
    Arc::new(|s: &str| normalize_ws(s))
}

fn lstrip_transform() -> TextTransform {
    Arc::new(|s: &str| s.trim_start().to_string())
}

fn rstrip_transform() -> TextTransform {
    Arc::new(|s: &str| s.trim_end().to_string())
}

/// Pass 14. Computes the `.text` transform list for every element (spec.md
/// §4.3). `preserve`/`strict` whitespace disables all transforms; otherwise
/// normalize/strip apply, and a block first child forces a trailing newline
/// and indent so the child starts on its own line.
pub fn text_transforms(doc: &Document, annotations: &mut Annotations, one_indent: &str) {
    for id in all_nodes(doc) {
        let mut chain: Vec<TextTransform> = Vec::new();
        let whitespace = annotations.whitespace(id);
        let first_child = doc.arena.children(id).first().copied();
        let first_child_type = first_child.and_then(|c| annotations.element_type(c));

        if !matches!(whitespace, Some(Whitespace::Preserve) | Some(Whitespace::Strict)) {
            if matches!(whitespace, Some(Whitespace::Normalize) | Some(Whitespace::Strip)) {
                chain.push(normalize_transform());
                if whitespace == Some(Whitespace::Strip) {
                    chain.push(lstrip_transform());
                }
            }
            if first_child_type == Some(ElementType::Block) {
                let child_level = first_child
                    .and_then(|c| annotations.physical_level(c))
                    .unwrap_or(0);
                let indent = one_indent.to_string();
                chain.push(Arc::new(move |s: &str| {
                    transforms::text_preceding_block(s, child_level, &indent)
                }));
            }
            if first_child.is_none() && whitespace == Some(Whitespace::Strip) {
                chain.push(rstrip_transform());
            }
        }

        annotations.set_text_transforms(id, chain);
    }
}

/// Pass 15. Computes the `.tail` transform list for every node (spec.md
/// §4.3). Depends on the *parent's* whitespace and the node's own type,
/// since tail text lives in the parent's content area.
pub fn tail_transforms(doc: &Document, annotations: &mut Annotations, one_indent: &str) {
    for id in all_nodes(doc) {
        let mut chain: Vec<TextTransform> = Vec::new();
        let parent = doc.arena.get(id).parent();
        let parent_whitespace = parent.and_then(|p| annotations.whitespace(p));
        let parent_physical_level = parent.and_then(|p| annotations.physical_level(p)).unwrap_or(0);
        let next_sibling = doc.arena.next_sibling(id);
        let next_sibling_type = next_sibling.and_then(|s| annotations.element_type(s));
        let elem_type = annotations.element_type(id);

        if !matches!(parent_whitespace, Some(Whitespace::Preserve) | Some(Whitespace::Strict)) {
            if matches!(parent_whitespace, Some(Whitespace::Normalize) | Some(Whitespace::Strip)) {
                chain.push(normalize_transform());
                if next_sibling.is_none() && parent_whitespace == Some(Whitespace::Strip) {
                    chain.push(rstrip_transform());
                }
            }

            if elem_type == Some(ElementType::Block) {
                match next_sibling_type {
                    Some(ElementType::Block) => {
                        let indent = one_indent.to_string();
                        chain.push(Arc::new(move |s: &str| {
                            transforms::text_following_block(s, parent_physical_level, &indent)
                        }));
                    }
                    Some(ElementType::Inline) => {
                        chain.push(Arc::new(move |s: &str| {
                            transforms::text_following_block_preceding_inline(s, parent_physical_level)
                        }));
                    }
                    None => {
                        if parent.is_some() {
                            let indent = one_indent.to_string();
                            chain.push(Arc::new(move |s: &str| {
                                transforms::text_following_block(s, parent_physical_level, &indent)
                            }));
                        } else {
                            // The node is the document root: it must never carry a tail.
                            chain.push(Arc::new(|_s: &str| String::new()));
                        }
                    }
                }
            }

            if let Some(next) = next_sibling {
                if next_sibling_type == Some(ElementType::Block) {
                    let sibling_level = annotations.physical_level(next).unwrap_or(0);
                    let indent = one_indent.to_string();
                    chain.push(Arc::new(move |s: &str| {
                        transforms::text_preceding_block(s, sibling_level, &indent)
                    }));
                }
            }
        }

        annotations.set_tail_transforms(id, chain);
    }
}
