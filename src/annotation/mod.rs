//! The annotation side-table: node id → metadata, written by the ordered
//! passes in [`passes`] and consumed by the serializer. No tree mutation.
//! Grounded in `annotation.py`'s `Annotations` class; the `dict[str, Any]`
//! per-element bag becomes a typed [`NodeAnnotation`] struct since the five
//! annotation keys are fixed and known ahead of time.

pub mod passes;
pub mod transforms;

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{FormatError, Result};
use crate::node::{Document, NodeId};

/// Layout role assigned to every element by the end of the type-annotation
/// passes (spec.md §4.2, passes 1-5 and 11).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    Block,
    Inline,
}

impl ElementType {
    fn label(self) -> &'static str {
        match self {
            ElementType::Block => "block",
            ElementType::Inline => "inline",
        }
    }
}

/// Whitespace discipline assigned by the whitespace-annotation passes
/// (spec.md §4.2, passes 6-10). `Strict` represents `xml:space="preserve"`
/// semantics and always wins: it overwrites any other whitespace value and
/// nothing overwrites it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Whitespace {
    Preserve,
    Normalize,
    Strip,
    Strict,
}

impl Whitespace {
    fn label(self) -> &'static str {
        match self {
            Whitespace::Preserve => "preserve",
            Whitespace::Normalize => "normalize",
            Whitespace::Strip => "strip",
            Whitespace::Strict => "strict",
        }
    }
}

/// How [`Annotations::set_type`]/[`Annotations::set_whitespace`] behave when
/// the node already carries a value for that key. Mirrors
/// `AnnotationConflictMode` in the original source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictMode {
    /// Fail unless the new value equals the existing one.
    Raise,
    /// Leave the existing value in place, silently.
    Skip,
    /// Replace the existing value unconditionally.
    Overwrite,
}

/// A `content, physical_level → content` closure applied to `.text`/`.tail`
/// at serialization time. Operates on plain strings; CDATA content is never
/// subject to whitespace transforms (spec.md §4.3's final paragraph).
pub type TextTransform = Arc<dyn Fn(&str) -> String + Send + Sync>;

#[derive(Default)]
struct NodeAnnotation {
    element_type: Option<ElementType>,
    whitespace: Option<Whitespace>,
    logical_level: Option<u32>,
    physical_level: Option<u32>,
    text_transforms: Vec<TextTransform>,
    tail_transforms: Vec<TextTransform>,
}

/// The side-table itself: one [`NodeAnnotation`] bag per visited node id.
/// Scoped to a single `format_*` call, matching spec.md §5's resource model.
#[derive(Default)]
pub struct Annotations {
    entries: HashMap<NodeId, NodeAnnotation>,
}

impl Annotations {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, id: NodeId) -> &mut NodeAnnotation {
        self.entries.entry(id).or_default()
    }

    pub fn element_type(&self, id: NodeId) -> Option<ElementType> {
        self.entries.get(&id).and_then(|a| a.element_type)
    }

    pub fn whitespace(&self, id: NodeId) -> Option<Whitespace> {
        self.entries.get(&id).and_then(|a| a.whitespace)
    }

    pub fn logical_level(&self, id: NodeId) -> Option<u32> {
        self.entries.get(&id).and_then(|a| a.logical_level)
    }

    pub fn physical_level(&self, id: NodeId) -> Option<u32> {
        self.entries.get(&id).and_then(|a| a.physical_level)
    }

    pub fn text_transforms(&self, id: NodeId) -> &[TextTransform] {
        self.entries
            .get(&id)
            .map(|a| a.text_transforms.as_slice())
            .unwrap_or(&[])
    }

    pub fn tail_transforms(&self, id: NodeId) -> &[TextTransform] {
        self.entries
            .get(&id)
            .map(|a| a.tail_transforms.as_slice())
            .unwrap_or(&[])
    }

    /// Set `id`'s element type, subject to `mode`. `tag` is used only to
    /// build the conflict diagnostic.
    fn set_type(
        &mut self,
        id: NodeId,
        value: ElementType,
        tag: &str,
        mode: ConflictMode,
    ) -> Result<()> {
        let existing = self.entry(id).element_type;
        if let Some(previous) = existing {
            match mode {
                ConflictMode::Raise if previous != value => {
                    return Err(FormatError::AnnotationConflict {
                        tag: tag.to_string(),
                        previous: previous.label().to_string(),
                        attempted: value.label().to_string(),
                    });
                }
                ConflictMode::Raise | ConflictMode::Skip => return Ok(()),
                ConflictMode::Overwrite => {}
            }
        }
        self.entry(id).element_type = Some(value);
        Ok(())
    }

    fn set_whitespace(&mut self, id: NodeId, value: Whitespace, mode: ConflictMode) {
        let existing = self.entry(id).whitespace;
        if existing.is_some() && mode == ConflictMode::Skip {
            return;
        }
        self.entry(id).whitespace = Some(value);
    }

    fn set_logical_level(&mut self, id: NodeId, value: u32) {
        self.entry(id).logical_level = Some(value);
    }

    fn set_physical_level(&mut self, id: NodeId, value: u32) {
        self.entry(id).physical_level = Some(value);
    }

    fn set_text_transforms(&mut self, id: NodeId, transforms: Vec<TextTransform>) {
        self.entry(id).text_transforms = transforms;
    }

    fn set_tail_transforms(&mut self, id: NodeId, transforms: Vec<TextTransform>) {
        self.entry(id).tail_transforms = transforms;
    }
}

/// Visit every node of `doc`'s tree (root included) in document order.
pub(crate) fn all_nodes(doc: &Document) -> Vec<NodeId> {
    doc.arena.iter_subtree(doc.root).collect()
}
