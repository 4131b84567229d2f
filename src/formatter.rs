//! The general-purpose [`Formatter`] engine (spec.md §6's "external
//! interfaces"): a builder over predicate factories, user-supplied
//! transform/formatter/reorderer hooks, and the four pluggable strategies,
//! plus the driver that runs the fifteen annotation passes and the
//! serializer. Grounded in `document_formatter.py`'s `DocumentFormatter`
//! class, translated from its keyword-argument constructor into the
//! teacher's plain-fields-plus-`with_*`-builder-methods idiom (see the
//! teacher's `Options` struct).

use std::path::Path;
use std::sync::Arc;

use crate::annotation::{passes, Annotations, ElementType};
use crate::error::{FormatError, Result};
use crate::node::{Document, NodeId, TextContent};
use crate::predicates::{
    never_match, AttributePredicate, AttributePredicateFactory, ElementPredicate, ElementPredicateFactory,
};
use crate::serializer::{self, SerializeContext};
use crate::strategy::{AttributeFormattingStrategy, DoctypeStrategy, EmptyElementStrategy, EscapingStrategy, ParsingStrategy};

/// A `content, formatter, physical_level → content` hook (spec.md §6's
/// `reformat_text_when`). Content may be plain text or a CDATA section;
/// a formatter may convert between the two.
pub type TextTransformFn = Arc<dyn Fn(TextContent, &Formatter, u32) -> TextContent + Send + Sync>;

/// A `value, formatter, physical_level → value` hook for one attribute's
/// value (spec.md §6's `reformat_attribute_when`). `physical_level` is the
/// element's level plus one when its attributes are wrapped, matching the
/// resolved Open Question in spec.md §9.
pub type AttributeValueFormatter = Arc<dyn Fn(&str, &Formatter, u32) -> String + Send + Sync>;

/// A `names → permuted names` hook (spec.md §6's `reorder_attributes_when`).
/// Its output is validated as a permutation of its input at serialization time.
pub type AttributeReorderer = Arc<dyn Fn(&[String]) -> Vec<String> + Send + Sync>;

/// The general formatter: every constructor option from spec.md §6 as a
/// plain field, set through `with_*` builder methods. `XmlFormatter` and
/// `Html5Formatter` are thin convenience wrappers that construct one of
/// these with format-appropriate strategies and default predicates already
/// applied.
#[derive(Clone)]
pub struct Formatter {
    block_when: ElementPredicateFactory,
    inline_when: ElementPredicateFactory,
    normalize_whitespace_when: ElementPredicateFactory,
    strip_whitespace_when: ElementPredicateFactory,
    preserve_whitespace_when: ElementPredicateFactory,
    wrap_attributes_when: ElementPredicateFactory,
    text_content_formatters: Vec<(ElementPredicateFactory, TextTransformFn)>,
    attribute_content_formatters: Vec<(AttributePredicateFactory, AttributeValueFormatter)>,
    attribute_reorderers: Vec<(ElementPredicateFactory, AttributeReorderer)>,
    indent_size: usize,
    default_type: ElementType,
    escaping_strategy: Arc<dyn EscapingStrategy>,
    parsing_strategy: Arc<dyn ParsingStrategy>,
    doctype_strategy: Arc<dyn DoctypeStrategy>,
    attribute_strategy: Arc<dyn AttributeFormattingStrategy>,
    empty_element_strategy: Arc<dyn EmptyElementStrategy>,
}

/// Predicates and user hooks bound to one document, owned for the lifetime
/// of a single `format_*` call.
struct BoundPipeline {
    wrap_attributes: ElementPredicate,
    attribute_reorderers: Vec<(ElementPredicate, AttributeReorderer)>,
    text_content_formatters: Vec<(ElementPredicate, TextTransformFn)>,
    attribute_content_formatters: Vec<(AttributePredicate, AttributeValueFormatter)>,
}

impl Formatter {
    /// Construct a formatter with no predicates set (every `*_when` default
    /// defaults to never matching) and the given strategies. `indent_size`
    /// defaults to 2, `default_type` to `block`, matching spec.md §6.
    pub fn new(
        parsing_strategy: Arc<dyn ParsingStrategy>,
        escaping_strategy: Arc<dyn EscapingStrategy>,
        doctype_strategy: Arc<dyn DoctypeStrategy>,
        attribute_strategy: Arc<dyn AttributeFormattingStrategy>,
        empty_element_strategy: Arc<dyn EmptyElementStrategy>,
    ) -> Self {
        Formatter {
            block_when: never_match(),
            inline_when: never_match(),
            normalize_whitespace_when: never_match(),
            strip_whitespace_when: never_match(),
            preserve_whitespace_when: never_match(),
            wrap_attributes_when: never_match(),
            text_content_formatters: Vec::new(),
            attribute_content_formatters: Vec::new(),
            attribute_reorderers: Vec::new(),
            indent_size: 2,
            default_type: ElementType::Block,
            escaping_strategy,
            parsing_strategy,
            doctype_strategy,
            attribute_strategy,
            empty_element_strategy,
        }
    }

    /// A clone of this formatter, ready to have individual fields
    /// overridden via `with_*` methods. The Rust analogue of the Python
    /// `derive(**overrides)` keyword-argument clone.
    pub fn derive(&self) -> Formatter {
        self.clone()
    }

    pub fn with_block_when(mut self, predicate: ElementPredicateFactory) -> Self {
        self.block_when = predicate;
        self
    }

    pub fn with_inline_when(mut self, predicate: ElementPredicateFactory) -> Self {
        self.inline_when = predicate;
        self
    }

    pub fn with_normalize_whitespace_when(mut self, predicate: ElementPredicateFactory) -> Self {
        self.normalize_whitespace_when = predicate;
        self
    }

    pub fn with_strip_whitespace_when(mut self, predicate: ElementPredicateFactory) -> Self {
        self.strip_whitespace_when = predicate;
        self
    }

    pub fn with_preserve_whitespace_when(mut self, predicate: ElementPredicateFactory) -> Self {
        self.preserve_whitespace_when = predicate;
        self
    }

    pub fn with_wrap_attributes_when(mut self, predicate: ElementPredicateFactory) -> Self {
        self.wrap_attributes_when = predicate;
        self
    }

    pub fn with_indent_size(mut self, indent_size: usize) -> Self {
        self.indent_size = indent_size;
        self
    }

    pub fn with_default_type(mut self, default_type: ElementType) -> Self {
        self.default_type = default_type;
        self
    }

    pub fn with_text_content_formatter(
        mut self,
        predicate: ElementPredicateFactory,
        formatter: TextTransformFn,
    ) -> Self {
        self.text_content_formatters.push((predicate, formatter));
        self
    }

    pub fn with_attribute_content_formatter(
        mut self,
        predicate: AttributePredicateFactory,
        formatter: AttributeValueFormatter,
    ) -> Self {
        self.attribute_content_formatters.push((predicate, formatter));
        self
    }

    pub fn with_attribute_reorderer(mut self, predicate: ElementPredicateFactory, reorderer: AttributeReorderer) -> Self {
        self.attribute_reorderers.push((predicate, reorderer));
        self
    }

    pub fn with_escaping_strategy(mut self, strategy: Arc<dyn EscapingStrategy>) -> Self {
        self.escaping_strategy = strategy;
        self
    }

    pub fn with_parsing_strategy(mut self, strategy: Arc<dyn ParsingStrategy>) -> Self {
        self.parsing_strategy = strategy;
        self
    }

    pub fn with_doctype_strategy(mut self, strategy: Arc<dyn DoctypeStrategy>) -> Self {
        self.doctype_strategy = strategy;
        self
    }

    pub fn with_attribute_strategy(mut self, strategy: Arc<dyn AttributeFormattingStrategy>) -> Self {
        self.attribute_strategy = strategy;
        self
    }

    pub fn with_empty_element_strategy(mut self, strategy: Arc<dyn EmptyElementStrategy>) -> Self {
        self.empty_element_strategy = strategy;
        self
    }

    fn one_indent(&self) -> String {
        " ".repeat(self.indent_size)
    }

    /// Run all fifteen annotation passes over `doc`, in the order spec.md
    /// §4.2 lists them.
    fn annotate(&self, doc: &Document) -> Result<Annotations> {
        let mut annotations = Annotations::new();
        let block_pred = (self.block_when)(doc);
        let inline_pred = (self.inline_when)(doc);
        let preserve_pred = (self.preserve_whitespace_when)(doc);
        let normalize_pred = (self.normalize_whitespace_when)(doc);
        let strip_pred = (self.strip_whitespace_when)(doc);
        let one_indent = self.one_indent();

        passes::explicit_block(doc, &mut annotations, &block_pred)?;
        passes::explicit_inline(doc, &mut annotations, &inline_pred)?;
        passes::mixed_content_inline(doc, &mut annotations)?;
        passes::inline_inheritance(doc, &mut annotations)?;
        passes::block_subtree_inheritance(doc, &mut annotations)?;
        passes::explicit_preserve(doc, &mut annotations, &preserve_pred);
        passes::preserve_inheritance(doc, &mut annotations);
        passes::explicit_normalize(doc, &mut annotations, &normalize_pred);
        passes::explicit_strip(doc, &mut annotations, &strip_pred);
        passes::xml_space(doc, &mut annotations);
        passes::default_type(doc, &mut annotations, self.default_type)?;
        passes::logical_level(doc, &mut annotations);
        passes::physical_level(doc, &mut annotations);
        passes::text_transforms(doc, &mut annotations, &one_indent);
        passes::tail_transforms(doc, &mut annotations, &one_indent);
        Ok(annotations)
    }

    fn bind(&self, doc: &Document) -> BoundPipeline {
        BoundPipeline {
            wrap_attributes: (self.wrap_attributes_when)(doc),
            attribute_reorderers: self
                .attribute_reorderers
                .iter()
                .map(|(factory, reorderer)| (factory(doc), reorderer.clone()))
                .collect(),
            text_content_formatters: self
                .text_content_formatters
                .iter()
                .map(|(factory, formatter)| (factory(doc), formatter.clone()))
                .collect(),
            attribute_content_formatters: self
                .attribute_content_formatters
                .iter()
                .map(|(factory, formatter)| (factory(doc), formatter.clone()))
                .collect(),
        }
    }

    /// DOCTYPE precedence for whole-document formatting: an explicit
    /// argument wins outright; otherwise, when the strategy insists on a
    /// DOCTYPE being present, prefer whatever the parser found and fall back
    /// to the strategy's default; otherwise use the parsed DOCTYPE verbatim
    /// (which may be absent). `format_element` never calls this — subtree
    /// formatting never auto-adds a DOCTYPE.
    fn resolve_doctype(&self, doc: &Document, explicit: Option<&str>) -> Option<String> {
        if let Some(doctype) = explicit {
            return Some(doctype.to_string());
        }
        if self.doctype_strategy.should_ensure_doctype() {
            return doc
                .doctype
                .clone()
                .or_else(|| self.doctype_strategy.default_doctype().map(|s| s.to_string()));
        }
        doc.doctype.clone()
    }

    /// Parse `source` as a full document and format it.
    pub fn format_str(&self, source: &str, doctype: Option<&str>, xml_declaration: bool) -> Result<String> {
        let doc = self.parsing_strategy.parse_str(source)?;
        self.format_tree(&doc, doctype, xml_declaration)
    }

    /// Parse `source` bytes as a full document and format it.
    pub fn format_bytes(&self, source: &[u8], doctype: Option<&str>, xml_declaration: bool) -> Result<String> {
        let doc = self.parsing_strategy.parse_bytes(source)?;
        self.format_tree(&doc, doctype, xml_declaration)
    }

    /// Read and parse a full document from `path`, then format it.
    pub fn format_file(&self, path: &Path, doctype: Option<&str>, xml_declaration: bool) -> Result<String> {
        let bytes = std::fs::read(path).map_err(|e| FormatError::Parse(e.to_string()))?;
        self.format_bytes(&bytes, doctype, xml_declaration)
    }

    /// Format an already-parsed document: annotate, then serialize any
    /// leading prologue (comments/PIs before the root), the resolved
    /// DOCTYPE, and the root element's subtree, in that order.
    pub fn format_tree(&self, doc: &Document, doctype: Option<&str>, xml_declaration: bool) -> Result<String> {
        let annotations = self.annotate(doc)?;
        let bound = self.bind(doc);
        let one_indent = self.one_indent();
        let ctx = SerializeContext {
            doc,
            annotations: &annotations,
            one_indent: &one_indent,
            wrap_attributes: &bound.wrap_attributes,
            attribute_reorderers: &bound.attribute_reorderers,
            text_content_formatters: &bound.text_content_formatters,
            attribute_content_formatters: &bound.attribute_content_formatters,
            escaping: self.escaping_strategy.as_ref(),
            attribute_strategy: self.attribute_strategy.as_ref(),
            empty_element: self.empty_element_strategy.as_ref(),
            formatter: self,
        };

        let mut out = String::new();
        if xml_declaration {
            out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n");
        }
        for &id in &doc.prologue {
            serializer::serialize_subtree(&ctx, id, &mut out)?;
            out.push('\n');
        }
        if let Some(resolved) = self.resolve_doctype(doc, doctype) {
            out.push_str(&resolved);
            out.push('\n');
        }
        serializer::serialize_subtree(&ctx, doc.root, &mut out)?;
        Ok(out)
    }

    /// Format a single subtree, identified by `id` within `doc`'s arena.
    /// Never auto-adds a DOCTYPE: `doctype`, if given, is emitted verbatim
    /// on its own line; otherwise none is added regardless of strategy.
    pub fn format_element(&self, doc: &Document, id: NodeId, doctype: Option<&str>) -> Result<String> {
        let annotations = self.annotate(doc)?;
        let bound = self.bind(doc);
        let one_indent = self.one_indent();
        let ctx = SerializeContext {
            doc,
            annotations: &annotations,
            one_indent: &one_indent,
            wrap_attributes: &bound.wrap_attributes,
            attribute_reorderers: &bound.attribute_reorderers,
            text_content_formatters: &bound.text_content_formatters,
            attribute_content_formatters: &bound.attribute_content_formatters,
            escaping: self.escaping_strategy.as_ref(),
            attribute_strategy: self.attribute_strategy.as_ref(),
            empty_element: self.empty_element_strategy.as_ref(),
            formatter: self,
        };

        let mut out = String::new();
        if let Some(doctype) = doctype {
            out.push_str(doctype);
            out.push('\n');
        }
        serializer::serialize_subtree(&ctx, id, &mut out)?;
        Ok(out)
    }
}
