//! Predicate layer (spec.md §4.1).
//!
//! Two predicate shapes, both two-stage closures: stage 1 is document-scoped
//! precomputation (e.g. collecting a set of matching node ids once per
//! document); stage 2 is an O(1) per-node membership test. An **element
//! predicate factory** produces an [`ElementPredicate`] from a [`Document`];
//! an **attribute predicate factory** produces an [`AttributePredicate`].

pub mod element;
pub mod matcher;

pub use matcher::Matcher;

use std::sync::Arc;

use crate::node::{Document, NodeId};

/// A predicate over a single node, already bound to one document.
pub type ElementPredicate = Arc<dyn Fn(&Document, NodeId) -> bool + Send + Sync>;

/// Stage-1 closure: given a document root, produce a concrete [`ElementPredicate`].
pub type ElementPredicateFactory = Arc<dyn Fn(&Document) -> ElementPredicate + Send + Sync>;

/// A predicate over an element's single attribute, already bound to one document.
pub type AttributePredicate = Arc<dyn Fn(&Document, NodeId, &str, &str) -> bool + Send + Sync>;

/// Stage-1 closure: given a document root, produce a concrete [`AttributePredicate`].
pub type AttributePredicateFactory = Arc<dyn Fn(&Document) -> AttributePredicate + Send + Sync>;

/// An element predicate factory that never matches. The default behind every
/// unset `*_when` formatter option (mirrors `never_match` referenced by
/// `document_formatter.py`).
pub fn never_match() -> ElementPredicateFactory {
    Arc::new(|_doc| Arc::new(|_doc, _id| false))
}

/// An element predicate factory that always matches.
pub fn always_match() -> ElementPredicateFactory {
    Arc::new(|_doc| Arc::new(|_doc, _id| true))
}

/// OR-combine any number of element predicate factories.
pub fn any_of(factories: Vec<ElementPredicateFactory>) -> ElementPredicateFactory {
    Arc::new(move |doc| {
        let predicates: Vec<ElementPredicate> = factories.iter().map(|f| f(doc)).collect();
        Arc::new(move |doc, id| predicates.iter().any(|p| p(doc, id)))
    })
}

/// AND-combine any number of element predicate factories.
pub fn all_of(factories: Vec<ElementPredicateFactory>) -> ElementPredicateFactory {
    Arc::new(move |doc| {
        let predicates: Vec<ElementPredicate> = factories.iter().map(|f| f(doc)).collect();
        Arc::new(move |doc, id| predicates.iter().all(|p| p(doc, id)))
    })
}

/// Negate an element predicate factory.
pub fn not_matching(factory: ElementPredicateFactory) -> ElementPredicateFactory {
    Arc::new(move |doc| {
        let predicate = factory(doc);
        Arc::new(move |doc, id| !predicate(doc, id))
    })
}

/// Derive an attribute predicate factory from an element predicate factory: it
/// matches only when the element predicate matches the attribute's owning
/// element AND the attribute's name (and, optionally, value) satisfy the
/// given matchers.
pub fn with_attribute(
    element_factory: ElementPredicateFactory,
    name_matcher: Matcher,
    value_matcher: Option<Matcher>,
) -> AttributePredicateFactory {
    Arc::new(move |doc| {
        let element_predicate = element_factory(doc);
        let name_matcher = name_matcher.clone();
        let value_matcher = value_matcher.clone();
        Arc::new(move |doc, id, name, value| {
            element_predicate(doc, id)
                && name_matcher.matches(name)
                && value_matcher.as_ref().is_none_or(|m| m.matches(value))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Element, Node, NodeArena, NsMap, QName, TextContent};

    fn single_element_doc(tag: &str) -> Document {
        let mut arena = NodeArena::new();
        let root = arena.push(Node::Element(Element {
            name: QName::local(tag),
            attributes: vec![],
            text: TextContent::Empty,
            tail: TextContent::Empty,
            children: vec![],
            parent: None,
            nsmap: NsMap::new(),
        }));
        Document {
            arena,
            root,
            doctype: None,
            prologue: vec![],
        }
    }

    #[test]
    fn never_match_is_always_false() {
        let doc = single_element_doc("div");
        let pred = never_match()(&doc);
        assert!(!pred(&doc, doc.root));
    }

    #[test]
    fn always_match_is_always_true() {
        let doc = single_element_doc("div");
        let pred = always_match()(&doc);
        assert!(pred(&doc, doc.root));
    }

    #[test]
    fn any_of_is_or() {
        let doc = single_element_doc("div");
        let factory = any_of(vec![never_match(), always_match()]);
        assert!(factory(&doc)(&doc, doc.root));
    }

    #[test]
    fn all_of_is_and() {
        let doc = single_element_doc("div");
        let factory = all_of(vec![never_match(), always_match()]);
        assert!(!factory(&doc)(&doc, doc.root));
    }

    #[test]
    fn not_matching_negates() {
        let doc = single_element_doc("div");
        let factory = not_matching(always_match());
        assert!(!factory(&doc)(&doc, doc.root));
    }
}
