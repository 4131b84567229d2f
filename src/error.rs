//! Errors surfaced by the annotation pipeline, predicate factories, strategies,
//! and the parsing/serialization façade.

/// Errors that can occur while configuring or running a [`crate::formatter::Formatter`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FormatError {
    /// A predicate factory or matcher was misconfigured at construction time
    /// (empty tag/attribute name, malformed regex, negative count, min > max,
    /// empty PI target).
    #[error("predicate validation error: {0}")]
    PredicateValidation(String),

    /// An element was marked with two incompatible annotations (e.g. both
    /// `block` and `inline`) by explicit user predicates.
    #[error("{tag} previously marked as {previous}, cannot also mark as {attempted}")]
    AnnotationConflict {
        tag: String,
        previous: String,
        attempted: String,
    },

    /// Parsing the input document failed.
    #[error("parse error: {0}")]
    Parse(String),

    /// An attribute reorderer's output was not a permutation of its input.
    #[error("attribute reorderer for <{tag}> returned invalid reordering: {detail}")]
    ReordererContractViolation { tag: String, detail: String },

    /// No escaping/rendering handler is registered for a text content variant.
    #[error("no handler for content variant: {0}")]
    UnsupportedContentType(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FormatError>;
