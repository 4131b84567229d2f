//! Matchers usable for attribute name/value comparisons in
//! [`super::with_attribute`]: an exact string, a compiled regex, or an
//! arbitrary unary predicate.

use regex::Regex;
use std::sync::Arc;

use crate::error::{FormatError, Result};

/// One of the three shapes spec.md §4.1 allows for attribute name/value
/// matching. Constructing a `Matcher::regex` with an invalid pattern is a
/// configuration error detected at construction time (spec.md §4.8).
#[derive(Clone)]
pub enum Matcher {
    Exact(String),
    Regex(Arc<Regex>),
    Predicate(Arc<dyn Fn(&str) -> bool + Send + Sync>),
}

impl Matcher {
    pub fn exact(s: impl Into<String>) -> Matcher {
        Matcher::Exact(s.into())
    }

    pub fn regex(pattern: &str) -> Result<Matcher> {
        Regex::new(pattern)
            .map(|re| Matcher::Regex(Arc::new(re)))
            .map_err(|e| FormatError::PredicateValidation(format!("invalid regex '{pattern}': {e}")))
    }

    pub fn predicate(f: impl Fn(&str) -> bool + Send + Sync + 'static) -> Matcher {
        Matcher::Predicate(Arc::new(f))
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Matcher::Exact(s) => s == value,
            Matcher::Regex(re) => re.is_match(value),
            Matcher::Predicate(f) => f(value),
        }
    }
}

impl std::fmt::Debug for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Matcher::Exact(s) => write!(f, "Matcher::Exact({s:?})"),
            Matcher::Regex(re) => write!(f, "Matcher::Regex({})", re.as_str()),
            Matcher::Predicate(_) => write!(f, "Matcher::Predicate(..)"),
        }
    }
}

impl From<&str> for Matcher {
    fn from(s: &str) -> Self {
        Matcher::exact(s)
    }
}

impl From<String> for Matcher {
    fn from(s: String) -> Self {
        Matcher::Exact(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_matcher_compares_strings() {
        let m = Matcher::exact("class");
        assert!(m.matches("class"));
        assert!(!m.matches("id"));
    }

    #[test]
    fn regex_matcher_rejects_bad_pattern() {
        assert!(Matcher::regex("(unclosed").is_err());
    }

    #[test]
    fn regex_matcher_matches_pattern() {
        let m = Matcher::regex("^data-.*$").unwrap();
        assert!(m.matches("data-foo"));
        assert!(!m.matches("class"));
    }

    #[test]
    fn predicate_matcher_runs_closure() {
        let m = Matcher::predicate(|s| s.len() > 3);
        assert!(m.matches("hello"));
        assert!(!m.matches("hi"));
    }
}
