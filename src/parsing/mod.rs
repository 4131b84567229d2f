//! Bridges from each upstream parser's own tree into this crate's
//! [`crate::node`] model (spec.md §4.4's parsing strategy, added per
//! SPEC_FULL.md §1's fifth strategy surface — "the engine itself does not
//! parse; the façade does"). [`xml`] bridges `quick-xml`'s event stream;
//! [`html5`] bridges `html5ever` + `markup5ever_rcdom`'s `RcDom`, the
//! teacher crate's own parsing stack.

pub mod html5;
pub mod xml;
