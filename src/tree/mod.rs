// Tree passes over a parsed document.
//
// `validate` checks a tree without touching it and stops at the first
// violation; `normalize` rewrites names in place and reports what it changed.
// Both walk depth-first in document order, parent before children.

pub mod normalize;
pub mod validate;

pub use normalize::normalize;
pub use validate::{validate, Violation};
