//! Self-test for advice that ships before/after fixtures.
//!
//! An advice directory may hold `a/` (the tree before) and `b/` (the tree
//! expected after one run). [`run_selftest`] copies `a/` to a scratch
//! directory, runs the advice once, compares against `b/`, then checks that
//! the advice has nothing left to do.

mod compare;
mod engine;

pub use compare::{Comparison, PLACEHOLDER_MANIFEST, VOLATILE_PATTERNS, compare_trees, list_files};
pub use engine::{FIXTURE_AFTER, FIXTURE_BEFORE, run_case, run_selftest};
