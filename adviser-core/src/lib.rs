//! Embeddable runner for adviser.
//!
//! Takes a loaded [`Catalog`](adviser_catalog::Catalog), a target checkout and
//! a [`Filter`](adviser_catalog::Filter), and runs every selected advice in
//! order, each in its own branch of an ephemeral clone (or directly in the
//! caller's tree for in-place apply).
//!
//! # Port traits
//!
//! Version control goes through [`Vcs`](ports::Vcs). The [`adapters`] module
//! provides [`ShellGit`](adapters::ShellGit), which shells out to `git` with an
//! explicit working directory per call.
//!
//! # Entry point
//!
//! - [`Runner::run`](pipeline::Runner::run): returns one
//!   [`AdviceResult`](adviser_types::AdviceResult) per advice, in execution order.

pub mod adapters;
pub mod pipeline;
pub mod ports;
pub mod settings;

pub use adapters::ShellGit;
pub use pipeline::{RunError, Runner, commit_message};
pub use ports::Vcs;
pub use settings::{Placement, RunSettings};
