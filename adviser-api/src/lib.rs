//! Contracts shared by every advice implementation.
//!
//! An advice is a predicate (`check`) paired with a mutator (`apply`). The
//! orchestrator only ever calls the composite [`Advice::run`], usually through
//! [`run_isolated`] so a misbehaving implementation cannot unwind past it.
//!
//! Metadata (confidence, preview, manual, order) lives in [`AdviceMeta`] and is
//! read from the advice's [`ADVICE_MANIFEST`], never from the implementation.

mod advice;
mod isolate;
mod manifest;
mod next_steps;

pub use advice::{Advice, AdviceFactory, AdviceSource};
pub use isolate::{check_isolated, run_isolated};
pub use manifest::{ADVICE_MANIFEST, AdviceManifest, AdviceMeta};
pub use next_steps::NextSteps;
