//! Shared DTOs for the adviser workspace.
//!
//! # Design constraints
//! - These types cross crate boundaries and are printed as JSON by the CLI.
//! - Prefer adding optional fields over changing semantics.

pub mod confidence;
pub mod mode;
pub mod report;
pub mod result;
pub mod selftest;

pub use confidence::{Confidence, ParseConfidenceError};
pub use mode::{Mode, ParseModeError};
pub use report::{RunReport, ToolInfo};
pub use result::{AdviceResult, RunResults};
pub use selftest::{CaseReport, SelftestSummary, Verdict};

/// Process exit codes shared by the CLI and the self-test engine.
pub mod exit {
    pub const OK: u8 = 0;
    /// Any advice failed, nothing matched the filter, or a fatal error occurred.
    pub const FAILURE: u8 = 1;
    /// Self-test: at least one case produced a tree that differs from its expected tree.
    pub const SELFTEST_MISMATCH: u8 = 1;
    /// Self-test: at least one advice raised while being tested.
    pub const SELFTEST_ERROR: u8 = 8;
}
