use crate::exit;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of one fixture self-test case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Ran, produced the expected tree, and is inert afterwards.
    Pass,
    /// The mutated tree does not match the expected tree.
    Fail,
    /// `check` still wants to run after one application.
    NotDone,
    /// The tree matches but the advice reported no modification.
    DidNotRun,
    /// The advice raised while being tested.
    Error,
}

impl Verdict {
    pub fn label(self) -> &'static str {
        match self {
            Verdict::Pass => "PASS",
            Verdict::Fail => "FAIL",
            Verdict::NotDone => "NOT DONE",
            Verdict::DidNotRun => "DID NOT RUN",
            Verdict::Error => "ERROR",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseReport {
    pub advice_name: String,
    pub verdict: Verdict,

    /// Unified diff from the expected tree to the produced tree, when they differ.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CaseReport {
    /// Exit-status bits this case contributes: a content mismatch and an
    /// advice that raised are reported separately. NOT DONE and DID NOT RUN
    /// with matching trees set neither.
    pub fn exit_bits(&self) -> u8 {
        let mut bits = exit::OK;
        if self.diff.is_some() {
            bits |= exit::SELFTEST_MISMATCH;
        }
        if self.verdict == Verdict::Error {
            bits |= exit::SELFTEST_ERROR;
        }
        bits
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelftestSummary {
    pub cases: Vec<CaseReport>,
}

impl SelftestSummary {
    pub fn push(&mut self, case: CaseReport) {
        self.cases.push(case);
    }

    /// OR-combination of every case's exit bits.
    pub fn exit_status(&self) -> u8 {
        self.cases
            .iter()
            .fold(exit::OK, |acc, c| acc | c.exit_bits())
    }

    pub fn count(&self, verdict: Verdict) -> usize {
        self.cases.iter().filter(|c| c.verdict == verdict).count()
    }
}
