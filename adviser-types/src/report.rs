use crate::mode::Mode;
use crate::result::RunResults;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Machine-readable envelope around one runner invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub tool: ToolInfo,
    pub mode: Mode,
    pub target: String,
    pub started_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,

    pub results: RunResults,
}

impl RunReport {
    pub fn new(tool: ToolInfo, mode: Mode, target: impl Into<String>) -> Self {
        Self {
            tool,
            mode,
            target: target.into(),
            started_at: Utc::now(),
            ended_at: None,
            results: RunResults::new(),
        }
    }

    pub fn finish(mut self, results: RunResults) -> Self {
        self.results = results;
        self.ended_at = Some(Utc::now());
        self
    }

    /// True when something failed or nothing was selected.
    pub fn is_failure(&self) -> bool {
        self.results.is_empty() || self.results.any_failed()
    }
}
