use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What the runner does with the changes an advice produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Report whether changes are possible. Never commits or pushes.
    #[default]
    Check,
    /// Report the staged diff. Never commits or pushes.
    Diff,
    /// Commit and force-push one branch per advice (or edit in place).
    Apply,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Check => "check",
            Mode::Diff => "diff",
            Mode::Apply => "apply",
        }
    }

    /// True for modes that must never mutate the remote.
    pub fn is_read_only(self) -> bool {
        !matches!(self, Mode::Apply)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mode '{0}' (expected one of: check, diff, apply)")]
pub struct ParseModeError(pub String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "check" => Ok(Mode::Check),
            "diff" => Ok(Mode::Diff),
            "apply" => Ok(Mode::Apply),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}
