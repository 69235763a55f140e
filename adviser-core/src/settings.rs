//! Clap-free settings for the runner.

use adviser_types::Mode;

pub const DEFAULT_REMOTE: &str = "origin";
pub const DEFAULT_BRANCH_PREFIX: &str = "advice-";

/// Where advice mutates files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Placement {
    /// One branch per advice in an ephemeral clone of the target.
    #[default]
    Branches,
    /// The caller's own working tree. Apply mode only.
    InPlace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub mode: Mode,
    pub placement: Placement,
    /// Remote the clone pushes to and branches start from.
    pub remote: String,
    /// Branch name for advice `x` is `<branch_prefix>x`.
    pub branch_prefix: String,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            placement: Placement::default(),
            remote: DEFAULT_REMOTE.to_string(),
            branch_prefix: DEFAULT_BRANCH_PREFIX.to_string(),
        }
    }
}

impl RunSettings {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn in_place(mut self) -> Self {
        self.placement = Placement::InPlace;
        self
    }

    pub fn branch_name(&self, advice_name: &str) -> String {
        format!("{}{}", self.branch_prefix, advice_name)
    }
}
