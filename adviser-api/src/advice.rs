use crate::next_steps::NextSteps;
use anyhow::Context;
use camino::Utf8Path;
use serde::de::DeserializeOwned;

/// A named, independently applicable automated fix.
///
/// `check` must not touch the filesystem. `apply` may only mutate files under
/// `workdir` and never issues version-control commands; staging, committing and
/// pushing belong to the runner.
pub trait Advice {
    /// True when `apply` would change something in `project`.
    fn check(&self, project: &Utf8Path) -> anyhow::Result<bool>;

    fn apply(&self, workdir: &Utf8Path, next_steps: &mut NextSteps) -> anyhow::Result<()>;

    /// Check, then apply once if the check passed. Returns whether `apply` ran.
    ///
    /// Implementations with stateful check/apply coupling may override this;
    /// the runner and the self-test engine only ever call `run`.
    fn run(&self, workdir: &Utf8Path, next_steps: &mut NextSteps) -> anyhow::Result<bool> {
        if !self.check(workdir)? {
            return Ok(false);
        }
        self.apply(workdir, next_steps)?;
        Ok(true)
    }
}

/// Everything a factory gets to build one advice.
#[derive(Debug, Clone, Copy)]
pub struct AdviceSource<'a> {
    /// Display name, e.g. `python/typed-marker`.
    pub name: &'a str,
    /// Directory holding the manifest and any bundled scripts or fixtures.
    pub dir: &'a Utf8Path,
    /// The manifest's `[params]` table.
    pub params: &'a toml::Table,
}

impl AdviceSource<'_> {
    /// Deserialize the `[params]` table into a kind-specific struct.
    pub fn params<T: DeserializeOwned>(&self) -> anyhow::Result<T> {
        toml::Value::Table(self.params.clone())
            .try_into()
            .with_context(|| format!("invalid [params] for advice {}", self.name))
    }
}

/// Builds an advice from its manifest. Registered per kind.
pub type AdviceFactory = fn(&AdviceSource<'_>) -> anyhow::Result<Box<dyn Advice>>;
