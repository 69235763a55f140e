//! The advice run: placement, per-advice branch lifecycle and finalization.

use crate::ports::Vcs;
use crate::settings::{Placement, RunSettings};
use adviser_api::run_isolated;
use adviser_catalog::{Catalog, Filter, LoadedAdvice};
use adviser_context::{ContextError, ExecutionContext};
use adviser_types::{AdviceResult, Mode, RunResults};
use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};

pub const NO_CHANGES: &str = "No changes needed";
pub const CHANGES_AVAILABLE: &str = "Changes can be applied";

/// Fatal errors: raised before any advice runs, never for one advice.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("in-place placement is only valid in apply mode, not {0}")]
    InPlaceRequiresApply(Mode),

    #[error("cannot read the current branch of {0}: not a git checkout, or HEAD is detached")]
    NoCurrentBranch(Utf8PathBuf),

    #[error(
        "uncommitted changes found in {repo}:\n{}\nPlease commit or stash them.",
        .files.join("\n")
    )]
    DirtyWorkingTree { repo: Utf8PathBuf, files: Vec<String> },

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

/// `Apply <name>`, then a blank line and one line per next step.
pub fn commit_message(advice_name: &str, next_steps: &[String]) -> String {
    let mut message = format!("Apply {advice_name}");
    if !next_steps.is_empty() {
        message.push_str("\n\n");
        for step in next_steps {
            message.push_str(step);
            message.push('\n');
        }
    }
    message
}

pub struct Runner<'a> {
    catalog: &'a Catalog,
    settings: RunSettings,
    vcs: &'a dyn Vcs,
}

impl<'a> Runner<'a> {
    pub fn new(
        catalog: &'a Catalog,
        settings: RunSettings,
        vcs: &'a dyn Vcs,
    ) -> Result<Self, RunError> {
        if settings.placement == Placement::InPlace && settings.mode != Mode::Apply {
            return Err(RunError::InPlaceRequiresApply(settings.mode));
        }
        Ok(Self {
            catalog,
            settings,
            vcs,
        })
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// Run every advice `filter` admits against `target`, in catalog order.
    ///
    /// A failure inside one advice is recorded in its result and the run
    /// continues. Only setup problems are returned as errors.
    pub fn run(&self, target: &Utf8Path, filter: &Filter) -> Result<RunResults, RunError> {
        let current_branch = self
            .vcs
            .current_branch(target)?
            .ok_or_else(|| RunError::NoCurrentBranch(target.to_path_buf()))?;
        let advices = self.catalog.order(filter);
        info!(
            target = %target,
            branch = %current_branch,
            mode = %self.settings.mode,
            count = advices.len(),
            "starting run"
        );

        match self.settings.placement {
            Placement::InPlace => self.run_in_place(target, &advices),
            Placement::Branches => self.run_in_branches(target, &current_branch, &advices),
        }
    }

    fn run_in_place(
        &self,
        target: &Utf8Path,
        advices: &[&LoadedAdvice],
    ) -> Result<RunResults, RunError> {
        let files = self.vcs.dirty_files(target)?;
        if !files.is_empty() {
            return Err(RunError::DirtyWorkingTree {
                repo: target.to_path_buf(),
                files,
            });
        }

        let mut ctx = ExecutionContext::discover(target)?;
        let mut results = RunResults::new();
        for advice in advices {
            let result = match run_on_projects(advice, &mut ctx) {
                Ok(modified) => {
                    let message = if modified {
                        "Changes applied in place"
                    } else {
                        NO_CHANGES
                    };
                    AdviceResult::succeeded(advice.name(), modified, message)
                        .with_next_steps(ctx.take_next_steps())
                }
                Err(e) => {
                    warn!(advice = advice.name(), error = %format!("{e:#}"), "advice failed");
                    AdviceResult::failed(advice.name(), format!("{e:#}"))
                }
            };
            results.insert(result);
        }
        Ok(results)
    }

    fn run_in_branches(
        &self,
        target: &Utf8Path,
        current_branch: &str,
        advices: &[&LoadedAdvice],
    ) -> Result<RunResults, RunError> {
        let scratch = TempDir::new().context("create scratch directory")?;
        let clone = Utf8PathBuf::from_path_buf(scratch.path().to_path_buf())
            .map_err(|p| anyhow::anyhow!("scratch path is not UTF-8: {}", p.display()))?;
        self.vcs
            .clone_repo(target, &clone)
            .with_context(|| format!("clone {target}"))?;

        let mut ctx = ExecutionContext::discover(&clone)?;
        let start = format!("{}/{}", self.settings.remote, current_branch);

        let mut results = RunResults::new();
        for advice in advices {
            results.insert(self.branch_run(advice, &mut ctx, &start));
        }
        Ok(results)
    }

    fn branch_run(
        &self,
        advice: &LoadedAdvice,
        ctx: &mut ExecutionContext,
        start: &str,
    ) -> AdviceResult {
        match self.try_branch_run(advice, ctx, start) {
            Ok(result) => result,
            Err(e) => {
                warn!(advice = advice.name(), error = %format!("{e:#}"), "advice failed");
                AdviceResult::failed(advice.name(), format!("{e:#}"))
            }
        }
    }

    fn try_branch_run(
        &self,
        advice: &LoadedAdvice,
        ctx: &mut ExecutionContext,
        start: &str,
    ) -> anyhow::Result<AdviceResult> {
        let repo = ctx.repo_root().to_path_buf();
        let branch = self.settings.branch_name(advice.name());
        info!(advice = advice.name(), branch = %branch, "running advice");

        // Leftovers from earlier advice. Only diff mode keeps tracked changes,
        // so earlier advice stays in later diffs.
        if self.settings.mode != Mode::Diff {
            self.vcs.reset_hard(&repo)?;
        }
        self.vcs.clean(&repo)?;
        self.vcs.checkout_new_branch(&repo, &branch, start)?;

        let modified = run_on_projects(advice, ctx)?;
        self.vcs.add_all(&repo)?;
        let next_steps = ctx.take_next_steps();

        self.finalize(advice.name(), &repo, &branch, modified, next_steps)
    }

    fn finalize(
        &self,
        name: &str,
        repo: &Utf8Path,
        branch: &str,
        modified: bool,
        next_steps: Vec<String>,
    ) -> anyhow::Result<AdviceResult> {
        let result = match self.settings.mode {
            Mode::Apply => {
                if !modified || !self.vcs.has_staged_changes(repo)? {
                    AdviceResult::succeeded(name, false, NO_CHANGES)
                } else {
                    self.publish(repo, branch, &commit_message(name, &next_steps))?;
                    AdviceResult::succeeded(
                        name,
                        true,
                        format!("Changes applied to branch {branch}"),
                    )
                    .with_branch(branch)
                }
            }
            Mode::Diff => AdviceResult::succeeded(name, modified, self.vcs.staged_diff(repo)?),
            Mode::Check => {
                let message = if self.vcs.has_staged_changes(repo)? {
                    CHANGES_AVAILABLE
                } else {
                    NO_CHANGES
                };
                AdviceResult::succeeded(name, modified, message)
            }
        };
        Ok(result.with_next_steps(next_steps))
    }

    /// Commit and force-push. Refuses outside apply mode.
    fn publish(&self, repo: &Utf8Path, branch: &str, message: &str) -> anyhow::Result<()> {
        if self.settings.mode.is_read_only() {
            bail!(
                "refusing to publish {branch}: {} mode never mutates the remote",
                self.settings.mode
            );
        }
        self.vcs.commit(repo, message)?;
        self.vcs.push_force(repo, &self.settings.remote, branch)?;
        info!(branch, remote = %self.settings.remote, "pushed");
        Ok(())
    }
}

/// Run `advice` on every project of `ctx`; true if any project changed.
fn run_on_projects(advice: &LoadedAdvice, ctx: &mut ExecutionContext) -> anyhow::Result<bool> {
    ctx.reset_next_steps();
    let projects: Vec<Utf8PathBuf> = ctx.project_paths().collect();
    let mut modified = false;
    for project in projects {
        debug!(advice = advice.name(), project = %project, "visiting project");
        modified |= run_isolated(advice, &project, ctx.next_steps_mut())
            .with_context(|| format!("{} failed in {project}", advice.name()))?;
    }
    Ok(modified)
}
