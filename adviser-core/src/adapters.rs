//! `git` subprocess implementation of [`Vcs`].

use crate::ports::Vcs;
use anyhow::{Context, bail};
use camino::Utf8Path;
use std::process::{Command, Output};
use tracing::{debug, info};

/// Shells out to `git`, one process per operation.
#[derive(Debug, Clone, Default)]
pub struct ShellGit {
    envs: Vec<(String, String)>,
}

impl ShellGit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extra environment for every invocation (author identity in tests).
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    fn output(&self, cwd: &Utf8Path, args: &[&str]) -> anyhow::Result<Output> {
        info!(cwd = %cwd, args = ?args, "git");
        let output = Command::new("git")
            .args(args)
            .current_dir(cwd)
            .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .output()
            .with_context(|| format!("spawn git {}", args.join(" ")))?;
        debug!(
            status = ?output.status.code(),
            stdout = %String::from_utf8_lossy(&output.stdout),
            "git finished"
        );
        Ok(output)
    }

    fn run_checked(&self, cwd: &Utf8Path, args: &[&str]) -> anyhow::Result<String> {
        let output = self.output(cwd, args)?;
        if !output.status.success() {
            bail!(
                "git {} failed in {}: {}",
                args.join(" "),
                cwd,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run a `--exit-code` style command: 0 → false, 1 → true.
    fn differs(&self, cwd: &Utf8Path, args: &[&str]) -> anyhow::Result<(bool, String)> {
        let output = self.output(cwd, args)?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        match output.status.code() {
            Some(0) => Ok((false, stdout)),
            Some(1) => Ok((true, stdout)),
            code => bail!(
                "git {} exited with {:?} in {}: {}",
                args.join(" "),
                code,
                cwd,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        }
    }
}

impl Vcs for ShellGit {
    fn current_branch(&self, repo: &Utf8Path) -> anyhow::Result<Option<String>> {
        if !repo.is_dir() {
            return Ok(None);
        }
        let output = self.output(repo, &["symbolic-ref", "--quiet", "--short", "HEAD"])?;
        if !output.status.success() {
            return Ok(None);
        }
        let branch = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok((!branch.is_empty()).then_some(branch))
    }

    fn clone_repo(&self, source: &Utf8Path, dest: &Utf8Path) -> anyhow::Result<()> {
        self.run_checked(source, &["clone", "--quiet", ".", dest.as_str()])?;
        Ok(())
    }

    fn checkout_new_branch(
        &self,
        repo: &Utf8Path,
        branch: &str,
        start: &str,
    ) -> anyhow::Result<()> {
        self.run_checked(repo, &["checkout", "--quiet", "-b", branch, start])?;
        Ok(())
    }

    fn clean(&self, repo: &Utf8Path) -> anyhow::Result<()> {
        self.run_checked(repo, &["clean", "-fdx"])?;
        Ok(())
    }

    fn reset_hard(&self, repo: &Utf8Path) -> anyhow::Result<()> {
        self.run_checked(repo, &["reset", "--quiet", "--hard"])?;
        Ok(())
    }

    fn add_all(&self, repo: &Utf8Path) -> anyhow::Result<()> {
        self.run_checked(repo, &["add", "-A"])?;
        Ok(())
    }

    fn dirty_files(&self, repo: &Utf8Path) -> anyhow::Result<Vec<String>> {
        let (dirty, stdout) = self.differs(repo, &["diff", "--name-only", "--exit-code"])?;
        if !dirty {
            return Ok(Vec::new());
        }
        Ok(stdout.lines().map(str::to_string).collect())
    }

    fn staged_diff(&self, repo: &Utf8Path) -> anyhow::Result<String> {
        self.run_checked(repo, &["diff", "--cached"])
    }

    fn has_staged_changes(&self, repo: &Utf8Path) -> anyhow::Result<bool> {
        let (changed, _) = self.differs(repo, &["diff", "--cached", "--exit-code", "--quiet"])?;
        Ok(changed)
    }

    fn commit(&self, repo: &Utf8Path, message: &str) -> anyhow::Result<()> {
        self.run_checked(repo, &["commit", "--quiet", "-m", message])?;
        Ok(())
    }

    fn push_force(&self, repo: &Utf8Path, remote: &str, branch: &str) -> anyhow::Result<()> {
        self.run_checked(repo, &["push", "--quiet", "-f", remote, branch])?;
        Ok(())
    }
}
