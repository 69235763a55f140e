//! Port traits abstracting version control away from the runner.

use camino::Utf8Path;

/// The fixed set of version-control operations the runner needs.
///
/// Every call names the repository it operates on; nothing relies on the
/// process working directory.
pub trait Vcs {
    /// Short name of the checked-out branch, or `None` for a detached HEAD or
    /// a directory that is not a checkout.
    fn current_branch(&self, repo: &Utf8Path) -> anyhow::Result<Option<String>>;

    /// Clone `source` into the existing, empty directory `dest`.
    fn clone_repo(&self, source: &Utf8Path, dest: &Utf8Path) -> anyhow::Result<()>;

    /// `checkout -b <branch> <start>`
    fn checkout_new_branch(&self, repo: &Utf8Path, branch: &str, start: &str)
    -> anyhow::Result<()>;

    /// Remove untracked and ignored files.
    fn clean(&self, repo: &Utf8Path) -> anyhow::Result<()>;

    /// Discard staged and unstaged changes to tracked files.
    fn reset_hard(&self, repo: &Utf8Path) -> anyhow::Result<()>;

    /// Stage everything, including deletions.
    fn add_all(&self, repo: &Utf8Path) -> anyhow::Result<()>;

    /// Files with unstaged changes. Empty means the tree is clean.
    fn dirty_files(&self, repo: &Utf8Path) -> anyhow::Result<Vec<String>>;

    /// Unified diff of the index against HEAD.
    fn staged_diff(&self, repo: &Utf8Path) -> anyhow::Result<String>;

    fn has_staged_changes(&self, repo: &Utf8Path) -> anyhow::Result<bool>;

    fn commit(&self, repo: &Utf8Path, message: &str) -> anyhow::Result<()>;

    /// Force-push `branch` to `remote`.
    fn push_force(&self, repo: &Utf8Path, remote: &str, branch: &str) -> anyhow::Result<()>;
}
