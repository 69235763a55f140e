use crate::discover::{discover_projects, find_repo_root};
use crate::error::ContextError;
use adviser_api::NextSteps;
use camino::{Utf8Path, Utf8PathBuf};
use tracing::info;

/// One checkout and the projects advice will be run against.
///
/// Lives for one in-place run or one ephemeral clone.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    root: Utf8PathBuf,
    repo_root: Utf8PathBuf,
    projects: Vec<Utf8PathBuf>,
    next_steps: NextSteps,
}

impl ExecutionContext {
    /// Resolve the repository root for `root` and discover its projects.
    ///
    /// Zero projects is an error: there would be nothing to advise.
    pub fn discover(root: &Utf8Path) -> Result<Self, ContextError> {
        if !root.is_dir() {
            return Err(ContextError::NotADirectory(root.to_path_buf()));
        }
        let repo_root = find_repo_root(root).unwrap_or_else(|| root.to_path_buf());
        let projects = discover_projects(&repo_root)?;
        if projects.is_empty() {
            return Err(ContextError::NoProjects(repo_root));
        }
        info!(repo_root = %repo_root, projects = ?projects, "execution context ready");
        Ok(Self {
            root: root.to_path_buf(),
            repo_root,
            projects,
            next_steps: NextSteps::new(),
        })
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn repo_root(&self) -> &Utf8Path {
        &self.repo_root
    }

    /// Project directories relative to the repository root (`.` for the root).
    pub fn projects(&self) -> &[Utf8PathBuf] {
        &self.projects
    }

    /// Absolute project directories.
    pub fn project_paths(&self) -> impl Iterator<Item = Utf8PathBuf> + '_ {
        self.projects.iter().map(|p| {
            if p.as_str() == "." {
                self.repo_root.clone()
            } else {
                self.repo_root.join(p)
            }
        })
    }

    pub fn next_steps(&self) -> &NextSteps {
        &self.next_steps
    }

    pub fn next_steps_mut(&mut self) -> &mut NextSteps {
        &mut self.next_steps
    }

    pub fn reset_next_steps(&mut self) {
        self.next_steps.clear();
    }

    pub fn take_next_steps(&mut self) -> Vec<String> {
        self.next_steps.take()
    }
}
