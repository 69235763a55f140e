use crate::error::ContextError;
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::Path;
use tracing::{debug, warn};

/// Files that make a directory a Python project.
pub const PROJECT_MARKERS: &[&str] = &["pyproject.toml", "setup.py", "setup.cfg"];

/// Entry whose presence marks a repository root.
pub const VCS_MARKER: &str = ".git";

/// Subtrees never searched for projects, on top of the repository's own
/// ignore rules.
pub const BUILTIN_IGNORES: &[&str] = &[
    "**/.git",
    "**/.hg",
    "**/.svn",
    "**/__pycache__",
    "**/.mypy_cache",
    "**/.pytest_cache",
    "**/.ruff_cache",
    "**/.tox",
    "**/.nox",
    "**/.venv",
    "**/venv",
    "**/node_modules",
    "**/build",
    "**/dist",
    "**/*.egg-info",
];

/// Nearest ancestor of `start` (inclusive) holding a [`VCS_MARKER`].
pub fn find_repo_root(start: &Utf8Path) -> Option<Utf8PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(VCS_MARKER).exists())
        .map(Utf8Path::to_path_buf)
}

fn builtin_globset() -> Result<GlobSet, ContextError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in BUILTIN_IGNORES {
        let glob = Glob::new(pattern).map_err(|source| ContextError::IgnorePattern {
            pattern: pattern.to_string(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| ContextError::IgnorePattern {
        pattern: "<builtin set>".to_string(),
        source,
    })
}

fn is_project(dir: &Path) -> bool {
    PROJECT_MARKERS.iter().any(|m| dir.join(m).is_file())
}

/// Find every Python project under `root`, relative to it and sorted.
///
/// The root itself is reported as `.`. Nothing below a project is searched.
/// `.gitignore` files and the git exclude file apply whether or not `root` is
/// a git checkout.
pub fn discover_projects(root: &Utf8Path) -> Result<Vec<Utf8PathBuf>, ContextError> {
    let globset = builtin_globset()?;

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(true)
        .parents(false)
        .ignore(false)
        .git_ignore(true)
        .git_exclude(true)
        .git_global(false)
        .require_git(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b));

    let walk_root = root.as_std_path().to_path_buf();
    builder.filter_entry(move |entry| {
        let Ok(rel) = entry.path().strip_prefix(&walk_root) else {
            return true;
        };
        if rel.as_os_str().is_empty() {
            return true;
        }
        let rel = rel.to_string_lossy().replace('\\', "/");
        if globset.is_match(&rel) {
            return false;
        }
        // Do not descend into a project's subdirectories.
        if !entry.file_type().is_some_and(|ft| ft.is_dir()) {
            return true;
        }
        entry.path().parent().is_none_or(|parent| !is_project(parent))
    });

    let mut projects = Vec::new();
    for result in builder.build() {
        let entry = result.map_err(|source| ContextError::Walk {
            root: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_some_and(|ft| ft.is_dir()) || !is_project(entry.path()) {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        match Utf8Path::from_path(rel) {
            Some(rel) if rel.as_str().is_empty() => projects.push(Utf8PathBuf::from(".")),
            Some(rel) => projects.push(rel.to_path_buf()),
            None => warn!(path = %entry.path().display(), "skipping non-UTF-8 project path"),
        }
    }

    projects.sort();
    debug!(root = %root, count = projects.len(), "discovered projects");
    Ok(projects)
}
