use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::BTreeSet;
use walkdir::WalkDir;

/// Created empty in the scratch tree so project discovery has a root.
pub const PLACEHOLDER_MANIFEST: &str = "pyproject.toml";

/// OS and editor litter that never takes part in a comparison.
pub const VOLATILE_PATTERNS: &[&str] = &[
    "**/.DS_Store",
    "**/Thumbs.db",
    "**/*.swp",
    "**/*.swo",
    "**/*~",
    "**/__pycache__/**",
    "**/*.pyc",
    "**/.git/**",
];

fn volatile() -> anyhow::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in VOLATILE_PATTERNS {
        builder.add(Glob::new(pattern).with_context(|| format!("glob {pattern}"))?);
    }
    Ok(builder.build()?)
}

/// Every non-volatile file under `root`, relative and sorted.
pub fn list_files(root: &Utf8Path) -> anyhow::Result<BTreeSet<Utf8PathBuf>> {
    let volatile = volatile()?;
    let mut files = BTreeSet::new();
    if !root.exists() {
        return Ok(files);
    }
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walk {root}"))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(root)
            .with_context(|| format!("{} is outside {root}", entry.path().display()))?;
        let rel = Utf8Path::from_path(rel)
            .with_context(|| format!("non UTF-8 path {}", rel.display()))?;
        let normalized = Utf8PathBuf::from(rel.as_str().replace('\\', "/"));
        if volatile.is_match(normalized.as_str()) {
            continue;
        }
        files.insert(normalized);
    }
    Ok(files)
}

/// Outcome of comparing an expected tree with the tree an advice produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comparison {
    /// In both trees with different content.
    pub changed: Vec<Utf8PathBuf>,
    /// Only in the expected tree.
    pub missing: Vec<Utf8PathBuf>,
    /// Only in the produced tree.
    pub unexpected: Vec<Utf8PathBuf>,
    /// Unified diff from expected to produced.
    pub diff: String,
}

impl Comparison {
    pub fn differs(&self) -> bool {
        !(self.changed.is_empty() && self.missing.is_empty() && self.unexpected.is_empty())
    }
}

/// Compare `expected` with `actual`.
///
/// An empty [`PLACEHOLDER_MANIFEST`] present only in `actual` is ignored.
pub fn compare_trees(expected: &Utf8Path, actual: &Utf8Path) -> anyhow::Result<Comparison> {
    let want = list_files(expected)?;
    let got = list_files(actual)?;
    let mut cmp = Comparison::default();

    for path in want.union(&got) {
        let old = if want.contains(path) {
            Some(fs::read(expected.join(path))?)
        } else {
            None
        };
        let new = if got.contains(path) {
            Some(fs::read(actual.join(path))?)
        } else {
            None
        };

        match (&old, &new) {
            (Some(a), Some(b)) if a == b => continue,
            (Some(_), Some(_)) => cmp.changed.push(path.clone()),
            (Some(_), None) => cmp.missing.push(path.clone()),
            (None, Some(b)) if path.as_str() == PLACEHOLDER_MANIFEST && b.is_empty() => continue,
            (None, Some(_)) => cmp.unexpected.push(path.clone()),
            (None, None) => continue,
        }
        cmp.diff.push_str(&file_diff(
            path,
            old.as_deref().unwrap_or_default(),
            new.as_deref().unwrap_or_default(),
        ));
    }
    Ok(cmp)
}

fn file_diff(path: &Utf8Path, old: &[u8], new: &[u8]) -> String {
    let (Ok(old), Ok(new)) = (std::str::from_utf8(old), std::str::from_utf8(new)) else {
        return format!("Binary files a/{path} and b/{path} differ\n");
    };

    let mut out = format!("--- a/{path}\n+++ b/{path}\n");
    let patch = diffy::create_patch(old, new).to_string();
    // diffy writes its own `--- original` / `+++ modified` header.
    for line in patch.split_inclusive('\n').skip(2) {
        out.push_str(line);
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}
