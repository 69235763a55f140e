//! Built-in advice kinds.

pub mod command;
pub mod rename;
pub mod replace;
pub mod write_file;

use anyhow::bail;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};

/// Validate a manifest path that must stay inside the project.
pub(crate) fn project_relative(field: &str, raw: &str) -> anyhow::Result<Utf8PathBuf> {
    let path = Utf8Path::new(raw);
    if raw.is_empty() {
        bail!("`{field}` must not be empty");
    }
    if path.is_absolute() {
        bail!("`{field}` must be relative to the project, got {raw}");
    }
    if path.components().any(|c| matches!(c, Utf8Component::ParentDir)) {
        bail!("`{field}` must not leave the project, got {raw}");
    }
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_nested_relative_paths() {
        assert_eq!(
            project_relative("path", "src/pkg/py.typed").unwrap(),
            Utf8PathBuf::from("src/pkg/py.typed")
        );
    }

    #[test]
    fn rejects_escaping_paths() {
        assert!(project_relative("path", "").is_err());
        assert!(project_relative("path", "/etc/passwd").is_err());
        assert!(project_relative("path", "../sibling").is_err());
        assert!(project_relative("path", "a/../../b").is_err());
    }
}
