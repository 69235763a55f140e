//! `rename`: move one file within the project.

use super::project_relative;
use adviser_api::{Advice, AdviceSource, NextSteps};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;

pub const KIND: &str = "rename";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Params {
    from: String,
    to: String,
}

#[derive(Debug)]
pub struct RenameAdvice {
    from: Utf8PathBuf,
    to: Utf8PathBuf,
}

pub fn build(src: &AdviceSource<'_>) -> anyhow::Result<Box<dyn Advice>> {
    let params: Params = src.params()?;
    Ok(Box::new(RenameAdvice {
        from: project_relative("from", &params.from)?,
        to: project_relative("to", &params.to)?,
    }))
}

impl Advice for RenameAdvice {
    fn check(&self, project: &Utf8Path) -> anyhow::Result<bool> {
        Ok(project.join(&self.from).is_file() && !project.join(&self.to).exists())
    }

    fn apply(&self, workdir: &Utf8Path, _next_steps: &mut NextSteps) -> anyhow::Result<()> {
        let to = workdir.join(&self.to);
        if let Some(parent) = to.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::rename(workdir.join(&self.from), &to)
            .with_context(|| format!("rename {} -> {}", self.from, self.to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8Path::from_path(dir.path()).unwrap();
        fs::write(root.join("requirements.in"), "click\n").unwrap();

        let advice = RenameAdvice {
            from: "requirements.in".into(),
            to: "requirements/base.in".into(),
        };
        let mut steps = NextSteps::new();
        assert!(advice.run(root, &mut steps).unwrap());
        assert_eq!(
            fs::read_to_string(root.join("requirements/base.in")).unwrap(),
            "click\n"
        );
        assert!(!advice.check(root).unwrap());
    }
}
