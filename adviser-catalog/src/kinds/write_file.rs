//! `write-file`: make sure a file exists with the given contents.

use super::project_relative;
use adviser_api::{Advice, AdviceSource, NextSteps};
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use serde::Deserialize;

pub const KIND: &str = "write-file";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Params {
    path: String,
    contents: String,
    #[serde(default)]
    overwrite: bool,
}

#[derive(Debug)]
pub struct WriteFileAdvice {
    path: Utf8PathBuf,
    contents: String,
    overwrite: bool,
}

pub fn build(src: &AdviceSource<'_>) -> anyhow::Result<Box<dyn Advice>> {
    let params: Params = src.params()?;
    Ok(Box::new(WriteFileAdvice {
        path: project_relative("path", &params.path)?,
        contents: params.contents,
        overwrite: params.overwrite,
    }))
}

impl Advice for WriteFileAdvice {
    fn check(&self, project: &Utf8Path) -> anyhow::Result<bool> {
        let path = project.join(&self.path);
        if !path.exists() {
            return Ok(true);
        }
        Ok(self.overwrite && fs::read_to_string(&path)? != self.contents)
    }

    fn apply(&self, workdir: &Utf8Path, _next_steps: &mut NextSteps) -> anyhow::Result<()> {
        let path = workdir.join(&self.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &self.contents)?;
        Ok(())
    }
}
