//! `replace`: regex substitution over a single file.

use super::project_relative;
use adviser_api::{Advice, AdviceSource, NextSteps};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use regex::Regex;
use serde::Deserialize;
use std::borrow::Cow;

pub const KIND: &str = "replace";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Params {
    path: String,
    pattern: String,
    replacement: String,
}

#[derive(Debug)]
pub struct ReplaceAdvice {
    path: Utf8PathBuf,
    pattern: Regex,
    replacement: String,
}

pub fn build(src: &AdviceSource<'_>) -> anyhow::Result<Box<dyn Advice>> {
    let params: Params = src.params()?;
    let pattern = Regex::new(&params.pattern)
        .with_context(|| format!("invalid `pattern` {:?}", params.pattern))?;
    Ok(Box::new(ReplaceAdvice {
        path: project_relative("path", &params.path)?,
        pattern,
        replacement: params.replacement,
    }))
}

impl ReplaceAdvice {
    /// New contents, or `None` when nothing would change.
    fn rewritten(&self, project: &Utf8Path) -> anyhow::Result<Option<String>> {
        let path = project.join(&self.path);
        if !path.is_file() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path)?;
        match self.pattern.replace_all(&text, self.replacement.as_str()) {
            Cow::Owned(new) if new != text => Ok(Some(new)),
            _ => Ok(None),
        }
    }
}

impl Advice for ReplaceAdvice {
    fn check(&self, project: &Utf8Path) -> anyhow::Result<bool> {
        Ok(self.rewritten(project)?.is_some())
    }

    fn apply(&self, workdir: &Utf8Path, _next_steps: &mut NextSteps) -> anyhow::Result<()> {
        if let Some(new) = self.rewritten(workdir)? {
            fs::write(workdir.join(&self.path), new)?;
        }
        Ok(())
    }
}
