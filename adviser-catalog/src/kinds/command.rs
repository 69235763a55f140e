//! `command`: shell out for both the check and the apply step.
//!
//! ```toml
//! kind = "command"
//! [params]
//! check = ["grep", "-q", "Hello", "README.txt"]
//! apply = ["sh", "{advice_dir}/fix.sh"]
//! ```
//!
//! The check exits 0 when the advice applies and 1 when it does not; any other
//! exit is an error. The apply step must exit 0. Lines it prints that start
//! with `next-step:` are collected as next steps.

use adviser_api::{Advice, AdviceSource, NextSteps};
use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::process::{Command, Output};
use tracing::debug;

pub const KIND: &str = "command";

const ADVICE_DIR_TOKEN: &str = "{advice_dir}";
const NEXT_STEP_PREFIX: &str = "next-step:";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Params {
    check: Vec<String>,
    apply: Vec<String>,
}

#[derive(Debug)]
pub struct CommandAdvice {
    name: String,
    dir: Utf8PathBuf,
    check: Vec<String>,
    apply: Vec<String>,
}

pub fn build(src: &AdviceSource<'_>) -> anyhow::Result<Box<dyn Advice>> {
    let params: Params = src.params()?;
    if params.check.is_empty() {
        bail!("`check` must name a program");
    }
    if params.apply.is_empty() {
        bail!("`apply` must name a program");
    }
    Ok(Box::new(CommandAdvice {
        name: src.name.to_string(),
        dir: src.dir.to_path_buf(),
        check: params.check,
        apply: params.apply,
    }))
}

impl CommandAdvice {
    fn output(&self, argv: &[String], cwd: &Utf8Path) -> anyhow::Result<Output> {
        let args: Vec<String> = argv
            .iter()
            .map(|a| a.replace(ADVICE_DIR_TOKEN, self.dir.as_str()))
            .collect();
        debug!(advice = %self.name, cwd = %cwd, args = ?args, "running advice command");

        let (program, rest) = args
            .split_first()
            .context("empty command line")?;
        let output = Command::new(program)
            .args(rest)
            .current_dir(cwd)
            .env("ADVICE_NAME", &self.name)
            .env("ADVICE_DIR", self.dir.as_str())
            .env("ADVICE_PROJECT", cwd.as_str())
            .output()
            .with_context(|| format!("failed to spawn {program}"))?;

        debug!(advice = %self.name, status = ?output.status.code(), "advice command finished");
        Ok(output)
    }
}

impl Advice for CommandAdvice {
    fn check(&self, project: &Utf8Path) -> anyhow::Result<bool> {
        let out = self.output(&self.check, project)?;
        match out.status.code() {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            code => bail!(
                "check command {:?} exited with {:?}: {}",
                self.check,
                code,
                String::from_utf8_lossy(&out.stderr).trim()
            ),
        }
    }

    fn apply(&self, workdir: &Utf8Path, next_steps: &mut NextSteps) -> anyhow::Result<()> {
        let out = self.output(&self.apply, workdir)?;
        if !out.status.success() {
            bail!(
                "apply command {:?} exited with {:?}: {}",
                self.apply,
                out.status.code(),
                String::from_utf8_lossy(&out.stderr).trim()
            );
        }
        let stdout = String::from_utf8_lossy(&out.stdout);
        for line in stdout.lines() {
            if let Some(step) = line.strip_prefix(NEXT_STEP_PREFIX) {
                next_steps.push(step.trim());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fs_err as fs;

    fn advice(check: &[&str], apply: &[&str], dir: &Utf8Path) -> CommandAdvice {
        CommandAdvice {
            name: "demo".to_string(),
            dir: dir.to_path_buf(),
            check: check.iter().map(|s| s.to_string()).collect(),
            apply: apply.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn tmp() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, path)
    }

    #[test]
    fn check_maps_exit_codes() {
        let (_d, root) = tmp();
        assert!(advice(&["true"], &["true"], &root).check(&root).unwrap());
        assert!(!advice(&["false"], &["true"], &root).check(&root).unwrap());
        let err = advice(&["sh", "-c", "exit 3"], &["true"], &root)
            .check(&root)
            .unwrap_err();
        assert!(err.to_string().contains("Some(3)"));
    }

    #[test]
    fn apply_runs_in_project_and_collects_next_steps() {
        let (_d, root) = tmp();
        let a = advice(
            &["true"],
            &[
                "sh",
                "-c",
                "echo \"$ADVICE_NAME\" > marker.txt; \
                 echo 'next-step: rerun the linter'; echo noise",
            ],
            &root,
        );
        let mut steps = NextSteps::new();
        a.apply(&root, &mut steps).unwrap();
        assert_eq!(fs::read_to_string(root.join("marker.txt")).unwrap(), "demo\n");
        assert_eq!(steps.as_slice(), ["rerun the linter".to_string()]);
    }

    #[test]
    fn advice_dir_token_is_expanded() {
        let (_d, root) = tmp();
        let advice_dir = root.join("advice");
        fs::create_dir_all(&advice_dir).unwrap();
        fs::write(advice_dir.join("present"), "").unwrap();
        let a = advice(&["test", "-f", "{advice_dir}/present"], &["true"], &advice_dir);
        assert!(a.check(&root).unwrap());
    }

    #[test]
    fn failing_apply_is_an_error() {
        let (_d, root) = tmp();
        let a = advice(&["true"], &["sh", "-c", "echo nope >&2; exit 1"], &root);
        let err = a.apply(&root, &mut NextSteps::new()).unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[test]
    fn build_rejects_empty_argv() {
        let params: toml::Table = toml::from_str("check = []\napply = [\"true\"]").unwrap();
        let src = AdviceSource {
            name: "demo",
            dir: Utf8Path::new("/tmp"),
            params: &params,
        };
        assert!(build(&src).is_err());
    }
}
