use adviser_api::ADVICE_MANIFEST;
use adviser_catalog::Registry;
use adviser_context::PROJECT_MARKERS;
use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use fs_err as fs;
use std::path::PathBuf;
use std::process::Command as ProcessCommand;

#[derive(Debug, Parser)]
#[command(name = "xtask", about = "Workspace helper tasks")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print project markers, the manifest file name and the built-in advice kinds.
    PrintMarkers,
    /// Create a new advice skeleton with an empty before/after fixture.
    Scaffold {
        /// Advice name; `/` nests it in a group directory.
        name: String,
        #[arg(long, default_value = "tests/fixtures/advice")]
        dir: PathBuf,
    },
    /// Self-test the fixture advice collection with the release CLI.
    SelfTest {
        #[arg(long, default_value = "tests/fixtures/advice")]
        dir: PathBuf,
    },
}

const SKELETON: &str = r#"kind = "command"
confidence = "unset"
preview = true
description = "Describe what this advice changes."

[params]
check = ["false"]
apply = ["true"]
"#;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::PrintMarkers => {
            for marker in PROJECT_MARKERS {
                println!("project marker: {marker}");
            }
            println!("advice manifest: {ADVICE_MANIFEST}");
            for kind in Registry::builtin().kinds() {
                println!("advice kind: {kind}");
            }
        }
        Command::Scaffold { name, dir } => {
            if name.split('/').any(|part| part.is_empty() || part.starts_with('.')) {
                bail!("invalid advice name '{name}'");
            }
            let root = dir.join(&name);
            if root.exists() {
                bail!("{} already exists", root.display());
            }
            for fixture in ["a", "b"] {
                fs::create_dir_all(root.join(fixture))
                    .with_context(|| format!("create {}", root.join(fixture).display()))?;
            }
            fs::write(root.join(ADVICE_MANIFEST), SKELETON)?;
            println!("created {}", root.display());
        }
        Command::SelfTest { dir } => {
            let status = ProcessCommand::new("cargo")
                .args(["run", "--release", "-p", "adviser", "--", "--advice-dir"])
                .arg(&dir)
                .arg("self-test")
                .status()
                .context("run adviser self-test")?;
            if !status.success() {
                bail!("self-test failed");
            }
        }
    }
    Ok(())
}
