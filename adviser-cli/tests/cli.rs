#![allow(deprecated)]

use assert_cmd::Command;
use camino::Utf8PathBuf;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use std::path::Path;
use tempfile::TempDir;

fn fixtures() -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("workspace root")
        .join("tests/fixtures")
}

fn adviser() -> Command {
    let mut cmd = Command::cargo_bin("adviser").expect("adviser binary");
    cmd.env_remove("ADVICE_DIR")
        .env_remove("ADVICE_URL")
        .env_remove("RUST_LOG");
    cmd
}

/// `adviser` pointed at the good fixture collection, run from an empty dir.
fn with_advice(target: &Path) -> Command {
    let mut cmd = adviser();
    cmd.arg("--advice-dir")
        .arg(fixtures().join("advice").as_str())
        .arg("--target")
        .arg(target);
    cmd
}

fn git(root: &Path, args: &[&str]) {
    let out = std::process::Command::new("git")
        .args(["-c", "user.name=Test User", "-c", "user.email=test@example.com"])
        .args(args)
        .current_dir(root)
        .output()
        .expect("run git");
    assert!(
        out.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&out.stderr)
    );
}

fn target_repo(readme: &str) -> TempDir {
    let temp = TempDir::new().expect("temp dir");
    let root = temp.path();
    git(root, &["init", "--quiet", "--initial-branch", "main"]);
    std::fs::write(root.join("pyproject.toml"), "[project]\nname = \"demo\"\n").expect("write");
    std::fs::write(root.join("README.txt"), readme).expect("write");
    git(root, &["add", "-A"]);
    git(root, &["commit", "--quiet", "-m", "init"]);
    temp
}

fn with_identity(cmd: &mut Command) -> &mut Command {
    cmd.env("GIT_AUTHOR_NAME", "Test User")
        .env("GIT_AUTHOR_EMAIL", "test@example.com")
        .env("GIT_COMMITTER_NAME", "Test User")
        .env("GIT_COMMITTER_EMAIL", "test@example.com")
}

#[test]
fn help_lists_subcommands() {
    adviser()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("self-test"))
        .stdout(predicate::str::contains("apply"));
}

#[test]
fn list_hides_preview_advice_by_default() {
    let tmp = TempDir::new().unwrap();
    with_advice(tmp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Available advice:\n"))
        .stdout(predicate::str::contains("* shouty : GREEN\n"))
        .stdout(predicate::str::contains("* manual/bump-version : RED (manual)\n"))
        .stdout(predicate::str::contains("pip-tools").not());
}

#[test]
fn list_with_preview_shows_preview_advice() {
    let tmp = TempDir::new().unwrap();
    with_advice(tmp.path())
        .args(["list", "--preview"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* pip-tools : YELLOW (preview)\n"));
}

#[test]
fn list_respects_confidence_threshold() {
    let tmp = TempDir::new().unwrap();
    with_advice(tmp.path())
        .args(["list", "--confidence", "green"])
        .assert()
        .success()
        .stdout(predicate::str::contains("shouty"))
        .stdout(predicate::str::contains("python/typed-marker"))
        .stdout(predicate::str::contains("bump-version").not());
}

#[test]
fn list_json_is_ordered_array() {
    let tmp = TempDir::new().unwrap();
    let out = with_advice(tmp.path())
        .args(["list", "--format", "json"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let list: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let names: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["manual/bump-version", "shouty", "python/typed-marker"]);
    assert_eq!(list[1]["kind"], "command");
    assert_eq!(list[1]["confidence"], "green");
}

#[test]
fn missing_advice_source_is_an_error() {
    let tmp = TempDir::new().unwrap();
    adviser()
        .arg("--target")
        .arg(tmp.path())
        .arg("list")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no advice source configured"));
}

#[test]
fn names_and_all_are_mutually_exclusive() {
    let tmp = TempDir::new().unwrap();
    with_advice(tmp.path())
        .args(["check", "shouty", "-a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn run_requires_names_or_all() {
    let tmp = TempDir::new().unwrap();
    with_advice(tmp.path())
        .arg("diff")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn inplace_conflicts_with_dry_run() {
    let tmp = TempDir::new().unwrap();
    with_advice(tmp.path())
        .args(["apply", "-a", "--inplace", "-n"])
        .assert()
        .failure();
}

#[test]
fn show_describes_advice() {
    let tmp = TempDir::new().unwrap();
    with_advice(tmp.path())
        .args(["show", "shouty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("name:        shouty\n"))
        .stdout(predicate::str::contains("kind:        command\n"))
        .stdout(predicate::str::contains("self-test:   fixture present\n"));
}

#[test]
fn show_unknown_advice_fails() {
    let tmp = TempDir::new().unwrap();
    with_advice(tmp.path())
        .args(["show", "nope"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no advice named 'nope'"));
}

#[test]
fn self_test_passes_on_good_fixtures() {
    let tmp = TempDir::new().unwrap();
    with_advice(tmp.path())
        .arg("self-test")
        .assert()
        .success()
        .stdout(predicate::str::contains("shouty"))
        .stdout(predicate::str::contains("4 passed, 0 not passing"));
}

#[test]
fn self_test_exit_code_combines_failures_and_errors() {
    let tmp = TempDir::new().unwrap();
    adviser()
        .arg("--advice-dir")
        .arg(fixtures().join("bad_advice").as_str())
        .arg("--target")
        .arg(tmp.path())
        .arg("self-test")
        .assert()
        .code(9)
        .stdout(predicate::str::contains("NOT DONE"))
        .stdout(predicate::str::contains("DID NOT RUN"));
}

#[test]
fn self_test_not_done_alone_exits_zero() {
    let tmp = TempDir::new().unwrap();
    adviser()
        .arg("--advice-dir")
        .arg(fixtures().join("bad_advice").as_str())
        .arg("--target")
        .arg(tmp.path())
        .args(["self-test", "not_done", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"not_done\""))
        .stdout(predicate::str::contains("\"verdict\": \"not_done\""))
        .stdout(predicate::str::contains("wrong_contents").not());
}

#[test]
fn config_file_supplies_advice_dir_and_filter() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("adviser.toml"),
        format!(
            "[advice]\ndir = \"{}\"\n\n[filter]\nconfidence = \"green\"\n",
            fixtures().join("advice")
        ),
    )
    .unwrap();

    adviser()
        .arg("--target")
        .arg(tmp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("shouty"))
        .stdout(predicate::str::contains("bump-version").not());
}

#[test]
fn config_command_reports_merged_settings() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("adviser.toml"),
        "[run]\nremote = \"upstream\"\n\n[filter]\nconfidence = \"red\"\n",
    )
    .unwrap();

    let out = with_advice(tmp.path())
        .args(["config", "--confidence", "yellow"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(value["config"]["remote"], "upstream");
    assert_eq!(value["config"]["confidence"], "yellow");
    assert_eq!(value["config"]["branch_prefix"], "advice-");
    assert!(value["advice_path"].as_str().unwrap().ends_with("advice"));
}

#[test]
fn check_reports_available_changes() {
    let repo = target_repo("Hello\n");
    with_advice(repo.path())
        .args(["check", "shouty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("shouty: Changes can be applied\n"));
}

#[test]
fn diff_prints_staged_changes() {
    let repo = target_repo("Hello\n");
    with_advice(repo.path())
        .args(["diff", "shouty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("shouty:\n"))
        .stdout(predicate::str::contains("+HELLO"));
}

#[test]
fn apply_pushes_branch_and_reports_it() {
    let repo = target_repo("Hello\n");
    with_identity(&mut with_advice(repo.path()))
        .args(["apply", "shouty"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "shouty: Changes applied to branch advice-shouty\n",
        ))
        .stdout(predicate::str::contains("shouty: next step:"));

    let out = std::process::Command::new("git")
        .args(["branch", "--list", "advice-*"])
        .current_dir(repo.path())
        .output()
        .unwrap();
    assert!(String::from_utf8_lossy(&out.stdout).contains("advice-shouty"));
}

#[test]
fn apply_json_report_carries_branch_name() {
    let repo = target_repo("Hello\n");
    let out = with_identity(&mut with_advice(repo.path()))
        .args(["apply", "shouty", "--format", "json"])
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["mode"], "apply");
    assert_eq!(report["tool"]["name"], "adviser");
    assert_eq!(report["results"][0]["advice_name"], "shouty");
    assert_eq!(report["results"][0]["branch_name"], "advice-shouty");
}

#[test]
fn apply_inplace_edits_working_tree() {
    let repo = target_repo("Hello\n");
    with_advice(repo.path())
        .args(["apply", "shouty", "--inplace"])
        .assert()
        .success()
        .stdout(predicate::str::contains("shouty: Changes applied in place\n"));

    let readme = std::fs::read_to_string(repo.path().join("README.txt")).unwrap();
    assert_eq!(readme, "HELLO\n");
}

#[test]
fn empty_selection_exits_nonzero() {
    let repo = target_repo("Hello\n");
    with_advice(repo.path())
        .args(["check", "does-not-exist"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("No advice matched the filter."));
}

#[test]
fn target_outside_git_is_fatal() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("pyproject.toml"), "").unwrap();
    with_advice(tmp.path())
        .args(["check", "-a"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot read the current branch"));
}
