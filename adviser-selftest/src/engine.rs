use crate::compare::{PLACEHOLDER_MANIFEST, compare_trees};
use adviser_api::{NextSteps, check_isolated, run_isolated};
use adviser_catalog::{Catalog, Filter, LoadedAdvice};
use adviser_types::{CaseReport, SelftestSummary, Verdict};
use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use tempfile::TempDir;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

pub const FIXTURE_BEFORE: &str = "a";
pub const FIXTURE_AFTER: &str = "b";

/// Run the fixture case of every advice `filter` admits that has one.
pub fn run_selftest(catalog: &Catalog, filter: &Filter) -> SelftestSummary {
    let mut summary = SelftestSummary::default();
    for advice in catalog.order(filter) {
        if !advice.dir().join(FIXTURE_BEFORE).is_dir() {
            debug!(advice = advice.name(), "no fixture, skip");
            continue;
        }
        let case = run_case(advice);
        info!(advice = advice.name(), verdict = %case.verdict, "self-test case finished");
        summary.push(case);
    }
    summary
}

/// Run one advice against its fixture. Errors and panics become [`Verdict::Error`].
pub fn run_case(advice: &LoadedAdvice) -> CaseReport {
    match try_case(advice) {
        Ok(report) => report,
        Err(e) => {
            warn!(advice = advice.name(), error = %format!("{e:#}"), "self-test case raised");
            CaseReport {
                advice_name: advice.name().to_string(),
                verdict: Verdict::Error,
                diff: None,
                error: Some(format!("{e:#}")),
            }
        }
    }
}

fn try_case(advice: &LoadedAdvice) -> anyhow::Result<CaseReport> {
    let before = advice.dir().join(FIXTURE_BEFORE);
    let after = advice.dir().join(FIXTURE_AFTER);
    if !after.is_dir() {
        bail!("{before} has no matching {FIXTURE_AFTER}/ fixture");
    }

    let scratch = TempDir::new().context("create scratch directory")?;
    let workdir = Utf8PathBuf::from_path_buf(scratch.path().join("workdir"))
        .map_err(|p| anyhow::anyhow!("scratch path is not UTF-8: {}", p.display()))?;
    copy_tree(&before, &workdir)?;
    let placeholder = workdir.join(PLACEHOLDER_MANIFEST);
    if !placeholder.exists() {
        fs::write(&placeholder, "")?;
    }

    let mut next_steps = NextSteps::new();
    let ran = run_isolated(advice, &workdir, &mut next_steps)?;
    let cmp = compare_trees(&after, &workdir)?;
    let still_wants_to_run = check_isolated(advice, &workdir)?;

    let verdict = if still_wants_to_run {
        Verdict::NotDone
    } else if cmp.differs() {
        Verdict::Fail
    } else if !ran {
        Verdict::DidNotRun
    } else {
        Verdict::Pass
    };

    Ok(CaseReport {
        advice_name: advice.name().to_string(),
        verdict,
        diff: cmp.differs().then_some(cmp.diff),
        error: None,
    })
}

fn copy_tree(src: &Utf8Path, dst: &Utf8Path) -> anyhow::Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry.with_context(|| format!("walk {src}"))?;
        let rel = entry.path().strip_prefix(src)?;
        let target = dst.as_std_path().join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
