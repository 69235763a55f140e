//! Rendering helpers (plain text) for terminal output.

use adviser_catalog::LoadedAdvice;
use adviser_types::{Mode, RunResults, SelftestSummary, Verdict};

const NAME_WIDTH: usize = 25;

pub fn render_list(advices: &[&LoadedAdvice]) -> String {
    if advices.is_empty() {
        return "No advice matched the filter.\n".to_string();
    }
    let mut out = String::from("Available advice:\n");
    for advice in advices {
        let meta = advice.meta();
        out.push_str(&format!("* {} : {}", advice.name(), meta.confidence.label()));
        if meta.preview {
            out.push_str(" (preview)");
        }
        if meta.manual {
            out.push_str(" (manual)");
        }
        out.push('\n');
    }
    out
}

pub fn render_show(advice: &LoadedAdvice) -> String {
    let meta = advice.meta();
    let mut out = String::new();
    out.push_str(&format!("name:        {}\n", advice.name()));
    out.push_str(&format!("kind:        {}\n", advice.kind()));
    out.push_str(&format!("directory:   {}\n", advice.dir()));
    out.push_str(&format!("confidence:  {}\n", meta.confidence.label()));
    out.push_str(&format!("preview:     {}\n", meta.preview));
    out.push_str(&format!("manual:      {}\n", meta.manual));
    out.push_str(&format!("order:       {}\n", meta.order));
    out.push_str(&format!(
        "self-test:   {}\n",
        if advice.has_fixture() {
            "fixture present"
        } else {
            "no fixture"
        }
    ));
    if let Some(desc) = &meta.description {
        out.push_str(&format!("\n{desc}\n"));
    }
    out
}

pub fn render_results(results: &RunResults, mode: Mode) -> String {
    if results.is_empty() {
        return "No advice matched the filter.\n".to_string();
    }
    let mut out = String::new();
    for r in results {
        if !r.success {
            out.push_str(&format!("{} failed: {}\n", r.advice_name, r.error));
            continue;
        }
        match mode {
            Mode::Diff if !r.message.is_empty() => {
                out.push_str(&format!("{}:\n{}", r.advice_name, r.message));
                if !r.message.ends_with('\n') {
                    out.push('\n');
                }
            }
            Mode::Diff => out.push_str(&format!("{}: No changes needed\n", r.advice_name)),
            Mode::Check | Mode::Apply => {
                out.push_str(&format!("{}: {}\n", r.advice_name, r.message));
            }
        }
        if r.modified {
            for step in &r.next_steps {
                out.push_str(&format!("{}: next step: {}\n", r.advice_name, step));
            }
        }
    }
    out
}

pub fn render_selftest(summary: &SelftestSummary) -> String {
    let mut out = String::new();
    for case in &summary.cases {
        out.push_str(&format!(
            "{:<width$}{}\n",
            case.advice_name,
            case.verdict.label(),
            width = NAME_WIDTH
        ));
        if let Some(err) = &case.error {
            out.push_str(&format!("    {err}\n"));
        }
        if let Some(diff) = &case.diff {
            for line in diff.lines() {
                out.push_str(&format!("    {line}\n"));
            }
        }
    }
    let passed = summary.count(Verdict::Pass);
    out.push_str(&format!(
        "\n{} passed, {} not passing\n",
        passed,
        summary.cases.len() - passed
    ));
    out
}
