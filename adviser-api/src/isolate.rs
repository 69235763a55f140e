use crate::advice::Advice;
use crate::next_steps::NextSteps;
use anyhow::anyhow;
use camino::Utf8Path;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Call [`Advice::run`], turning a panic into an error.
pub fn run_isolated(
    advice: &dyn Advice,
    workdir: &Utf8Path,
    next_steps: &mut NextSteps,
) -> anyhow::Result<bool> {
    catch(|| advice.run(workdir, next_steps))
}

/// Call [`Advice::check`], turning a panic into an error.
pub fn check_isolated(advice: &dyn Advice, project: &Utf8Path) -> anyhow::Result<bool> {
    catch(|| advice.check(project))
}

fn catch<T>(f: impl FnOnce() -> anyhow::Result<T>) -> anyhow::Result<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(anyhow!("advice panicked: {}", panic_message(&*payload))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
