/// Runs the steps of a traversal in order
mod task_runner;
pub use task_runner::TaskRunner;

/// Per-task states and the outcome of a run
mod report;
pub use report::{Outcome, RunReport, TaskState};

use workflow::PathConfig;

use crate::fs::Fs;
use crate::pipeline::Reporter;
use crate::tools::Toolchain;
use crate::ui::Ui;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Task '{0}' failed")]
    TaskFailed(String),
}

/// Everything an action needs while it runs.
pub struct Env<'a> {
    pub fs: &'a Fs,
    pub ui: &'a Ui,
    pub tools: &'a Toolchain,
    pub paths: &'a PathConfig,
    pub reporter: &'a Reporter<'a>,
}

/// Run `f` with an `Env` rooted at `root`, allowed to write under `root/out`.
#[cfg(test)]
pub fn test_env<T>(
    root: &std::path::Path,
    f: impl FnOnce(&Env) -> anyhow::Result<T>,
) -> anyhow::Result<T> {
    let fs = Fs::new(root, &["out"]);
    let ui = Ui::new(0);
    let tools = Toolchain::default();
    let paths = PathConfig::default();
    let reporter = Reporter::new(&ui);
    f(&Env {
        fs: &fs,
        ui: &ui,
        tools: &tools,
        paths: &paths,
        reporter: &reporter,
    })
}
