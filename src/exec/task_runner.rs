use std::time::Duration;

use anyhow::{Context, Result};

use traverse::Traversal;
use util::Timer;
use workflow::{Action, Registry};

use crate::{scripts, styles};

use super::{Env, RunReport, TaskState};

fn elapsed(timer: &Timer) -> Duration {
    timer.elapsed().unwrap_or_default()
}

/// `TaskRunner` runs the steps of a traversal one at a time.
///
/// Each step is announced when it starts and when it finishes, and so is
/// every composite task as its first step starts and its last step finishes.
/// The first step that fails stops the run: it and every composite task
/// containing it are marked failed, and no later step is started.
/// Files already written by earlier steps are left in place.
pub struct TaskRunner<'a> {
    reg: &'a Registry,
    env: Env<'a>,
}

impl<'a> TaskRunner<'a> {
    pub fn new(reg: &'a Registry, env: Env<'a>) -> Self {
        Self { reg, env }
    }

    pub fn run(&self, traversal: &Traversal) -> RunReport {
        let ui = self.env.ui;
        let mut report = RunReport::new(traversal);
        let mut span_timers: Vec<Option<Timer>> = traversal.spans.iter().map(|_| None).collect();

        for (i, step) in traversal.steps.iter().enumerate() {
            // composites are entered outermost first:
            for (s, span) in traversal.spans.iter().enumerate() {
                if span.steps.start == i {
                    ui.task_start(self.reg.name(span.task));
                    span_timers[s] = Some(Timer::now());
                }
            }

            let name = self.reg.name(step.task);
            let timer = Timer::now();
            ui.task_start(name);
            report.set(i, TaskState::Running);
            log::debug!("running {}", traversal.step_path(i, self.reg));

            let result = self
                .run_action(step.action)
                .with_context(|| format!("while running '{}'", traversal.step_path(i, self.reg)));

            let done = match result {
                Ok(()) => {
                    report.set(i, TaskState::Succeeded);
                    ui.task_finish(name, elapsed(&timer));
                    true
                }
                Err(e) => {
                    report.set(i, TaskState::Failed);
                    ui.task_failed(name, elapsed(&timer));
                    report.error = Some(e);
                    false
                }
            };

            // ...and left innermost first:
            for (s, span) in traversal.spans.iter().enumerate().rev() {
                let span_elapsed = span_timers[s].as_ref().map(elapsed).unwrap_or_default();
                if done && span.steps.end == i + 1 {
                    ui.task_finish(self.reg.name(span.task), span_elapsed);
                } else if !done && span.steps.contains(&i) {
                    ui.task_failed(self.reg.name(span.task), span_elapsed);
                }
            }

            if !done {
                break;
            }
        }

        report.file_errors = self.env.reporter.error_count();
        report
    }

    fn run_action(&self, action: Action) -> Result<()> {
        let env = &self.env;
        let paths = env.paths;
        match action {
            Action::Clean(kind) => {
                for dir in paths.output_dirs(kind) {
                    let deleted = env
                        .fs
                        .clean_dir(&env.fs.resolve_dir(dir), paths.clean_exclude(kind))?;
                    log::info!("deleted {deleted} entries under {dir}");
                }
            }
            Action::CompileStyles(target) => {
                styles::compile(env, paths.style_input(target), paths.style_output(target))?;
            }
            Action::MinifyStyles(target) => {
                styles::compile_and_minify(
                    env,
                    paths.style_input(target),
                    paths.style_output(target),
                )?;
            }
            Action::BundleScripts => {
                scripts::bundle(env, &paths.scripts, &paths.scripts_output, false)?;
            }
            Action::BundleAndMinifyScripts => {
                scripts::bundle(env, &paths.scripts, &paths.scripts_output, true)?;
            }
        }
        Ok(())
    }
}
