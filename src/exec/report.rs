use colored::Colorize;

use traverse::{Span, Traversal};
use workflow::Registry;

use super::Error;

/// Lifecycle of one task within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl TaskState {
    fn colored(&self) -> colored::ColoredString {
        match self {
            Self::Pending => "pending".dimmed(),
            Self::Running => "running".yellow(),
            Self::Succeeded => "succeeded".green(),
            Self::Failed => "failed".red(),
        }
    }
}

/// What a successful run did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// atomic steps that ran to completion
    pub steps_run: usize,
    /// per-file errors that were reported and skipped
    pub file_errors: usize,
}

/// States of every step in a traversal, plus the error that stopped it (if any).
///
/// Composite tasks don't have a state of their own;
/// theirs is derived from the steps they cover.
#[derive(Debug)]
pub struct RunReport {
    steps: Vec<TaskState>,
    pub(super) error: Option<anyhow::Error>,
    pub(super) file_errors: usize,
}

impl RunReport {
    pub fn new(traversal: &Traversal) -> Self {
        Self {
            steps: vec![TaskState::Pending; traversal.steps.len()],
            error: None,
            file_errors: 0,
        }
    }

    pub(super) fn set(&mut self, step: usize, state: TaskState) {
        self.steps[step] = state;
    }

    pub fn step_state(&self, step: usize) -> TaskState {
        self.steps[step]
    }

    /// State of a composite task, from the states of its steps.
    pub fn span_state(&self, span: &Span) -> TaskState {
        let states = &self.steps[span.steps.clone()];
        if states.contains(&TaskState::Failed) {
            TaskState::Failed
        } else if states.iter().all(|s| *s == TaskState::Succeeded) {
            TaskState::Succeeded
        } else if states.iter().all(|s| *s == TaskState::Pending) {
            TaskState::Pending
        } else {
            TaskState::Running
        }
    }

    /// State of the task that was invoked.
    pub fn goal_state(&self, traversal: &Traversal) -> TaskState {
        match traversal.spans.first() {
            Some(span) if span.task == traversal.goal => self.span_state(span),
            _ => self.steps.first().copied().unwrap_or(TaskState::Pending),
        }
    }

    /// Print the final state of every task in the traversal.
    pub fn print_summary(&self, traversal: &Traversal, reg: &Registry) {
        eprintln!("\n{}", "Task states:".magenta());
        for span in &traversal.spans {
            eprintln!("  {} {}", reg.name(span.task), self.span_state(span).colored());
        }
        for i in 0..self.steps.len() {
            eprintln!("  {} {}", traversal.step_path(i, reg), self.step_state(i).colored());
        }
        if self.file_errors > 0 {
            eprintln!("  {} file(s) reported errors", self.file_errors);
        }
    }

    /// `Ok` if the goal task succeeded, otherwise the error that stopped it.
    pub fn into_result(self, traversal: &Traversal, reg: &Registry) -> anyhow::Result<Outcome> {
        let failed = Error::TaskFailed(reg.name(traversal.goal).to_owned());
        match (self.goal_state(traversal), self.error) {
            (TaskState::Succeeded, None) => Ok(Outcome {
                steps_run: self.steps.len(),
                file_errors: self.file_errors,
            }),
            (_, Some(e)) => Err(e.context(failed)),
            (_, None) => Err(failed.into()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_composite_state() -> Result<()> {
        let reg = Registry::standard()?;
        let t = Traversal::create(&reg, reg.find("build:dev")?)?;
        let mut report = RunReport::new(&t);
        let clean = &t.spans[1];
        assert_eq!(TaskState::Pending, report.goal_state(&t));

        report.set(0, TaskState::Succeeded);
        report.set(1, TaskState::Running);
        assert_eq!(TaskState::Running, report.span_state(clean));

        report.set(1, TaskState::Succeeded);
        assert_eq!(TaskState::Succeeded, report.span_state(clean));
        assert_eq!(TaskState::Running, report.goal_state(&t));

        report.set(2, TaskState::Failed);
        assert_eq!(TaskState::Failed, report.goal_state(&t));
        assert_eq!(TaskState::Succeeded, report.span_state(clean));
        assert_eq!(TaskState::Pending, report.step_state(3));
        Ok(())
    }

    #[test]
    fn test_into_result() -> Result<()> {
        let reg = Registry::standard()?;
        let t = Traversal::create(&reg, reg.find("clean:js")?)?;
        let mut report = RunReport::new(&t);
        report.set(0, TaskState::Succeeded);
        report.file_errors = 2;
        assert_eq!(
            Outcome { steps_run: 1, file_errors: 2 },
            report.into_result(&t, &reg)?
        );

        let mut report = RunReport::new(&t);
        report.set(0, TaskState::Failed);
        report.error = Some(anyhow::anyhow!("disk on fire"));
        let e = report.into_result(&t, &reg).unwrap_err();
        assert_eq!("Task 'clean:js' failed", e.to_string());
        assert_eq!("disk on fire", e.root_cause().to_string());
        Ok(())
    }
}
