use std::time::Duration;

use colored::Colorize;

use util::format_duration;

use crate::pipeline::PipelineCounters;

/// All interactions with the text UI should go through this struct.
pub struct Ui {
    /// -v count; anything above 0 displays extra info to the user
    verbose: u8,
}

impl Ui {
    pub fn new(verbose: u8) -> Self {
        Self { verbose }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose > 0
    }

    pub fn task_start(&self, task: &str) {
        eprintln!("Starting '{}'...", task.cyan());
    }

    pub fn task_finish(&self, task: &str, elapsed: Duration) {
        eprintln!(
            "Finished '{}' after {}",
            task.cyan(),
            format_duration(elapsed).magenta()
        );
    }

    pub fn task_failed(&self, task: &str, elapsed: Duration) {
        eprintln!(
            "'{}' {} after {}",
            task.cyan(),
            "errored".red(),
            format_duration(elapsed).magenta()
        );
    }

    /// Progress message from inside a task.
    pub fn log(&self, msg: &str) {
        eprintln!("{msg}");
    }

    pub fn counts(&self, counters: &PipelineCounters) {
        eprintln!("# src files:  {}", counters.discovered);
        eprintln!("# dest files: {}", counters.emitted);
    }

    /// A file that failed in one pipeline stage.
    pub fn file_error(&self, title: &str, msg: &str) {
        eprintln!("{} {msg}", format!("[{title}]").red());
    }

    pub fn verbose_msg(&self, msg: &str) {
        if self.is_verbose() {
            eprintln!("{}", msg);
        }
    }
}
